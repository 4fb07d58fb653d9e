use async_trait::async_trait;

use crate::core::error::OracleError;

/// A natural-language completion service used purely as a classifier.
///
/// Implementations make one call per invocation and never retry; the decision
/// maker turns any error into the default decision.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Sends `system_instruction` and the raw `query`, returning the model's raw text.
    async fn complete(&self, system_instruction: &str, query: &str) -> Result<String, OracleError>;
}
