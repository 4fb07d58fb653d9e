use async_trait::async_trait;

use crate::core::error::OracleError;
use crate::core::oracle::Oracle;
use crate::llm::GeminiClient;

/// Classifies requests with a lightweight Gemini model.
#[derive(Clone)]
pub struct GeminiOracle {
    client: GeminiClient,
    model: String,
}

impl GeminiOracle {
    pub fn new(client: GeminiClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Oracle for GeminiOracle {
    async fn complete(&self, system_instruction: &str, query: &str) -> Result<String, OracleError> {
        self.client
            .gemini_complete(self.model.as_str(), query)
            .system(system_instruction)
            .await
            .map_err(|e| OracleError(e.to_string()))
    }
}
