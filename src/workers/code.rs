use std::sync::Arc;

use async_trait::async_trait;

use crate::core::capability::{ConversationStore, TextCapability};
use crate::core::error::CapabilityError;
use crate::llm::{GeminiClient, GeminiContent, GeminiPart, GeminiTool};
use crate::workers::remember;

/// Code assistance with the provider's sandboxed code execution tool.
#[derive(Clone)]
pub struct CodeAssist {
    client: GeminiClient,
    model: String,
    store: Arc<dyn ConversationStore>,
}

impl CodeAssist {
    pub fn new(client: GeminiClient, model: impl Into<String>, store: Arc<dyn ConversationStore>) -> Self {
        Self {
            client,
            model: model.into(),
            store,
        }
    }
}

/// Renders text, then the executed code and its output as fenced blocks.
pub fn format_code_reply(parts: &[GeminiPart]) -> String {
    let text = parts.iter().find_map(|p| p.text.as_deref()).unwrap_or_default();
    let mut reply = text.to_string();

    if let Some(code) = parts
        .iter()
        .find_map(|p| p.executable_code.as_ref())
        .filter(|c| !c.code.is_empty())
    {
        reply.push_str(&format!(
            "\n```{}\n{}\n```",
            code.language.to_lowercase(),
            code.code
        ));
    }

    if let Some(result) = parts
        .iter()
        .find_map(|p| p.code_execution_result.as_ref())
        .filter(|r| !r.output.is_empty())
    {
        reply.push_str(&format!("\n**Output:**\n```\n{}\n```", result.output));
    }
    reply
}

#[async_trait]
impl TextCapability for CodeAssist {
    async fn respond(&self, user_id: &str, prompt: &str) -> Result<String, CapabilityError> {
        let response = self
            .client
            .call_gemini(
                self.model.as_str(),
                vec![GeminiContent::user(prompt)],
                None,
                None,
                vec![GeminiTool::code_execution()],
            )
            .await?;

        let reply = format_code_reply(response.parts());
        if reply.is_empty() {
            return Err(CapabilityError::Other("empty code response".to_string()));
        }
        remember(self.store.as_ref(), user_id, prompt, &reply).await;
        Ok(reply)
    }
}
