use std::sync::Arc;

use guardgate_core::types::guardrails::service::GuardAdapter;
use guardgate_core::types::guardrails::{GuardConfig, GuardError, GuardVerdict};
use guardgate_core::types::moderation::ModerationResult;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::guards::categories;
use crate::guards::prompt::{PromptBuilder, Turn};
use crate::guards::verdict::parse_verdict;

#[derive(Debug, Serialize)]
struct CompletionBody<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    text: String,
}

#[derive(Debug, Deserialize)]
struct CompletionReply {
    choices: Vec<CompletionChoice>,
}

/// Talks to a Llama Guard 3 model served behind an OpenAI style `/completions` endpoint
pub struct LlamaGuardAdapter {
    config: Arc<GuardConfig>,
    client: reqwest::Client,
}

impl LlamaGuardAdapter {
    pub fn new(config: Arc<GuardConfig>, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    fn moderation_prompt(&self, text: &str) -> String {
        PromptBuilder::new()
            .with_categories(&self.config.categories)
            .build(&[Turn::user(text)])
    }

    fn completion_prompt(&self, text: &str) -> String {
        PromptBuilder::new().build(&[Turn::user(text)])
    }

    /// Sends one prompt and returns the untrimmed text of the first choice
    async fn send(&self, prompt: &str) -> Result<String, GuardError> {
        let config = &self.config;
        let body = CompletionBody {
            model: &config.target_model_name,
            prompt,
        };

        let mut request = self
            .client
            .post(&config.target)
            .timeout(config.request_timeout)
            .json(&body);
        if let Some(token) = config.bearer_token() {
            request = request.bearer_auth(token);
        }

        debug!("Calling guard backend {} for {}", config.target, config.id);
        let response = request.send().await.map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let detail = response.text().await.unwrap_or_default();
            return Err(GuardError::BackendError {
                status: status.as_u16(),
                detail,
            });
        }

        let bytes = response.bytes().await.map_err(|e| self.transport_error(e))?;
        let reply: CompletionReply = serde_json::from_slice(&bytes)
            .map_err(|e| GuardError::BackendProtocolError(e.to_string()))?;

        reply
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.text)
            .ok_or_else(|| GuardError::BackendProtocolError("response has no choices".to_string()))
    }

    fn transport_error(&self, error: reqwest::Error) -> GuardError {
        if error.is_timeout() {
            GuardError::BackendTimeout {
                guard: self.config.id.clone(),
                timeout: self.config.request_timeout,
            }
        } else {
            GuardError::BackendUnavailable(error.to_string())
        }
    }
}

#[async_trait::async_trait]
impl GuardAdapter for LlamaGuardAdapter {
    fn guard_id(&self) -> &str {
        &self.config.id
    }

    async fn classify(&self, text: &str) -> Result<GuardVerdict, GuardError> {
        let raw = self.send(&self.moderation_prompt(text)).await?;
        parse_verdict(&raw)
    }

    fn to_moderation_result(&self, verdict: &GuardVerdict) -> ModerationResult {
        categories::to_moderation_result(verdict)
    }

    async fn complete(&self, prompt: &str) -> Result<String, GuardError> {
        let raw = self.send(&self.completion_prompt(prompt)).await?;
        Ok(raw.trim().to_string())
    }
}
