use serde::{Deserialize, Serialize};

use crate::types::guardrails::GuardError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum CompletionPrompt {
    Single(String),
    Batch(Vec<serde_json::Value>),
}

impl CompletionPrompt {
    /// Returns every prompt as text, failing on the first non-string element
    pub fn into_prompts(self) -> Result<Vec<String>, GuardError> {
        match self {
            CompletionPrompt::Single(prompt) => Ok(vec![prompt]),
            CompletionPrompt::Batch(prompts) => prompts
                .into_iter()
                .enumerate()
                .map(|(index, prompt)| match prompt {
                    serde_json::Value::String(prompt) => Ok(prompt),
                    other => Err(GuardError::InvalidInput(format!(
                        "prompt {index} must be a string, got {other}"
                    ))),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub prompt: CompletionPrompt,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionChoice {
    pub text: String,
    pub index: u32,
    pub logprobs: Option<serde_json::Value>,
    pub finish_reason: String,
}

/// Token accounting is not performed, every counter stays at zero
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CompletionUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<CompletionChoice>,
    pub usage: CompletionUsage,
}
