use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

pub mod service;

/// Sentinel used when a provider does not name an API key variable, or the variable is unset.
pub const IGNORED_API_KEY: &str = "ignored";

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Standard Llama Guard 3 hazard taxonomy, used when a guard omits `categories`.
pub const DEFAULT_LLAMA_GUARD_CATEGORIES: [&str; 13] = [
    "S1: Violent Crimes.",
    "S2: Non-Violent Crimes.",
    "S3: Sex Crimes.",
    "S4: Child Exploitation.",
    "S5: Defamation.",
    "S6: Specialized Advice.",
    "S7: Privacy.",
    "S8: Intellectual Property.",
    "S9: Indiscriminate Weapons.",
    "S10: Hate.",
    "S11: Self-Harm.",
    "S12: Sexual Content.",
    "S13: Elections.",
];

/// Family of the backend safety model a guard talks to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum GuardType {
    #[serde(rename = "llama-guard-3", alias = "llama-guard")]
    LlamaGuard3,
}

impl GuardType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GuardType::LlamaGuard3 => "llama-guard-3",
        }
    }
}

impl fmt::Display for GuardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Modality of a moderated unit
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    Text,
    Image,
}

impl InputType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputType::Text => "text",
            InputType::Image => "image",
        }
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fully resolved configuration of one registered guard.
///
/// Built once while the registry loads and shared read-only afterwards.
#[derive(Debug)]
pub struct GuardConfig {
    /// Registry key, `prefix + model_name`
    pub id: String,
    pub guard_type: GuardType,
    pub api_key: SecretString,
    pub categories: Vec<String>,
    pub input_types: BTreeSet<InputType>,
    pub target: String,
    pub target_model_name: String,
    pub request_timeout: Duration,
}

impl GuardConfig {
    /// Returns the first requested input type this guard does not accept
    pub fn first_unsupported(&self, input_types: &[InputType]) -> Option<InputType> {
        input_types
            .iter()
            .find(|input_type| !self.input_types.contains(input_type))
            .copied()
    }

    /// Returns the API key to send to the backend, if one was configured
    pub fn bearer_token(&self) -> Option<&str> {
        let key = self.api_key.expose_secret();
        if key.is_empty() || key == IGNORED_API_KEY {
            None
        } else {
            Some(key)
        }
    }
}

/// The backend's own classification, before any category mapping
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "verdict", rename_all = "lowercase")]
pub enum GuardVerdict {
    Safe,
    Unsafe { violated_categories: Vec<String> },
}

impl GuardVerdict {
    pub fn is_safe(&self) -> bool {
        matches!(self, GuardVerdict::Safe)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GuardError {
    #[error("Guard {0} not found")]
    GuardNotFound(String),

    #[error("Input type {requested} not supported by guard model {guard}")]
    UnsupportedInputType { guard: String, requested: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Guard backend responded with status {status}: {detail}")]
    BackendError { status: u16, detail: String },

    #[error("Guard backend returned an unexpected payload: {0}")]
    BackendProtocolError(String),

    #[error("Guard backend returned a malformed verdict: {0:?}")]
    MalformedVerdict(String),

    #[error("Guard {guard} did not respond within {timeout:?}")]
    BackendTimeout { guard: String, timeout: Duration },

    #[error("Guard backend is unreachable: {0}")]
    BackendUnavailable(String),
}
