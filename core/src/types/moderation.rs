use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::guardrails::{GuardError, GuardVerdict, InputType};

/// Externally exposed moderation categories
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModerationCategory {
    #[serde(rename = "sexual")]
    Sexual,
    #[serde(rename = "hate")]
    Hate,
    #[serde(rename = "illicit")]
    Illicit,
    #[serde(rename = "illicit/violent")]
    IllicitViolent,
    #[serde(rename = "harassment")]
    Harassment,
    #[serde(rename = "self-harm")]
    SelfHarm,
    #[serde(rename = "sexual/minors")]
    SexualMinors,
    #[serde(rename = "hate/threatening")]
    HateThreatening,
    #[serde(rename = "violence/graphic")]
    ViolenceGraphic,
    #[serde(rename = "self-harm/intent")]
    SelfHarmIntent,
    #[serde(rename = "self-harm/instructions")]
    SelfHarmInstructions,
    #[serde(rename = "harassment/threatening")]
    HarassmentThreatening,
    #[serde(rename = "violence")]
    Violence,
}

impl ModerationCategory {
    pub const ALL: [ModerationCategory; 13] = [
        ModerationCategory::Sexual,
        ModerationCategory::Hate,
        ModerationCategory::Illicit,
        ModerationCategory::IllicitViolent,
        ModerationCategory::Harassment,
        ModerationCategory::SelfHarm,
        ModerationCategory::SexualMinors,
        ModerationCategory::HateThreatening,
        ModerationCategory::ViolenceGraphic,
        ModerationCategory::SelfHarmIntent,
        ModerationCategory::SelfHarmInstructions,
        ModerationCategory::HarassmentThreatening,
        ModerationCategory::Violence,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModerationCategory::Sexual => "sexual",
            ModerationCategory::Hate => "hate",
            ModerationCategory::Illicit => "illicit",
            ModerationCategory::IllicitViolent => "illicit/violent",
            ModerationCategory::Harassment => "harassment",
            ModerationCategory::SelfHarm => "self-harm",
            ModerationCategory::SexualMinors => "sexual/minors",
            ModerationCategory::HateThreatening => "hate/threatening",
            ModerationCategory::ViolenceGraphic => "violence/graphic",
            ModerationCategory::SelfHarmIntent => "self-harm/intent",
            ModerationCategory::SelfHarmInstructions => "self-harm/instructions",
            ModerationCategory::HarassmentThreatening => "harassment/threatening",
            ModerationCategory::Violence => "violence",
        }
    }
}

/// Moderation result for one input unit, in the OpenAI moderation schema
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModerationResult {
    pub flagged: bool,
    pub categories: BTreeMap<ModerationCategory, bool>,
    pub category_scores: BTreeMap<ModerationCategory, f64>,
    pub category_applied_input_types: BTreeMap<ModerationCategory, Vec<InputType>>,
}

impl ModerationResult {
    /// Baseline result: nothing flagged, every score 0.0, every category applied to text
    pub fn safe() -> Self {
        Self {
            flagged: false,
            categories: ModerationCategory::ALL.iter().map(|c| (*c, false)).collect(),
            category_scores: ModerationCategory::ALL.iter().map(|c| (*c, 0.0)).collect(),
            category_applied_input_types: ModerationCategory::ALL
                .iter()
                .map(|c| (*c, vec![InputType::Text]))
                .collect(),
        }
    }

    pub fn flag(&mut self, category: ModerationCategory) {
        self.categories.insert(category, true);
        self.category_scores.insert(category, 1.0);
    }

    pub fn is_flagged(&self, category: ModerationCategory) -> bool {
        self.categories.get(&category).copied().unwrap_or(false)
    }

    pub fn score(&self, category: ModerationCategory) -> f64 {
        self.category_scores.get(&category).copied().unwrap_or(0.0)
    }
}

impl Default for ModerationResult {
    fn default() -> Self {
        Self::safe()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageUrl {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StructuredInput {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

/// One element of a batched moderation input.
///
/// Anything that is neither a string nor a recognised structured item is kept
/// as `Invalid` so the whole batch can be rejected with a precise error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ModerationInputItem {
    Text(String),
    Structured(StructuredInput),
    Invalid(serde_json::Value),
}

impl ModerationInputItem {
    pub fn input_type(&self) -> Option<InputType> {
        match self {
            ModerationInputItem::Text(_)
            | ModerationInputItem::Structured(StructuredInput::Text { .. }) => {
                Some(InputType::Text)
            }
            ModerationInputItem::Structured(StructuredInput::ImageUrl { .. }) => {
                Some(InputType::Image)
            }
            ModerationInputItem::Invalid(_) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ModerationInput {
    Text(String),
    Batch(Vec<ModerationInputItem>),
}

impl ModerationInput {
    pub fn into_items(self) -> Vec<ModerationInputItem> {
        match self {
            ModerationInput::Text(text) => vec![ModerationInputItem::Text(text)],
            ModerationInput::Batch(items) => items,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    #[serde(rename = "openai")]
    OpenAi,
    #[serde(rename = "llama-guard-3")]
    LlamaGuard3,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub input: ModerationInput,
    #[serde(default)]
    pub output_format: OutputFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ModerationResults {
    OpenAi(Vec<ModerationResult>),
    LlamaGuard(Vec<GuardVerdict>),
}

impl ModerationResults {
    pub fn len(&self) -> usize {
        match self {
            ModerationResults::OpenAi(results) => results.len(),
            ModerationResults::LlamaGuard(results) => results.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationResponse {
    pub id: String,
    pub model: String,
    pub results: ModerationResults,
}

/// Extracts the text of every item, failing the whole batch on the first non-text item
pub fn collect_texts(items: Vec<ModerationInputItem>) -> Result<Vec<String>, GuardError> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            ModerationInputItem::Text(text)
            | ModerationInputItem::Structured(StructuredInput::Text { text }) => Ok(text),
            ModerationInputItem::Structured(StructuredInput::ImageUrl { .. }) => {
                Err(GuardError::InvalidInput(format!(
                    "item {index} is an image; image moderation is not supported"
                )))
            }
            ModerationInputItem::Invalid(value) => Err(GuardError::InvalidInput(format!(
                "item {index} must be a string, got {value}"
            ))),
        })
        .collect()
}
