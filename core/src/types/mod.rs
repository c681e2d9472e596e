pub mod completions;
pub mod guardrails;
pub mod models;
pub mod moderation;
