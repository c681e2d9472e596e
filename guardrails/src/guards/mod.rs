use std::sync::Arc;

use guardgate_core::types::guardrails::service::GuardAdapter;
use guardgate_core::types::guardrails::{GuardConfig, GuardType};

pub mod categories;
pub mod llama_guard;
pub mod prompt;
pub mod traced;
pub mod verdict;

#[cfg(test)]
mod tests;

use llama_guard::LlamaGuardAdapter;
use traced::TracedGuard;

/// Builds the adapter for a guard's family. The returned adapter records a span per backend call.
pub fn adapter_for(config: Arc<GuardConfig>, client: reqwest::Client) -> Box<dyn GuardAdapter> {
    let inner: Box<dyn GuardAdapter> = match config.guard_type {
        GuardType::LlamaGuard3 => Box::new(LlamaGuardAdapter::new(config, client)),
    };
    Box::new(TracedGuard::new(inner))
}
