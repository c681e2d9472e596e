use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::types::guardrails::service::{GuardAdapter, GuardResolver};
use crate::types::guardrails::{GuardError, GuardVerdict, InputType};
use crate::types::moderation::{ModerationCategory, ModerationResult};

/// Scripted guard: texts containing "kill" are unsafe (S1), "fail" makes the backend
/// return 500 and a "slow" prefix delays the answer.
pub struct MockGuard {
    id: String,
    calls: AtomicUsize,
}

impl MockGuard {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn backend(&self, text: &str) -> Result<(), GuardError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if text.starts_with("slow") {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        if text.contains("fail") {
            return Err(GuardError::BackendError {
                status: 500,
                detail: "boom".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl GuardAdapter for MockGuard {
    fn guard_id(&self) -> &str {
        &self.id
    }

    async fn classify(&self, text: &str) -> Result<GuardVerdict, GuardError> {
        self.backend(text).await?;
        if text.contains("kill") {
            Ok(GuardVerdict::Unsafe {
                violated_categories: vec!["S1".to_string()],
            })
        } else {
            Ok(GuardVerdict::Safe)
        }
    }

    fn to_moderation_result(&self, verdict: &GuardVerdict) -> ModerationResult {
        let mut result = ModerationResult::safe();
        if !verdict.is_safe() {
            result.flagged = true;
            result.flag(ModerationCategory::Violence);
        }
        result
    }

    async fn complete(&self, prompt: &str) -> Result<String, GuardError> {
        self.backend(prompt).await?;
        Ok(format!("echo: {prompt}"))
    }
}

#[derive(Default)]
pub struct MockResolver {
    guards: HashMap<String, (Arc<MockGuard>, Vec<InputType>)>,
    default_guard: Option<String>,
}

impl MockResolver {
    pub fn with_guard(mut self, guard: Arc<MockGuard>, input_types: Vec<InputType>) -> Self {
        self.guards
            .insert(guard.guard_id().to_string(), (guard, input_types));
        self
    }

    pub fn with_default(mut self, id: &str) -> Self {
        self.default_guard = Some(id.to_string());
        self
    }
}

impl GuardResolver for MockResolver {
    fn resolve(
        &self,
        model: &str,
        input_types: &[InputType],
    ) -> Result<Arc<dyn GuardAdapter>, GuardError> {
        let (guard, supported) = self
            .guards
            .get(model)
            .ok_or_else(|| GuardError::GuardNotFound(model.to_string()))?;
        if let Some(missing) = input_types.iter().find(|t| !supported.contains(t)) {
            return Err(GuardError::UnsupportedInputType {
                guard: model.to_string(),
                requested: missing.to_string(),
            });
        }
        Ok(guard.clone() as Arc<dyn GuardAdapter>)
    }

    fn guards(&self) -> Vec<(String, String)> {
        let mut guards: Vec<(String, String)> = self
            .guards
            .keys()
            .map(|id| (id.clone(), "llama-guard-3".to_string()))
            .collect();
        guards.sort();
        guards
    }

    fn default_guard(&self) -> Option<&str> {
        self.default_guard.as_deref()
    }
}
