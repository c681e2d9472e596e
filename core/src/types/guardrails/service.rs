use std::sync::Arc;

use crate::types::guardrails::{GuardError, GuardVerdict, InputType};
use crate::types::moderation::ModerationResult;

/// Capability interface implemented once per guard family
#[async_trait::async_trait]
pub trait GuardAdapter: Send + Sync {
    /// Registry id of the guard this adapter serves
    fn guard_id(&self) -> &str;

    /// Asks the backend model for its raw safe/unsafe verdict on a single text
    async fn classify(&self, text: &str) -> Result<GuardVerdict, GuardError>;

    /// Re-expresses a backend verdict in the externally exposed taxonomy
    fn to_moderation_result(&self, verdict: &GuardVerdict) -> ModerationResult;

    async fn moderate(&self, text: &str) -> Result<ModerationResult, GuardError> {
        let verdict = self.classify(text).await?;
        Ok(self.to_moderation_result(&verdict))
    }

    /// Free-form completion against the backend, returning the trimmed text
    async fn complete(&self, prompt: &str) -> Result<String, GuardError>;
}

/// Resolves a client supplied model identifier to a ready adapter
pub trait GuardResolver: Send + Sync {
    fn resolve(
        &self,
        model: &str,
        input_types: &[InputType],
    ) -> Result<Arc<dyn GuardAdapter>, GuardError>;

    /// Registered guard ids with their guard type, sorted by id
    fn guards(&self) -> Vec<(String, String)>;

    /// Guard used when a request does not name a model
    fn default_guard(&self) -> Option<&str> {
        None
    }
}
