use guardgate_core::types::guardrails::service::GuardAdapter;
use guardgate_core::types::guardrails::{GuardError, GuardVerdict};
use guardgate_core::types::moderation::ModerationResult;
use tracing::field;
use tracing::info_span;
use tracing_futures::Instrument;

pub const SPAN_GUARD_EVALUATION: &str = "guard_evaluation";

pub struct TracedGuard {
    inner: Box<dyn GuardAdapter>,
}

impl TracedGuard {
    pub fn new(inner: Box<dyn GuardAdapter>) -> Self {
        Self { inner }
    }
}

#[async_trait::async_trait]
impl GuardAdapter for TracedGuard {
    fn guard_id(&self) -> &str {
        self.inner.guard_id()
    }

    async fn classify(&self, text: &str) -> Result<GuardVerdict, GuardError> {
        let span = info_span!(
            target: "guardgate::guard",
            SPAN_GUARD_EVALUATION,
            guard = self.inner.guard_id(),
            operation = "classify",
            result = field::Empty,
            error = field::Empty
        );

        let result = self.inner.classify(text).instrument(span.clone()).await;
        match &result {
            Ok(GuardVerdict::Safe) => {
                span.record("result", "safe");
            }
            Ok(GuardVerdict::Unsafe {
                violated_categories,
            }) => {
                span.record(
                    "result",
                    format!("unsafe {}", violated_categories.join(",")).as_str(),
                );
            }
            Err(e) => {
                span.record("error", e.to_string().as_str());
            }
        }

        result
    }

    fn to_moderation_result(&self, verdict: &GuardVerdict) -> ModerationResult {
        self.inner.to_moderation_result(verdict)
    }

    async fn complete(&self, prompt: &str) -> Result<String, GuardError> {
        let span = info_span!(
            target: "guardgate::guard",
            SPAN_GUARD_EVALUATION,
            guard = self.inner.guard_id(),
            operation = "complete",
            result = field::Empty,
            error = field::Empty
        );

        let result = self.inner.complete(prompt).instrument(span.clone()).await;
        match &result {
            Ok(text) => {
                span.record("result", text.len());
            }
            Err(e) => {
                span.record("error", e.to_string().as_str());
            }
        }

        result
    }
}
