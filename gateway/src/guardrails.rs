use std::collections::HashMap;
use std::sync::Arc;

use guardgate_core::types::guardrails::service::{GuardAdapter, GuardResolver};
use guardgate_core::types::guardrails::{GuardError, InputType};
use guardgate_guardrails::guards::adapter_for;
use guardgate_guardrails::registry::{ConfigError, GuardRegistry};
use tracing::info;

/// Owns the registry and one ready adapter per registered guard
pub struct GuardrailsService {
    registry: GuardRegistry,
    adapters: HashMap<String, Arc<dyn GuardAdapter>>,
    default_guard: Option<String>,
}

impl GuardrailsService {
    pub fn new(
        registry: GuardRegistry,
        client: reqwest::Client,
        default_guard: Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(default_guard) = &default_guard {
            if !registry.contains(default_guard) {
                return Err(ConfigError::UnknownDefaultGuard(default_guard.clone()));
            }
        }

        let adapters = registry
            .guards()
            .into_iter()
            .map(|config| {
                let adapter: Arc<dyn GuardAdapter> =
                    Arc::from(adapter_for(config.clone(), client.clone()));
                (config.id.clone(), adapter)
            })
            .collect::<HashMap<_, _>>();

        info!("Guardrails service ready with {} guards", adapters.len());

        Ok(Self {
            registry,
            adapters,
            default_guard,
        })
    }
}

impl GuardResolver for GuardrailsService {
    fn resolve(
        &self,
        model: &str,
        input_types: &[InputType],
    ) -> Result<Arc<dyn GuardAdapter>, GuardError> {
        let config = self.registry.resolve(model, input_types)?;
        self.adapters
            .get(&config.id)
            .cloned()
            .ok_or_else(|| GuardError::GuardNotFound(model.to_string()))
    }

    fn guards(&self) -> Vec<(String, String)> {
        self.registry
            .guards()
            .into_iter()
            .map(|config| (config.id.clone(), config.guard_type.to_string()))
            .collect()
    }

    fn default_guard(&self) -> Option<&str> {
        self.default_guard.as_deref()
    }
}
