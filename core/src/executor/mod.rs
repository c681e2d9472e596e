use crate::types::guardrails::service::GuardResolver;
use crate::types::guardrails::GuardError;

pub mod completions;
pub mod moderation;

#[cfg(test)]
mod tests;

/// Picks the requested model, falling back to the resolver's default guard
pub fn resolve_model_name(
    requested: Option<String>,
    resolver: &dyn GuardResolver,
) -> Result<String, GuardError> {
    match requested {
        Some(model) => Ok(model),
        None => resolver
            .default_guard()
            .map(str::to_string)
            .ok_or_else(|| {
                GuardError::InvalidInput(
                    "model is required when no default guard is configured".to_string(),
                )
            }),
    }
}
