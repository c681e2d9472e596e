//! Guard registry.
//!
//! Guards are declared in JSON files, each holding one or more named providers:
//!
//! ```json
//! {
//!   "local": {
//!     "api_key_variable": "LOCAL_GUARD_KEY",
//!     "prefix": "local/",
//!     "models": {
//!       "llama-guard-3": {
//!         "guard_type": "llama-guard-3",
//!         "target": "http://localhost:8080/v1/completions",
//!         "target_model_name": "meta-llama/Llama-Guard-3-8B"
//!       }
//!     }
//!   }
//! }
//! ```
//!
//! Every model is registered under `prefix + model_name`. The registry is built
//! once at startup and only read afterwards.
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use guardgate_core::types::guardrails::{
    GuardConfig, GuardError, GuardType, InputType, DEFAULT_LLAMA_GUARD_CATEGORIES,
    DEFAULT_REQUEST_TIMEOUT, IGNORED_API_KEY,
};
use secrecy::SecretString;
use serde::Deserialize;
use serde_with::rust::maps_duplicate_key_is_error;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read guard config directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to read guard config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse guard config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Guard {key} in {path} is already registered from {previous}")]
    DuplicateGuard {
        key: String,
        path: PathBuf,
        previous: PathBuf,
    },
    #[error("Guard {key} has an invalid target {target:?}: {reason}")]
    InvalidTarget {
        key: String,
        target: String,
        reason: String,
    },
    #[error("Guard {key} has an invalid request timeout {timeout}")]
    InvalidTimeout { key: String, timeout: f64 },
    #[error("Default guard {0} is not registered")]
    UnknownDefaultGuard(String),
}

/// One provider block of a guard config file
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    #[serde(default)]
    pub api_key_variable: Option<String>,
    #[serde(default)]
    pub prefix: String,
    #[serde(default, deserialize_with = "maps_duplicate_key_is_error::deserialize")]
    pub models: BTreeMap<String, GuardModelConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GuardModelConfig {
    pub guard_type: GuardType,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub categories: Option<Vec<String>>,
    #[serde(default)]
    pub input_types: Option<BTreeSet<InputType>>,
    pub target: String,
    pub target_model_name: String,
    /// Seconds
    #[serde(default)]
    pub request_timeout: Option<f64>,
}

/// Top level of a guard config file. A provider or model named twice in one
/// file fails the parse.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct ProvidersFile(
    #[serde(deserialize_with = "maps_duplicate_key_is_error::deserialize")]
    pub BTreeMap<String, ProviderConfig>,
);

fn default_categories(guard_type: GuardType) -> Vec<String> {
    match guard_type {
        GuardType::LlamaGuard3 => DEFAULT_LLAMA_GUARD_CATEGORIES
            .iter()
            .map(|category| category.to_string())
            .collect(),
    }
}

impl GuardModelConfig {
    fn into_guard_config(self, id: String, provider_api_key: &str) -> Result<GuardConfig, ConfigError> {
        let target = reqwest::Url::parse(&self.target).map_err(|e| ConfigError::InvalidTarget {
            key: id.clone(),
            target: self.target.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(target.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidTarget {
                key: id,
                target: self.target,
                reason: "scheme must be http or https".to_string(),
            });
        }

        let request_timeout = match self.request_timeout {
            None => DEFAULT_REQUEST_TIMEOUT,
            Some(secs) if secs.is_finite() && secs > 0.0 => Duration::from_secs_f64(secs),
            Some(secs) => {
                return Err(ConfigError::InvalidTimeout {
                    key: id,
                    timeout: secs,
                })
            }
        };

        let categories = self
            .categories
            .unwrap_or_else(|| default_categories(self.guard_type));

        let api_key = self
            .api_key
            .unwrap_or_else(|| provider_api_key.to_string());

        Ok(GuardConfig {
            id,
            guard_type: self.guard_type,
            api_key: SecretString::from(api_key),
            categories,
            input_types: self
                .input_types
                .unwrap_or_else(|| BTreeSet::from([InputType::Text])),
            target: self.target,
            target_model_name: self.target_model_name,
            request_timeout,
        })
    }
}

/// Flat namespace of guards loaded from every provider config file
#[derive(Debug, Default)]
pub struct GuardRegistry {
    guards: HashMap<String, Arc<GuardConfig>>,
    sources: HashMap<String, PathBuf>,
}

impl GuardRegistry {
    /// Loads every `*.json` file of `config_dir`, resolving API keys from the process environment
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        Self::load_with(config_dir, |name| std::env::var(name).ok())
    }

    pub fn load_with<P, F>(config_dir: P, env: F) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let dir = config_dir.as_ref();
        let read_dir_error = |source| ConfigError::ReadDir {
            path: dir.to_path_buf(),
            source,
        };

        let mut files = vec![];
        for entry in std::fs::read_dir(dir).map_err(read_dir_error)? {
            let path = entry.map_err(read_dir_error)?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        // Registration order must not depend on the filesystem
        files.sort();

        let mut registry = Self::default();
        for path in files {
            let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::ReadFile {
                path: path.clone(),
                source,
            })?;
            let providers: ProvidersFile =
                serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                    path: path.clone(),
                    source,
                })?;

            info!("Loading guard config {}", path.display());
            registry.register_providers(&path, providers, &env)?;
        }

        if registry.is_empty() {
            warn!("No guards registered from {}", dir.display());
        }

        Ok(registry)
    }

    /// Registers every model of every provider. Duplicate keys are rejected.
    pub fn register_providers<F>(
        &mut self,
        source: &Path,
        providers: ProvidersFile,
        env: &F,
    ) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        for (provider_name, provider) in providers.0 {
            let api_key = provider
                .api_key_variable
                .as_deref()
                .and_then(env)
                .unwrap_or_else(|| IGNORED_API_KEY.to_string());

            for (model_name, model) in provider.models {
                let key = format!("{}{}", provider.prefix, model_name);
                if let Some(previous) = self.sources.get(&key) {
                    return Err(ConfigError::DuplicateGuard {
                        key,
                        path: source.to_path_buf(),
                        previous: previous.clone(),
                    });
                }

                let config = model.into_guard_config(key.clone(), &api_key)?;
                debug!(
                    "Registered guard {} ({}) from provider {}",
                    key, config.guard_type, provider_name
                );

                self.sources.insert(key.clone(), source.to_path_buf());
                self.guards.insert(key, Arc::new(config));
            }
        }

        Ok(())
    }

    pub fn resolve(
        &self,
        model: &str,
        input_types: &[InputType],
    ) -> Result<Arc<GuardConfig>, GuardError> {
        let config = self
            .guards
            .get(model)
            .ok_or_else(|| GuardError::GuardNotFound(model.to_string()))?;

        if let Some(unsupported) = config.first_unsupported(input_types) {
            return Err(GuardError::UnsupportedInputType {
                guard: model.to_string(),
                requested: unsupported.to_string(),
            });
        }

        Ok(config.clone())
    }

    pub fn contains(&self, model: &str) -> bool {
        self.guards.contains_key(model)
    }

    /// All guards ordered by id
    pub fn guards(&self) -> Vec<&Arc<GuardConfig>> {
        let mut guards: Vec<&Arc<GuardConfig>> = self.guards.values().collect();
        guards.sort_by(|a, b| a.id.cmp(&b.id));
        guards
    }

    pub fn len(&self) -> usize {
        self.guards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }
}
