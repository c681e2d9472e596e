use crate::cli;
use minijinja::Environment;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const GUARDS_CONFIG_DIR_ENV: &str = "GUARDS_CONFIG_DIR";
pub const DEFAULT_GUARDS_CONFIG_DIR: &str = "/configs";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config file. Error: {0}")]
    ParseError(#[from] serde_yaml::Error),
    #[error("Failed to read template in config. Error: {0}")]
    ReadError(#[from] minijinja::Error),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct GuardsConfig {
    /// Directory holding the guard provider `*.json` files
    #[serde(default)]
    pub config_dir: Option<PathBuf>,
    /// Guard used when a request omits `model`
    #[serde(default)]
    pub default_model: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub guards: GuardsConfig,
}

fn replace_env_vars(content: String) -> Result<String, ConfigError> {
    let env = Environment::new();
    let template = env.template_from_str(&content)?;
    let parameters = template.undeclared_variables(false);

    let mut variables = HashMap::new();
    parameters.iter().for_each(|k| {
        if let Ok(v) = std::env::var(k) {
            variables.insert(k, v);
        };
    });

    Ok(template.render(variables)?)
}

impl Config {
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(config_path) {
            Ok(content) => Self::from_yaml(content),
            Err(_e) => Ok(Self::default()),
        }
    }

    pub fn from_yaml(content: String) -> Result<Self, ConfigError> {
        let content = replace_env_vars(content)?;
        // An empty file renders to an empty document
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(&content)?)
    }

    pub fn apply_cli_overrides(mut self, cli_opts: &cli::Commands) -> Self {
        if let cli::Commands::Serve(args) = cli_opts {
            if let Some(host) = &args.host {
                self.http.host = host.clone();
            }
            if let Some(port) = args.port {
                self.http.port = port;
            }

            if let Some(cors) = &args.cors_origins {
                self.http.cors_allowed_origins =
                    cors.split(',').map(|s| s.trim().to_string()).collect();
            }

            if let Some(guards_dir) = &args.guards_dir {
                self.guards.config_dir = Some(guards_dir.clone());
            }

            if let Some(default_model) = &args.default_model {
                self.guards.default_model = Some(default_model.clone());
            }
        }
        self
    }

    /// Config file value, then `GUARDS_CONFIG_DIR`, then `/configs`
    pub fn guards_config_dir(&self) -> PathBuf {
        self.guards
            .config_dir
            .clone()
            .or_else(|| std::env::var(GUARDS_CONFIG_DIR_ENV).ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_GUARDS_CONFIG_DIR))
    }
}
