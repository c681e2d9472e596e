pub mod list;
pub mod serve;

use std::path::PathBuf;

use guardgate_guardrails::registry::GuardRegistry;
use tracing::info;

use crate::CliError;

pub(crate) fn load_registry(config_dir: PathBuf) -> Result<GuardRegistry, CliError> {
    info!("Loading guard configs from {}", config_dir.display());
    Ok(GuardRegistry::load(&config_dir)?)
}
