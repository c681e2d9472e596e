use std::path::PathBuf;

use crate::config::Config;
use crate::run;
use crate::CliError;
use ::tracing::info;

use super::load_registry;

pub async fn handle_list(config_path: String, guards_dir: Option<PathBuf>) -> Result<(), CliError> {
    let config = Config::load(&config_path)?;
    let config_dir = guards_dir.unwrap_or_else(|| config.guards_config_dir());
    let registry = load_registry(config_dir)?;

    info!("Found {} guards\n", registry.len());

    run::table::pretty_print_guards(&registry.guards());
    Ok(())
}
