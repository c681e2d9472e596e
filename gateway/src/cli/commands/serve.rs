use crate::cli::{Commands, ServeArgs};
use crate::config::Config;
use crate::guardrails::GuardrailsService;
use crate::http::ApiServer;
use crate::CliError;

use super::load_registry;

pub async fn handle_serve(serve_args: ServeArgs, config_path: String) -> Result<(), CliError> {
    let config = Config::load(&config_path)?;
    let config = config.apply_cli_overrides(&Commands::Serve(serve_args));

    let registry = load_registry(config.guards_config_dir())?;
    let client = reqwest::Client::builder()
        .build()
        .map_err(|e| CliError::CustomError(e.to_string()))?;
    let guards = GuardrailsService::new(registry, client, config.guards.default_model.clone())?;

    let api_server = ApiServer::new(config, guards);
    api_server.start()?.await?;
    Ok(())
}
