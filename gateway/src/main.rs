use clap::Parser;
use config::ConfigError;
use thiserror::Error;

mod cli;
mod config;
mod guardrails;
mod http;
mod run;
mod tracing;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    ServerError(#[from] http::ServerError),
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    #[error(transparent)]
    GuardConfigError(#[from] guardgate_guardrails::registry::ConfigError),
    #[error("Error: {0}")]
    CustomError(String),
}

pub const LOGO: &str = r#"
                            _                  _       
   __ _ _   _  __ _ _ __ __| | __ _  __ _  __ _| |_ ___ 
  / _` | | | |/ _` | '__/ _` |/ _` |/ _` |/ _` | __/ _ \
 | (_| | |_| | (_| | | | (_| | (_| | (_| | (_| | ||  __/
  \__, |\__,_|\__,_|_|  \__,_|\__, |\__,_|\__,_|\__\___|
  |___/                       |___/                    
"#;

#[actix_web::main]
async fn main() -> Result<(), CliError> {
    dotenv::dotenv().ok();

    let cli = cli::Cli::parse();
    tracing::init_tracing();

    match cli.command {
        Some(cli::Commands::List { guards_dir }) => {
            cli::commands::list::handle_list(cli.config, guards_dir).await
        }
        Some(cli::Commands::Serve(subcommand_args)) => {
            println!("{LOGO}");
            cli::commands::serve::handle_serve(subcommand_args, cli.config).await
        }
        None => {
            println!("{LOGO}");
            // No command specified, use flattened serve args
            cli::commands::serve::handle_serve(cli.serve_args, cli.config).await
        }
    }
}
