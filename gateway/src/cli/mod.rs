use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod commands;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, default_value = "config.yaml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub serve_args: ServeArgs,
}

#[derive(Debug, Clone, Parser, Default)]
pub struct ServeArgs {
    /// Host address to bind to (e.g., 127.0.0.1 for local or 0.0.0.0 for all interfaces)
    #[arg(long, value_name = "ADDRESS")]
    pub host: Option<String>,

    /// Port to listen on (e.g., 8000)
    #[arg(long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Comma-separated list of allowed CORS origins (e.g., http://localhost:3000,https://example.com)
    #[arg(long, value_name = "ORIGINS")]
    pub cors_origins: Option<String>,

    /// Directory with guard provider JSON files (defaults to $GUARDS_CONFIG_DIR or /configs)
    #[arg(long, value_name = "DIR")]
    pub guards_dir: Option<PathBuf>,

    /// Guard used when a request does not name a model
    #[arg(long, value_name = "GUARD_ID")]
    pub default_model: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the API server (default if no command specified)
    Serve(ServeArgs),
    /// List all registered guards
    List {
        /// Directory with guard provider JSON files
        #[arg(long, value_name = "DIR")]
        guards_dir: Option<PathBuf>,
    },
}
