use std::path::PathBuf;

use anyhow::Result;
use auth_gate::{AppConfig, AuthType, hash_password, parse_path_list};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "auth-gate")]
#[command(about = "HTTP API with pluggable request authentication")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind host
        #[arg(long, env = "API_HOST")]
        host: Option<String>,
        #[arg(short, long, env = "API_PORT")]
        port: Option<u16>,
        /// Authentication strategy: auth, basic_auth or session_auth
        #[arg(long, env = "AUTH_TYPE")]
        auth_type: Option<AuthType>,
        /// Name of the session cookie
        #[arg(long, env = "SESSION_NAME")]
        session_name: Option<String>,
        /// JSON file with the users to serve
        #[arg(long, env = "USERS_FILE")]
        users_file: Option<PathBuf>,
        /// Comma-separated exclusion patterns (e.g. "/api/v1/status/,/api/v1/public*")
        #[arg(long, env = "AUTH_EXCLUDED_PATHS")]
        excluded_paths: Option<String>,
    },
    /// Print the digest stored for a password
    HashPassword { password: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("auth_gate=info".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            port,
            auth_type,
            session_name,
            users_file,
            excluded_paths,
        } => {
            let mut config = AppConfig::from_env()?;

            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(auth_type) = auth_type {
                config.auth_type = auth_type;
            }
            if let Some(name) = session_name.filter(|n| !n.trim().is_empty()) {
                config.session_name = name;
            }
            if users_file.is_some() {
                config.users_file = users_file;
            }
            if let Some(paths) = excluded_paths {
                config.excluded_paths = parse_path_list(&paths);
            }

            info!(
                "Starting API on {} with {} authentication",
                config.bind_address(),
                config.auth_type
            );
            auth_gate::start_http(config).await?;
        }
        Commands::HashPassword { password } => {
            println!("{}", hash_password(&password));
        }
    }

    Ok(())
}
