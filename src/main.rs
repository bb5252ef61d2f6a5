//! homedash
//!
//! Loads the dashboard configuration and either prints one of its views or
//! serves them over HTTP.
//!
//! ```text
//! homedash check              validate config.yml, exit 1 on failure
//! homedash show [--safe]      print the merged configuration
//! homedash services           print services keyed by id
//! homedash snapshot           print the persisted configuration
//! homedash serve              serve the HTTP API
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use homedash::config::{extract_safely_config, extract_services_from_config};
use homedash::observability::{init_logging, metrics, LogFormat};
use homedash::storage::FsStorage;
use homedash::{ConfigLoader, HttpServer};

#[derive(Parser)]
#[command(name = "homedash")]
#[command(about = "Personal dashboard configuration loader", long_about = None)]
struct Cli {
    /// Directory holding config.yml.
    #[arg(long, env = "HOMEDASH_CONFIG_DIR", default_value = "data/config")]
    config_dir: PathBuf,

    /// Directory holding the persisted configuration snapshot.
    #[arg(long, env = "HOMEDASH_SNAPSHOT_DIR", default_value = "data/snapshots")]
    snapshot_dir: PathBuf,

    /// Log level for this crate (RUST_LOG takes precedence).
    #[arg(long, env = "HOMEDASH_LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[arg(long, value_enum, env = "HOMEDASH_LOG_FORMAT", default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration file
    Check,
    /// Print the loaded configuration as JSON
    Show {
        /// Remove secrets before printing
        #[arg(long)]
        safe: bool,
    },
    /// Print services keyed by their generated id
    Services,
    /// Print the previously persisted configuration
    Snapshot,
    /// Serve the HTTP API
    Serve {
        #[arg(long, env = "HOMEDASH_BIND", default_value = "127.0.0.1:3000")]
        bind: String,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_format);

    tracing::debug!(
        config_dir = %cli.config_dir.display(),
        snapshot_dir = %cli.snapshot_dir.display(),
        "Storage configured"
    );

    let loader = Arc::new(ConfigLoader::new(
        Arc::new(FsStorage::new(&cli.config_dir)),
        Arc::new(FsStorage::new(&cli.snapshot_dir)),
    ));

    match cli.command {
        Commands::Check => match loader.check().await {
            Ok(summary) => println!("{}", summary),
            Err(e) => {
                eprintln!("{}", e.describe());
                return Ok(ExitCode::FAILURE);
            }
        },
        Commands::Show { safe } => {
            let config = loader.load_local_config().await;
            let config = if safe {
                extract_safely_config(&config)
            } else {
                config
            };
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::Services => {
            let config = loader.load_local_config().await;
            let services = extract_services_from_config(&config);
            println!("{}", serde_json::to_string_pretty(&services)?);
        }
        Commands::Snapshot => match loader.get_local_config().await {
            Some(config) => println!("{}", serde_json::to_string_pretty(&config)?),
            None => {
                eprintln!("No persisted configuration found");
                return Ok(ExitCode::FAILURE);
            }
        },
        Commands::Serve { bind } => {
            let handle = metrics::install_recorder();
            let config = loader.load_local_config().await;
            if let Some(error) = &config.error {
                tracing::warn!(error = %error, "Serving default configuration");
            }

            let listener = TcpListener::bind(&bind).await?;
            HttpServer::new(config, loader, handle).run(listener).await?;
            tracing::info!("Shutdown complete");
        }
    }

    Ok(ExitCode::SUCCESS)
}
