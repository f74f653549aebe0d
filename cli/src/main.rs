//! Workshop Service CLI server
//!
//! ```sh
//! # Run with default config (~/.config/workshop-service/config.toml)
//! workshop-service
//!
//! # Custom config path
//! workshop-service --config /etc/workshop-service/config.toml
//!
//! # Validate config without starting
//! workshop-service --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use workshop::config::AppConfig;
use workshop::server::{init_tracing, ServerHandle, ServerOptions};

/// Workshop Service: bookings and work orders for a vehicle workshop.
#[derive(Parser, Debug)]
#[command(
    name = "workshop-service",
    version,
    about = "REST API server for vehicle workshop bookings and work orders",
    long_about = "Workshop Service: REST API for customers, vehicles, service bookings \
                  and the work orders derived from them.\n\n\
                  Default config: ~/.config/workshop-service/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "WORKSHOP_CONFIG")]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    /// Skip creating the default admin user.
    #[arg(long)]
    no_admin: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.unwrap_or_else(workshop::default_config_path);

    let mut config = match AppConfig::load(&config_path) {
        Ok(cfg) => cfg,
        Err(e) if cli.check => {
            eprintln!("Configuration is invalid: {}", e);
            std::process::exit(1);
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config from {}: {}", config_path.display(), e);
            return Err(e.into());
        }
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(port) = cli.api_port {
        config.server.api_port = port;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   API address : {}", config.api_address());
        println!("   Database    : {}", config.database.url);
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    init_tracing(&config);
    info!("Configuration loaded from {}", config_path.display());

    // ── Start server ───────────────────────────────────────────
    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
        create_default_admin: !cli.no_admin,
    })
    .await?;

    handle.install_signal_handler();
    info!("🚀 Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
