//! markstash server
//!
//! HTTP front end for the markstash bookmark engine.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use markstash_core::{Backend, Config, Store};

mod commands;
mod cors;
mod error;
mod routes;

#[derive(Parser)]
#[command(name = "markstash")]
#[command(about = "markstash - bookmark storage and indexing server")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve {
        /// Address to listen on (overrides config)
        #[arg(long)]
        bind: Option<String>,
        /// Keep everything in memory; nothing survives a restart
        #[arg(long)]
        memory: bool,
    },
    /// Show the effective configuration
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load().context("Failed to load configuration")?;

    let command = cli.command.unwrap_or(Commands::Serve {
        bind: None,
        memory: false,
    });

    match command {
        Commands::Config { json } => commands::config::show(&config, json),
        Commands::Serve { bind, memory } => {
            if let Some(bind) = bind {
                config.bind = bind;
            }
            if memory {
                config.backend = Backend::Memory;
            }

            init_logging(&config);
            serve(config).await
        }
    }
}

/// Initialize logging to stderr
///
/// `RUST_LOG` takes precedence; otherwise the configured level applies to
/// the markstash crates and request tracing.
fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "markstash_core={level},markstash_server={level},tower_http={level}",
            level = config.log_level
        ))
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

async fn serve(config: Config) -> Result<()> {
    let store = Store::open(&config)?;
    let app = routes::router(store);

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    let addr = listener
        .local_addr()
        .context("Failed to read listener address")?;

    info!(%addr, backend = %config.backend, "markstash listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown requested"),
        Err(e) => {
            warn!(error = %e, "Failed to listen for Ctrl-C; running until killed");
            std::future::pending::<()>().await;
        }
    }
}
