//! factdesk - Conversational assistant backend with fact review
//!
//! Serves the conversation endpoint and the facts review API.

use anyhow::Result;
use clap::{Parser, Subcommand};
use factdesk::{
    api::build_app,
    chat::{ChatEngine, ChatState, HttpEngine},
    config::{parse_origins, AppConfig},
    facts::{FactStore, FactsState},
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "factdesk")]
#[command(author = "A3S Lab Team")]
#[command(version)]
#[command(about = "Conversational assistant backend with fact review")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "FACTDESK_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(long, env = "PORT")]
        port: Option<u16>,

        /// Upstream conversation engine URL
        #[arg(long, env = "FACTDESK_UPSTREAM_URL")]
        upstream: Option<String>,

        /// Allowed CORS origins: `*` or a comma-separated list
        #[arg(long, env = "ALLOWED_ORIGINS")]
        allowed_origins: Option<String>,
    },

    /// Show configuration
    Config {
        /// Show default configuration
        #[arg(long)]
        default: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("factdesk={},tower_http=debug", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match cli.config {
        Some(config_path) => AppConfig::load(&config_path)?,
        None => AppConfig::default(),
    };

    match cli.command {
        Commands::Serve {
            host,
            port,
            upstream,
            allowed_origins,
        } => {
            let mut config = config;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(upstream) = upstream {
                config.engine.upstream_url = Some(upstream);
            }
            if let Some(origins) = allowed_origins {
                config.server.cors_origins = parse_origins(&origins);
            }
            run_server(config).await?;
        }
        Commands::Config { default } => {
            show_config(if default { None } else { Some(&config) })?;
        }
    }

    Ok(())
}

async fn run_server(config: AppConfig) -> Result<()> {
    tracing::info!("Starting factdesk");

    let facts = Arc::new(FactStore::new());

    let engine = HttpEngine::from_config(&config.engine)?;
    match &engine {
        Some(engine) => tracing::info!(upstream = %engine.url(), "Conversation engine configured"),
        None => tracing::warn!(
            "No upstream engine configured; /chatkit will answer 503 Service Unavailable"
        ),
    }
    let engine = engine.map(|e| Arc::new(e) as Arc<dyn ChatEngine>);

    let app = build_app(
        ChatState {
            engine,
            facts: facts.clone(),
        },
        FactsState { store: facts },
        &config.server.cors_origins,
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("factdesk listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down...");
}

fn show_config(config: Option<&AppConfig>) -> Result<()> {
    let config = config.cloned().unwrap_or_default();
    println!("{}", config.to_toml()?);
    Ok(())
}
