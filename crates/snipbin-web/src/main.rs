//! Snipbin — web server for posting and viewing expiring text snippets.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use snipbin_web::{AppState, Config, SqliteSnippetStore, TemplateCache, router};

/// Snipbin - expiring text snippets over HTTP.
#[derive(Parser, Debug)]
#[command(name = "snipbin")]
#[command(about = "Web server for expiring text snippets", long_about = None)]
struct Args {
    /// Path to .env file (optional).
    #[arg(long, env = "DOTENV_PATH", default_value = ".env")]
    dotenv: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load .env file if it exists
    if std::path::Path::new(&args.dotenv).exists() {
        dotenvy::from_path(&args.dotenv)?;
        eprintln!("Loaded environment from {}", args.dotenv);
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    let bind_addr = config.bind_addr.clone();

    // The template cache is built before the listener starts; a template
    // that fails to parse aborts start-up here.
    let templates = TemplateCache::build(&config.template_dir())?;

    // Open the store and create application state
    let store = SqliteSnippetStore::connect(&config.database_url).await?;
    let state = AppState::new(config, Arc::new(store), templates);

    // Build the router with its middleware chain
    let app = router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "starting server");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
