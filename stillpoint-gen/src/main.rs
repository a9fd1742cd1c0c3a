//! stillpoint-gen - Guided meditation generation service
//!
//! Single HTTP service that accepts emotional-transition requests,
//! runs the generation pipeline in the background and serves the
//! finished tracks plus a small web UI.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stillpoint_common::events::EventBus;
use stillpoint_gen::config::ServiceConfig;
use stillpoint_gen::AppState;

/// Command-line arguments for stillpoint-gen
#[derive(Parser, Debug)]
#[command(name = "stillpoint-gen")]
#[command(about = "Guided meditation generation service")]
#[command(version)]
struct Args {
    /// Root folder holding database, work files and media library
    #[arg(short, long, env = "STILLPOINT_ROOT")]
    root_folder: Option<String>,

    /// Bind address (host:port)
    #[arg(short, long, env = "STILLPOINT_BIND")]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stillpoint_gen=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    info!("Starting stillpoint-gen (meditation generation) service");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Resolve root folder and make sure the layout exists
    let root_folder = stillpoint_common::config::resolve_root_folder(
        args.root_folder.as_deref(),
        "STILLPOINT_ROOT",
    );
    stillpoint_common::config::ensure_root_layout(&root_folder)
        .context("Failed to initialize root folder")?;
    info!("Root folder: {}", root_folder.display());

    // TOML config is the lowest-priority source for keys and addresses
    let toml_config = stillpoint_common::config::load_toml_config()
        .unwrap_or_default();

    let config = ServiceConfig::new(root_folder, args.bind, &toml_config);

    // Initialize database connection pool
    let db_path = config.database_path();
    info!("Database: {}", db_path.display());
    let db_pool = stillpoint_gen::db::init_database_pool(&db_path).await?;
    info!("Database connection established");

    // Event bus for SSE broadcasting
    let event_bus = EventBus::new(100);
    info!("Event bus initialized");

    let bind = config.bind.clone();
    let state = AppState::new(db_pool, event_bus, config, toml_config);

    let app = stillpoint_gen::build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!("Listening on http://{}", bind);
    info!("Health check: http://{}/health", bind);

    axum::serve(listener, app).await?;

    Ok(())
}
