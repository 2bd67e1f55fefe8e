use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use mealfit_api::RestApi;
use mealfit_core::{MatchConfig, MatchStrategy};
use mealfit_store::{ArtifactStore, StoreConfig};

/// A dish-name suitability engine for dietary concepts
#[derive(Parser, Debug)]
#[command(name = "mealfit")]
#[command(about = "Scores menu items against dietary concepts", long_about = None)]
struct Args {
    /// Path to the nutrition catalog JSON
    #[arg(long, default_value = "./data/catalog.json")]
    catalog: PathBuf,

    /// Path to the trained artifact bundle JSON
    #[arg(long, default_value = "./data/artifacts.json")]
    artifacts: PathBuf,

    /// HTTP API port
    #[arg(long, default_value_t = 8000)]
    http_port: u16,

    /// Name matching strategy: linear, graph or auto
    #[arg(long, default_value = "auto")]
    strategy: MatchStrategy,

    /// Graph search breadth (graph strategy only)
    #[arg(long, default_value_t = 64)]
    ef_search: usize,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting mealfit v{}", env!("CARGO_PKG_VERSION"));
    info!("Catalog: {:?}", args.catalog);
    info!("Artifacts: {:?}", args.artifacts);
    info!("HTTP API port: {}", args.http_port);

    let store = Arc::new(ArtifactStore::new(StoreConfig {
        catalog_path: args.catalog,
        artifacts_path: args.artifacts,
        match_config: MatchConfig {
            strategy: args.strategy,
            ef_search: args.ef_search,
        },
    }));

    let load_store = store.clone();
    tokio::task::spawn_blocking(move || load_store.load()).await??;
    info!("Snapshot loaded ({} dishes)", store.catalog_size());

    let store_http = store.clone();
    let http_port = args.http_port;
    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on port {}", http_port);
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(store_http, http_port).await {
                eprintln!("HTTP server error: {}", e);
            }
        })
    });

    info!("mealfit started successfully");
    info!("HTTP API: http://localhost:{}/", args.http_port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = tokio::task::spawn_blocking(move || {
            http_handle.join().ok();
        }) => {
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
    Ok(())
}
