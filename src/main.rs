use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;
use stockroom_api::{AppState, RestApi};
use stockroom_core::{Recommender, RecommenderConfig};
use stockroom_storage::StorageManager;

/// Product catalog service with similar-product recommendations
#[derive(Parser, Debug)]
#[command(name = "stockroom")]
#[command(about = "Product catalog with content-based recommendations", long_about = None)]
struct Args {
    /// Path to the data directory
    #[arg(short, long, default_value = "./data")]
    data_dir: PathBuf,

    /// HTTP API port
    #[arg(long, default_value_t = 8000)]
    http_port: u16,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// JSON file of products to import when the catalog is empty
    #[arg(long)]
    seed: Option<PathBuf>,

    /// Vocabulary cap for the TF-IDF vectorizer
    #[arg(long, default_value_t = 5000)]
    max_features: usize,
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

    info!("Starting Stockroom v{}", env!("CARGO_PKG_VERSION"));
    info!("Data directory: {:?}", args.data_dir);
    info!("HTTP API port: {}", args.http_port);

    let config = RecommenderConfig {
        max_features: args.max_features,
        ..RecommenderConfig::default()
    };
    config.validate()?;

    let storage = Arc::new(StorageManager::new(&args.data_dir)?);
    info!("Storage initialized");

    if let Some(seed) = &args.seed {
        if storage.count()? == 0 {
            storage.import_json(seed)?;
        } else {
            info!("Catalog already populated, ignoring seed file {:?}", seed);
        }
    }

    let state = AppState::new(storage, Arc::new(Recommender::new(config)));
    let index = state.refresh()?;
    info!("Recommender ready with {} products", index.len());

    let http_port = args.http_port;
    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on port {}", http_port);
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(state, http_port).await {
                error!("HTTP server error: {}", e);
            }
        })
    });

    info!("Stockroom started successfully");
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
