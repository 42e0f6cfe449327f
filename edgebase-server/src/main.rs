use clap::Parser;
use edgebase_core::{EdgeStore, EdgebaseConfig};
use tokio::sync::broadcast;
use tracing_subscriber::{fmt, EnvFilter};

use edgebase_server::router::ServerState;
use edgebase_server::server;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "edgebase.toml")]
    config: String,

    #[arg(long)]
    health: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Load config
    let config = match EdgebaseConfig::load(&args.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config from {}: {}", args.config, e);
            std::process::exit(1);
        }
    };

    // Init logging, RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.service.log_level));
    fmt().with_env_filter(filter).init();

    // Open the edge store
    let store = match EdgeStore::open(&config.database).await {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to open edge store at {}: {}", config.database.path, e);
            std::process::exit(1);
        }
    };

    if args.health {
        match store.health_check().await {
            Ok(v) => println!("✅ SQLite available: {}", v),
            Err(e) => {
                println!("❌ SQLite check failed: {}", e);
                std::process::exit(1);
            }
        }

        match store.edge_count().await {
            Ok(n) => println!("✅ Edge table readable: {} edges", n),
            Err(e) => {
                println!("❌ Edge table check failed: {}", e);
                std::process::exit(1);
            }
        }

        println!("✅ Edgebase health check passed");
        store.close().await;
        return Ok(());
    }

    let (tx, _rx) = broadcast::channel(1);
    let shutdown_tx = tx.clone();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(());
    });

    let state = ServerState::new(store.clone(), &config);
    let result = server::run_unix_server(&config.service.socket_path, state, tx.subscribe()).await;

    store.close().await;
    result
}
