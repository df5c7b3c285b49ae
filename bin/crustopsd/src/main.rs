//! `crustopsd` — the CrustOps storefront server binary.
//!
//! Usage:
//!   crustopsd [-c <context-name-or-path>] [--listen <addr>] [--seed]
//!
//! The context name resolves to `/etc/crustops/<name>.toml`. Without
//! `-c`, built-in defaults are used (data under `./data`).

mod config;
mod routes;

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use crustops_core::Module;
use crustops_shop::notify::ConsoleNotifier;
use crustops_shop::service::{ShopConfig, ShopService};
use crustops_shop::ShopModule;

use config::ServerConfig;

/// CrustOps storefront server.
#[derive(Parser, Debug)]
#[command(name = "crustopsd", about = "CrustOps storefront server")]
struct Cli {
    /// Context name or path to config file.
    #[arg(short = 'c', long = "config")]
    config: Option<String>,

    /// Listen address.
    #[arg(long = "listen", default_value = "0.0.0.0:8080")]
    listen: String,

    /// Seed the launch menu and default settings on startup.
    #[arg(long = "seed")]
    seed: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let server_config = match cli.config {
        Some(ref name) => {
            let path = ServerConfig::resolve_path(name);
            info!("Loading configuration from {}", path.display());
            ServerConfig::load(&path)?
        }
        None => ServerConfig::default(),
    };

    let data_dir = std::path::PathBuf::from(&server_config.storage.data_dir);
    std::fs::create_dir_all(&data_dir)?;

    let sql: Arc<dyn crustops_sql::SQLStore> = Arc::new(
        crustops_sql::SqliteStore::open(&data_dir.join("crustops.sqlite"))
            .map_err(|e| anyhow::anyhow!("failed to open SQL store: {}", e))?,
    );

    let shop_config = ShopConfig {
        otp_ttl_secs: server_config.otp.ttl_secs,
    };
    let service = ShopService::new(sql, Arc::new(ConsoleNotifier), shop_config)
        .map_err(|e| anyhow::anyhow!("failed to initialize shop service: {}", e))?;

    if cli.seed {
        service
            .seed()
            .map_err(|e| anyhow::anyhow!("seed failed: {}", e))?;
        info!("Seed complete");
    }

    let shop_module = ShopModule::new(service);
    info!("Shop module initialized");

    let module_routes = vec![(shop_module.name(), shop_module.routes())];
    let app = routes::build_router(module_routes);

    let listener = tokio::net::TcpListener::bind(&cli.listen).await?;
    info!("CrustOps server listening on {}", cli.listen);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to install shutdown handler: {}", e);
        return;
    }
    info!("Shutting down");
}
