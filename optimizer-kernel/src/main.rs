/**
 * MTA OPTIMIZER - Server entry point
 *
 * ROLE : bootstrap (env, logging, config, record store, HTTP).
 * The store and config are built once here and handed to the service.
 */

use anyhow::{Context, Result};
use mta_optimizer::config::{load_config, OptimizerConfig, StorageBackend};
use mta_optimizer::evaluator::parse_threshold;
use mta_optimizer::http::build_router;
use mta_optimizer::store::{FsRecordStore, MemoryRecordStore, SharedStore};
use mta_optimizer::{AppState, InventoryService};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // load .env when present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mta_optimizer=info")),
        )
        .init();

    let cfg = load_config().await.context("failed to load configuration")?;
    if parse_threshold(&cfg.threshold).is_err() {
        warn!(threshold = %cfg.threshold, "threshold is not a valid integer, evaluations will fail");
    }

    let store = build_store(&cfg).await?;
    info!(backend = store.backend(), key = %cfg.storage.key, "record store ready");

    let inventory = InventoryService::from_config(store, &cfg);
    let app_state = AppState::new(inventory).with_api_key(cfg.api_key.clone());
    let app = build_router(app_state);

    let listener = TcpListener::bind(&cfg.bind)
        .await
        .with_context(|| format!("failed to bind {}", cfg.bind))?;
    info!("listening on http://{}", cfg.bind);
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

async fn build_store(cfg: &OptimizerConfig) -> Result<SharedStore> {
    let store: SharedStore = match cfg.storage.backend {
        StorageBackend::Fs => {
            tokio::fs::create_dir_all(&cfg.storage.data_dir)
                .await
                .with_context(|| format!("failed to create data dir {}", cfg.storage.data_dir))?;
            Arc::new(FsRecordStore::new(&cfg.storage.data_dir))
        }
        StorageBackend::Memory => {
            warn!("memory backend selected, inventory is lost on restart");
            Arc::new(MemoryRecordStore::new())
        }
        StorageBackend::S3 => s3_store(cfg).await?,
    };
    Ok(store)
}

#[cfg(feature = "s3")]
async fn s3_store(cfg: &OptimizerConfig) -> Result<SharedStore> {
    use mta_optimizer::store::s3::S3RecordStore;
    let store = S3RecordStore::from_env(cfg.storage.bucket.clone(), cfg.storage.region.clone()).await;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "s3"))]
async fn s3_store(_cfg: &OptimizerConfig) -> Result<SharedStore> {
    anyhow::bail!("s3 backend requested but the binary was built without the `s3` feature")
}
