use clap::Parser;
use net_warden::allowlist::AllowList;
use net_warden::cli::Cli;
use net_warden::config::{Config, StorageBackend};
use net_warden::error::AppError;
use net_warden::http::run_http_server;
use net_warden::storage::{FsObjectStore, HttpObjectStore, ObjectStore};
use net_warden::store::BlocklistStore;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Cli::parse();
    run(args).await
}

/// アプリケーションのメインロジック
async fn run(args: Cli) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::from_env()?;
    let allowlist = AllowList::new(&config.extra_allow_nets);
    info!(
        bucket = %config.bucket,
        key = %config.key,
        allow_entries = allowlist.len(),
        "starting blocklist service"
    );

    let storage: Arc<dyn ObjectStore> = match config.backend {
        StorageBackend::Http => {
            let endpoint = config.endpoint.clone().ok_or_else(|| {
                AppError::Config("storageEndpoint is required when storageBackend is http".into())
            })?;
            Arc::new(HttpObjectStore::new(
                endpoint,
                args.timeout_secs,
                args.max_retries,
                args.max_backoff_secs,
            )?)
        }
        StorageBackend::Fs => Arc::new(FsObjectStore),
    };

    let store = Arc::new(BlocklistStore::new(storage, allowlist, &config));
    run_http_server(store, args.listen).await?;
    Ok(())
}
