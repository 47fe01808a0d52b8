use anyhow::Result;
use biztime::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("biztime=info,tower_http=info")),
        )
        .init();

    let config = ServerConfig::load()?;
    let addr = config.bind_address();

    match config.database.backend {
        StorageBackend::Memory => {
            tracing::warn!("using the in-memory store; data is lost on exit");
            ServerBuilder::new()
                .with_store(InMemoryStore::new())
                .serve(&addr)
                .await
        }
        StorageBackend::Postgres => serve_postgres(&config.database, &addr).await,
    }
}

#[cfg(feature = "postgres")]
async fn serve_postgres(database: &DatabaseConfig, addr: &str) -> Result<()> {
    let store = PostgresStore::connect(database.active_url(), database.max_connections).await?;
    if database.migrate {
        store.migrate().await?;
    }

    let served = ServerBuilder::new()
        .with_store(store.clone())
        .serve(addr)
        .await;

    store.close().await;
    served
}

#[cfg(not(feature = "postgres"))]
async fn serve_postgres(_database: &DatabaseConfig, _addr: &str) -> Result<()> {
    Err(ConfigError::UnsupportedBackend {
        backend: "postgres".to_string(),
    }
    .into())
}
