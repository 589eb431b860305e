//! invoice-dash server binary
//!
//! Reads the YAML file named by `INVOICE_DASH_CONFIG` (defaults otherwise),
//! applies `POSTGRES_URL` / `INVOICE_DASH_ADDR`, and serves the dashboard.
//! With the `postgres` feature and a database URL the PostgreSQL store is
//! used; otherwise invoices live in memory.

use invoice_dash::config::AppConfig;
use invoice_dash::server::ServerBuilder;
use tracing_subscriber::EnvFilter;

const CONFIG_ENV: &str = "INVOICE_DASH_CONFIG";

fn load_config() -> anyhow::Result<AppConfig> {
    let config = match std::env::var(CONFIG_ENV) {
        Ok(path) if !path.is_empty() => {
            tracing::info!(%path, "loading configuration");
            AppConfig::from_yaml_file(&path)?
        }
        _ => AppConfig::default(),
    };
    let config = config.with_env_overrides();
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("invoice_dash=info")),
        )
        .init();

    let config = load_config()?;

    #[cfg(feature = "postgres")]
    if config.database.url.is_some() {
        use invoice_dash::storage::PostgresInvoiceStore;

        let store = PostgresInvoiceStore::connect(&config.database).await?;
        store.migrate().await?;
        let result = ServerBuilder::new()
            .with_config(config)
            .with_store(store.clone())
            .serve()
            .await;
        store.close().await;
        return result;
    }

    serve_in_memory(config).await
}

#[cfg(feature = "in-memory")]
async fn serve_in_memory(config: AppConfig) -> anyhow::Result<()> {
    use invoice_dash::storage::InMemoryInvoiceStore;

    if config.database.url.is_some() {
        tracing::warn!("database.url is set but the postgres feature is disabled; using the in-memory store");
    } else {
        tracing::info!("no database configured; using the in-memory store");
    }

    ServerBuilder::new()
        .with_config(config)
        .with_store(InMemoryInvoiceStore::new())
        .serve()
        .await
}

#[cfg(not(feature = "in-memory"))]
async fn serve_in_memory(_config: AppConfig) -> anyhow::Result<()> {
    anyhow::bail!("no store available: set POSTGRES_URL or enable the in-memory feature")
}
