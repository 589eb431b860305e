//! ServerBuilder for fluent API to build HTTP servers

use super::handlers::{
    AppState, create_invoice, delete_invoice, get_invoice, health_check, list_invoices,
    update_invoice,
};
use crate::actions::InvoiceActions;
use crate::config::AppConfig;
use crate::core::cache::ViewCache;
use crate::core::store::InvoiceStore;
use anyhow::Result;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Builder for the dashboard HTTP server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_config(config)
///     .with_store(InMemoryInvoiceStore::new())
///     .build()?;
/// ```
pub struct ServerBuilder {
    config: AppConfig,
    store: Option<Arc<dyn InvoiceStore>>,
    cache: Option<ViewCache>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder with the default configuration
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            store: None,
            cache: None,
            custom_routes: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the invoice store (required)
    pub fn with_store(mut self, store: impl InvoiceStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Set a store that is shared with other owners
    pub fn with_shared_store(mut self, store: Arc<dyn InvoiceStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Use an existing view cache, e.g. to subscribe to revalidations
    ///
    /// The cache keeps its own view capacity; `dashboard.cache_capacity`
    /// only applies to the cache the builder creates.
    pub fn with_cache(mut self, cache: ViewCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Add custom routes to the server
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the handler state without a router
    pub fn build_state(&mut self) -> Result<AppState> {
        self.config.validate()?;

        let store = self
            .store
            .take()
            .ok_or_else(|| anyhow::anyhow!("InvoiceStore is required. Call .with_store()"))?;
        let capacity = self.config.dashboard.cache_capacity;
        let cache = self
            .cache
            .take()
            .unwrap_or_else(|| ViewCache::default().with_view_capacity(capacity));
        let actions = InvoiceActions::new(store, cache, &self.config);

        Ok(AppState {
            actions: Arc::new(actions),
            items_per_page: self.config.dashboard.items_per_page,
        })
    }

    /// Build the final router
    ///
    /// Routes, relative to `dashboard.list_path`:
    /// - `GET /` list view, `POST /` create
    /// - `GET /{id}` single invoice
    /// - `POST /{id}/edit` update, `POST /{id}/delete` delete
    pub fn build(mut self) -> Result<Router> {
        let state = self.build_state()?;
        let list_path = self.config.dashboard.list_path.clone();

        let invoice_routes = Router::new()
            .route(&list_path, get(list_invoices).post(create_invoice))
            .route(&format!("{}/{{id}}", list_path), get(get_invoice))
            .route(&format!("{}/{{id}}/edit", list_path), post(update_invoice))
            .route(&format!("{}/{{id}}/delete", list_path), post(delete_invoice))
            .with_state(state);

        let mut app = Router::new()
            .route("/health", get(health_check))
            .route("/healthz", get(health_check))
            .merge(invoice_routes);

        for custom_router in std::mem::take(&mut self.custom_routes) {
            app = app.merge(custom_router);
        }

        Ok(app.layer(ServiceBuilder::new().layer(TraceLayer::new_for_http())))
    }

    /// Serve the application on `server.addr` with graceful shutdown
    ///
    /// Handles SIGTERM and SIGINT (Ctrl+C).
    pub async fn serve(self) -> Result<()> {
        let addr = self.config.server.addr.clone();
        let app = self.build()?;
        let listener = TcpListener::bind(&addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves on Ctrl+C or SIGTERM
///
/// If a handler cannot be installed, that signal is never awaited.
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
