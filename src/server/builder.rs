//! ServerBuilder for fluent API to build the HTTP server

use anyhow::Result;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use super::router::build_proposal_routes;
use super::views::Views;
use crate::config::AppConfig;
use crate::core::flash::FlashCookie;
use crate::core::i18n::Translator;
use crate::core::store::EntityStore;
use crate::proposals::handlers::AppState;
use crate::proposals::service::ProposalService;

/// Builder for the proposal server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_config(AppConfig::from_yaml_file("proposals.yaml")?)
///     .with_store(InMemoryStore::new())
///     .build()?;
/// ```
pub struct ServerBuilder {
    config: AppConfig,
    store: Option<Arc<dyn EntityStore>>,
    translator: Option<Translator>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default_config(),
            store: None,
            translator: None,
            custom_routes: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the entity store (required unless the `in-memory` feature is on)
    pub fn with_store(mut self, store: impl EntityStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Use a prepared translator instead of loading one from the config
    pub fn with_translator(mut self, translator: Translator) -> Self {
        self.translator = Some(translator);
        self
    }

    /// Add routes next to the proposal routes, e.g. a login page
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    fn take_store(&mut self) -> Result<Arc<dyn EntityStore>> {
        if let Some(store) = self.store.take() {
            return Ok(store);
        }

        #[cfg(feature = "in-memory")]
        {
            Ok(Arc::new(crate::storage::InMemoryStore::new()))
        }

        #[cfg(not(feature = "in-memory"))]
        {
            Err(anyhow::anyhow!(
                "An EntityStore is required. Call .with_store()"
            ))
        }
    }

    fn load_translator(&mut self) -> Result<Translator> {
        if let Some(translator) = self.translator.take() {
            return Ok(translator);
        }
        match &self.config.translations_path {
            Some(path) => Ok(Translator::from_yaml_file(&self.config.locale, path)?),
            None => Ok(Translator::english()),
        }
    }

    /// Assemble the shared handler state
    pub fn build_state(&mut self) -> Result<AppState> {
        let store = self.take_store()?;
        let translator = Arc::new(self.load_translator()?);

        Ok(AppState {
            service: ProposalService::new(store.clone(), translator.clone()),
            store,
            translator,
            views: Arc::new(Views::new()?),
            flash: FlashCookie::new(self.config.flash.cookie_name.clone()),
            datatable: self.config.datatable.clone(),
        })
    }

    /// Build the router: health check, proposal routes and custom routes
    pub fn build(mut self) -> Result<Router> {
        let state = self.build_state()?;

        let mut app = Router::new()
            .route("/health", get(health_check))
            .merge(build_proposal_routes(state));

        for custom_router in std::mem::take(&mut self.custom_routes) {
            app = app.merge(custom_router);
        }

        Ok(app.layer(TraceLayer::new_for_http()))
    }

    /// Serve on the configured address with graceful shutdown
    pub async fn serve(self) -> Result<()> {
        let addr = self.config.server.addr();
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

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "proposal-desk"
    }))
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
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
