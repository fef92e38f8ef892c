use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use sample_index::{
    journal_source_for_path, DirectoryCollection, RefreshController, RefreshScheduler,
    RefreshTrigger, SampleIndex,
};

use crate::config::ServerConfig;
use crate::error::{CoreError, CoreResult};

pub mod error;
pub mod openapi;
pub mod projects;
pub mod refresh;
pub mod samples;

pub struct Server {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    serve_handle: Option<JoinHandle<()>>,
    scheduler: Option<RefreshScheduler>,
    state: Arc<ServerState>,
}

impl Server {
    /// Builds the index, runs the startup refresh, starts the refresh timer
    /// and begins serving on `config.bind_addr`.
    pub async fn new(config: ServerConfig) -> CoreResult<Self> {
        config.validate()?;
        let state = ServerState::from_config(&config)?;

        if let Err(error) = state.controller.refresh(RefreshTrigger::Startup).await {
            tracing::warn!(%error, "initial sample refresh failed; serving an empty index");
        }
        let scheduler = RefreshScheduler::spawn(state.controller.clone(), config.refresh_interval());

        let listener = TcpListener::bind(config.socket_addr()?)
            .await
            .map_err(|error| CoreError::Internal(error.to_string()))?;
        let addr = listener
            .local_addr()
            .map_err(|error| CoreError::Internal(error.to_string()))?;
        let app = router(state.clone());
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let serve_handle = tokio::spawn(async move {
            if let Err(error) = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await
            {
                tracing::error!(%error, "http server stopped");
            }
        });
        tracing::info!(%addr, data_dir = %config.data_dir.display(), "mass spec server listening");

        Ok(Server {
            addr,
            shutdown: Some(shutdown_tx),
            serve_handle: Some(serve_handle),
            scheduler: Some(scheduler),
            state,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn index(&self) -> &Arc<SampleIndex> {
        &self.state.index
    }

    /// Stops the refresh timer, then waits for in-flight requests to finish
    /// and the listener to close.
    pub async fn shutdown(&mut self) -> CoreResult<()> {
        if let Some(scheduler) = self.scheduler.take() {
            scheduler.shutdown().await;
        }
        self.signal_shutdown()?;
        if let Some(handle) = self.serve_handle.take() {
            handle
                .await
                .map_err(|error| CoreError::Internal(format!("http server task failed: {error}")))?;
        }
        tracing::info!(addr = %self.addr, "mass spec server stopped");
        Ok(())
    }

    fn signal_shutdown(&mut self) -> CoreResult<()> {
        if let Some(sender) = self.shutdown.take() {
            sender
                .send(())
                .map_err(|_| CoreError::Internal("failed to send server shutdown signal".to_string()))
        } else {
            Ok(())
        }
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        self.scheduler.take();
        let _ = self.signal_shutdown();
    }
}

pub(crate) fn router(state: Arc<ServerState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    Router::new()
        .route("/health", get(health))
        .route("/api/samples", get(samples::list_samples))
        .route("/api/samples/:id", get(samples::get_sample))
        .route("/api/refresh", post(refresh::trigger_refresh))
        .route("/api/import", post(refresh::import))
        .route("/api/projects", get(projects::list_projects))
        .route("/api/projects/:name/samples", get(projects::project_samples))
        .route("/api/status", get(refresh::refresh_status))
        .with_state(state)
        .layer(cors)
}

async fn health() -> &'static str {
    "ok"
}

pub(crate) struct ServerState {
    pub(crate) index: Arc<SampleIndex>,
    pub(crate) controller: Arc<RefreshController>,
}

impl ServerState {
    pub(crate) fn from_config(config: &ServerConfig) -> CoreResult<Arc<Self>> {
        let index = Arc::new(SampleIndex::new());
        let collection = Arc::new(DirectoryCollection::with_url_prefix(
            &config.data_dir,
            &config.url_prefix,
        ));
        let journal_path = config.resolved_journal_path();
        let journal = journal_source_for_path(journal_path.as_deref());
        let controller = Arc::new(RefreshController::new(
            index.clone(),
            collection,
            journal,
            config.supported_kinds()?,
        ));
        Ok(Arc::new(Self { index, controller }))
    }
}
