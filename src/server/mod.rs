//! HTTP presentation layer over the store service

use axum::{
    http::Method,
    routing::{get, post, put},
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use crate::service::StoreService;

pub mod routes;

/// Server state
pub struct AppState {
    pub service: StoreService,
    /// Snapshot paths in request bodies resolve inside this directory
    pub exchange_dir: PathBuf,
}

pub fn router(service: StoreService, exchange_dir: PathBuf) -> Router {
    let state = Arc::new(AppState { service, exchange_dir });

    // Cross-origin pages may read the list, never mutate it or move files.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET]);

    Router::new()
        .route("/names", get(routes::list_names).post(routes::create_name))
        .route("/names/{id}", put(routes::update_name).delete(routes::delete_name))
        .route("/snapshot/export", post(routes::export_snapshot))
        .route("/snapshot/import", post(routes::import_snapshot))
        .route("/stats", get(routes::get_stats))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn start_server(port: u16, service: StoreService, exchange_dir: PathBuf) -> anyhow::Result<()> {
    std::fs::create_dir_all(&exchange_dir)?;
    let app = router(service, exchange_dir);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}
