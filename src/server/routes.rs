use axum::{
    extract::{Path, State},
    Json,
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use crate::coordinator::StoreStats;
use crate::exchange::{CopyShare, ExchangeReason, ExportReceipt, ImportOutcome, PresetPicker};
use crate::server::AppState;
use crate::service::StoreService;
use crate::{Error, NameRecord};
use std::path::{Component, PathBuf};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct NameBody {
    pub name: String,
}

/// `destination` is relative to the exchange directory
#[derive(Deserialize)]
pub struct ExportBody {
    pub destination: PathBuf,
}

/// `source` is relative to the exchange directory. A missing `source` is
/// treated as a cancelled pick.
#[derive(Deserialize, Default)]
pub struct ImportBody {
    #[serde(default)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<ExchangeReason>,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(err: Error) -> ApiError {
    let status = match &err {
        Error::Exchange { reason: ExchangeReason::FileNotFound, .. } => StatusCode::NOT_FOUND,
        Error::Exchange {
            reason: ExchangeReason::Read | ExchangeReason::InvalidSnapshot,
            ..
        } => StatusCode::BAD_REQUEST,
        Error::HandleClosed | Error::WorkerStopped => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    tracing::warn!("Request failed ({}): {}", status, err);
    (
        status,
        Json(ErrorResponse {
            reason: err.exchange_reason(),
            error: err.to_string(),
        }),
    )
}

/// Resolve a client-supplied snapshot path inside the exchange directory.
/// Absolute paths and `..` components are rejected before anything touches
/// the filesystem.
fn exchange_path(state: &AppState, requested: &std::path::Path) -> Result<PathBuf, ApiError> {
    let mut components = requested.components().peekable();
    let contained = components.peek().is_some()
        && components.all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if !contained {
        tracing::warn!("Rejected snapshot path {}", requested.display());
        return Err((
            StatusCode::FORBIDDEN,
            Json(ErrorResponse {
                error: format!("{} is outside the exchange directory", requested.display()),
                reason: None,
            }),
        ));
    }
    Ok(state.exchange_dir.join(requested))
}

/// Run a service call off the async runtime; the service blocks until the
/// store worker replies
async fn blocking<T, F>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&StoreService) -> crate::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let service = state.service.clone();
    tokio::task::spawn_blocking(move || f(&service))
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse { error: e.to_string(), reason: None }),
            )
        })?
        .map_err(api_error)
}

pub async fn list_names(State(state): State<Arc<AppState>>) -> Result<Json<Vec<NameRecord>>, ApiError> {
    blocking(&state, |service| service.list_all()).await.map(Json)
}

pub async fn create_name(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NameBody>,
) -> Result<(StatusCode, Json<NameRecord>), ApiError> {
    let record = blocking(&state, move |service| service.insert(body.name)).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update_name(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<NameBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let updated = blocking(&state, move |service| service.update(id, body.name)).await?;
    Ok(Json(serde_json::json!({ "id": id, "updated": updated })))
}

pub async fn delete_name(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let deleted = blocking(&state, move |service| service.delete(id)).await?;
    Ok(Json(serde_json::json!({ "id": id, "deleted": deleted })))
}

pub async fn export_snapshot(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ExportBody>,
) -> Result<Json<ExportReceipt>, ApiError> {
    let destination = exchange_path(&state, &body.destination)?;
    blocking(&state, move |service| {
        service.export_snapshot(Box::new(CopyShare::new(destination)))
    })
    .await
    .map(Json)
}

pub async fn import_snapshot(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ImportBody>,
) -> Result<Json<ImportOutcome>, ApiError> {
    let source = body
        .source
        .map(|source| exchange_path(&state, &source))
        .transpose()?;
    blocking(&state, move |service| {
        service.import_snapshot(&PresetPicker::new(source))
    })
    .await
    .map(Json)
}

pub async fn get_stats(State(state): State<Arc<AppState>>) -> Result<Json<StoreStats>, ApiError> {
    blocking(&state, |service| service.stats()).await.map(Json)
}
