use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use super::error::ApiError;
use super::BOXES_PATH;
use crate::model::{BoxRecord, NewBox};
use crate::service::BoxService;

/// GET /api/boxes
pub async fn list_boxes(State(service): State<Arc<BoxService>>) -> Json<Vec<BoxRecord>> {
    Json(service.list().await)
}

/// POST /api/boxes
pub async fn create_box(
    State(service): State<Arc<BoxService>>,
    payload: Result<Json<NewBox>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(new) = payload?;
    let record = service.add(new).await?;
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, BOXES_PATH)],
        Json(record),
    ))
}

/// DELETE /api/boxes
pub async fn delete_boxes(State(service): State<Arc<BoxService>>) -> Result<StatusCode, ApiError> {
    service.clear_all().await?;
    Ok(StatusCode::NO_CONTENT)
}
