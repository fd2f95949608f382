//! HTTP API for the box collection
//!
//! Routes:
//! - `GET /api/boxes` lists every box
//! - `POST /api/boxes` creates a box and returns it with its new id
//! - `DELETE /api/boxes` removes all boxes

pub mod error;
pub mod handlers;
pub mod redirect;

use std::sync::Arc;

use axum::middleware;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::service::BoxService;
use handlers::{create_box, delete_boxes, list_boxes};
use redirect::redirect_to_https;

/// Route shared by all box endpoints
pub const BOXES_PATH: &str = "/api/boxes";

/// Build the application router.
///
/// When `https_port` is set, plain HTTP requests are redirected there.
pub fn router(service: Arc<BoxService>, https_port: Option<u16>) -> Router {
    let mut router = Router::new()
        .route(
            BOXES_PATH,
            get(list_boxes).post(create_box).delete(delete_boxes),
        )
        .with_state(service);

    if let Some(port) = https_port {
        router = router.layer(middleware::from_fn_with_state(port, redirect_to_https));
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router.layer(cors).layer(TraceLayer::new_for_http())
}
