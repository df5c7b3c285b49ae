//! HTTP API. One router per resource, merged here and nested under
//! `/api` by the binary.

pub mod auth;
pub mod batches;
pub mod orders;
pub mod pizzas;
pub mod reviews;
pub mod settings;

use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};

use crate::service::ShopService;

pub(crate) type AppState = Arc<ShopService>;

pub fn router(service: AppState) -> Router {
    Router::new()
        .merge(pizzas::routes())
        .merge(orders::routes())
        .merge(reviews::routes())
        .merge(settings::routes())
        .merge(auth::routes())
        .merge(batches::routes())
        .route("/health", get(health))
        .with_state(service)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}
