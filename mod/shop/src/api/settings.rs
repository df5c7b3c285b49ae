use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crustops_core::ServiceError;

use crate::model::Settings;

use super::AppState;

pub(crate) fn routes() -> Router<AppState> {
    Router::new().route("/settings", get(get_settings).patch(update_settings))
}

async fn get_settings(State(svc): State<AppState>) -> Result<Json<Settings>, ServiceError> {
    Ok(Json(svc.settings()?))
}

async fn update_settings(
    State(svc): State<AppState>,
    Json(patch): Json<serde_json::Value>,
) -> Result<Json<Settings>, ServiceError> {
    Ok(Json(svc.update_settings(patch)?))
}
