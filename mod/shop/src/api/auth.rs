use axum::extract::{Path, Query, State};
use axum::routing::{get, patch, post};
use axum::{Json, Router};

use crustops_core::ServiceError;

use crate::model::User;

use super::AppState;

pub(crate) fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/send-otp", post(send_otp))
        .route("/auth/verify-otp", post(verify_otp))
        .route("/auth/me", get(me))
        .route("/users/{id}", patch(update_user))
}

#[derive(serde::Deserialize)]
struct SendOtpRequest {
    phone: String,
}

async fn send_otp(
    State(svc): State<AppState>,
    Json(body): Json<SendOtpRequest>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    svc.send_otp(&body.phone)?;
    Ok(Json(serde_json::json!({"message": "OTP sent successfully"})))
}

#[derive(serde::Deserialize)]
struct VerifyOtpRequest {
    phone: String,
    code: String,
}

async fn verify_otp(
    State(svc): State<AppState>,
    Json(body): Json<VerifyOtpRequest>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let user = svc.verify_otp(&body.phone, &body.code)?;
    Ok(Json(serde_json::json!({"user": user})))
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct MeQuery {
    user_id: Option<String>,
}

// Toy session model: the client holds its user id and presents it as a
// query parameter.
async fn me(
    State(svc): State<AppState>,
    Query(query): Query<MeQuery>,
) -> Result<Json<User>, ServiceError> {
    let user_id = query
        .user_id
        .ok_or_else(|| ServiceError::Unauthorized("not logged in".into()))?;
    Ok(Json(svc.get_user(&user_id)?))
}

async fn update_user(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<serde_json::Value>,
) -> Result<Json<User>, ServiceError> {
    Ok(Json(svc.update_user(&id, patch)?))
}
