use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crustops_core::ServiceError;

use crate::model::{Batch, BatchPizza, BatchPizzaDetail};
use crate::service::batch::{CreateBatchInput, CreateBatchPizzaInput};

use super::AppState;

pub(crate) fn routes() -> Router<AppState> {
    Router::new()
        .route("/batches", get(list).post(create))
        // Static segment; takes precedence over the `{id}` match below.
        .route("/batches/next", get(next))
        .route(
            "/batches/{id}",
            get(get_one).patch(update).delete(delete_one),
        )
        .route("/batches/{id}/pizzas", get(list_pizzas).post(add_pizza))
        .route(
            "/batches/{batch_id}/pizzas/{pizza_id}",
            axum::routing::patch(update_pizza).delete(remove_pizza),
        )
        .route("/batches/{id}/availability/{pizza_id}", get(availability))
}

async fn list(State(svc): State<AppState>) -> Result<Json<Vec<Batch>>, ServiceError> {
    Ok(Json(svc.list_batches()?))
}

async fn create(
    State(svc): State<AppState>,
    Json(input): Json<CreateBatchInput>,
) -> Result<(StatusCode, Json<Batch>), ServiceError> {
    let batch = svc.create_batch(input)?;
    Ok((StatusCode::CREATED, Json(batch)))
}

/// The batch customers currently order from: today's, else the earliest
/// future one. 404 when nothing is scheduled.
async fn next(State(svc): State<AppState>) -> Result<Json<Batch>, ServiceError> {
    let batch = svc
        .next_batch()?
        .ok_or_else(|| ServiceError::NotFound("no upcoming batch".into()))?;
    Ok(Json(batch))
}

async fn get_one(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Batch>, ServiceError> {
    Ok(Json(svc.get_batch(&id)?))
}

async fn update(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<serde_json::Value>,
) -> Result<Json<Batch>, ServiceError> {
    Ok(Json(svc.update_batch(&id, patch)?))
}

async fn delete_one(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServiceError> {
    svc.delete_batch(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_pizzas(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<BatchPizzaDetail>>, ServiceError> {
    Ok(Json(svc.list_batch_pizzas(&id)?))
}

async fn add_pizza(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<CreateBatchPizzaInput>,
) -> Result<(StatusCode, Json<BatchPizza>), ServiceError> {
    let entry = svc.add_batch_pizza(&id, input)?;
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn update_pizza(
    State(svc): State<AppState>,
    Path((batch_id, pizza_id)): Path<(String, String)>,
    Json(patch): Json<serde_json::Value>,
) -> Result<Json<BatchPizza>, ServiceError> {
    Ok(Json(svc.update_batch_pizza(&batch_id, &pizza_id, patch)?))
}

async fn remove_pizza(
    State(svc): State<AppState>,
    Path((batch_id, pizza_id)): Path<(String, String)>,
) -> Result<StatusCode, ServiceError> {
    svc.remove_batch_pizza(&batch_id, &pizza_id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn availability(
    State(svc): State<AppState>,
    Path((batch_id, pizza_id)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let available = svc.available_quantity(&batch_id, &pizza_id)?;
    Ok(Json(serde_json::json!({"available": available})))
}
