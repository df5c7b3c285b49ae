use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, patch};
use axum::{Json, Router};

use crustops_core::{ListParams, ServiceError};

use crate::model::Order;
use crate::service::order::CreateOrderInput;

use super::AppState;

pub(crate) fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list).post(create))
        .route("/orders/{id}", get(get_one))
        .route("/orders/{id}/status", patch(set_status))
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderListQuery {
    limit: Option<usize>,
    offset: Option<usize>,
    user_id: Option<String>,
}

impl OrderListQuery {
    fn params(&self) -> ListParams {
        let defaults = ListParams::default();
        ListParams {
            limit: self.limit.unwrap_or(defaults.limit),
            offset: self.offset.unwrap_or(defaults.offset),
        }
    }
}

async fn list(
    State(svc): State<AppState>,
    Query(query): Query<OrderListQuery>,
) -> Result<Json<Vec<Order>>, ServiceError> {
    Ok(Json(svc.list_orders(&query.params(), query.user_id.as_deref())?))
}

async fn create(
    State(svc): State<AppState>,
    Json(input): Json<CreateOrderInput>,
) -> Result<(StatusCode, Json<Order>), ServiceError> {
    let order = svc.create_order(input)?;
    Ok((StatusCode::CREATED, Json(order)))
}

async fn get_one(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Order>, ServiceError> {
    Ok(Json(svc.get_order(&id)?))
}

#[derive(serde::Deserialize)]
struct StatusUpdate {
    status: String,
}

async fn set_status(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<StatusUpdate>,
) -> Result<Json<Order>, ServiceError> {
    Ok(Json(svc.set_order_status(&id, &body.status)?))
}
