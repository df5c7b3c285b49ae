use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, patch};
use axum::{Json, Router};

use crustops_core::{ListParams, ServiceError};

use crate::model::{MenuPizza, Pizza};
use crate::service::pizza::CreatePizzaInput;

use super::AppState;

pub(crate) fn routes() -> Router<AppState> {
    Router::new()
        .route("/pizzas", get(menu).post(create))
        .route("/pizzas/all", get(list_all))
        .route("/pizzas/{id}", patch(update))
}

/// The storefront menu: active pizzas with live batch availability.
async fn menu(State(svc): State<AppState>) -> Result<Json<Vec<MenuPizza>>, ServiceError> {
    Ok(Json(svc.menu()?))
}

/// Every pizza, active or not (admin view).
async fn list_all(
    State(svc): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Pizza>>, ServiceError> {
    Ok(Json(svc.list_pizzas(&params)?))
}

async fn create(
    State(svc): State<AppState>,
    Json(input): Json<CreatePizzaInput>,
) -> Result<(StatusCode, Json<Pizza>), ServiceError> {
    let pizza = svc.create_pizza(input)?;
    Ok((StatusCode::CREATED, Json(pizza)))
}

async fn update(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<serde_json::Value>,
) -> Result<Json<Pizza>, ServiceError> {
    Ok(Json(svc.update_pizza(&id, patch)?))
}
