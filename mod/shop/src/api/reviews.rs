use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crustops_core::{ListParams, ServiceError};

use crate::model::{Order, Review};
use crate::service::review::CreateReviewInput;

use super::AppState;

pub(crate) fn routes() -> Router<AppState> {
    Router::new()
        .route("/reviews", get(list).post(create))
        .route("/reviews/pending", get(pending))
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewListQuery {
    limit: Option<usize>,
    offset: Option<usize>,
    pizza_id: Option<String>,
    order_id: Option<String>,
}

impl ReviewListQuery {
    fn params(&self) -> ListParams {
        let defaults = ListParams::default();
        ListParams {
            limit: self.limit.unwrap_or(defaults.limit),
            offset: self.offset.unwrap_or(defaults.offset),
        }
    }
}

/// List reviews, optionally narrowed to one pizza or one order. The
/// response is always an array; an order filter yields zero or one.
async fn list(
    State(svc): State<AppState>,
    Query(query): Query<ReviewListQuery>,
) -> Result<Json<Vec<Review>>, ServiceError> {
    let reviews = if let Some(order_id) = query.order_id {
        svc.review_by_order(&order_id)?.into_iter().collect()
    } else if let Some(pizza_id) = query.pizza_id {
        svc.reviews_by_pizza(&pizza_id)?
    } else {
        svc.list_reviews(&query.params())?
    };
    Ok(Json(reviews))
}

async fn create(
    State(svc): State<AppState>,
    Json(input): Json<CreateReviewInput>,
) -> Result<(StatusCode, Json<Review>), ServiceError> {
    let review = svc.create_review(input)?;
    Ok((StatusCode::CREATED, Json(review)))
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct PendingQuery {
    user_id: Option<String>,
}

/// The caller's delivered/completed orders still awaiting a review.
async fn pending(
    State(svc): State<AppState>,
    Query(query): Query<PendingQuery>,
) -> Result<Json<Vec<Order>>, ServiceError> {
    let user_id = query
        .user_id
        .ok_or_else(|| ServiceError::Validation("userId is required".into()))?;
    Ok(Json(svc.pending_reviews(&user_id)?))
}
