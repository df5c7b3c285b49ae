use crustops_core::{new_id, ListParams, ServiceError};
use crustops_sql::Value;

use crate::model::{Order, Review};

use super::{ShopService, NO_LIMIT};

/// Input for submitting a review.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewInput {
    pub order_id: String,
    pub rating: i64,
    #[serde(default)]
    pub comment: String,
    pub author: String,
    #[serde(default)]
    pub overall_rating: Option<String>,
    #[serde(default)]
    pub fair_price: Option<String>,
    #[serde(default)]
    pub custom_price_amount: Option<String>,
    #[serde(default)]
    pub crust_flavor: Option<String>,
    #[serde(default)]
    pub crust_quality: Option<String>,
    #[serde(default)]
    pub toppings_balance: Option<String>,
    #[serde(default)]
    pub would_order_again: Option<String>,
}

impl ShopService {
    /// Submit a review for a delivered or completed order.
    ///
    /// The reviewed pizza is taken from the order, never from the
    /// caller. One review per order; the `order_id` UNIQUE index backs
    /// this up at the storage level.
    pub fn create_review(&self, input: CreateReviewInput) -> Result<Review, ServiceError> {
        if !(1..=5).contains(&input.rating) {
            return Err(ServiceError::Validation(
                "rating must be between 1 and 5".into(),
            ));
        }

        let order = self.get_order(&input.order_id)?;
        if !order.status.is_reviewable() {
            return Err(ServiceError::Validation(
                "Only delivered or completed orders can be reviewed.".into(),
            ));
        }
        if self.review_by_order(&input.order_id)?.is_some() {
            return Err(ServiceError::Conflict(
                "You have already reviewed this order.".into(),
            ));
        }

        let id = new_id();
        let now = Self::now();
        let record = Review {
            id: id.clone(),
            order_id: input.order_id,
            pizza_id: order.pizza_id,
            rating: input.rating,
            comment: input.comment,
            author: input.author,
            overall_rating: input.overall_rating,
            fair_price: input.fair_price,
            custom_price_amount: input.custom_price_amount,
            crust_flavor: input.crust_flavor,
            crust_quality: input.crust_quality,
            toppings_balance: input.toppings_balance,
            would_order_again: input.would_order_again,
            created_at: Some(now.clone()),
        };

        self.insert_record("reviews", &id, &record, &[
            ("order_id", record.order_id.as_str().into()),
            ("pizza_id", record.pizza_id.as_str().into()),
            ("create_at", Value::Text(now)),
        ])?;

        Ok(record)
    }

    pub fn list_reviews(&self, params: &ListParams) -> Result<Vec<Review>, ServiceError> {
        self.list_records("reviews", &[], "create_at DESC", params.limit, params.offset)
    }

    pub fn reviews_by_pizza(&self, pizza_id: &str) -> Result<Vec<Review>, ServiceError> {
        self.list_records(
            "reviews",
            &[("pizza_id", pizza_id.into())],
            "create_at DESC",
            NO_LIMIT,
            0,
        )
    }

    pub fn review_by_order(&self, order_id: &str) -> Result<Option<Review>, ServiceError> {
        Ok(self
            .list_records::<Review>(
                "reviews",
                &[("order_id", order_id.into())],
                "create_at DESC",
                1,
                0,
            )?
            .into_iter()
            .next())
    }

    /// A user's delivered/completed orders that have no review yet.
    /// Non-empty means the user is blocked from placing new orders.
    pub fn pending_reviews(&self, user_id: &str) -> Result<Vec<Order>, ServiceError> {
        let rows = self.sql
            .query(
                "SELECT o.data AS data FROM orders o
                 LEFT JOIN reviews r ON r.order_id = o.id
                 WHERE o.user_id = ?1
                   AND o.status IN ('delivered', 'completed')
                   AND r.id IS NULL
                 ORDER BY o.create_at DESC",
                &[user_id.into()],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        let mut orders = Vec::new();
        for row in &rows {
            let data = row.get_str("data")
                .ok_or_else(|| ServiceError::Internal("missing data column".into()))?;
            orders.push(
                serde_json::from_str(data)
                    .map_err(|e| ServiceError::Internal(e.to_string()))?,
            );
        }
        Ok(orders)
    }
}
