use crustops_core::{new_id, ListParams, ServiceError};
use crustops_sql::Value;

use crate::model::{Order, OrderStatus, OrderType};

use super::ShopService;

/// Input for placing an order.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderInput {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub batch_id: Option<String>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub pizza_id: String,
    pub quantity: u32,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub date: String,
    pub time_slot: String,
}

impl ShopService {
    /// Place an order.
    ///
    /// Validation order follows the storefront flow: pending-review
    /// gate, pizza checks, then stock. Stock is enforced by a guarded
    /// `INSERT ... SELECT ... WHERE`, so the availability check and the
    /// insert are a single atomic statement — concurrent orders cannot
    /// oversell a batch.
    pub fn create_order(&self, input: CreateOrderInput) -> Result<Order, ServiceError> {
        if input.quantity == 0 {
            return Err(ServiceError::Validation("quantity must be at least 1".into()));
        }

        // One outstanding review at a time: block new orders while a
        // delivered/completed order is still unreviewed.
        if let Some(ref user_id) = input.user_id {
            if !self.pending_reviews(user_id)?.is_empty() {
                return Err(ServiceError::Validation(
                    "Please review your previous order before placing a new one. \
                     You can find the review link in your order history."
                        .into(),
                ));
            }
        }

        let pizza = self.get_pizza(&input.pizza_id).map_err(|_| {
            ServiceError::NotFound(format!("pizza {} not found", input.pizza_id))
        })?;
        if !pizza.active {
            return Err(ServiceError::Validation(
                "This pizza is not currently available.".into(),
            ));
        }

        let id = new_id();
        let now = Self::now();
        let record = Order {
            id: id.clone(),
            user_id: input.user_id,
            batch_id: input.batch_id.clone(),
            customer_name: input.customer_name,
            customer_email: input.customer_email,
            customer_phone: input.customer_phone,
            pizza_id: input.pizza_id,
            quantity: input.quantity,
            order_type: input.order_type,
            date: input.date,
            time_slot: input.time_slot,
            status: OrderStatus::Confirmed,
            created_at: Some(now.clone()),
        };
        let json = serde_json::to_string(&record)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        match input.batch_id {
            Some(ref batch_id) => {
                let batch = self.get_batch(batch_id).map_err(|_| {
                    ServiceError::NotFound(format!("batch {} not found", batch_id))
                })?;
                if record.date != batch.service_date {
                    return Err(ServiceError::Validation(
                        "Order date does not match batch service date.".into(),
                    ));
                }
                self.insert_batch_order(&record, &json, &now)?;
            }
            None => {
                // Legacy path: no batch, only the daily cap applies.
                if pizza.sold_out {
                    return Err(ServiceError::Validation(
                        "This pizza is currently sold out.".into(),
                    ));
                }
                let cap = self.settings()?.max_pies_per_day;
                self.insert_capped_order(&record, &json, &now, cap)?;
            }
        }

        Ok(record)
    }

    /// Guarded insert against the batch cap: remaining availability
    /// (cap minus non-cancelled ordered quantity) must cover the order.
    fn insert_batch_order(
        &self,
        order: &Order,
        json: &str,
        now: &str,
    ) -> Result<(), ServiceError> {
        let batch_id = order.batch_id.as_deref().unwrap_or_default();
        let affected = self.sql
            .exec(
                "INSERT INTO orders
                     (id, data, user_id, batch_id, pizza_id, quantity, status, date, create_at)
                 SELECT ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9
                 WHERE COALESCE((SELECT bp.max_quantity FROM batch_pizzas bp
                                 WHERE bp.batch_id = ?4 AND bp.pizza_id = ?5), 0)
                       - COALESCE((SELECT SUM(o.quantity) FROM orders o
                                   WHERE o.batch_id = ?4 AND o.pizza_id = ?5
                                     AND o.status <> 'cancelled'), 0)
                       >= ?6",
                &[
                    order.id.as_str().into(),
                    json.into(),
                    order.user_id.as_deref().into(),
                    batch_id.into(),
                    order.pizza_id.as_str().into(),
                    Value::Integer(order.quantity as i64),
                    order.status.as_str().into(),
                    order.date.as_str().into(),
                    now.into(),
                ],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        if affected == 0 {
            let available = self.available_quantity(batch_id, &order.pizza_id)?;
            let noun = if available == 1 { "pizza" } else { "pizzas" };
            return Err(ServiceError::SoldOut(format!(
                "Sorry! Only {} {} available for this batch.",
                available, noun
            )));
        }
        Ok(())
    }

    /// Guarded insert against the daily cap for batch-less orders.
    fn insert_capped_order(
        &self,
        order: &Order,
        json: &str,
        now: &str,
        cap: u32,
    ) -> Result<(), ServiceError> {
        let affected = self.sql
            .exec(
                "INSERT INTO orders
                     (id, data, user_id, batch_id, pizza_id, quantity, status, date, create_at)
                 SELECT ?1, ?2, ?3, NULL, ?4, ?5, ?6, ?7, ?8
                 WHERE COALESCE((SELECT SUM(o.quantity) FROM orders o
                                 WHERE o.date = ?7 AND o.status <> 'cancelled'), 0)
                       + ?5 <= ?9",
                &[
                    order.id.as_str().into(),
                    json.into(),
                    order.user_id.as_deref().into(),
                    order.pizza_id.as_str().into(),
                    Value::Integer(order.quantity as i64),
                    order.status.as_str().into(),
                    order.date.as_str().into(),
                    now.into(),
                    Value::Integer(cap as i64),
                ],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        if affected == 0 {
            return Err(ServiceError::SoldOut(
                "Sorry! We just sold out for that date while you were ordering.".into(),
            ));
        }
        Ok(())
    }

    pub fn get_order(&self, id: &str) -> Result<Order, ServiceError> {
        self.get_record("orders", id)
    }

    /// All orders, newest first, optionally restricted to one user.
    pub fn list_orders(
        &self,
        params: &ListParams,
        user_id: Option<&str>,
    ) -> Result<Vec<Order>, ServiceError> {
        let mut filters: Vec<(&str, Value)> = Vec::new();
        if let Some(uid) = user_id {
            filters.push(("user_id", uid.into()));
        }
        self.list_records("orders", &filters, "create_at DESC", params.limit, params.offset)
    }

    /// Set an order's status to any allow-listed value.
    ///
    /// There is deliberately no transition graph; the admin dashboard
    /// suggests a next status but the server accepts all known ones.
    /// Customer-visible transitions trigger an SMS-style notification;
    /// a notification failure never fails the update.
    pub fn set_order_status(&self, id: &str, status: &str) -> Result<Order, ServiceError> {
        let status = OrderStatus::parse(status)
            .ok_or_else(|| ServiceError::Validation(format!("invalid status '{}'", status)))?;

        let mut order: Order = self.get_record("orders", id)?;
        order.status = status;

        self.update_record("orders", id, &order, &[
            ("status", status.as_str().into()),
        ])?;

        if let Some(message) = status_notification(status) {
            if let Err(e) = self.notifier.send(&order.customer_phone, message) {
                tracing::warn!(order_id = %id, error = %e, "status notification failed");
            }
        }

        Ok(order)
    }
}

/// Customer-facing message for a status change, if any.
fn status_notification(status: OrderStatus) -> Option<&'static str> {
    match status {
        OrderStatus::Cooking => Some("Your order is in the oven."),
        OrderStatus::Ready => Some("Your order is ready!"),
        OrderStatus::Delivered => {
            Some("Enjoy the pie! We await your honest review - Team CrustOps")
        }
        OrderStatus::Cancelled => {
            Some("Your order has been cancelled. If you have questions, please contact us.")
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crustops_core::{ListParams, ServiceError};

    use crate::model::OrderType;
    use crate::notify::testing::FailingNotifier;
    use crate::service::batch::{CreateBatchInput, CreateBatchPizzaInput};
    use crate::service::pizza::CreatePizzaInput;
    use crate::service::testing::{test_service, test_service_with};
    use crate::service::{ShopConfig, ShopService};

    use super::CreateOrderInput;

    const DATE: &str = "2026-09-04";

    fn setup_batch(svc: &ShopService, cap: u32) -> (String, String) {
        let pizza = svc
            .create_pizza(CreatePizzaInput {
                name: "Señor Crustobal".into(),
                description: "taco pie".into(),
                tags: vec![],
                image_url: None,
                active: true,
                sold_out: false,
                price: "25.00".into(),
            })
            .unwrap();
        let batch = svc
            .create_batch(CreateBatchInput {
                batch_number: 1,
                service_date: DATE.into(),
                service_start_hour: 16,
                service_end_hour: 20,
            })
            .unwrap();
        svc.add_batch_pizza(&batch.id, CreateBatchPizzaInput {
            pizza_id: pizza.id.clone(),
            max_quantity: cap,
        })
        .unwrap();
        (batch.id, pizza.id)
    }

    fn order_input(batch_id: Option<&str>, pizza_id: &str, quantity: u32) -> CreateOrderInput {
        CreateOrderInput {
            user_id: None,
            batch_id: batch_id.map(String::from),
            customer_name: "Ada".into(),
            customer_email: "ada@example.com".into(),
            customer_phone: "+15550001111".into(),
            pizza_id: pizza_id.into(),
            quantity,
            order_type: OrderType::Pickup,
            date: DATE.into(),
            time_slot: "16:30".into(),
        }
    }

    #[test]
    fn order_is_stored_confirmed_and_draws_stock() {
        let (svc, _) = test_service();
        let (batch_id, pizza_id) = setup_batch(&svc, 5);

        let order = svc
            .create_order(order_input(Some(&batch_id), &pizza_id, 2))
            .unwrap();
        assert_eq!(order.status.as_str(), "confirmed");
        assert_eq!(svc.available_quantity(&batch_id, &pizza_id).unwrap(), 3);

        let fetched = svc.get_order(&order.id).unwrap();
        assert_eq!(fetched, order);
    }

    #[test]
    fn oversell_is_rejected_with_remaining_count() {
        let (svc, _) = test_service();
        let (batch_id, pizza_id) = setup_batch(&svc, 3);

        svc.create_order(order_input(Some(&batch_id), &pizza_id, 2))
            .unwrap();

        let err = svc
            .create_order(order_input(Some(&batch_id), &pizza_id, 2))
            .unwrap_err();
        match err {
            ServiceError::SoldOut(msg) => assert!(msg.contains("Only 1 pizza available")),
            other => panic!("expected SoldOut, got {:?}", other),
        }

        // The remaining single pizza can still be ordered.
        svc.create_order(order_input(Some(&batch_id), &pizza_id, 1))
            .unwrap();
        assert_eq!(svc.available_quantity(&batch_id, &pizza_id).unwrap(), 0);
    }

    #[test]
    fn concurrent_orders_sell_exactly_the_cap() {
        let (svc, _) = test_service();
        let (batch_id, pizza_id) = setup_batch(&svc, 5);

        let mut handles = Vec::new();
        for _ in 0..16 {
            let svc = Arc::clone(&svc);
            let batch_id = batch_id.clone();
            let pizza_id = pizza_id.clone();
            handles.push(std::thread::spawn(move || {
                svc.create_order(order_input(Some(&batch_id), &pizza_id, 1))
                    .is_ok()
            }));
        }

        let sold = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(sold, 5);
        assert_eq!(svc.available_quantity(&batch_id, &pizza_id).unwrap(), 0);
    }

    #[test]
    fn cancelling_releases_stock() {
        let (svc, _) = test_service();
        let (batch_id, pizza_id) = setup_batch(&svc, 2);

        let order = svc
            .create_order(order_input(Some(&batch_id), &pizza_id, 2))
            .unwrap();
        assert_eq!(svc.available_quantity(&batch_id, &pizza_id).unwrap(), 0);

        svc.set_order_status(&order.id, "cancelled").unwrap();
        assert_eq!(svc.available_quantity(&batch_id, &pizza_id).unwrap(), 2);
    }

    #[test]
    fn pizza_not_in_batch_is_unorderable() {
        let (svc, _) = test_service();
        let (batch_id, _) = setup_batch(&svc, 3);
        let other = svc
            .create_pizza(CreatePizzaInput {
                name: "Interloper".into(),
                description: "not offered".into(),
                tags: vec![],
                image_url: None,
                active: true,
                sold_out: false,
                price: "20.00".into(),
            })
            .unwrap();

        let err = svc
            .create_order(order_input(Some(&batch_id), &other.id, 1))
            .unwrap_err();
        assert!(matches!(err, ServiceError::SoldOut(_)));
    }

    #[test]
    fn date_must_match_batch_service_date() {
        let (svc, _) = test_service();
        let (batch_id, pizza_id) = setup_batch(&svc, 3);

        let mut input = order_input(Some(&batch_id), &pizza_id, 1);
        input.date = "2026-09-05".into();
        let err = svc.create_order(input).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn inactive_pizza_is_rejected() {
        let (svc, _) = test_service();
        let (batch_id, pizza_id) = setup_batch(&svc, 3);
        svc.update_pizza(&pizza_id, serde_json::json!({"active": false}))
            .unwrap();

        let err = svc
            .create_order(order_input(Some(&batch_id), &pizza_id, 1))
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn legacy_orders_respect_daily_cap() {
        let (svc, _) = test_service();
        let (_, pizza_id) = setup_batch(&svc, 100);
        svc.update_settings(serde_json::json!({"maxPiesPerDay": 3}))
            .unwrap();

        svc.create_order(order_input(None, &pizza_id, 2)).unwrap();
        let err = svc.create_order(order_input(None, &pizza_id, 2)).unwrap_err();
        assert!(matches!(err, ServiceError::SoldOut(_)));
        svc.create_order(order_input(None, &pizza_id, 1)).unwrap();
    }

    #[test]
    fn status_updates_notify_and_tolerate_gateway_failure() {
        let (svc, notifier) = test_service();
        let (batch_id, pizza_id) = setup_batch(&svc, 5);
        let order = svc
            .create_order(order_input(Some(&batch_id), &pizza_id, 1))
            .unwrap();

        svc.set_order_status(&order.id, "cooking").unwrap();
        svc.set_order_status(&order.id, "ready").unwrap();
        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].1, "Your order is in the oven.");
        assert_eq!(sent[1].1, "Your order is ready!");
        drop(sent);

        assert!(svc.set_order_status(&order.id, "al dente").is_err());

        // A failing gateway must not fail the update.
        let svc = test_service_with(Arc::new(FailingNotifier), ShopConfig::default());
        let (batch_id, pizza_id) = setup_batch(&svc, 5);
        let order = svc
            .create_order(order_input(Some(&batch_id), &pizza_id, 1))
            .unwrap();
        let updated = svc.set_order_status(&order.id, "delivered").unwrap();
        assert_eq!(updated.status.as_str(), "delivered");
    }

    #[test]
    fn list_orders_filters_by_user() {
        let (svc, _) = test_service();
        let (batch_id, pizza_id) = setup_batch(&svc, 10);

        let mut mine = order_input(Some(&batch_id), &pizza_id, 1);
        mine.user_id = Some("u1".into());
        svc.create_order(mine).unwrap();
        svc.create_order(order_input(Some(&batch_id), &pizza_id, 1))
            .unwrap();

        let all = svc.list_orders(&ListParams::default(), None).unwrap();
        assert_eq!(all.len(), 2);
        let filtered = svc.list_orders(&ListParams::default(), Some("u1")).unwrap();
        assert_eq!(filtered.len(), 1);
    }
}
