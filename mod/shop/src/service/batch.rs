use crustops_core::{new_id, today_ymd, ServiceError};
use crustops_sql::Value;

use crate::model::{Batch, BatchPizza, BatchPizzaDetail, Pizza};

use super::{ShopService, NO_LIMIT};

/// Input for creating a batch.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBatchInput {
    pub batch_number: i64,
    pub service_date: String,
    #[serde(default = "default_start_hour")]
    pub service_start_hour: u8,
    #[serde(default = "default_end_hour")]
    pub service_end_hour: u8,
}

fn default_start_hour() -> u8 {
    16
}

fn default_end_hour() -> u8 {
    20
}

/// Input for offering a pizza in a batch.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBatchPizzaInput {
    pub pizza_id: String,
    pub max_quantity: u32,
}

impl ShopService {
    // ── Batches ──

    pub fn create_batch(&self, input: CreateBatchInput) -> Result<Batch, ServiceError> {
        validate_service_date(&input.service_date)?;
        if input.service_start_hour >= input.service_end_hour {
            return Err(ServiceError::Validation(format!(
                "service window {}–{} is empty",
                input.service_start_hour, input.service_end_hour
            )));
        }

        let id = new_id();
        let now = Self::now();
        let record = Batch {
            id: id.clone(),
            batch_number: input.batch_number,
            service_date: input.service_date.clone(),
            service_start_hour: input.service_start_hour,
            service_end_hour: input.service_end_hour,
            created_at: Some(now.clone()),
        };

        self.insert_record("batches", &id, &record, &[
            ("batch_number", Value::Integer(input.batch_number)),
            ("service_date", Value::Text(input.service_date)),
            ("create_at", Value::Text(now)),
        ])?;

        Ok(record)
    }

    pub fn get_batch(&self, id: &str) -> Result<Batch, ServiceError> {
        self.get_record("batches", id)
    }

    /// All batches, ordered by batch number.
    pub fn list_batches(&self) -> Result<Vec<Batch>, ServiceError> {
        self.list_records("batches", &[], "batch_number ASC", NO_LIMIT, 0)
    }

    pub fn get_batch_by_date(&self, date: &str) -> Result<Option<Batch>, ServiceError> {
        let batches: Vec<Batch> = self.list_records(
            "batches",
            &[("service_date", date.into())],
            "batch_number ASC",
            1,
            0,
        )?;
        Ok(batches.into_iter().next())
    }

    /// The next batch customers can order from: today's batch if one
    /// exists, otherwise the earliest future batch.
    pub fn next_batch(&self) -> Result<Option<Batch>, ServiceError> {
        self.next_batch_from(&today_ymd())
    }

    pub(crate) fn next_batch_from(&self, today: &str) -> Result<Option<Batch>, ServiceError> {
        if let Some(batch) = self.get_batch_by_date(today)? {
            return Ok(Some(batch));
        }

        let rows = self.sql
            .query(
                "SELECT data FROM batches WHERE service_date >= ?1
                 ORDER BY service_date ASC LIMIT 1",
                &[today.into()],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        match rows.first().and_then(|r| r.get_str("data")) {
            Some(data) => {
                let batch: Batch = serde_json::from_str(data)
                    .map_err(|e| ServiceError::Internal(e.to_string()))?;
                Ok(Some(batch))
            }
            None => Ok(None),
        }
    }

    pub fn update_batch(
        &self,
        id: &str,
        patch: serde_json::Value,
    ) -> Result<Batch, ServiceError> {
        let current: Batch = self.get_record("batches", id)?;
        let updated: Batch = Self::apply_patch(&current, patch)?;
        validate_service_date(&updated.service_date)?;

        self.update_record("batches", id, &updated, &[
            ("batch_number", Value::Integer(updated.batch_number)),
            ("service_date", Value::Text(updated.service_date.clone())),
        ])?;

        Ok(updated)
    }

    /// Delete a batch along with its batch-pizza rows.
    pub fn delete_batch(&self, id: &str) -> Result<(), ServiceError> {
        self.sql
            .exec(
                "DELETE FROM batch_pizzas WHERE batch_id = ?1",
                &[Value::Text(id.to_string())],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        self.delete_record("batches", id)
    }

    // ── Batch pizzas ──

    pub fn add_batch_pizza(
        &self,
        batch_id: &str,
        input: CreateBatchPizzaInput,
    ) -> Result<BatchPizza, ServiceError> {
        // Both sides of the association must exist.
        self.get_batch(batch_id)?;
        self.get_pizza(&input.pizza_id)?;

        let id = new_id();
        let now = Self::now();
        let record = BatchPizza {
            id: id.clone(),
            batch_id: batch_id.to_string(),
            pizza_id: input.pizza_id.clone(),
            max_quantity: input.max_quantity,
            created_at: Some(now.clone()),
        };

        self.insert_record("batch_pizzas", &id, &record, &[
            ("batch_id", Value::Text(batch_id.to_string())),
            ("pizza_id", Value::Text(input.pizza_id)),
            ("max_quantity", Value::Integer(input.max_quantity as i64)),
            ("create_at", Value::Text(now)),
        ])?;

        Ok(record)
    }

    /// The batch-pizza row for a (batch, pizza) pair, if the pizza is
    /// offered in the batch.
    pub fn get_batch_pizza(
        &self,
        batch_id: &str,
        pizza_id: &str,
    ) -> Result<Option<BatchPizza>, ServiceError> {
        let entries: Vec<BatchPizza> = self.list_records(
            "batch_pizzas",
            &[("batch_id", batch_id.into()), ("pizza_id", pizza_id.into())],
            "create_at ASC",
            1,
            0,
        )?;
        Ok(entries.into_iter().next())
    }

    /// Batch-pizza rows joined with their pizza documents.
    pub fn list_batch_pizzas(
        &self,
        batch_id: &str,
    ) -> Result<Vec<BatchPizzaDetail>, ServiceError> {
        let rows = self.sql
            .query(
                "SELECT bp.data AS bp_data, p.data AS pizza_data
                 FROM batch_pizzas bp
                 JOIN pizzas p ON p.id = bp.pizza_id
                 WHERE bp.batch_id = ?1
                 ORDER BY bp.create_at ASC",
                &[batch_id.into()],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        let mut details = Vec::new();
        for row in &rows {
            let entry: BatchPizza = row
                .get_str("bp_data")
                .ok_or_else(|| ServiceError::Internal("missing bp_data".into()))
                .and_then(|d| {
                    serde_json::from_str(d).map_err(|e| ServiceError::Internal(e.to_string()))
                })?;
            let pizza: Pizza = row
                .get_str("pizza_data")
                .ok_or_else(|| ServiceError::Internal("missing pizza_data".into()))
                .and_then(|d| {
                    serde_json::from_str(d).map_err(|e| ServiceError::Internal(e.to_string()))
                })?;
            details.push(BatchPizzaDetail { entry, pizza });
        }
        Ok(details)
    }

    pub fn update_batch_pizza(
        &self,
        batch_id: &str,
        pizza_id: &str,
        patch: serde_json::Value,
    ) -> Result<BatchPizza, ServiceError> {
        let current = self
            .get_batch_pizza(batch_id, pizza_id)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "pizza {} is not offered in batch {}",
                    pizza_id, batch_id
                ))
            })?;
        let updated: BatchPizza = Self::apply_patch(&current, patch)?;

        self.update_record("batch_pizzas", &current.id, &updated, &[
            ("max_quantity", Value::Integer(updated.max_quantity as i64)),
        ])?;

        Ok(updated)
    }

    pub fn remove_batch_pizza(
        &self,
        batch_id: &str,
        pizza_id: &str,
    ) -> Result<(), ServiceError> {
        let entry = self
            .get_batch_pizza(batch_id, pizza_id)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "pizza {} is not offered in batch {}",
                    pizza_id, batch_id
                ))
            })?;
        self.delete_record("batch_pizzas", &entry.id)
    }

    // ── Availability ──

    /// Remaining sellable quantity for a pizza in a batch: the per-batch
    /// cap minus the sum of non-cancelled order quantities, clamped at 0.
    /// A pizza not offered in the batch has availability 0.
    pub fn available_quantity(
        &self,
        batch_id: &str,
        pizza_id: &str,
    ) -> Result<u32, ServiceError> {
        let entry = match self.get_batch_pizza(batch_id, pizza_id)? {
            Some(e) => e,
            None => return Ok(0),
        };

        let rows = self.sql
            .query(
                "SELECT COALESCE(SUM(quantity), 0) AS ordered FROM orders
                 WHERE batch_id = ?1 AND pizza_id = ?2 AND status <> 'cancelled'",
                &[batch_id.into(), pizza_id.into()],
            )
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        let ordered = rows.first().and_then(|r| r.get_i64("ordered")).unwrap_or(0);
        Ok((entry.max_quantity as i64 - ordered).max(0) as u32)
    }
}

fn validate_service_date(date: &str) -> Result<(), ServiceError> {
    if chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
        return Err(ServiceError::Validation(format!(
            "invalid service date '{}', expected YYYY-MM-DD",
            date
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::service::testing::test_service;

    use super::{CreateBatchInput, CreateBatchPizzaInput};

    fn batch_input(number: i64, date: &str) -> CreateBatchInput {
        CreateBatchInput {
            batch_number: number,
            service_date: date.into(),
            service_start_hour: 16,
            service_end_hour: 20,
        }
    }

    fn some_pizza(svc: &crate::service::ShopService, name: &str) -> crate::model::Pizza {
        svc.create_pizza(crate::service::pizza::CreatePizzaInput {
            name: name.into(),
            description: "pie".into(),
            tags: vec![],
            image_url: None,
            active: true,
            sold_out: false,
            price: "24.00".into(),
        })
        .unwrap()
    }

    #[test]
    fn create_list_delete_batch() {
        let (svc, _) = test_service();
        let b2 = svc.create_batch(batch_input(2, "2026-09-11")).unwrap();
        let b1 = svc.create_batch(batch_input(1, "2026-09-04")).unwrap();

        let all = svc.list_batches().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, b1.id); // ordered by batch number

        svc.delete_batch(&b2.id).unwrap();
        assert!(svc.get_batch(&b2.id).is_err());
    }

    #[test]
    fn batch_number_is_unique() {
        let (svc, _) = test_service();
        svc.create_batch(batch_input(1, "2026-09-04")).unwrap();
        let dup = svc.create_batch(batch_input(1, "2026-09-11"));
        assert!(matches!(dup, Err(crustops_core::ServiceError::Conflict(_))));
    }

    #[test]
    fn rejects_malformed_date_and_empty_window() {
        let (svc, _) = test_service();
        assert!(svc.create_batch(batch_input(1, "next friday")).is_err());

        let mut input = batch_input(2, "2026-09-04");
        input.service_start_hour = 20;
        input.service_end_hour = 16;
        assert!(svc.create_batch(input).is_err());
    }

    #[test]
    fn next_batch_prefers_today_then_earliest_future() {
        let (svc, _) = test_service();
        svc.create_batch(batch_input(1, "2026-08-21")).unwrap(); // past
        svc.create_batch(batch_input(2, "2026-09-04")).unwrap();
        svc.create_batch(batch_input(3, "2026-08-28")).unwrap(); // today

        let next = svc.next_batch_from("2026-08-28").unwrap().unwrap();
        assert_eq!(next.batch_number, 3);

        let later = svc.next_batch_from("2026-08-29").unwrap().unwrap();
        assert_eq!(later.batch_number, 2);

        assert!(svc.next_batch_from("2026-12-01").unwrap().is_none());
    }

    #[test]
    fn batch_pizza_association_and_caps() {
        let (svc, _) = test_service();
        let batch = svc.create_batch(batch_input(1, "2026-09-04")).unwrap();
        let pizza = some_pizza(&svc, "Truffle Shuffle");

        let entry = svc
            .add_batch_pizza(&batch.id, CreateBatchPizzaInput {
                pizza_id: pizza.id.clone(),
                max_quantity: 5,
            })
            .unwrap();
        assert_eq!(entry.max_quantity, 5);

        // Duplicate pair is rejected.
        let dup = svc.add_batch_pizza(&batch.id, CreateBatchPizzaInput {
            pizza_id: pizza.id.clone(),
            max_quantity: 9,
        });
        assert!(dup.is_err());

        let listed = svc.list_batch_pizzas(&batch.id).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].pizza.name, "Truffle Shuffle");

        let updated = svc
            .update_batch_pizza(&batch.id, &pizza.id, serde_json::json!({"maxQuantity": 8}))
            .unwrap();
        assert_eq!(updated.max_quantity, 8);
        assert_eq!(svc.available_quantity(&batch.id, &pizza.id).unwrap(), 8);

        svc.remove_batch_pizza(&batch.id, &pizza.id).unwrap();
        assert_eq!(svc.available_quantity(&batch.id, &pizza.id).unwrap(), 0);
    }

    #[test]
    fn availability_zero_for_unknown_pair() {
        let (svc, _) = test_service();
        let batch = svc.create_batch(batch_input(1, "2026-09-04")).unwrap();
        assert_eq!(svc.available_quantity(&batch.id, "nope").unwrap(), 0);
    }

    #[test]
    fn delete_batch_cascades_batch_pizzas() {
        let (svc, _) = test_service();
        let batch = svc.create_batch(batch_input(1, "2026-09-04")).unwrap();
        let pizza = some_pizza(&svc, "Cascade");
        svc.add_batch_pizza(&batch.id, CreateBatchPizzaInput {
            pizza_id: pizza.id.clone(),
            max_quantity: 3,
        })
        .unwrap();

        svc.delete_batch(&batch.id).unwrap();
        assert!(svc.get_batch_pizza(&batch.id, &pizza.id).unwrap().is_none());
    }
}
