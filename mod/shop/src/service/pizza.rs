use crustops_core::{new_id, today_ymd, ListParams, ServiceError};
use crustops_sql::Value;

use crate::model::{MenuPizza, Pizza};

use super::{ShopService, NO_LIMIT};

/// Input for creating a pizza.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePizzaInput {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub sold_out: bool,
    pub price: String,
}

fn default_true() -> bool {
    true
}

impl ShopService {
    pub fn create_pizza(&self, input: CreatePizzaInput) -> Result<Pizza, ServiceError> {
        if input.name.trim().is_empty() {
            return Err(ServiceError::Validation("pizza name is required".into()));
        }
        if input.price.trim().parse::<f64>().is_err() {
            return Err(ServiceError::Validation(format!(
                "invalid price '{}'",
                input.price
            )));
        }

        let id = new_id();
        let now = Self::now();
        let record = Pizza {
            id: id.clone(),
            name: input.name,
            description: input.description,
            tags: input.tags,
            image_url: input.image_url,
            active: input.active,
            sold_out: input.sold_out,
            price: input.price,
            created_at: Some(now.clone()),
        };

        self.insert_record("pizzas", &id, &record, &[
            ("active", record.active.into()),
            ("sold_out", record.sold_out.into()),
            ("create_at", Value::Text(now)),
        ])?;

        Ok(record)
    }

    pub fn get_pizza(&self, id: &str) -> Result<Pizza, ServiceError> {
        self.get_record("pizzas", id)
    }

    /// All pizzas, including inactive ones (admin view).
    pub fn list_pizzas(&self, params: &ListParams) -> Result<Vec<Pizza>, ServiceError> {
        self.list_records("pizzas", &[], "create_at ASC", params.limit, params.offset)
    }

    /// Pizzas visible on the storefront.
    pub fn active_pizzas(&self) -> Result<Vec<Pizza>, ServiceError> {
        self.list_records(
            "pizzas",
            &[("active", true.into())],
            "create_at ASC",
            NO_LIMIT,
            0,
        )
    }

    pub fn update_pizza(
        &self,
        id: &str,
        patch: serde_json::Value,
    ) -> Result<Pizza, ServiceError> {
        let current: Pizza = self.get_record("pizzas", id)?;
        let updated: Pizza = Self::apply_patch(&current, patch)?;

        self.update_record("pizzas", id, &updated, &[
            ("active", updated.active.into()),
            ("sold_out", updated.sold_out.into()),
        ])?;

        Ok(updated)
    }

    /// The storefront menu: active pizzas of the active batch, each
    /// annotated with live availability and the batch it belongs to.
    ///
    /// The active batch is today's batch, or the earliest future one.
    /// With no batch scheduled, every active pizza is shown sold out.
    pub fn menu(&self) -> Result<Vec<MenuPizza>, ServiceError> {
        self.menu_for_date(&today_ymd())
    }

    pub(crate) fn menu_for_date(&self, today: &str) -> Result<Vec<MenuPizza>, ServiceError> {
        let batch = match self.next_batch_from(today)? {
            Some(b) => b,
            None => {
                // No upcoming batch: nothing is orderable.
                return Ok(self
                    .active_pizzas()?
                    .into_iter()
                    .map(|mut p| {
                        p.sold_out = true;
                        MenuPizza {
                            pizza: p,
                            batch_id: None,
                            batch_number: None,
                            service_date: None,
                        }
                    })
                    .collect());
            }
        };

        let entries = self.list_batch_pizzas(&batch.id)?;
        let mut items = Vec::new();
        for entry in entries {
            let mut pizza = entry.pizza;
            if !pizza.active {
                continue;
            }
            let available = self.available_quantity(&batch.id, &pizza.id)?;
            pizza.sold_out = available == 0;
            items.push(MenuPizza {
                pizza,
                batch_id: Some(batch.id.clone()),
                batch_number: Some(batch.batch_number),
                service_date: Some(batch.service_date.clone()),
            });
        }
        Ok(items)
    }
}
