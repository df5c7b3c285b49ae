use serde::{Deserialize, Serialize};

use super::Pizza;

/// Batch — a named service window during which a subset of pizzas is
/// offered for order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    /// UUID primary key.
    #[serde(default)]
    pub id: String,

    /// Sequential, human-facing batch number. Unique.
    pub batch_number: i64,

    /// Service date (YYYY-MM-DD).
    pub service_date: String,

    /// First service hour, 24h clock (16 = 4PM).
    #[serde(default = "default_start_hour")]
    pub service_start_hour: u8,

    /// Last service hour, 24h clock (20 = 8PM).
    #[serde(default = "default_end_hour")]
    pub service_end_hour: u8,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

fn default_start_hour() -> u8 {
    16
}

fn default_end_hour() -> u8 {
    20
}

/// Batch pizza — associates a pizza with a batch and carries the
/// per-batch quantity cap.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BatchPizza {
    /// UUID primary key.
    #[serde(default)]
    pub id: String,

    pub batch_id: String,

    pub pizza_id: String,

    /// Maximum sellable quantity of this pizza in this batch.
    pub max_quantity: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// A batch pizza row joined with its full pizza document, as returned
/// by the batch admin endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchPizzaDetail {
    #[serde(flatten)]
    pub entry: BatchPizza,

    pub pizza: Pizza,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_json_roundtrip() {
        let b = Batch {
            id: "b001".into(),
            batch_number: 7,
            service_date: "2026-09-04".into(),
            service_start_hour: 16,
            service_end_hour: 20,
            created_at: None,
        };
        let json = serde_json::to_string(&b).unwrap();
        let back: Batch = serde_json::from_str(&json).unwrap();
        assert_eq!(b, back);
    }

    #[test]
    fn batch_hours_default() {
        let b: Batch = serde_json::from_str(
            r#"{"batchNumber": 1, "serviceDate": "2026-09-04"}"#,
        )
        .unwrap();
        assert_eq!(b.service_start_hour, 16);
        assert_eq!(b.service_end_hour, 20);
    }
}
