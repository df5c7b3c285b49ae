use serde::{Deserialize, Serialize};

/// Storefront settings. A singleton row with id 1.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_id")]
    pub id: i64,

    /// Daily order cap for legacy (batch-less) orders.
    pub max_pies_per_day: u32,

    /// Service weekdays, 0=Sun .. 6=Sat.
    pub service_days: Vec<u8>,

    /// First service hour, 24h clock.
    pub service_start_hour: u8,

    /// Last service hour, 24h clock.
    pub service_end_hour: u8,
}

fn default_id() -> i64 {
    1
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            id: 1,
            max_pies_per_day: 15,
            service_days: vec![4, 5, 6], // Thu, Fri, Sat
            service_start_hour: 16,
            service_end_hour: 20,
        }
    }
}
