use serde::{Deserialize, Serialize};

/// Order lifecycle status.
///
/// There is no enforced transition graph: the admin dashboard suggests a
/// "next status" but the server accepts any allow-listed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Cooking,
    Ready,
    Delivered,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Cooking => "cooking",
            OrderStatus::Ready => "ready",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Parse an allow-listed status string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(OrderStatus::Pending),
            "confirmed" => Some(OrderStatus::Confirmed),
            "cooking" => Some(OrderStatus::Cooking),
            "ready" => Some(OrderStatus::Ready),
            "delivered" => Some(OrderStatus::Delivered),
            "completed" => Some(OrderStatus::Completed),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    /// A review may be left once the order reached one of these states.
    pub fn is_reviewable(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Completed)
    }
}

/// Fulfillment type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Pickup,
    Delivery,
}

/// Order — one pizza, one quantity, one service slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// UUID primary key.
    #[serde(default)]
    pub id: String,

    /// Owning user, when placed while logged in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Batch this order draws stock from. Absent on legacy orders that
    /// only count against the daily cap.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<String>,

    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,

    pub pizza_id: String,

    pub quantity: u32,

    /// Fulfillment type.
    #[serde(rename = "type")]
    pub order_type: OrderType,

    /// Service date (YYYY-MM-DD). Must match the batch service date.
    pub date: String,

    /// Service time slot, e.g. "16:00", "16:30".
    pub time_slot: String,

    pub status: OrderStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}
