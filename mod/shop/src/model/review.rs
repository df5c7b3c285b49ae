use serde::{Deserialize, Serialize};

/// Review — structured post-order feedback. One per order.
///
/// `rating` and `comment` are the original free-form fields; the
/// optional questionnaire fields carry the structured answers shown on
/// the review page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// UUID primary key.
    #[serde(default)]
    pub id: String,

    pub order_id: String,

    pub pizza_id: String,

    /// 1-5 star rating.
    pub rating: i64,

    /// Free-form additional thoughts.
    pub comment: String,

    pub author: String,

    /// e.g. "Needs improvement" | "Good" | "Awesome" | "Mind-blowing!"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_rating: Option<String>,

    /// e.g. "$18–$20", or "Other" with `custom_price_amount` set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fair_price: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_price_amount: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crust_flavor: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crust_quality: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toppings_balance: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub would_order_again: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}
