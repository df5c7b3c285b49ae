use serde::{Deserialize, Serialize};

/// Pizza — a menu item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pizza {
    /// UUID primary key.
    #[serde(default)]
    pub id: String,

    pub name: String,

    pub description: String,

    /// Short labels shown on the menu card (e.g. "veg", "spicy").
    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Inactive pizzas are hidden from the storefront and not orderable.
    #[serde(default = "default_true")]
    pub active: bool,

    /// Manual sold-out flag; the batch menu overrides this from
    /// live availability.
    #[serde(default)]
    pub sold_out: bool,

    /// Decimal price string, e.g. "24.00".
    pub price: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

fn default_true() -> bool {
    true
}

/// A pizza as shown on the storefront menu: the pizza document plus the
/// batch it is offered in. `sold_out` reflects live batch availability.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuPizza {
    #[serde(flatten)]
    pub pizza: Pizza,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_number: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pizza_json_roundtrip() {
        let p = Pizza {
            id: "pz001".into(),
            name: "Truffle Shuffle".into(),
            description: "Wild mushrooms, garlic confit, taleggio.".into(),
            tags: vec!["veg".into(), "white pie".into()],
            image_url: None,
            active: true,
            sold_out: false,
            price: "24.00".into(),
            created_at: None,
        };
        let json = serde_json::to_string(&p).unwrap();
        let back: Pizza = serde_json::from_str(&json).unwrap();
        assert_eq!(p, back);
    }

    #[test]
    fn pizza_defaults_apply() {
        let p: Pizza = serde_json::from_str(
            r#"{"name": "Plain", "description": "cheese", "price": "20.00"}"#,
        )
        .unwrap();
        assert!(p.active);
        assert!(!p.sold_out);
        assert!(p.tags.is_empty());
    }

    #[test]
    fn menu_pizza_flattens_pizza_fields() {
        let m = MenuPizza {
            pizza: Pizza {
                id: "pz001".into(),
                name: "Plain".into(),
                description: "cheese".into(),
                tags: vec![],
                image_url: None,
                active: true,
                sold_out: true,
                price: "20.00".into(),
                created_at: None,
            },
            batch_id: Some("b1".into()),
            batch_number: Some(3),
            service_date: Some("2026-08-28".into()),
        };
        let v = serde_json::to_value(&m).unwrap();
        assert_eq!(v["name"], "Plain");
        assert_eq!(v["soldOut"], true);
        assert_eq!(v["batchNumber"], 3);
    }
}
