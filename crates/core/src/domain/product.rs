use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub i64);

/// A single item in the product catalog. `quantity` is the only field this
/// service mutates; the rest is owned by whoever maintains the catalog rows.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub description: String,
    // Wire contract: price is a JSON number, not rust_decimal's default
    // string representation.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: i64,
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{Product, ProductId};

    #[test]
    fn product_serializes_price_as_json_number() {
        let product = Product {
            id: ProductId(7),
            description: "widget".to_string(),
            price: Decimal::new(1099, 2),
            quantity: 3,
        };

        let value = serde_json::to_value(&product).expect("serialize product");

        assert_eq!(value["id"], serde_json::json!(7));
        assert_eq!(value["description"], serde_json::json!("widget"));
        assert_eq!(value["price"], serde_json::json!(10.99));
        assert_eq!(value["quantity"], serde_json::json!(3));
    }

    #[test]
    fn product_round_trips_through_json() {
        let product = Product {
            id: ProductId(1),
            description: "anvil".to_string(),
            price: Decimal::new(2525, 2),
            quantity: 0,
        };

        let json = serde_json::to_string(&product).expect("serialize");
        let back: Product = serde_json::from_str(&json).expect("deserialize");

        assert_eq!(back, product);
    }
}
