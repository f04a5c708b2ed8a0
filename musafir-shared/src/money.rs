use serde::{Deserialize, Serialize};

/// Currency assumed when a catalog item does not name one.
pub const DEFAULT_CURRENCY: &str = "INR";

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

/// A monetary value in a named currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Money {
    pub amount: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Money {
    pub fn new(amount: f64, currency: &str) -> Self {
        Self {
            amount,
            currency: currency.to_string(),
        }
    }

    pub fn inr(amount: f64) -> Self {
        Self::new(amount, DEFAULT_CURRENCY)
    }
}

/// Computed charge breakdown for a booking. Always derived by the pricing
/// engine, never supplied by a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amount {
    pub subtotal: f64,
    pub taxes: f64,
    pub total: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_defaults_on_deserialize() {
        let money: Money = serde_json::from_str(r#"{"amount": 1000.0}"#).unwrap();
        assert_eq!(money.currency, "INR");
        assert_eq!(money.amount, 1000.0);
    }
}
