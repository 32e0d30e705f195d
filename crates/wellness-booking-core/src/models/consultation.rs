//! Consultation offerings and prices.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An amount of money in whole cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Create an amount from cents.
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Create an amount from whole dollars.
    pub const fn from_dollars(dollars: u64) -> Self {
        Self(dollars * 100)
    }

    pub const fn cents(self) -> u64 {
        self.0
    }

    /// Dollars, dropping any cents.
    pub const fn whole_dollars(self) -> u64 {
        self.0 / 100
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cents = self.0 % 100;
        if cents == 0 {
            write!(f, "${}", self.0 / 100)
        } else {
            write!(f, "${}.{:02}", self.0 / 100, cents)
        }
    }
}

/// Serde adapter for prices written as whole dollars in catalog documents.
pub mod dollars {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::Money;

    pub fn serialize<S: Serializer>(money: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        if money.cents() % 100 == 0 {
            serializer.serialize_u64(money.whole_dollars())
        } else {
            serializer.serialize_f64(money.cents() as f64 / 100.0)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        let dollars = f64::deserialize(deserializer)?;
        if !dollars.is_finite() || dollars < 0.0 {
            return Err(serde::de::Error::custom(format!(
                "price must be a non-negative amount, got {}",
                dollars
            )));
        }
        Ok(Money::from_cents((dollars * 100.0).round() as u64))
    }
}

/// A bookable consultation offering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationType {
    /// Stable identifier (e.g., "comprehensive")
    pub id: String,
    /// Display name
    pub name: String,
    /// Human-readable duration (e.g., "90-120 minutes")
    #[serde(rename = "duration")]
    pub duration_range: String,
    /// Human-readable price band (e.g., "$225-275")
    pub price_range: String,
    /// Price charged when this consultation is booked
    #[serde(with = "dollars")]
    pub standard_price: Money,
    /// One-line description for the selection card
    pub short_description: String,
    /// Icon name used by the UI shell
    #[serde(default)]
    pub icon: String,
}

impl ConsultationType {
    /// Create a consultation type with required fields.
    pub fn new(id: String, name: String, standard_price: Money) -> Self {
        Self {
            id,
            name,
            duration_range: String::new(),
            price_range: standard_price.to_string(),
            standard_price,
            short_description: String::new(),
            icon: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_display() {
        assert_eq!(Money::from_dollars(250).to_string(), "$250");
        assert_eq!(Money::from_cents(9250).to_string(), "$92.50");
        assert_eq!(Money::from_cents(5).to_string(), "$0.05");
        assert_eq!(Money::ZERO.to_string(), "$0");
    }

    #[test]
    fn test_consultation_from_document_json() {
        let json = r#"{
            "id": "comprehensive",
            "name": "Comprehensive Health Assessment",
            "duration": "90-120 minutes",
            "priceRange": "$225-275",
            "standardPrice": 250,
            "shortDescription": "Full constitutional assessment",
            "icon": "clipboard"
        }"#;

        let consultation: ConsultationType = serde_json::from_str(json).unwrap();
        assert_eq!(consultation.id, "comprehensive");
        assert_eq!(consultation.duration_range, "90-120 minutes");
        assert_eq!(consultation.standard_price, Money::from_dollars(250));
    }

    #[test]
    fn test_fractional_and_negative_prices() {
        let json = r#"{"id":"a","name":"A","duration":"","priceRange":"","standardPrice":92.5,"shortDescription":""}"#;
        let consultation: ConsultationType = serde_json::from_str(json).unwrap();
        assert_eq!(consultation.standard_price, Money::from_cents(9250));
        assert!(consultation.icon.is_empty());

        let json = r#"{"id":"a","name":"A","duration":"","priceRange":"","standardPrice":-1,"shortDescription":""}"#;
        assert!(serde_json::from_str::<ConsultationType>(json).is_err());
    }
}
