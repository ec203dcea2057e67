//! Input value objects for ledger mutations.
//!
//! Requests arrive unvalidated (straight from a form or a CLI); `validate`
//! either returns a checked copy or the first failing field. Nothing is
//! clamped or trimmed on the way through.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, ItemId};

use crate::item::ItemKey;
use crate::journal::Destination;

/// Receive a lot of an item (creating the item if its key is new).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockInRequest {
    pub name: String,
    pub size: String,
    pub quantity: i64,
    pub supplier: String,
    /// Total amount paid for this lot, not a per-unit price.
    #[serde(alias = "cost")]
    pub total_cost: Decimal,
    pub min_stock_level: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Withdraw stock for a taker and destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockOutRequest {
    pub item_id: ItemId,
    pub quantity: i64,
    pub taker: String,
    #[serde(default)]
    pub destination: Destination,
    pub occurred_at: DateTime<Utc>,
}

/// Log how much of what was taken was actually used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRequest {
    pub item_id: ItemId,
    pub quantity_taken: i64,
    pub quantity_used: i64,
    /// Remaining figure computed by the caller, if any. Only checked, never trusted.
    #[serde(default)]
    pub claimed_remaining: Option<i64>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ValidStockIn {
    pub key: ItemKey,
    pub quantity: i64,
    pub supplier: String,
    pub total_cost: Decimal,
    pub min_stock_level: i64,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ValidStockOut {
    pub item_id: ItemId,
    pub quantity: i64,
    pub taker: String,
    pub destination: Destination,
    pub occurred_at: DateTime<Utc>,
}

fn require_text(field: &'static str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(field, "cannot be empty"));
    }
    Ok(())
}

fn require_positive(field: &'static str, value: i64) -> DomainResult<()> {
    if value <= 0 {
        return Err(DomainError::validation(
            field,
            format!("must be greater than zero (got {value})"),
        ));
    }
    Ok(())
}

impl StockInRequest {
    pub(crate) fn validate(self) -> DomainResult<ValidStockIn> {
        require_text("name", &self.name)?;
        require_text("size", &self.size)?;
        require_positive("quantity", self.quantity)?;
        require_text("supplier", &self.supplier)?;

        if self.total_cost < Decimal::ZERO {
            return Err(DomainError::validation(
                "cost",
                format!("cannot be negative (got {})", self.total_cost),
            ));
        }
        if self.min_stock_level < 0 {
            return Err(DomainError::validation(
                "min_stock_level",
                format!("cannot be negative (got {})", self.min_stock_level),
            ));
        }

        Ok(ValidStockIn {
            key: ItemKey::new(self.name, self.size),
            quantity: self.quantity,
            supplier: self.supplier,
            total_cost: self.total_cost,
            min_stock_level: self.min_stock_level,
            occurred_at: self.occurred_at,
        })
    }
}

impl StockOutRequest {
    pub(crate) fn validate(self) -> DomainResult<ValidStockOut> {
        require_positive("quantity", self.quantity)?;
        require_text("taker", &self.taker)?;
        if let Destination::Other(label) = &self.destination {
            require_text("destination", label)?;
        }

        Ok(ValidStockOut {
            item_id: self.item_id,
            quantity: self.quantity,
            taker: self.taker,
            destination: self.destination,
            occurred_at: self.occurred_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn stock_in() -> StockInRequest {
        StockInRequest {
            name: "Flour".to_string(),
            size: "1kg".to_string(),
            quantity: 10,
            supplier: "Mill Co".to_string(),
            total_cost: dec!(20.00),
            min_stock_level: 5,
            occurred_at: Utc::now(),
        }
    }

    fn field_of(err: DomainError) -> &'static str {
        match err {
            DomainError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn accepts_well_formed_stock_in() {
        let valid = stock_in().validate().unwrap();
        assert_eq!(valid.key, ItemKey::new("Flour", "1kg"));
        assert_eq!(valid.total_cost, dec!(20.00));
    }

    #[test]
    fn reports_the_offending_field() {
        let mut req = stock_in();
        req.name = "   ".to_string();
        assert_eq!(field_of(req.validate().unwrap_err()), "name");

        let mut req = stock_in();
        req.quantity = 0;
        assert_eq!(field_of(req.validate().unwrap_err()), "quantity");

        let mut req = stock_in();
        req.supplier.clear();
        assert_eq!(field_of(req.validate().unwrap_err()), "supplier");

        let mut req = stock_in();
        req.total_cost = dec!(-0.01);
        assert_eq!(field_of(req.validate().unwrap_err()), "cost");

        let mut req = stock_in();
        req.min_stock_level = -1;
        assert_eq!(field_of(req.validate().unwrap_err()), "min_stock_level");
    }

    #[test]
    fn zero_and_sub_cent_costs_are_accepted() {
        let mut req = stock_in();
        req.total_cost = Decimal::ZERO;
        assert!(req.validate().is_ok());

        let mut req = stock_in();
        req.total_cost = dec!(12.505);
        assert_eq!(req.validate().unwrap().total_cost, dec!(12.505));

        let mut req = stock_in();
        req.total_cost = dec!(12.500);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn deserializes_cost_alias() {
        let json = r#"{
            "name": "Flour", "size": "1kg", "quantity": 10, "supplier": "Mill Co",
            "cost": "20.00", "min_stock_level": 5, "occurred_at": "2024-01-01T00:00:00Z"
        }"#;
        let req: StockInRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.total_cost, dec!(20.00));
    }

    #[test]
    fn stock_out_requires_taker_and_labelled_destination() {
        let base = StockOutRequest {
            item_id: ItemId::new(),
            quantity: 1,
            taker: "Chef".to_string(),
            destination: Destination::Bar,
            occurred_at: Utc::now(),
        };
        assert!(base.clone().validate().is_ok());

        let mut req = base.clone();
        req.taker = String::new();
        assert_eq!(field_of(req.validate().unwrap_err()), "taker");

        let mut req = base.clone();
        req.destination = Destination::Other(" ".to_string());
        assert_eq!(field_of(req.validate().unwrap_err()), "destination");

        let mut req = base;
        req.quantity = -4;
        assert_eq!(field_of(req.validate().unwrap_err()), "quantity");
    }
}
