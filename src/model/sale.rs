//! A recorded sale of one product.
//!
//! # Document Store
//! [`Sale`] implements the [`Document`](doc_store::Document) trait,
//! allowing it to be managed by a [`CollectionActor`](doc_store::CollectionActor).
//! Sales are ordered by `timestamp`, which is what the date-ordered and ranged
//! listings of [`SaleClient`](crate::clients::SaleClient) use.

use crate::model::ProductId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Sales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SaleId(pub u32);

impl From<u32> for SaleId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for SaleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sale_{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: SaleId,
    /// Weak reference; the product may since have been removed.
    pub product_id: ProductId,
    /// Product name as it was when the sale was recorded or last edited.
    pub product_name: String,
    pub quantity: u32,
    /// Price per unit at the time of sale. Never recomputed from the product.
    pub unit_price: Decimal,
    pub timestamp: DateTime<Utc>,
}

impl Sale {
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Payload for recording a sale.
#[derive(Debug, Clone)]
pub struct SaleCreate {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub timestamp: DateTime<Utc>,
}

/// Full or partial overwrite of a sale. `None` fields are left as they are.
#[derive(Debug, Clone, Default)]
pub struct SaleUpdate {
    pub product_id: Option<ProductId>,
    pub product_name: Option<String>,
    pub quantity: Option<u32>,
    pub unit_price: Option<Decimal>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl SaleUpdate {
    /// An update that puts every field back to what `sale` holds.
    pub fn restoring(sale: &Sale) -> Self {
        Self {
            product_id: Some(sale.product_id),
            product_name: Some(sale.product_name.clone()),
            quantity: Some(sale.quantity),
            unit_price: Some(sale.unit_price),
            timestamp: Some(sale.timestamp),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_total_multiplies_price_by_quantity() {
        let sale = Sale {
            id: SaleId(1),
            product_id: ProductId(1),
            product_name: "Cuaderno".into(),
            quantity: 3,
            unit_price: Decimal::new(1250, 2),
            timestamp: Utc::now(),
        };
        assert_eq!(sale.line_total(), Decimal::new(3750, 2));
    }

    #[test]
    fn ids_display_with_prefix() {
        assert_eq!(SaleId(7).to_string(), "sale_7");
        assert_eq!(ProductId(3).to_string(), "product_3");
    }
}
