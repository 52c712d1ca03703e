//! Document trait implementation for the Sale record.
//!
//! The collection refuses to hold a sale with zero quantity or a non-positive price,
//! whichever path the write came through.

use super::error::SaleError;
use crate::model::{Sale, SaleCreate, SaleId, SaleUpdate};
use chrono::{DateTime, Utc};
use doc_store::Document;
use rust_decimal::Decimal;

/// Sales have no custom actions.
#[derive(Debug)]
pub enum SaleAction {}

fn check_terms(quantity: u32, unit_price: Decimal) -> Result<(), SaleError> {
    if quantity == 0 {
        return Err(SaleError::ZeroQuantity);
    }
    if unit_price <= Decimal::ZERO {
        return Err(SaleError::NonPositivePrice(unit_price));
    }
    Ok(())
}

impl Document for Sale {
    type Id = SaleId;
    type Create = SaleCreate;
    type Update = SaleUpdate;
    type Action = SaleAction;
    type ActionResult = ();
    type SortKey = DateTime<Utc>;
    type Error = SaleError;

    fn from_create_params(id: SaleId, params: SaleCreate) -> Result<Self, SaleError> {
        check_terms(params.quantity, params.unit_price)?;
        Ok(Self {
            id,
            product_id: params.product_id,
            product_name: params.product_name,
            quantity: params.quantity,
            unit_price: params.unit_price,
            timestamp: params.timestamp,
        })
    }

    fn sort_key(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn apply_update(&mut self, update: SaleUpdate) -> Result<(), SaleError> {
        check_terms(
            update.quantity.unwrap_or(self.quantity),
            update.unit_price.unwrap_or(self.unit_price),
        )?;
        if let Some(product_id) = update.product_id {
            self.product_id = product_id;
        }
        if let Some(product_name) = update.product_name {
            self.product_name = product_name;
        }
        if let Some(quantity) = update.quantity {
            self.quantity = quantity;
        }
        if let Some(unit_price) = update.unit_price {
            self.unit_price = unit_price;
        }
        if let Some(timestamp) = update.timestamp {
            self.timestamp = timestamp;
        }
        Ok(())
    }

    fn handle_action(&mut self, action: SaleAction) -> Result<(), SaleError> {
        match action {}
    }
}
