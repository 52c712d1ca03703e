//! Error types for the reconciliation engine.

use super::steps::{Operation, Step};
use crate::model::{ProductId, SaleId};
use thiserror::Error;

/// Why a register, edit or delete did not go through.
///
/// Every variant except `StorageFailure` is raised before the first write, so the
/// stores are exactly as they were.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ReconcileError {
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    #[error("Sale not found: {0}")]
    SaleNotFound(SaleId),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Insufficient stock for {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    /// Returning units would push the product past the largest representable stock.
    #[error("Stock overflow for {product_id}: {current} + {added}")]
    StockOverflow {
        product_id: ProductId,
        current: u32,
        added: u32,
    },

    /// A store call failed. Steps in `completed` had already returned successfully,
    /// and any writes among them are committed.
    #[error("{operation} failed at step {index} ({step}): {reason}; completed: {completed:?}")]
    StorageFailure {
        operation: Operation,
        step: Step,
        /// 1-based position of `step`: one past the steps in `completed`.
        index: usize,
        completed: Vec<Step>,
        reason: String,
    },
}

impl ReconcileError {
    /// Writes that committed before the failure. Empty for every pre-write rejection.
    pub fn committed_writes(&self) -> Vec<Step> {
        match self {
            ReconcileError::StorageFailure { completed, .. } => completed
                .iter()
                .copied()
                .filter(|step| step.is_write())
                .collect(),
            _ => Vec::new(),
        }
    }
}
