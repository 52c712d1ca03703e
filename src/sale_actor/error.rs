//! Error types for the Sale ledger.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during sale operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SaleError {
    /// The requested sale was not found.
    #[error("Sale not found: {0}")]
    NotFound(String),

    /// A sale must move at least one unit.
    #[error("Sale quantity must be at least 1")]
    ZeroQuantity,

    /// A sale must have a positive unit price.
    #[error("Unit price must be positive, got {0}")]
    NonPositivePrice(Decimal),

    /// The store could not complete the request.
    #[error("Sale store error: {0}")]
    Store(String),
}
