//! Error types for the Product ledger.

use thiserror::Error;

/// Errors that can occur during product operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProductError {
    /// The requested product was not found.
    #[error("Product not found: {0}")]
    NotFound(String),

    /// Product names must contain something other than whitespace.
    #[error("Product name must not be blank")]
    BlankName,

    /// The requested quantity exceeds the available stock.
    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: u32, available: u32 },

    /// Adding stock would overflow the counter.
    #[error("Stock overflow: {current} + {added}")]
    StockOverflow { current: u32, added: u32 },

    /// The store could not complete the request.
    #[error("Product store error: {0}")]
    Store(String),
}
