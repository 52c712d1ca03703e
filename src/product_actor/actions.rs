//! Custom actions for the Product collection.
//!
//! Each action is evaluated against the stored record inside a single message turn of the
//! product collection, so two actions on the same product can never interleave. This is
//! what the `atomic` stock-write mode relies on.
//!
//! See [`impl Document for Product`](crate::model::Product#impl-Document-for-Product) for
//! the implementation.

/// Custom actions for Product documents.
///
/// Every action replies with the stock level after it ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductAction {
    /// Reads the current stock level without modifying it.
    CheckStock,
    /// Takes units out of stock.
    ///
    /// # Errors
    /// Fails with `InsufficientStock` if the amount exceeds current stock; the
    /// record is left unchanged.
    ReserveStock(u32),
    /// Puts units back into stock.
    ///
    /// # Errors
    /// Fails with `StockOverflow` if the result would not fit a `u32`.
    Restock(u32),
}
