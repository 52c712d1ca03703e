//! # Stock Ledger
//!
//! Inventory and sales bookkeeping for a small shop, built around one correctness
//! problem: keeping each product's stock count consistent with the sales that reference
//! it, on a store that only offers single-document atomicity.
//!
//! ## Module Tour
//!
//! ### 1. The Store ([`doc_store`])
//! A generic collection actor per record type. Each single-document read or write is
//! atomic; nothing spans two documents.
//!
//! ### 2. The Ledgers ([`product_actor`], [`sale_actor`], [`clients`])
//! [`Product`](model::Product) and [`Sale`](model::Sale) records, the rules each collection
//! enforces on its own documents, and typed clients.
//!
//! ### 3. The Engine ([`engine`])
//! [`SalesEngine`](engine::SalesEngine) registers, edits and deletes sales as ordered
//! sequences of store calls, and reports exactly which calls committed when one fails.
//!
//! ### 4. Wiring ([`lifecycle`], [`config`])
//! [`InventorySystem`](lifecycle::InventorySystem) starts the collections and the engine
//! from a [`LedgerConfig`](config::LedgerConfig).
//!
//! ## Running
//!
//! ```bash
//! RUST_LOG=info cargo run
//! cargo test
//! ```

pub mod clients;
pub mod config;
pub mod engine;
pub mod lifecycle;
pub mod model;
pub mod product_actor;
pub mod sale_actor;
