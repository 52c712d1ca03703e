//! Type-safe wrappers around [`CollectionClient`](doc_store::CollectionClient).

pub mod product_client;
pub mod sale_client;

pub use product_client::*;
pub use sale_client::*;
