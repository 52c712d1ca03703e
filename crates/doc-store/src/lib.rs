//! # Doc Store
//!
//! An in-process document store built on the **Actor Model**. Each collection of records
//! (products, sales, …) lives in its own Tokio task and is reached through a cheap,
//! cloneable client.
//!
//! ## What the store guarantees
//!
//! - Each single-document read or write is atomic: a collection processes one request
//!   at a time, and a rejected write leaves the stored document untouched.
//! - Nothing else. There are no multi-document transactions, no locks that span
//!   requests, and no atomicity across collections. Callers that touch several
//!   documents must order their writes and handle a failure at any step.
//!
//! ## Architecture Overview
//!
//! 1. **Record Layer** ([`Document`]) - your record types and their write rules
//! 2. **Runtime Layer** ([`CollectionActor`]) - id assignment, storage, ordered listing
//! 3. **Interface Layer** ([`CollectionClient`], [`DocumentClient`]) - typed round trips
//!
//! ```rust
//! use doc_store::{CollectionActor, Document, ListQuery};
//!
//! #[derive(Clone, Debug)]
//! struct Entry { id: u32, posted_at: i64, memo: String }
//!
//! #[derive(Debug)] struct EntryCreate { posted_at: i64, memo: String }
//! #[derive(Debug, thiserror::Error)] #[error("empty memo")] struct EmptyMemo;
//!
//! impl Document for Entry {
//!     type Id = u32; type Create = EntryCreate; type Update = String;
//!     type Action = (); type ActionResult = (); type SortKey = i64; type Error = EmptyMemo;
//!
//!     fn from_create_params(id: u32, p: EntryCreate) -> Result<Self, EmptyMemo> {
//!         if p.memo.is_empty() { return Err(EmptyMemo); }
//!         Ok(Self { id, posted_at: p.posted_at, memo: p.memo })
//!     }
//!     fn sort_key(&self) -> i64 { self.posted_at }
//!     fn apply_update(&mut self, memo: String) -> Result<(), EmptyMemo> {
//!         if memo.is_empty() { return Err(EmptyMemo); }
//!         self.memo = memo;
//!         Ok(())
//!     }
//!     fn handle_action(&mut self, _: ()) -> Result<(), EmptyMemo> { Ok(()) }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, client) = CollectionActor::<Entry>::new(10);
//!     tokio::spawn(actor.run());
//!
//!     client.create(EntryCreate { posted_at: 20, memo: "late".into() }).await.unwrap();
//!     client.create(EntryCreate { posted_at: 10, memo: "early".into() }).await.unwrap();
//!
//!     // Newest first
//!     let entries = client.list(ListQuery::descending()).await.unwrap();
//!     assert_eq!(entries[0].memo, "late");
//!
//!     // A rejected write is reported and changes nothing
//!     assert!(client.update(1, String::new()).await.is_err());
//!     assert_eq!(client.get(1).await.unwrap().unwrap().memo, "late");
//! }
//! ```
//!
//! ## Testing
//!
//! [`mock::MockCollection`] hands out a real `CollectionClient` backed by scripted replies,
//! so any single step of a multi-document workflow can be made to fail.

pub mod client;
pub mod client_trait;
pub mod collection;
pub mod document;
pub mod error;
pub mod message;
pub mod mock;

// Re-export core types for convenience
pub use client::CollectionClient;
pub use client_trait::DocumentClient;
pub use collection::CollectionActor;
pub use document::Document;
pub use error::StoreError;
pub use message::{CollectionRequest, ListQuery, Reply, SortOrder};
