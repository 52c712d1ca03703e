//! # System Lifecycle
//!
//! Starts the two collections, wires the engine to them, and shuts everything down.
//!
//! ## Graceful Shutdown
//!
//! 1. **Drop all clients** - including the clones held by the engine
//! 2. **Collections detect closure** - `receiver.recv()` returns `None`
//! 3. **Collections log final state** and return
//! 4. **Await completion** - [`InventorySystem::shutdown`] waits for every task
//!
//! Clones of `products`, `sales` or `engine` handed out elsewhere keep their collection
//! alive; drop them before calling `shutdown`.
//!
//! ## Observability
//!
//! [`setup_tracing`] installs the subscriber; see the [`tracing`] module.

pub mod inventory_system;
pub mod tracing;

pub use inventory_system::*;
pub use tracing::*;
