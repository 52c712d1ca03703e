//! Plain records stored by the ledgers: [`Product`] and [`Sale`].

pub mod product;
pub mod sale;

pub use product::*;
pub use sale::*;
