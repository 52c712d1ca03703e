//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing` subscriber filtered by `RUST_LOG`.
//! Module paths are hidden (`with_target(false)`); collections tag their lines with
//! `entity_type` instead.
//!
//! ## What Gets Traced
//!
//! - **Collections**: startup, shutdown with final size, every committed or rejected write
//! - **Clients**: one span per call, with its arguments
//! - **Engine**: one span per operation; each committed step at `info`, rejections at
//!   `warn`, and failures that left a write behind at `error`
//!
//! ```bash
//! RUST_LOG=info cargo run     # Steps and outcomes
//! RUST_LOG=debug cargo run    # Plus request payloads
//! ```
//!
//! A register followed by a delete at `info` level. Collection lines carry no span: they are
//! written by the collection's own task.
//!
//! ```text
//! INFO Created entity_type="Sale" id=sale_1 size=1
//! INFO register_sale{product_id=ProductId(1) quantity=3 unit_price=2.50 mode=Overwrite}: Sale recorded sale_id=sale_1
//! INFO Updated entity_type="Product" id=product_1
//! INFO register_sale{product_id=ProductId(1) quantity=3 unit_price=2.50 mode=Overwrite}: Stock debited sale_id=sale_1 product_id=product_1 stock=7
//! INFO Updated entity_type="Product" id=product_1
//! INFO delete_sale{sale_id=SaleId(1) mode=Overwrite}: Stock restored sale_id=sale_1 product_id=product_1 stock=10
//! INFO Deleted entity_type="Sale" id=sale_1 size=0
//! INFO delete_sale{sale_id=SaleId(1) mode=Overwrite}: Sale removed sale_id=sale_1
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
