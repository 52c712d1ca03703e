//! Scripted walkthrough of the three engine operations.
//!
//! ```bash
//! RUST_LOG=info cargo run
//! STOCK_LEDGER_STOCK_WRITES=atomic RUST_LOG=info cargo run
//! ```

use rust_decimal::Decimal;
use stock_ledger::config::{ConfigLoader, LedgerConfig};
use stock_ledger::engine::{DeleteOutcome, ReconcileError};
use stock_ledger::lifecycle::{setup_tracing, InventorySystem};
use stock_ledger::model::ProductCreate;
use tracing::{info, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = ConfigLoader::new().load().unwrap_or_else(|e| {
        warn!(error = %e, "Falling back to default configuration");
        LedgerConfig::default()
    });
    info!(?config, "Starting inventory system");

    let system = InventorySystem::with_config(&config);

    let notebook = system
        .products
        .create_product(ProductCreate::new("Cuaderno A4", 20))
        .await
        .map_err(|e| e.to_string())?;
    let pen = system
        .products
        .create_product(ProductCreate::new("Boligrafo azul", 50))
        .await
        .map_err(|e| e.to_string())?;

    let sale = async {
        let sale = system
            .engine
            .register_sale(notebook.id, 5, Decimal::new(1000, 2))
            .await?;
        info!(sale_id = %sale.id, total = %sale.line_total(), "Sale registered");

        // Selling more than is on the shelf is refused before anything is written
        if let Err(e) = system
            .engine
            .register_sale(notebook.id, 16, Decimal::new(1000, 2))
            .await
        {
            warn!(error = %e, "Oversell refused");
        }

        let sale = system
            .engine
            .edit_sale(sale.id, notebook.id, 8, Decimal::new(950, 2))
            .await?;
        info!(sale_id = %sale.id, quantity = sale.quantity, "Sale edited");

        let sale = system
            .engine
            .edit_sale(sale.id, pen.id, 8, Decimal::new(150, 2))
            .await?;
        info!(sale_id = %sale.id, product = %sale.product_name, "Sale moved to another product");
        Ok::<_, ReconcileError>(sale)
    }
    .instrument(tracing::info_span!("sales_walkthrough"))
    .await
    .map_err(|e| e.to_string())?;

    // A sale whose product was removed from the catalog can still be deleted
    let orphan = system
        .engine
        .register_sale(pen.id, 2, Decimal::new(150, 2))
        .await
        .map_err(|e| e.to_string())?;
    system
        .products
        .remove_product(pen.id)
        .await
        .map_err(|e| e.to_string())?;
    match system.engine.delete_sale(orphan.id).await {
        Ok(DeleteOutcome::PartialSuccess { product_id, .. }) => {
            warn!(%product_id, "Sale deleted; product was gone so stock was not restored")
        }
        Ok(outcome) => info!(?outcome, "Sale deleted"),
        Err(e) => warn!(error = %e, "Delete failed"),
    }

    let history = system
        .sales
        .list_ordered_by_date()
        .await
        .map_err(|e| e.to_string())?;
    for sale in &history {
        info!(sale_id = %sale.id, product = %sale.product_name, quantity = sale.quantity, at = %sale.timestamp, "History");
    }

    for product in system
        .products
        .list_products()
        .await
        .map_err(|e| e.to_string())?
    {
        info!(product_id = %product.id, name = %product.name, stock = product.quantity, "Stock");
    }

    info!(sale_id = %sale.id, "Walkthrough finished");
    system.shutdown().await?;
    Ok(())
}
