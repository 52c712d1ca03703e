use crate::clients::{ProductClient, SaleClient};
use crate::config::LedgerConfig;
use crate::engine::SalesEngine;
use tracing::{error, info};

/// Runs the product and sale collections and the engine that reconciles them.
///
/// # Example
///
/// ```rust
/// use rust_decimal::Decimal;
/// use stock_ledger::lifecycle::InventorySystem;
/// use stock_ledger::model::ProductCreate;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let system = InventorySystem::new();
///
///     let product = system.products.create_product(ProductCreate::new("Cuaderno", 10)).await?;
///     let sale = system.engine.register_sale(product.id, 3, Decimal::new(250, 2)).await?;
///     assert_eq!(system.products.check_stock(product.id).await?, 7);
///
///     system.engine.delete_sale(sale.id).await?;
///     assert_eq!(system.products.check_stock(product.id).await?, 10);
///
///     system.shutdown().await?;
///     Ok(())
/// }
/// ```
pub struct InventorySystem {
    /// Client for the Product ledger
    pub products: ProductClient,

    /// Client for the Sale ledger
    pub sales: SaleClient,

    /// The three reconciling operations
    pub engine: SalesEngine,

    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl Default for InventorySystem {
    fn default() -> Self {
        Self::new()
    }
}

impl InventorySystem {
    /// Starts a system with the default configuration. Must be called inside a Tokio runtime.
    pub fn new() -> Self {
        Self::with_config(&LedgerConfig::default())
    }

    /// Starts a system with `config`.
    pub fn with_config(config: &LedgerConfig) -> Self {
        let capacity = config.channel_capacity.max(1);

        let (product_actor, products) = crate::product_actor::new(capacity);
        let (sale_actor, sales) = crate::sale_actor::new(capacity);

        let product_handle = tokio::spawn(product_actor.run());
        let sale_handle = tokio::spawn(sale_actor.run());

        let engine = SalesEngine::new(products.clone(), sales.clone(), config.stock_writes);
        info!(stock_writes = ?config.stock_writes, capacity, "Inventory system started");

        Self {
            products,
            sales,
            engine,
            handles: vec![product_handle, sale_handle],
        }
    }

    /// Gracefully shuts down the system.
    ///
    /// Returns an error if a collection task panicked.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");

        // Dropping every sender closes the channels; each collection then exits its loop
        drop(self.engine);
        drop(self.products);
        drop(self.sales);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Collection task failed: {:?}", e);
                return Err(format!("Collection task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
