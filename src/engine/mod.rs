//! # Reconciliation Engine
//!
//! Keeps every product's stock consistent with the sales that reference it:
//!
//! ```text
//! product.quantity == opening stock - sum(quantity of sales pointing at it)
//! ```
//!
//! The two ledgers live in separate collections and the store has no multi-document
//! transactions, so each operation is a fixed sequence of independent calls:
//!
//! | Operation | Calls, in order |
//! |-----------|-----------------|
//! | [`register_sale`](SalesEngine::register_sale) | fetch product, record sale, debit stock |
//! | [`edit_sale`](SalesEngine::edit_sale) | fetch sale, fetch product, rewrite sale, adjust stock |
//! | [`delete_sale`](SalesEngine::delete_sale) | fetch sale, fetch product, credit stock, remove sale |
//!
//! The sale is written before the stock on register and edit, and the stock is restored
//! before the sale is removed on delete. A failure in the middle therefore leaves stock
//! too high (a visible discrepancy) and never loses a sale record. The failure reports the
//! committed steps ([`ReconcileError::StorageFailure`]).
//!
//! ## Stock writes
//!
//! With [`StockWriteMode::Overwrite`] the engine computes the new level from the product it
//! just read and overwrites it. Two operations racing on one product can both read the same
//! level, and the later write wins.
//!
//! With [`StockWriteMode::Atomic`] the engine sends relative adjustments evaluated inside
//! the product collection instead. If a debit no longer fits because another writer got
//! there first, the sale write is undone and the caller gets `InsufficientStock`.
//!
//! ## Re-pointing a sale
//!
//! Editing a sale onto a different product moves the stock too: the new product is debited
//! by the new quantity and the original product is credited with the old quantity. If the
//! original product has since been removed, its credit is skipped with a warning.

pub mod error;
pub mod steps;

pub use error::*;
pub use steps::{Operation, Step};

use crate::clients::{ProductClient, SaleClient};
use crate::config::StockWriteMode;
use crate::model::{Product, ProductId, Sale, SaleCreate, SaleId, SaleUpdate};
use crate::product_actor::ProductError;
use chrono::Utc;
use doc_store::DocumentClient;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use steps::Progress;
use tracing::{debug, info, instrument, warn};

/// Result of a successful [`SalesEngine::delete_sale`].
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    /// The sale's units went back into stock and the sale was removed.
    StockRestored { sale: Sale, stock: u32 },
    /// The product was already gone. The sale was removed and nothing was restored.
    PartialSuccess { sale: Sale, product_id: ProductId },
}

impl DeleteOutcome {
    /// The sale that was removed.
    pub fn sale(&self) -> &Sale {
        match self {
            DeleteOutcome::StockRestored { sale, .. } | DeleteOutcome::PartialSuccess { sale, .. } => sale,
        }
    }

    pub fn is_partial(&self) -> bool {
        matches!(self, DeleteOutcome::PartialSuccess { .. })
    }
}

/// How an in-place edit moves stock.
#[derive(Debug, Clone, Copy)]
enum StockChange {
    Debit(u32),
    Credit(u32),
    Unchanged,
}

fn rejected(error: ReconcileError) -> ReconcileError {
    warn!(%error, "Rejected");
    error
}

fn validate_terms(quantity: u32, unit_price: Decimal) -> Result<(), ReconcileError> {
    if quantity == 0 {
        return Err(rejected(ReconcileError::InvalidInput(
            "quantity must be at least 1".to_string(),
        )));
    }
    if unit_price <= Decimal::ZERO {
        return Err(rejected(ReconcileError::InvalidInput(format!(
            "unit price must be positive, got {unit_price}"
        ))));
    }
    Ok(())
}

fn ensure_available(product: &Product, requested: u32) -> Result<(), ReconcileError> {
    if product.can_supply(requested) {
        return Ok(());
    }
    Err(rejected(ReconcileError::InsufficientStock {
        product_id: product.id,
        requested,
        available: product.quantity,
    }))
}

fn ensure_room(product: &Product, added: u32) -> Result<(), ReconcileError> {
    if product.quantity.checked_add(added).is_some() {
        return Ok(());
    }
    Err(rejected(ReconcileError::StockOverflow {
        product_id: product.id,
        current: product.quantity,
        added,
    }))
}

/// Registers, edits and deletes sales while keeping product stock in step.
///
/// Cheap to clone; every clone talks to the same two collections.
#[derive(Clone)]
pub struct SalesEngine {
    products: ProductClient,
    sales: SaleClient,
    stock_writes: StockWriteMode,
}

impl SalesEngine {
    pub fn new(products: ProductClient, sales: SaleClient, stock_writes: StockWriteMode) -> Self {
        Self {
            products,
            sales,
            stock_writes,
        }
    }

    pub fn stock_writes(&self) -> StockWriteMode {
        self.stock_writes
    }

    /// Records a sale of `quantity` units and takes them out of the product's stock.
    ///
    /// # Errors
    /// - `ProductNotFound`, `InvalidInput`, `InsufficientStock`: nothing was written.
    /// - `StorageFailure`: a store call failed; `completed` says whether the sale was recorded.
    #[instrument(skip(self), fields(mode = ?self.stock_writes))]
    pub async fn register_sale(
        &self,
        product_id: ProductId,
        quantity: u32,
        unit_price: Decimal,
    ) -> Result<Sale, ReconcileError> {
        let mut progress = Progress::new(Operation::RegisterSale);

        let product = self
            .fetch_product(&mut progress, Step::FetchProduct, product_id)
            .await?
            .ok_or_else(|| rejected(ReconcileError::ProductNotFound(product_id)))?;
        validate_terms(quantity, unit_price)?;
        ensure_available(&product, quantity)?;

        let sale = self
            .sales
            .record_sale(SaleCreate {
                product_id,
                product_name: product.name.clone(),
                quantity,
                unit_price,
                timestamp: Utc::now(),
            })
            .await
            .map_err(|e| progress.fail(Step::RecordSale, e))?;
        progress.done(Step::RecordSale);
        info!(sale_id = %sale.id, "Sale recorded");

        match self.debit(&product, quantity).await {
            Ok(stock) => {
                progress.done(Step::DebitStock);
                info!(sale_id = %sale.id, %product_id, stock, "Stock debited");
                Ok(sale)
            }
            Err(ProductError::InsufficientStock {
                requested,
                available,
            }) => {
                self.undo_sale_write(&mut progress, &sale, None).await?;
                Err(rejected(ReconcileError::InsufficientStock {
                    product_id,
                    requested,
                    available,
                }))
            }
            Err(e) => Err(progress.fail(Step::DebitStock, e)),
        }
    }

    /// Rewrites a sale and moves stock by the difference.
    ///
    /// The product name is re-snapshotted and the timestamp refreshed. Only an increase
    /// in quantity is checked against stock. Moving the sale to another product debits
    /// that product by the full new quantity and credits the original one.
    ///
    /// # Errors
    /// - `SaleNotFound`, `ProductNotFound`, `InvalidInput`, `InsufficientStock`,
    ///   `StockOverflow`: nothing was written.
    /// - `StorageFailure`: a store call failed; `completed` says whether the sale was rewritten.
    #[instrument(skip(self), fields(mode = ?self.stock_writes))]
    pub async fn edit_sale(
        &self,
        sale_id: SaleId,
        new_product_id: ProductId,
        new_quantity: u32,
        new_unit_price: Decimal,
    ) -> Result<Sale, ReconcileError> {
        let mut progress = Progress::new(Operation::EditSale);

        let existing = self.fetch_sale(&mut progress, sale_id).await?;
        let product = self
            .fetch_product(&mut progress, Step::FetchProduct, new_product_id)
            .await?
            .ok_or_else(|| rejected(ReconcileError::ProductNotFound(new_product_id)))?;
        validate_terms(new_quantity, new_unit_price)?;

        let rewrite = SaleUpdate {
            product_id: Some(new_product_id),
            product_name: Some(product.name.clone()),
            quantity: Some(new_quantity),
            unit_price: Some(new_unit_price),
            timestamp: Some(Utc::now()),
        };

        if new_product_id == existing.product_id {
            self.edit_in_place(&mut progress, &existing, &product, rewrite, new_quantity)
                .await
        } else {
            self.move_sale(&mut progress, &existing, &product, rewrite, new_quantity)
                .await
        }
    }

    /// Returns a sale's units to stock and removes the sale.
    ///
    /// A sale whose product no longer exists is still removed, reported as
    /// [`DeleteOutcome::PartialSuccess`].
    ///
    /// # Errors
    /// - `SaleNotFound`, `StockOverflow`: nothing was written.
    /// - `StorageFailure`: a store call failed; `completed` says whether stock was restored.
    #[instrument(skip(self), fields(mode = ?self.stock_writes))]
    pub async fn delete_sale(&self, sale_id: SaleId) -> Result<DeleteOutcome, ReconcileError> {
        let mut progress = Progress::new(Operation::DeleteSale);

        let sale = self.fetch_sale(&mut progress, sale_id).await?;
        let product = self
            .fetch_product(&mut progress, Step::FetchProduct, sale.product_id)
            .await?;

        let Some(product) = product else {
            self.remove_sale(&mut progress, sale_id).await?;
            warn!(
                %sale_id,
                product_id = %sale.product_id,
                "Product no longer exists; sale removed without restoring stock"
            );
            return Ok(DeleteOutcome::PartialSuccess {
                product_id: sale.product_id,
                sale,
            });
        };

        ensure_room(&product, sale.quantity)?;
        let stock = self
            .credit(&product, sale.quantity)
            .await
            .map_err(|e| progress.fail(Step::CreditStock, e))?;
        progress.done(Step::CreditStock);
        info!(%sale_id, product_id = %product.id, stock, "Stock restored");

        self.remove_sale(&mut progress, sale_id).await?;
        Ok(DeleteOutcome::StockRestored { sale, stock })
    }

    async fn edit_in_place(
        &self,
        progress: &mut Progress,
        existing: &Sale,
        product: &Product,
        rewrite: SaleUpdate,
        new_quantity: u32,
    ) -> Result<Sale, ReconcileError> {
        let change = match new_quantity.cmp(&existing.quantity) {
            Ordering::Greater => StockChange::Debit(new_quantity - existing.quantity),
            Ordering::Less => StockChange::Credit(existing.quantity - new_quantity),
            Ordering::Equal => StockChange::Unchanged,
        };
        match change {
            StockChange::Debit(delta) => ensure_available(product, delta)?,
            StockChange::Credit(delta) => ensure_room(product, delta)?,
            StockChange::Unchanged => {}
        }

        let updated = self.rewrite_sale(progress, existing.id, rewrite).await?;

        let adjusted = match change {
            StockChange::Debit(delta) => self.debit(product, delta).await,
            StockChange::Credit(delta) => self.credit(product, delta).await,
            StockChange::Unchanged => {
                debug!(sale_id = %existing.id, "Quantity unchanged; stock left as is");
                return Ok(updated);
            }
        };

        match adjusted {
            Ok(stock) => {
                progress.done(Step::AdjustStock);
                info!(sale_id = %existing.id, product_id = %product.id, stock, "Stock adjusted");
                Ok(updated)
            }
            Err(ProductError::InsufficientStock {
                requested,
                available,
            }) => {
                self.undo_sale_write(progress, &updated, Some(existing))
                    .await?;
                Err(rejected(ReconcileError::InsufficientStock {
                    product_id: product.id,
                    requested,
                    available,
                }))
            }
            Err(e) => Err(progress.fail(Step::AdjustStock, e)),
        }
    }

    async fn move_sale(
        &self,
        progress: &mut Progress,
        existing: &Sale,
        product: &Product,
        rewrite: SaleUpdate,
        new_quantity: u32,
    ) -> Result<Sale, ReconcileError> {
        ensure_available(product, new_quantity)?;

        let original = self
            .fetch_product(progress, Step::FetchOriginalProduct, existing.product_id)
            .await?;
        match &original {
            Some(original) => ensure_room(original, existing.quantity)?,
            None => warn!(
                sale_id = %existing.id,
                product_id = %existing.product_id,
                "Original product no longer exists; its stock will not be credited"
            ),
        }

        let updated = self.rewrite_sale(progress, existing.id, rewrite).await?;

        match self.debit(product, new_quantity).await {
            Ok(stock) => {
                progress.done(Step::DebitStock);
                info!(sale_id = %existing.id, product_id = %product.id, stock, "Stock debited");
            }
            Err(ProductError::InsufficientStock {
                requested,
                available,
            }) => {
                self.undo_sale_write(progress, &updated, Some(existing))
                    .await?;
                return Err(rejected(ReconcileError::InsufficientStock {
                    product_id: product.id,
                    requested,
                    available,
                }));
            }
            Err(e) => return Err(progress.fail(Step::DebitStock, e)),
        }

        if let Some(original) = original {
            let stock = self
                .credit(&original, existing.quantity)
                .await
                .map_err(|e| progress.fail(Step::CreditOriginalStock, e))?;
            progress.done(Step::CreditOriginalStock);
            info!(sale_id = %existing.id, product_id = %original.id, stock, "Original stock credited");
        }

        Ok(updated)
    }

    async fn fetch_sale(
        &self,
        progress: &mut Progress,
        sale_id: SaleId,
    ) -> Result<Sale, ReconcileError> {
        let sale = self
            .sales
            .get(sale_id)
            .await
            .map_err(|e| progress.fail(Step::FetchSale, e))?
            .ok_or_else(|| rejected(ReconcileError::SaleNotFound(sale_id)))?;
        progress.done(Step::FetchSale);
        Ok(sale)
    }

    async fn fetch_product(
        &self,
        progress: &mut Progress,
        step: Step,
        product_id: ProductId,
    ) -> Result<Option<Product>, ReconcileError> {
        let product = self
            .products
            .get(product_id)
            .await
            .map_err(|e| progress.fail(step, e))?;
        progress.done(step);
        Ok(product)
    }

    async fn rewrite_sale(
        &self,
        progress: &mut Progress,
        sale_id: SaleId,
        rewrite: SaleUpdate,
    ) -> Result<Sale, ReconcileError> {
        let updated = self
            .sales
            .update_sale(sale_id, rewrite)
            .await
            .map_err(|e| progress.fail(Step::RewriteSale, e))?;
        progress.done(Step::RewriteSale);
        info!(%sale_id, "Sale rewritten");
        Ok(updated)
    }

    async fn remove_sale(
        &self,
        progress: &mut Progress,
        sale_id: SaleId,
    ) -> Result<(), ReconcileError> {
        self.sales
            .delete(sale_id)
            .await
            .map_err(|e| progress.fail(Step::RemoveSale, e))?;
        progress.done(Step::RemoveSale);
        info!(%sale_id, "Sale removed");
        Ok(())
    }

    /// Takes back a sale write whose stock debit the product refused.
    ///
    /// Only reachable in atomic mode, when another writer took the stock between the
    /// read and the debit. A recorded sale is removed; a rewritten one gets its previous
    /// fields back.
    async fn undo_sale_write(
        &self,
        progress: &mut Progress,
        written: &Sale,
        previous: Option<&Sale>,
    ) -> Result<(), ReconcileError> {
        match previous {
            None => self.remove_sale(progress, written.id).await?,
            Some(previous) => {
                self.sales
                    .update_sale(previous.id, SaleUpdate::restoring(previous))
                    .await
                    .map_err(|e| progress.fail(Step::RevertSale, e))?;
                progress.done(Step::RevertSale);
            }
        }
        warn!(sale_id = %written.id, "Stock taken by a concurrent writer; sale write undone");
        Ok(())
    }

    async fn debit(&self, product: &Product, amount: u32) -> Result<u32, ProductError> {
        match self.stock_writes {
            StockWriteMode::Overwrite => {
                let level = product.quantity.checked_sub(amount).ok_or(
                    ProductError::InsufficientStock {
                        requested: amount,
                        available: product.quantity,
                    },
                )?;
                self.products
                    .set_quantity(product.id, level)
                    .await
                    .map(|p| p.quantity)
            }
            StockWriteMode::Atomic => self.products.reserve_stock(product.id, amount).await,
        }
    }

    async fn credit(&self, product: &Product, amount: u32) -> Result<u32, ProductError> {
        match self.stock_writes {
            StockWriteMode::Overwrite => {
                let level =
                    product
                        .quantity
                        .checked_add(amount)
                        .ok_or(ProductError::StockOverflow {
                            current: product.quantity,
                            added: amount,
                        })?;
                self.products
                    .set_quantity(product.id, level)
                    .await
                    .map(|p| p.quantity)
            }
            StockWriteMode::Atomic => self.products.restock(product.id, amount).await,
        }
    }
}
