//! Engine tests against scripted collections.
//!
//! Every store call the engine makes must be scripted here, in order; `verify()` fails on
//! any call that was not. That makes these tests a precise record of which writes each
//! operation issues, and lets a failure be injected at any single step.

use chrono::Utc;
use doc_store::mock::MockCollection;
use doc_store::StoreError;
use rust_decimal::Decimal;
use stock_ledger::clients::{ProductClient, SaleClient};
use stock_ledger::config::StockWriteMode;
use stock_ledger::engine::{DeleteOutcome, Operation, ReconcileError, SalesEngine, Step};
use stock_ledger::model::{Product, ProductId, Sale, SaleId};
use stock_ledger::product_actor::{ProductAction, ProductError};

const P1: ProductId = ProductId(1);
const P2: ProductId = ProductId(2);
const S1: SaleId = SaleId(1);

fn price(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

fn product(id: ProductId, quantity: u32) -> Product {
    Product::new(id, format!("Producto {}", id.0), quantity)
}

fn sale(product_id: ProductId, quantity: u32) -> Sale {
    Sale {
        id: S1,
        product_id,
        product_name: format!("Producto {}", product_id.0),
        quantity,
        unit_price: price(1000),
        timestamp: Utc::now(),
    }
}

struct Harness {
    products: MockCollection<Product>,
    sales: MockCollection<Sale>,
}

impl Harness {
    fn new() -> Self {
        Self {
            products: MockCollection::new(),
            sales: MockCollection::new(),
        }
    }

    fn engine(&self, mode: StockWriteMode) -> SalesEngine {
        SalesEngine::new(
            ProductClient::new(self.products.client()),
            SaleClient::new(self.sales.client()),
            mode,
        )
    }

    fn verify(&self) {
        self.products.verify();
        self.sales.verify();
    }
}

fn unavailable() -> StoreError {
    StoreError::Unavailable("connection reset".into())
}

fn assert_storage_failure(
    result: Result<impl std::fmt::Debug, ReconcileError>,
    operation: Operation,
    step: Step,
    completed: &[Step],
) -> ReconcileError {
    let err = result.expect_err("Expected a storage failure");
    match &err {
        ReconcileError::StorageFailure {
            operation: op,
            step: failed,
            index,
            completed: done,
            reason,
        } => {
            assert_eq!(*op, operation);
            assert_eq!(*failed, step);
            assert_eq!(*index, completed.len() + 1);
            assert_eq!(done.as_slice(), completed);
            assert!(reason.contains("connection reset"), "reason: {reason}");
        }
        other => panic!("Expected StorageFailure, got {other:?}"),
    }
    err
}

// =============================================================================
// REGISTER
// =============================================================================

#[tokio::test]
async fn test_register_writes_sale_then_overwrites_stock() {
    let mut h = Harness::new();
    h.products.expect_get(P1).return_ok(Some(product(P1, 10)));
    h.sales
        .expect_create()
        .matching(|c| c.product_id == P1 && c.quantity == 3 && c.product_name == "Producto 1")
        .return_ok(sale(P1, 3));
    h.products
        .expect_update(P1)
        .matching(|u| u.quantity == Some(7) && u.name.is_none())
        .return_ok(product(P1, 7));

    let result = h.engine(StockWriteMode::Overwrite)
        .register_sale(P1, 3, price(1000))
        .await;

    assert_eq!(result.unwrap().quantity, 3);
    h.verify();
}

#[tokio::test]
async fn test_register_fetch_failure_writes_nothing() {
    let mut h = Harness::new();
    h.products.expect_get(P1).return_err(unavailable());

    let result = h.engine(StockWriteMode::Overwrite)
        .register_sale(P1, 3, price(1000))
        .await;

    let err = assert_storage_failure(result, Operation::RegisterSale, Step::FetchProduct, &[]);
    assert!(err.committed_writes().is_empty());
    h.verify();
}

#[tokio::test]
async fn test_register_record_failure_leaves_stock_alone() {
    let mut h = Harness::new();
    h.products.expect_get(P1).return_ok(Some(product(P1, 10)));
    h.sales.expect_create().return_err(unavailable());

    let result = h.engine(StockWriteMode::Overwrite)
        .register_sale(P1, 3, price(1000))
        .await;

    let err = assert_storage_failure(
        result,
        Operation::RegisterSale,
        Step::RecordSale,
        &[Step::FetchProduct],
    );
    assert!(err.committed_writes().is_empty());
    h.verify();
}

#[tokio::test]
async fn test_register_debit_failure_reports_recorded_sale() {
    let mut h = Harness::new();
    h.products.expect_get(P1).return_ok(Some(product(P1, 10)));
    h.sales.expect_create().return_ok(sale(P1, 3));
    h.products.expect_update(P1).return_err(unavailable());

    let result = h.engine(StockWriteMode::Overwrite)
        .register_sale(P1, 3, price(1000))
        .await;

    let err = assert_storage_failure(
        result,
        Operation::RegisterSale,
        Step::DebitStock,
        &[Step::FetchProduct, Step::RecordSale],
    );
    assert_eq!(err.committed_writes(), vec![Step::RecordSale]);
    assert!(err.to_string().contains("step 3 (debit stock)"));
    h.verify();
}

#[tokio::test]
async fn test_invalid_input_issues_no_writes() {
    let mut h = Harness::new();
    h.products.expect_get(P1).return_ok(Some(product(P1, 10)));
    h.products.expect_get(P1).return_ok(Some(product(P1, 10)));
    let engine = h.engine(StockWriteMode::Overwrite);

    let zero = engine.register_sale(P1, 0, price(1000)).await;
    assert!(matches!(zero, Err(ReconcileError::InvalidInput(_))));

    let free = engine.register_sale(P1, 3, Decimal::ZERO).await;
    assert!(matches!(free, Err(ReconcileError::InvalidInput(_))));

    // Nothing but the two reads reached either collection
    h.verify();
}

#[tokio::test]
async fn test_oversell_issues_no_writes() {
    let mut h = Harness::new();
    h.products.expect_get(P1).return_ok(Some(product(P1, 5)));

    let result = h.engine(StockWriteMode::Overwrite)
        .register_sale(P1, 6, price(1000))
        .await;

    assert_eq!(
        result,
        Err(ReconcileError::InsufficientStock {
            product_id: P1,
            requested: 6,
            available: 5
        })
    );
    h.verify();
}

#[tokio::test]
async fn test_atomic_register_sends_reservation() {
    let mut h = Harness::new();
    h.products.expect_get(P1).return_ok(Some(product(P1, 10)));
    h.sales.expect_create().return_ok(sale(P1, 4));
    h.products
        .expect_action(P1)
        .matching(|a| *a == ProductAction::ReserveStock(4))
        .return_ok(6);

    let result = h.engine(StockWriteMode::Atomic)
        .register_sale(P1, 4, price(1000))
        .await;

    assert!(result.is_ok());
    h.verify();
}

#[tokio::test]
async fn test_atomic_register_refused_debit_removes_the_sale() {
    let mut h = Harness::new();
    // The read says 10, but a concurrent writer leaves only 1 by the time of the debit
    h.products.expect_get(P1).return_ok(Some(product(P1, 10)));
    h.sales.expect_create().return_ok(sale(P1, 4));
    h.products
        .expect_action(P1)
        .matching(|a| *a == ProductAction::ReserveStock(4))
        .return_err(StoreError::Rejected(Box::new(
            ProductError::InsufficientStock {
                requested: 4,
                available: 1,
            },
        )));
    h.sales.expect_delete(S1).return_ok(());

    let result = h.engine(StockWriteMode::Atomic)
        .register_sale(P1, 4, price(1000))
        .await;

    assert_eq!(
        result,
        Err(ReconcileError::InsufficientStock {
            product_id: P1,
            requested: 4,
            available: 1
        })
    );
    h.verify();
}

#[tokio::test]
async fn test_atomic_register_failed_removal_is_reported() {
    let mut h = Harness::new();
    h.products.expect_get(P1).return_ok(Some(product(P1, 10)));
    h.sales.expect_create().return_ok(sale(P1, 4));
    h.products
        .expect_action(P1)
        .return_err(StoreError::Rejected(Box::new(
            ProductError::InsufficientStock {
                requested: 4,
                available: 0,
            },
        )));
    h.sales.expect_delete(S1).return_err(unavailable());

    let result = h.engine(StockWriteMode::Atomic)
        .register_sale(P1, 4, price(1000))
        .await;

    let err = assert_storage_failure(
        result,
        Operation::RegisterSale,
        Step::RemoveSale,
        &[Step::FetchProduct, Step::RecordSale],
    );
    assert_eq!(err.committed_writes(), vec![Step::RecordSale]);
    h.verify();
}

// =============================================================================
// EDIT
// =============================================================================

#[tokio::test]
async fn test_edit_rewrites_sale_then_adjusts_by_delta() {
    let mut h = Harness::new();
    h.sales.expect_get(S1).return_ok(Some(sale(P1, 5)));
    h.products.expect_get(P1).return_ok(Some(product(P1, 10)));
    h.sales
        .expect_update(S1)
        .matching(|u| u.quantity == Some(8) && u.product_id == Some(P1) && u.timestamp.is_some())
        .return_ok(sale(P1, 8));
    h.products
        .expect_update(P1)
        .matching(|u| u.quantity == Some(7))
        .return_ok(product(P1, 7));

    let result = h.engine(StockWriteMode::Overwrite)
        .edit_sale(S1, P1, 8, price(1000))
        .await;

    assert_eq!(result.unwrap().quantity, 8);
    h.verify();
}

#[tokio::test]
async fn test_edit_with_same_quantity_skips_the_stock_write() {
    let mut h = Harness::new();
    h.sales.expect_get(S1).return_ok(Some(sale(P1, 5)));
    h.products.expect_get(P1).return_ok(Some(product(P1, 10)));
    h.sales
        .expect_update(S1)
        .matching(|u| u.unit_price == Some(Decimal::new(1500, 2)))
        .return_ok(sale(P1, 5));

    let result = h.engine(StockWriteMode::Overwrite)
        .edit_sale(S1, P1, 5, price(1500))
        .await;

    assert!(result.is_ok());
    h.verify();
}

#[tokio::test]
async fn test_edit_rewrite_failure_leaves_stock_alone() {
    let mut h = Harness::new();
    h.sales.expect_get(S1).return_ok(Some(sale(P1, 5)));
    h.products.expect_get(P1).return_ok(Some(product(P1, 10)));
    h.sales.expect_update(S1).return_err(unavailable());

    let result = h.engine(StockWriteMode::Overwrite)
        .edit_sale(S1, P1, 2, price(1000))
        .await;

    assert_storage_failure(
        result,
        Operation::EditSale,
        Step::RewriteSale,
        &[Step::FetchSale, Step::FetchProduct],
    );
    h.verify();
}

#[tokio::test]
async fn test_edit_adjust_failure_reports_rewritten_sale() {
    let mut h = Harness::new();
    h.sales.expect_get(S1).return_ok(Some(sale(P1, 5)));
    h.products.expect_get(P1).return_ok(Some(product(P1, 10)));
    h.sales.expect_update(S1).return_ok(sale(P1, 2));
    h.products
        .expect_update(P1)
        .matching(|u| u.quantity == Some(13))
        .return_err(unavailable());

    let result = h.engine(StockWriteMode::Overwrite)
        .edit_sale(S1, P1, 2, price(1000))
        .await;

    let err = assert_storage_failure(
        result,
        Operation::EditSale,
        Step::AdjustStock,
        &[Step::FetchSale, Step::FetchProduct, Step::RewriteSale],
    );
    assert_eq!(err.committed_writes(), vec![Step::RewriteSale]);
    h.verify();
}

#[tokio::test]
async fn test_atomic_edit_sends_relative_adjustments() {
    let mut h = Harness::new();
    h.sales.expect_get(S1).return_ok(Some(sale(P1, 5)));
    h.products.expect_get(P1).return_ok(Some(product(P1, 10)));
    h.sales.expect_update(S1).return_ok(sale(P1, 2));
    h.products
        .expect_action(P1)
        .matching(|a| *a == ProductAction::Restock(3))
        .return_ok(13);

    let result = h.engine(StockWriteMode::Atomic)
        .edit_sale(S1, P1, 2, price(1000))
        .await;

    assert!(result.is_ok());
    h.verify();
}

#[tokio::test]
async fn test_atomic_edit_refused_debit_reverts_the_sale() {
    let mut h = Harness::new();
    let original = sale(P1, 5);
    let expected_timestamp = original.timestamp;
    h.sales.expect_get(S1).return_ok(Some(original));
    h.products.expect_get(P1).return_ok(Some(product(P1, 10)));
    h.sales
        .expect_update(S1)
        .matching(|u| u.quantity == Some(9))
        .return_ok(sale(P1, 9));
    h.products
        .expect_action(P1)
        .matching(|a| *a == ProductAction::ReserveStock(4))
        .return_err(StoreError::Rejected(Box::new(
            ProductError::InsufficientStock {
                requested: 4,
                available: 2,
            },
        )));
    h.sales
        .expect_update(S1)
        .matching(move |u| u.quantity == Some(5) && u.timestamp == Some(expected_timestamp))
        .return_ok(sale(P1, 5));

    let result = h.engine(StockWriteMode::Atomic)
        .edit_sale(S1, P1, 9, price(1000))
        .await;

    assert_eq!(
        result,
        Err(ReconcileError::InsufficientStock {
            product_id: P1,
            requested: 4,
            available: 2
        })
    );
    h.verify();
}

#[tokio::test]
async fn test_repointing_debits_new_then_credits_original() {
    let mut h = Harness::new();
    h.sales.expect_get(S1).return_ok(Some(sale(P1, 4)));
    h.products.expect_get(P2).return_ok(Some(product(P2, 10)));
    h.products.expect_get(P1).return_ok(Some(product(P1, 6)));
    h.sales
        .expect_update(S1)
        .matching(|u| u.product_id == Some(P2) && u.product_name.as_deref() == Some("Producto 2"))
        .return_ok(sale(P2, 3));
    h.products
        .expect_update(P2)
        .matching(|u| u.quantity == Some(7))
        .return_ok(product(P2, 7));
    h.products
        .expect_update(P1)
        .matching(|u| u.quantity == Some(10))
        .return_ok(product(P1, 10));

    let result = h.engine(StockWriteMode::Overwrite)
        .edit_sale(S1, P2, 3, price(1000))
        .await;

    assert_eq!(result.unwrap().product_id, P2);
    h.verify();
}

#[tokio::test]
async fn test_repointing_credit_failure_reports_both_committed_writes() {
    let mut h = Harness::new();
    h.sales.expect_get(S1).return_ok(Some(sale(P1, 4)));
    h.products.expect_get(P2).return_ok(Some(product(P2, 10)));
    h.products.expect_get(P1).return_ok(Some(product(P1, 6)));
    h.sales.expect_update(S1).return_ok(sale(P2, 3));
    h.products.expect_update(P2).return_ok(product(P2, 7));
    h.products.expect_update(P1).return_err(unavailable());

    let result = h.engine(StockWriteMode::Overwrite)
        .edit_sale(S1, P2, 3, price(1000))
        .await;

    let err = assert_storage_failure(
        result,
        Operation::EditSale,
        Step::CreditOriginalStock,
        &[
            Step::FetchSale,
            Step::FetchProduct,
            Step::FetchOriginalProduct,
            Step::RewriteSale,
            Step::DebitStock,
        ],
    );
    assert_eq!(
        err.committed_writes(),
        vec![Step::RewriteSale, Step::DebitStock]
    );
    h.verify();
}

#[tokio::test]
async fn test_repointing_skips_credit_for_missing_original() {
    let mut h = Harness::new();
    h.sales.expect_get(S1).return_ok(Some(sale(P1, 4)));
    h.products.expect_get(P2).return_ok(Some(product(P2, 10)));
    h.products.expect_get(P1).return_ok(None);
    h.sales.expect_update(S1).return_ok(sale(P2, 3));
    h.products
        .expect_update(P2)
        .matching(|u| u.quantity == Some(7))
        .return_ok(product(P2, 7));

    let result = h.engine(StockWriteMode::Overwrite)
        .edit_sale(S1, P2, 3, price(1000))
        .await;

    assert!(result.is_ok());
    h.verify();
}

// =============================================================================
// DELETE
// =============================================================================

#[tokio::test]
async fn test_delete_restores_stock_before_removing_sale() {
    let mut h = Harness::new();
    h.sales.expect_get(S1).return_ok(Some(sale(P1, 5)));
    h.products.expect_get(P1).return_ok(Some(product(P1, 5)));
    h.products
        .expect_update(P1)
        .matching(|u| u.quantity == Some(10))
        .return_ok(product(P1, 10));
    h.sales.expect_delete(S1).return_ok(());

    let outcome = h.engine(StockWriteMode::Overwrite).delete_sale(S1).await.unwrap();

    assert!(matches!(outcome, DeleteOutcome::StockRestored { stock: 10, .. }));
    h.verify();
}

#[tokio::test]
async fn test_delete_credit_failure_keeps_the_sale() {
    let mut h = Harness::new();
    h.sales.expect_get(S1).return_ok(Some(sale(P1, 5)));
    h.products.expect_get(P1).return_ok(Some(product(P1, 5)));
    h.products.expect_update(P1).return_err(unavailable());

    let result = h.engine(StockWriteMode::Overwrite).delete_sale(S1).await;

    let err = assert_storage_failure(
        result,
        Operation::DeleteSale,
        Step::CreditStock,
        &[Step::FetchSale, Step::FetchProduct],
    );
    assert!(err.committed_writes().is_empty());
    h.verify();
}

#[tokio::test]
async fn test_delete_removal_failure_reports_restored_stock() {
    let mut h = Harness::new();
    h.sales.expect_get(S1).return_ok(Some(sale(P1, 5)));
    h.products.expect_get(P1).return_ok(Some(product(P1, 5)));
    h.products.expect_update(P1).return_ok(product(P1, 10));
    h.sales.expect_delete(S1).return_err(unavailable());

    let result = h.engine(StockWriteMode::Overwrite).delete_sale(S1).await;

    let err = assert_storage_failure(
        result,
        Operation::DeleteSale,
        Step::RemoveSale,
        &[Step::FetchSale, Step::FetchProduct, Step::CreditStock],
    );
    assert_eq!(err.committed_writes(), vec![Step::CreditStock]);
    h.verify();
}

#[tokio::test]
async fn test_delete_with_missing_product_only_removes_the_sale() {
    let mut h = Harness::new();
    h.sales.expect_get(S1).return_ok(Some(sale(P1, 5)));
    h.products.expect_get(P1).return_ok(None);
    h.sales.expect_delete(S1).return_ok(());

    let outcome = h.engine(StockWriteMode::Overwrite).delete_sale(S1).await.unwrap();

    assert_eq!(
        outcome,
        DeleteOutcome::PartialSuccess {
            sale: outcome.sale().clone(),
            product_id: P1
        }
    );
    h.verify();
}

#[tokio::test]
async fn test_atomic_delete_sends_restock() {
    let mut h = Harness::new();
    h.sales.expect_get(S1).return_ok(Some(sale(P1, 5)));
    h.products.expect_get(P1).return_ok(Some(product(P1, 5)));
    h.products
        .expect_action(P1)
        .matching(|a| *a == ProductAction::Restock(5))
        .return_ok(10);
    h.sales.expect_delete(S1).return_ok(());

    let outcome = h.engine(StockWriteMode::Atomic).delete_sale(S1).await.unwrap();

    assert!(matches!(outcome, DeleteOutcome::StockRestored { stock: 10, .. }));
    h.verify();
}

#[tokio::test]
async fn test_delete_refuses_to_overflow_stock() {
    let mut h = Harness::new();
    h.sales.expect_get(S1).return_ok(Some(sale(P1, 5)));
    h.products
        .expect_get(P1)
        .return_ok(Some(product(P1, u32::MAX - 1)));

    let result = h.engine(StockWriteMode::Overwrite).delete_sale(S1).await;

    assert!(matches!(result, Err(ReconcileError::StockOverflow { .. })));
    h.verify();
}
