//! Step bookkeeping for multi-call operations.
//!
//! Each engine operation issues its store calls strictly one after another. A [`Progress`]
//! records every call that returned successfully so that a failure can report exactly
//! which writes already committed.

use super::error::ReconcileError;
use std::fmt;
use tracing::{error, warn};

/// The three operations the engine exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    RegisterSale,
    EditSale,
    DeleteSale,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::RegisterSale => "register sale",
            Operation::EditSale => "edit sale",
            Operation::DeleteSale => "delete sale",
        })
    }
}

/// One store call within an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    FetchSale,
    /// The product the sale points at (the new one, for an edit).
    FetchProduct,
    /// The product an edited sale pointed at before being moved to another product.
    FetchOriginalProduct,
    RecordSale,
    RewriteSale,
    /// Puts an edited sale back after its stock adjustment was refused.
    RevertSale,
    RemoveSale,
    DebitStock,
    /// Same-product edit: debit or credit by the quantity difference.
    AdjustStock,
    CreditStock,
    /// Re-pointed edit: return the old quantity to the original product.
    CreditOriginalStock,
}

impl Step {
    pub fn is_write(self) -> bool {
        !matches!(
            self,
            Step::FetchSale | Step::FetchProduct | Step::FetchOriginalProduct
        )
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Step::FetchSale => "fetch sale",
            Step::FetchProduct => "fetch product",
            Step::FetchOriginalProduct => "fetch original product",
            Step::RecordSale => "record sale",
            Step::RewriteSale => "rewrite sale",
            Step::RevertSale => "revert sale",
            Step::RemoveSale => "remove sale",
            Step::DebitStock => "debit stock",
            Step::AdjustStock => "adjust stock",
            Step::CreditStock => "credit stock",
            Step::CreditOriginalStock => "credit original product stock",
        })
    }
}

/// Completed steps of one running operation.
#[derive(Debug)]
pub(crate) struct Progress {
    operation: Operation,
    completed: Vec<Step>,
}

impl Progress {
    pub(crate) fn new(operation: Operation) -> Self {
        Self {
            operation,
            completed: Vec::new(),
        }
    }

    pub(crate) fn done(&mut self, step: Step) {
        self.completed.push(step);
    }

    /// Builds the `StorageFailure` for `step`. Logged at `error` once a write has committed.
    pub(crate) fn fail(&self, step: Step, reason: impl fmt::Display) -> ReconcileError {
        let failure = ReconcileError::StorageFailure {
            operation: self.operation,
            step,
            index: self.completed.len() + 1,
            completed: self.completed.clone(),
            reason: reason.to_string(),
        };
        if self.completed.iter().any(|s| s.is_write()) {
            error!(error = %failure, "Operation left partially applied");
        } else {
            warn!(error = %failure, "Operation failed before any write");
        }
        failure
    }
}
