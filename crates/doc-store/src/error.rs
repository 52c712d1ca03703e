//! # Store Errors
//!
//! Every call through a [`CollectionClient`](crate::CollectionClient) is an independent
//! round trip and can fail on its own. This module defines the failures a caller sees.

use std::error::Error;

/// Errors that can occur while talking to a collection.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Collection closed")]
    Closed,
    #[error("Collection dropped response channel")]
    Dropped,
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error("Document rejected: {0}")]
    Rejected(Box<dyn Error + Send + Sync>),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Returns the typed document error if this is a rejection of type `E`.
    pub fn rejection<E: Error + 'static>(&self) -> Option<&E> {
        match self {
            StoreError::Rejected(e) => e.downcast_ref::<E>(),
            _ => None,
        }
    }

    /// Consumes the error, returning the typed rejection or the original error.
    pub fn into_rejection<E: Error + 'static>(self) -> Result<E, StoreError> {
        match self {
            StoreError::Rejected(e) => match e.downcast::<E>() {
                Ok(typed) => Ok(*typed),
                Err(other) => Err(StoreError::Rejected(other)),
            },
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error, PartialEq)]
    #[error("out of widgets")]
    struct OutOfWidgets;

    #[test]
    fn rejection_downcasts_to_document_error() {
        let err = StoreError::Rejected(Box::new(OutOfWidgets));
        assert_eq!(err.rejection::<OutOfWidgets>(), Some(&OutOfWidgets));
        assert_eq!(err.into_rejection::<OutOfWidgets>().unwrap(), OutOfWidgets);
    }

    #[test]
    fn non_rejections_pass_through() {
        let err = StoreError::Unavailable("timeout".into());
        assert!(err.rejection::<OutOfWidgets>().is_none());
        assert!(matches!(
            err.into_rejection::<OutOfWidgets>(),
            Err(StoreError::Unavailable(msg)) if msg == "timeout"
        ));
    }
}
