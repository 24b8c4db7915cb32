//! Error types for Catalog Parity Core
//!
//! Provides the error taxonomy of a verified dispatch:
//! - Divergences between the two backends (structural, flag, cardinality)
//! - Backend failures, propagated unchanged outside mutations
//! - Consolidated mutation failures
//! - Transaction lifecycle failures

use parity_compare::{CompareError, EntryId};
use parity_txn::TransactionError;

/// Failures raised by a backend collaborator
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// The requested object does not exist
    #[error("no such object: {0}")]
    NoSuchObject(String),

    /// The request or its payload is malformed
    #[error("invalid object: {0}")]
    InvalidObject(String),

    /// Any other store failure
    #[error("{0}")]
    Store(String),
}

/// Main verification error type
#[derive(Debug, thiserror::Error)]
pub enum ParityError {
    /// The two paths produced structurally different results
    #[error("different results from direct and indirect paths for {operation}, see diagnostic entry {entry}")]
    ConsistencyDivergence {
        /// Operation being verified
        operation: String,
        /// Entry holding the structured dump
        entry: EntryId,
        /// Number of differing items recorded
        divergent_items: usize,
        /// Whether reporting stopped at the budget
        truncated: bool,
    },

    /// The paths disagree on whether a listing was capped
    #[error("the truncation flag is different for {operation}: direct {direct}, indirect {indirect}")]
    ProtocolFlagMismatch {
        /// Operation being verified
        operation: String,
        /// Flag reported by the direct path
        direct: bool,
        /// Flag reported by the indirect path
        indirect: bool,
        /// Entry recording the mismatch
        entry: EntryId,
    },

    /// The paths returned a different number of items
    #[error("results are not the same size for {operation}: direct {direct}, indirect {indirect}")]
    SizeMismatch {
        /// Operation being verified
        operation: String,
        /// Item count on the direct path
        direct: usize,
        /// Item count on the indirect path
        indirect: usize,
        /// Entry recording the mismatch
        entry: EntryId,
    },

    /// A backend call failed
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// A bulk mutation failed and was rolled back
    #[error("{message}")]
    MutationFailed {
        /// Message of the underlying failure
        message: String,
        /// The underlying failure
        source: Box<ParityError>,
    },

    /// Fewer entries exist than a mutation names
    #[error("some entries to be altered are missing: requested {requested}, found {found}")]
    MissingEntries {
        /// Number of entries named
        requested: usize,
        /// Number of entries found
        found: usize,
    },

    /// Transaction lifecycle failure
    #[error(transparent)]
    Transaction(#[from] TransactionError),
}

impl ParityError {
    /// Check if the error reports disagreement between the two paths
    #[inline]
    #[must_use]
    pub fn is_divergence(&self) -> bool {
        matches!(
            self,
            Self::ConsistencyDivergence { .. }
                | Self::ProtocolFlagMismatch { .. }
                | Self::SizeMismatch { .. }
        )
    }

    /// Diagnostic entry recording this error, looking through mutation wrapping
    #[must_use]
    pub fn diagnostic_entry(&self) -> Option<EntryId> {
        match self {
            Self::ConsistencyDivergence { entry, .. }
            | Self::ProtocolFlagMismatch { entry, .. }
            | Self::SizeMismatch { entry, .. } => Some(*entry),
            Self::MutationFailed { source, .. } => source.diagnostic_entry(),
            _ => None,
        }
    }

    /// Wrap a failure raised inside a bulk mutation
    #[inline]
    #[must_use]
    pub fn mutation_failed(source: ParityError) -> Self {
        Self::MutationFailed {
            message: source.to_string(),
            source: Box::new(source),
        }
    }
}

impl From<CompareError> for ParityError {
    fn from(err: CompareError) -> Self {
        match err {
            CompareError::Divergent {
                operation,
                entry,
                divergent_items,
                truncated,
            } => Self::ConsistencyDivergence {
                operation,
                entry,
                divergent_items,
                truncated,
            },
            CompareError::SizeMismatch {
                operation,
                direct,
                indirect,
                entry,
            } => Self::SizeMismatch {
                operation,
                direct,
                indirect,
                entry,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn divergence_classification() {
        let err = ParityError::SizeMismatch {
            operation: "list_by_names".into(),
            direct: 2,
            indirect: 3,
            entry: EntryId(4),
        };
        assert!(err.is_divergence());
        assert_eq!(err.diagnostic_entry(), Some(EntryId(4)));

        let err = ParityError::Backend(BackendError::Store("disk full".into()));
        assert!(!err.is_divergence());
        assert_eq!(err.diagnostic_entry(), None);
    }

    #[test]
    fn mutation_failure_keeps_original_message() {
        let err = ParityError::mutation_failed(BackendError::Store("disk full".into()).into());
        assert_eq!(err.to_string(), "disk full");
        assert!(!err.is_divergence());
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn mutation_failure_exposes_inner_entry() {
        let inner = ParityError::ConsistencyDivergence {
            operation: "list_by_names".into(),
            entry: EntryId(2),
            divergent_items: 1,
            truncated: false,
        };
        let err = ParityError::mutation_failed(inner);
        assert_eq!(err.diagnostic_entry(), Some(EntryId(2)));
    }

    #[test]
    fn compare_error_maps_to_taxonomy() {
        let err: ParityError = CompareError::SizeMismatch {
            operation: "op".into(),
            direct: 1,
            indirect: 0,
            entry: EntryId(1),
        }
        .into();
        assert!(matches!(err, ParityError::SizeMismatch { direct: 1, indirect: 0, .. }));
    }
}
