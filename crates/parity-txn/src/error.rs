//! Transaction errors

/// Failures of the transaction lifecycle
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransactionError {
    /// The store could not open a transaction
    #[error("failed to open transaction: {0}")]
    Begin(String),

    /// The store failed while committing
    #[error("failed to commit transaction: {0}")]
    Commit(String),

    /// The store reported that the commit did not take effect
    #[error("transaction commit was not acknowledged")]
    NotCommitted,
}
