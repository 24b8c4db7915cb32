//! Backend contract
//!
//! A [`CatalogStore`] fronts both backends. Every call names the
//! [`ExecutionPath`] it runs on; the store never runs both paths in one call.

use crate::error::BackendError;
use crate::types::{ConcurrencyToken, ExecutionPath, LogicalRequest, Resolution, TableName, TargetHandle};
use parity_txn::TransactionManager;
use parity_value::ResultValue;

/// Dual-path catalog store verified by the dispatcher
pub trait CatalogStore: TransactionManager {
    /// Resolve a read request on one path
    ///
    /// # Errors
    /// Returns the backend's failure unchanged
    fn resolve(
        &self,
        request: &LogicalRequest,
        path: ExecutionPath,
    ) -> Result<Resolution, BackendError>;

    /// Resolve a mutation target by qualified name
    ///
    /// # Errors
    /// Returns [`BackendError::NoSuchObject`] if the target does not exist
    fn resolve_target(&self, name: &TableName) -> Result<TargetHandle, BackendError>;

    /// Apply new values to named entries on one path, returning the applied values
    ///
    /// # Errors
    /// Returns the backend's failure unchanged
    fn apply_alterations(
        &self,
        target: &TargetHandle,
        names: &[String],
        values: &[ResultValue],
        token: &ConcurrencyToken,
        path: ExecutionPath,
    ) -> Result<Vec<ResultValue>, BackendError>;
}
