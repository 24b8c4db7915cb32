//! Verified operation dispatch
//!
//! Every read runs on the direct path, then on the indirect path with the
//! same request, and only an equivalent pair lets the direct result through.
//! Bulk mutations run inside a transaction scope and fail as a single
//! consolidated error after rollback.

use crate::backend::CatalogStore;
use crate::config::VerifierConfig;
use crate::error::{BackendError, ParityError};
use crate::naming::{EntryNameResolver, PathStyleNames};
use crate::types::{
    ConcurrencyToken, EntryCoordinates, ExecutionPath, FilteredListing, LogicalRequest,
    Resolution, TableName,
};
use parity_compare::{DiagnosticEntry, DiagnosticSink, ParityVerifier, Severity};
use parity_txn::TransactionCoordinator;
use parity_value::ResultValue;
use std::fmt;
use std::sync::Arc;

/// Warning recorded when a dispatcher is created
pub const ACTIVE_NOTICE: &str =
    "catalog parity verification is active; this configuration is meant for test runs only";

const BULK_ALTER: &str = "bulk_alter";

/// Entry point of every verified catalog operation
pub struct OperationDispatcher<S> {
    store: S,
    sink: Arc<dyn DiagnosticSink>,
    config: VerifierConfig,
    naming: Box<dyn EntryNameResolver>,
}

impl<S: CatalogStore> OperationDispatcher<S> {
    /// Create a dispatcher over `store`, reporting into `sink`
    pub fn new(store: S, sink: Arc<dyn DiagnosticSink>) -> Self {
        sink.record(DiagnosticEntry::message(Severity::Warn, "init", ACTIVE_NOTICE));
        tracing::warn!("{ACTIVE_NOTICE}");
        Self {
            store,
            sink,
            config: VerifierConfig::default(),
            naming: Box::new(PathStyleNames::new()),
        }
    }

    /// With configuration
    #[inline]
    #[must_use]
    pub fn with_config(mut self, config: VerifierConfig) -> Self {
        self.config = config;
        self
    }

    /// With an entry name resolver
    #[inline]
    #[must_use]
    pub fn with_naming(mut self, naming: impl EntryNameResolver + 'static) -> Self {
        self.naming = Box::new(naming);
        self
    }

    /// Underlying store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Sink receiving diagnostic entries
    #[inline]
    #[must_use]
    pub fn sink(&self) -> &Arc<dyn DiagnosticSink> {
        &self.sink
    }

    /// Fetch one entry by exact key
    ///
    /// # Errors
    /// Returns a backend failure unchanged, or
    /// [`ParityError::ConsistencyDivergence`] if the paths disagree
    pub fn point_lookup(&self, coordinates: &EntryCoordinates) -> Result<ResultValue, ParityError> {
        self.verify_single(&LogicalRequest::PointLookup(coordinates.clone()))
    }

    /// List entries matching a predicate
    ///
    /// The truncation flags are compared before any item.
    ///
    /// # Errors
    /// Returns [`ParityError::ProtocolFlagMismatch`] if the flags differ,
    /// otherwise as [`Self::list_by_names`]
    pub fn list_by_filter(
        &self,
        table: &TableName,
        predicate: &str,
        max: Option<u32>,
    ) -> Result<FilteredListing, ParityError> {
        let request = LogicalRequest::ListByFilter {
            table: table.clone(),
            predicate: predicate.to_string(),
            max,
        };
        let (direct, indirect) = self.resolve_both(&request)?;
        if direct.truncated != indirect.truncated {
            let operation = request.operation();
            let entry = self.sink.record(DiagnosticEntry::message(
                Severity::Error,
                operation,
                format!(
                    "the truncation flag is different: direct {}, indirect {}",
                    direct.truncated, indirect.truncated
                ),
            ));
            return Err(ParityError::ProtocolFlagMismatch {
                operation: operation.to_string(),
                direct: direct.truncated,
                indirect: indirect.truncated,
                entry,
            });
        }
        let truncated = direct.truncated;
        let items = self.verify_items(&request, direct, indirect)?;
        Ok(FilteredListing { items, truncated })
    }

    /// List entries by encoded name; unmatched names are omitted
    ///
    /// # Errors
    /// Returns a backend failure unchanged, [`ParityError::SizeMismatch`] if
    /// the paths return different counts, or
    /// [`ParityError::ConsistencyDivergence`] if any item differs
    pub fn list_by_names(
        &self,
        table: &TableName,
        names: &[String],
    ) -> Result<Vec<ResultValue>, ParityError> {
        self.verify_listing(&LogicalRequest::ListByNames {
            table: table.clone(),
            names: names.to_vec(),
        })
    }

    /// List every entry of a table inside a transaction scope
    ///
    /// # Errors
    /// As [`Self::list_by_names`], plus transaction failures
    pub fn list_all(&self, table: &TableName, max: Option<u32>) -> Result<Vec<ResultValue>, ParityError> {
        let request = LogicalRequest::ListAll {
            table: table.clone(),
            max,
        };
        TransactionCoordinator::new(&self.store).run(|| self.verify_listing(&request))
    }

    /// Fetch column statistics of a table
    ///
    /// # Errors
    /// As [`Self::point_lookup`]
    pub fn get_statistics(
        &self,
        table: &TableName,
        columns: &[String],
        engine: &str,
    ) -> Result<ResultValue, ParityError> {
        self.verify_single(&LogicalRequest::TableStatistics {
            table: table.clone(),
            columns: columns.to_vec(),
            engine: engine.to_string(),
        })
    }

    /// Fetch column statistics per entry
    ///
    /// # Errors
    /// As [`Self::list_by_names`]
    pub fn get_entry_statistics(
        &self,
        table: &TableName,
        entry_names: &[String],
        columns: &[String],
        engine: &str,
    ) -> Result<Vec<ResultValue>, ParityError> {
        self.verify_listing(&LogicalRequest::EntryStatistics {
            table: table.clone(),
            entry_names: entry_names.to_vec(),
            columns: columns.to_vec(),
            engine: engine.to_string(),
        })
    }

    /// Alter entries, identified by key values, and return the applied values
    ///
    /// Runs in one transaction scope: new values on the direct path, the
    /// pre-mutation values on the indirect path, then the new values on the
    /// direct path again to produce the result. Nothing is committed unless
    /// every step succeeds.
    ///
    /// # Errors
    /// Returns [`ParityError::MutationFailed`] wrapping the first failure
    pub fn bulk_alter(
        &self,
        table: &TableName,
        entries: &[Vec<String>],
        new_values: Vec<ResultValue>,
        token: &ConcurrencyToken,
    ) -> Result<Vec<ResultValue>, ParityError> {
        let table = if self.config.normalize_identifiers {
            table.normalized()
        } else {
            table.clone()
        };
        TransactionCoordinator::new(&self.store)
            .run(|| self.alter_in_scope(&table, entries, new_values, token))
            .map_err(|err| {
                tracing::error!(table = %table, error = %err, "alter failed");
                self.sink.record(DiagnosticEntry::message(
                    Severity::Error,
                    BULK_ALTER,
                    format!("alter failed: {err}"),
                ));
                ParityError::mutation_failed(err)
            })
    }

    fn alter_in_scope(
        &self,
        table: &TableName,
        entries: &[Vec<String>],
        mut new_values: Vec<ResultValue>,
        token: &ConcurrencyToken,
    ) -> Result<Vec<ResultValue>, ParityError> {
        let target = self.store.resolve_target(table)?;

        if token.write_id > 0 {
            for record in new_values.iter_mut().filter_map(ResultValue::as_record_mut) {
                record.set(self.config.write_id_attribute.as_str(), token.write_id);
            }
        }

        let names = entries
            .iter()
            .map(|keys| self.naming.entry_name(&target.key_columns, keys))
            .collect::<Result<Vec<_>, _>>()?;

        let old_values = self.list_by_names(table, &names)?;
        if old_values.len() != names.len() {
            return Err(ParityError::MissingEntries {
                requested: names.len(),
                found: old_values.len(),
            });
        }

        self.store
            .apply_alterations(&target, &names, &new_values, token, ExecutionPath::Direct)?;
        self.store
            .apply_alterations(&target, &names, &old_values, token, ExecutionPath::Indirect)?;
        let applied = self
            .store
            .apply_alterations(&target, &names, &new_values, token, ExecutionPath::Direct)?;
        Ok(applied)
    }

    fn verifier(&self) -> ParityVerifier<'_> {
        ParityVerifier::new(self.sink.as_ref())
            .with_budget(self.config.max_reported_divergences)
            .with_indent(self.config.dump_indent)
    }

    fn resolve_both(&self, request: &LogicalRequest) -> Result<(Resolution, Resolution), ParityError> {
        let direct = self.store.resolve(request, ExecutionPath::Direct)?;
        let indirect = self.store.resolve(request, ExecutionPath::Indirect)?;
        Ok((direct, indirect))
    }

    fn verify_single(&self, request: &LogicalRequest) -> Result<ResultValue, ParityError> {
        let (direct, indirect) = self.resolve_both(request)?;
        self.verifier()
            .single(request.operation(), &direct.value, &indirect.value)?;
        Ok(direct.value)
    }

    fn verify_listing(&self, request: &LogicalRequest) -> Result<Vec<ResultValue>, ParityError> {
        let (direct, indirect) = self.resolve_both(request)?;
        self.verify_items(request, direct, indirect)
    }

    fn verify_items(
        &self,
        request: &LogicalRequest,
        direct: Resolution,
        indirect: Resolution,
    ) -> Result<Vec<ResultValue>, ParityError> {
        let operation = request.operation();
        let direct = items_of(direct, ExecutionPath::Direct, operation)?;
        let indirect = items_of(indirect, ExecutionPath::Indirect, operation)?;
        self.verifier().items(operation, &direct, &indirect)?;
        Ok(direct)
    }
}

fn items_of(
    resolution: Resolution,
    path: ExecutionPath,
    operation: &str,
) -> Result<Vec<ResultValue>, BackendError> {
    resolution.value.into_sequence().map_err(|e| {
        BackendError::InvalidObject(format!("{path} path result for {operation}: {e}"))
    })
}

impl<S> fmt::Debug for OperationDispatcher<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationDispatcher")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
