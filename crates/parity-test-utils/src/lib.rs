//! Testing utilities for the Catalog Parity workspace
//!
//! Shared test helpers and fixtures: a scripted dual-path store and catalog
//! entry builders.

#![allow(missing_docs)]

use parity_core::{
    BackendError, CatalogStore, ConcurrencyToken, ExecutionPath, LogicalRequest, Resolution,
    TableName, TargetHandle,
};
use parity_txn::{TransactionError, TransactionManager};
use parity_value::{Record, ResultValue};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap, HashSet};

/// A call observed by [`ScriptedStore`]
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    Resolve {
        operation: &'static str,
        path: ExecutionPath,
    },
    ResolveTarget(TableName),
    Apply {
        path: ExecutionPath,
        names: Vec<String>,
        values: Vec<ResultValue>,
    },
    Open,
    Commit,
    Rollback,
}

#[derive(Debug, Default)]
struct State {
    scripts: HashMap<(&'static str, ExecutionPath), Result<Resolution, BackendError>>,
    targets: Vec<TargetHandle>,
    apply_failures: HashMap<(ExecutionPath, usize), BackendError>,
    apply_panics: HashSet<(ExecutionPath, usize)>,
    apply_counts: HashMap<ExecutionPath, usize>,
    open_failure: Option<TransactionError>,
    commit_result: Option<Result<bool, TransactionError>>,
    calls: Vec<StoreCall>,
}

/// In-memory [`CatalogStore`] answering from per-path scripts
///
/// Unscripted reads fail with [`BackendError::NoSuchObject`]. Alterations
/// echo the values they receive unless a failure is injected. Commits
/// succeed unless told otherwise.
#[derive(Debug, Default)]
pub struct ScriptedStore {
    state: Mutex<State>,
}

impl ScriptedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `operation` on `path` with `resolution`
    pub fn script(self, operation: &'static str, path: ExecutionPath, resolution: Resolution) -> Self {
        self.state.lock().scripts.insert((operation, path), Ok(resolution));
        self
    }

    /// Answer `operation` with the same complete value on both paths
    pub fn script_both(self, operation: &'static str, value: ResultValue) -> Self {
        self.script(operation, ExecutionPath::Direct, Resolution::complete(value.clone()))
            .script(operation, ExecutionPath::Indirect, Resolution::complete(value))
    }

    /// Answer `operation` with separate complete values per path
    pub fn script_pair(self, operation: &'static str, direct: ResultValue, indirect: ResultValue) -> Self {
        self.script(operation, ExecutionPath::Direct, Resolution::complete(direct))
            .script(operation, ExecutionPath::Indirect, Resolution::complete(indirect))
    }

    /// Fail `operation` on `path`
    pub fn fail_resolve(self, operation: &'static str, path: ExecutionPath, error: BackendError) -> Self {
        self.state.lock().scripts.insert((operation, path), Err(error));
        self
    }

    /// Register a mutation target
    pub fn with_target(self, target: TargetHandle) -> Self {
        self.state.lock().targets.push(target);
        self
    }

    /// Fail the `nth` (1-based) alteration on `path`
    pub fn fail_apply(self, path: ExecutionPath, nth: usize, error: BackendError) -> Self {
        self.state.lock().apply_failures.insert((path, nth), error);
        self
    }

    /// Panic inside the `nth` (1-based) alteration on `path`
    pub fn panic_apply(self, path: ExecutionPath, nth: usize) -> Self {
        self.state.lock().apply_panics.insert((path, nth));
        self
    }

    /// Fail every transaction begin
    pub fn fail_open(self, error: TransactionError) -> Self {
        self.state.lock().open_failure = Some(error);
        self
    }

    /// Answer every commit with `result`
    pub fn commit_with(self, result: Result<bool, TransactionError>) -> Self {
        self.state.lock().commit_result = Some(result);
        self
    }

    /// Every call, in order
    pub fn calls(&self) -> Vec<StoreCall> {
        self.state.lock().calls.clone()
    }

    /// Alterations applied on `path`, in order
    pub fn applied(&self, path: ExecutionPath) -> Vec<StoreCall> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, StoreCall::Apply { path: p, .. } if *p == path))
            .collect()
    }

    pub fn commits(&self) -> usize {
        self.count(|c| matches!(c, StoreCall::Commit))
    }

    pub fn rollbacks(&self) -> usize {
        self.count(|c| matches!(c, StoreCall::Rollback))
    }

    pub fn opens(&self) -> usize {
        self.count(|c| matches!(c, StoreCall::Open))
    }

    /// Number of reads of `operation` on any path
    pub fn resolves(&self, operation: &str) -> usize {
        self.count(|c| matches!(c, StoreCall::Resolve { operation: op, .. } if *op == operation))
    }

    fn count(&self, pred: impl Fn(&StoreCall) -> bool) -> usize {
        self.state.lock().calls.iter().filter(|c| pred(c)).count()
    }
}

impl TransactionManager for ScriptedStore {
    fn open_transaction(&self) -> Result<(), TransactionError> {
        let mut state = self.state.lock();
        state.calls.push(StoreCall::Open);
        match &state.open_failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn commit_transaction(&self) -> Result<bool, TransactionError> {
        let mut state = self.state.lock();
        state.calls.push(StoreCall::Commit);
        state.commit_result.clone().unwrap_or(Ok(true))
    }

    fn rollback_and_cleanup(&self) {
        self.state.lock().calls.push(StoreCall::Rollback);
    }
}

impl CatalogStore for ScriptedStore {
    fn resolve(&self, request: &LogicalRequest, path: ExecutionPath) -> Result<Resolution, BackendError> {
        let operation = request.operation();
        let mut state = self.state.lock();
        state.calls.push(StoreCall::Resolve { operation, path });
        state
            .scripts
            .get(&(operation, path))
            .cloned()
            .unwrap_or_else(|| Err(BackendError::NoSuchObject(format!("no script for {operation} on {path}"))))
    }

    fn resolve_target(&self, name: &TableName) -> Result<TargetHandle, BackendError> {
        let mut state = self.state.lock();
        state.calls.push(StoreCall::ResolveTarget(name.clone()));
        state
            .targets
            .iter()
            .find(|t| &t.name == name)
            .cloned()
            .ok_or_else(|| BackendError::NoSuchObject(format!("table {name}")))
    }

    fn apply_alterations(
        &self,
        _target: &TargetHandle,
        names: &[String],
        values: &[ResultValue],
        _token: &ConcurrencyToken,
        path: ExecutionPath,
    ) -> Result<Vec<ResultValue>, BackendError> {
        let mut state = self.state.lock();
        state.calls.push(StoreCall::Apply {
            path,
            names: names.to_vec(),
            values: values.to_vec(),
        });
        let count = state.apply_counts.entry(path).or_insert(0);
        *count += 1;
        let nth = *count;
        if state.apply_panics.contains(&(path, nth)) {
            drop(state);
            panic!("alteration {nth} on {path} panicked");
        }
        match state.apply_failures.get(&(path, nth)) {
            Some(err) => Err(err.clone()),
            None => Ok(values.to_vec()),
        }
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn sales_table() -> TableName {
    TableName::new("hive", "sales", "orders")
}

/// Target for [`sales_table`], keyed by `ds`
pub fn sales_target() -> TargetHandle {
    TargetHandle::new(sales_table(), vec!["ds".to_string()])
}

/// An entry record keyed by `ds`
pub fn entry(ds: &str, location: &str) -> ResultValue {
    let parameters: BTreeMap<String, String> =
        [("numRows".to_string(), "10".to_string())].into_iter().collect();
    Record::new("Partition")
        .with("values", vec![ds.to_string()])
        .with("location", location)
        .with("parameters", parameters)
        .into()
}

/// `count` entries with distinct `ds` keys under `root`
pub fn entries(count: usize, root: &str) -> Vec<ResultValue> {
    (0..count)
        .map(|i| {
            let ds = format!("2024-01-{:02}", i + 1);
            let location = format!("{root}/ds={ds}");
            entry(&ds, &location)
        })
        .collect()
}

/// Column statistics for one column
pub fn column_stats(column: &str, distinct: i64) -> ResultValue {
    Record::new("ColumnStatistics")
        .with("column", column)
        .with("num_distinct", distinct)
        .with("num_nulls", 0_i64)
        .into()
}
