//! Verified read operations against a scripted store

use parity_compare::{DiagnosticLog, EntryId, Severity, TRUNCATION_NOTICE};
use parity_core::{
    BackendError, EntryCoordinates, ExecutionPath, OperationDispatcher, ParityError, Resolution,
    VerifierConfig, ACTIVE_NOTICE,
};
use parity_test_utils::{column_stats, entries, entry, sales_table, ScriptedStore};
use parity_value::ResultValue;
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn dispatcher(store: ScriptedStore) -> (OperationDispatcher<ScriptedStore>, Arc<DiagnosticLog>) {
    let log = Arc::new(DiagnosticLog::new());
    (OperationDispatcher::new(store, log.clone()), log)
}

fn names(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("ds=2024-01-{i:02}")).collect()
}

#[test]
fn construction_records_active_warning() {
    let (_dispatcher, log) = dispatcher(ScriptedStore::new());
    let warnings = log.with_severity(Severity::Warn);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].message, ACTIVE_NOTICE);
}

#[test]
fn point_lookup_returns_direct_result_when_equivalent() {
    let value = entry("2024-01-01", "s3://bucket/orders/ds=2024-01-01");
    let store = ScriptedStore::new().script_both("point_lookup", value.clone());
    let (dispatcher, log) = dispatcher(store);

    let coordinates = EntryCoordinates::new(sales_table(), vec!["2024-01-01".into()]);
    assert_eq!(dispatcher.point_lookup(&coordinates).unwrap(), value);
    assert!(log.with_severity(Severity::Error).is_empty());
    assert_eq!(dispatcher.store().resolves("point_lookup"), 2);
}

#[test]
fn point_lookup_divergence_is_fatal_and_logged() {
    let store = ScriptedStore::new().script_pair(
        "point_lookup",
        entry("2024-01-01", "s3://a"),
        entry("2024-01-01", "s3://b"),
    );
    let (dispatcher, log) = dispatcher(store);

    let coordinates = EntryCoordinates::new(sales_table(), vec!["2024-01-01".into()]);
    let err = dispatcher.point_lookup(&coordinates).unwrap_err();
    assert!(err.is_divergence());
    let entry_id = err.diagnostic_entry().unwrap();
    assert_eq!(entry_id, EntryId(2));

    let logged = log.get(entry_id).unwrap();
    assert_eq!(logged.severity, Severity::Error);
    let rendered = logged.render();
    assert!(rendered.contains("Objects are different:"));
    assert!(rendered.contains("$.location"));
    assert!(rendered.contains("direct.location: [s3://a]"));
    assert!(rendered.contains("indirect.location: [s3://b]"));
}

#[test]
fn backend_failure_propagates_unchanged() {
    let store = ScriptedStore::new()
        .script_both("point_lookup", ResultValue::null())
        .fail_resolve(
            "point_lookup",
            ExecutionPath::Indirect,
            BackendError::Store("connection reset".into()),
        );
    let (dispatcher, log) = dispatcher(store);

    let coordinates = EntryCoordinates::new(sales_table(), vec!["x".into()]);
    let err = dispatcher.point_lookup(&coordinates).unwrap_err();
    assert!(matches!(err, ParityError::Backend(BackendError::Store(ref m)) if m == "connection reset"));
    assert!(log.with_severity(Severity::Error).is_empty());
}

#[test]
fn filter_flag_mismatch_raised_before_items() {
    // Items differ in size too; the flag must win
    let store = ScriptedStore::new()
        .script(
            "list_by_filter",
            ExecutionPath::Direct,
            Resolution::capped(ResultValue::sequence(entries(2, "s3://a"))),
        )
        .script(
            "list_by_filter",
            ExecutionPath::Indirect,
            Resolution::complete(ResultValue::sequence(entries(3, "s3://b"))),
        );
    let (dispatcher, log) = dispatcher(store);

    let err = dispatcher
        .list_by_filter(&sales_table(), "ds > '2024-01-01'", Some(2))
        .unwrap_err();
    match err {
        ParityError::ProtocolFlagMismatch { direct, indirect, entry, .. } => {
            assert!(direct);
            assert!(!indirect);
            let logged = log.get(entry).unwrap();
            assert!(logged.message.contains("truncation flag is different"));
            assert!(logged.findings.is_empty());
        }
        other => panic!("expected ProtocolFlagMismatch, got {other:?}"),
    }
    assert_eq!(log.with_severity(Severity::Error).len(), 1);
}

#[test]
fn filter_listing_passes_flag_through() {
    let items = ResultValue::sequence(entries(2, "s3://a"));
    let store = ScriptedStore::new()
        .script("list_by_filter", ExecutionPath::Direct, Resolution::capped(items.clone()))
        .script("list_by_filter", ExecutionPath::Indirect, Resolution::capped(items));
    let (dispatcher, _log) = dispatcher(store);

    let listing = dispatcher.list_by_filter(&sales_table(), "true", Some(2)).unwrap();
    assert!(listing.truncated);
    assert_eq!(listing.items, entries(2, "s3://a"));
}

#[test]
fn size_mismatch_carries_both_counts() {
    let store = ScriptedStore::new().script_pair(
        "list_by_names",
        ResultValue::sequence(entries(2, "s3://a")),
        ResultValue::sequence(entries(3, "s3://a")),
    );
    let (dispatcher, log) = dispatcher(store);

    let err = dispatcher.list_by_names(&sales_table(), &names(3)).unwrap_err();
    assert!(matches!(err, ParityError::SizeMismatch { direct: 2, indirect: 3, .. }));
    let message = err.to_string();
    assert!(message.contains('2') && message.contains('3'));

    let logged = log.get(err.diagnostic_entry().unwrap()).unwrap();
    assert!(logged.findings.is_empty());
}

#[test]
fn seven_differing_items_report_five_and_a_notice() {
    let store = ScriptedStore::new().script_pair(
        "list_by_names",
        ResultValue::sequence(entries(7, "s3://a")),
        ResultValue::sequence(entries(7, "s3://b")),
    );
    let (dispatcher, log) = dispatcher(store);

    let err = dispatcher.list_by_names(&sales_table(), &names(7)).unwrap_err();
    match &err {
        ParityError::ConsistencyDivergence { divergent_items, truncated, .. } => {
            assert_eq!(*divergent_items, 5);
            assert!(*truncated);
        }
        other => panic!("expected ConsistencyDivergence, got {other:?}"),
    }

    let logged = log.get(err.diagnostic_entry().unwrap()).unwrap();
    assert_eq!(logged.findings.len(), 5);
    let rendered = logged.render();
    assert_eq!(rendered.matches(TRUNCATION_NOTICE).count(), 1);
    assert_eq!(rendered.matches("Results are different at list index").count(), 5);
}

#[test]
fn configured_budget_is_used() {
    let store = ScriptedStore::new().script_pair(
        "list_by_names",
        ResultValue::sequence(entries(4, "s3://a")),
        ResultValue::sequence(entries(4, "s3://b")),
    );
    let log = Arc::new(DiagnosticLog::new());
    let dispatcher = OperationDispatcher::new(store, log.clone())
        .with_config(VerifierConfig::new().with_max_reported(2));

    let err = dispatcher.list_by_names(&sales_table(), &names(4)).unwrap_err();
    assert!(matches!(
        err,
        ParityError::ConsistencyDivergence { divergent_items: 2, truncated: true, .. }
    ));
}

#[test]
fn unmatched_names_omitted_consistently() {
    let found = ResultValue::sequence(entries(2, "s3://a"));
    let store = ScriptedStore::new().script_both("list_by_names", found);
    let (dispatcher, _log) = dispatcher(store);

    let items = dispatcher.list_by_names(&sales_table(), &names(5)).unwrap();
    assert_eq!(items.len(), 2);
}

#[test]
fn non_sequence_listing_is_invalid() {
    let store = ScriptedStore::new().script_both("list_by_names", ResultValue::text("oops"));
    let (dispatcher, _log) = dispatcher(store);

    let err = dispatcher.list_by_names(&sales_table(), &names(1)).unwrap_err();
    assert!(matches!(err, ParityError::Backend(BackendError::InvalidObject(_))));
}

#[test]
fn statistics_compare_as_single_object() {
    let direct = ResultValue::sequence(vec![column_stats("id", 10), column_stats("amount", 7)]);
    let indirect = ResultValue::sequence(vec![column_stats("id", 10), column_stats("amount", 9)]);
    let store = ScriptedStore::new().script_pair("get_statistics", direct, indirect);
    let (dispatcher, log) = dispatcher(store);

    let columns = vec!["id".to_string(), "amount".to_string()];
    let err = dispatcher.get_statistics(&sales_table(), &columns, "hive").unwrap_err();
    let logged = log.get(err.diagnostic_entry().unwrap()).unwrap();
    assert_eq!(logged.findings.len(), 1);
    assert_eq!(logged.findings[0].index, None);
    assert_eq!(logged.findings[0].divergences[0].path.to_string(), "$[1].num_distinct");
}

#[test]
fn entry_statistics_compare_per_item() {
    let per_entry = ResultValue::sequence(vec![
        ResultValue::sequence(vec![column_stats("id", 10)]),
        ResultValue::sequence(vec![column_stats("id", 4)]),
    ]);
    let store = ScriptedStore::new().script_both("get_entry_statistics", per_entry);
    let (dispatcher, _log) = dispatcher(store);

    let stats = dispatcher
        .get_entry_statistics(&sales_table(), &names(2), &["id".to_string()], "hive")
        .unwrap();
    assert_eq!(stats.len(), 2);
}

#[test]
fn list_all_commits_after_verification() {
    let store = ScriptedStore::new().script_both("list_all", ResultValue::sequence(entries(3, "s3://a")));
    let (dispatcher, _log) = dispatcher(store);

    assert_eq!(dispatcher.list_all(&sales_table(), None).unwrap().len(), 3);
    let store = dispatcher.store();
    assert_eq!((store.opens(), store.commits(), store.rollbacks()), (1, 1, 0));
}

#[test]
fn list_all_divergence_rolls_back() {
    let store = ScriptedStore::new().script_pair(
        "list_all",
        ResultValue::sequence(entries(1, "s3://a")),
        ResultValue::sequence(entries(1, "s3://b")),
    );
    let (dispatcher, _log) = dispatcher(store);

    let err = dispatcher.list_all(&sales_table(), None).unwrap_err();
    assert!(err.is_divergence());
    let store = dispatcher.store();
    assert_eq!((store.commits(), store.rollbacks()), (0, 1));
}

#[test]
fn diagnostic_log_stays_verifiable() {
    let store = ScriptedStore::new().script_pair(
        "list_by_names",
        ResultValue::sequence(entries(7, "s3://a")),
        ResultValue::sequence(entries(7, "s3://b")),
    );
    let (dispatcher, log) = dispatcher(store);
    let _ = dispatcher.list_by_names(&sales_table(), &names(7));
    assert_eq!(log.len(), 2);
    assert!(log.verify_integrity().is_ok());
}
