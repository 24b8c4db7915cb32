//! Release guarantees of transaction scopes against a mocked manager

use mockall::mock;
use mockall::Sequence;
use parity_txn::{ScopeState, TransactionCoordinator, TransactionError, TransactionManager};
use std::panic::{self, AssertUnwindSafe};

mock! {
    pub Manager {}

    impl TransactionManager for Manager {
        fn open_transaction(&self) -> Result<(), TransactionError>;
        fn commit_transaction(&self) -> Result<bool, TransactionError>;
        fn rollback_and_cleanup(&self);
    }
}

fn opening() -> MockManager {
    let mut m = MockManager::new();
    m.expect_open_transaction().times(1).returning(|| Ok(()));
    m
}

#[test]
fn commit_then_drop_never_rolls_back() {
    let mut m = opening();
    m.expect_commit_transaction().times(1).returning(|| Ok(true));
    m.expect_rollback_and_cleanup().never();

    let scope = TransactionCoordinator::new(&m).begin().unwrap();
    assert!(scope.commit().unwrap());
}

#[test]
fn early_return_rolls_back_exactly_once() {
    fn backend_step() -> Result<(), TransactionError> {
        Err(TransactionError::Commit("backend went away".into()))
    }

    fn body(m: &MockManager) -> Result<(), TransactionError> {
        let scope = TransactionCoordinator::new(m).begin()?;
        backend_step()?;
        scope.commit().map(|_| ())
    }

    let mut m = opening();
    m.expect_commit_transaction().never();
    m.expect_rollback_and_cleanup().times(1).return_const(());

    assert!(body(&m).is_err());
}

#[test]
fn commit_failure_rolls_back() {
    let mut m = opening();
    let mut seq = Sequence::new();
    m.expect_commit_transaction()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Err(TransactionError::Commit("deadlock".into())));
    m.expect_rollback_and_cleanup()
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());

    let scope = TransactionCoordinator::new(&m).begin().unwrap();
    assert_eq!(
        scope.commit(),
        Err(TransactionError::Commit("deadlock".into()))
    );
}

#[test]
fn failed_begin_is_cleaned_up() {
    let mut m = MockManager::new();
    m.expect_open_transaction()
        .times(1)
        .returning(|| Err(TransactionError::Begin("no connection".into())));
    m.expect_commit_transaction().never();
    m.expect_rollback_and_cleanup().times(1).return_const(());

    let err = TransactionCoordinator::new(&m).begin().unwrap_err();
    assert_eq!(err, TransactionError::Begin("no connection".into()));
}

#[test]
fn panic_inside_scope_still_rolls_back() {
    let mut m = opening();
    m.expect_commit_transaction().never();
    m.expect_rollback_and_cleanup().times(1).return_const(());

    let coordinator = TransactionCoordinator::new(&m);
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        let scope = coordinator.begin().unwrap();
        assert_eq!(scope.state(), ScopeState::Open);
        panic!("mutation blew up");
    }));
    assert!(result.is_err());
}

#[test]
fn run_wraps_body_in_scope() {
    let mut m = opening();
    m.expect_commit_transaction().times(1).returning(|| Ok(true));
    m.expect_rollback_and_cleanup().never();

    let out: Result<Vec<u8>, TransactionError> =
        TransactionCoordinator::new(&m).run(|| Ok(vec![1, 2, 3]));
    assert_eq!(out.unwrap(), vec![1, 2, 3]);
}

#[test]
fn run_rolls_back_unacknowledged_commit() {
    let mut m = opening();
    m.expect_commit_transaction().times(1).returning(|| Ok(false));
    m.expect_rollback_and_cleanup().times(1).return_const(());

    let out: Result<(), TransactionError> = TransactionCoordinator::new(&m).run(|| Ok(()));
    assert_eq!(out, Err(TransactionError::NotCommitted));
}
