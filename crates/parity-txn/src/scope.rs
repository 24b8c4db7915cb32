//! Transaction scopes with guaranteed release
//!
//! A [`TransactionScope`] is closed exactly once: either committed, or rolled
//! back and cleaned up. Rollback runs on every exit path that does not end in
//! a successful commit, including early returns and panics unwinding through
//! the scope. A committed scope is never rolled back.

use crate::error::TransactionError;
use std::fmt::{self, Display, Formatter};

/// Begin/commit/rollback primitives of a backend store
pub trait TransactionManager {
    /// Open a transaction
    ///
    /// # Errors
    /// Returns [`TransactionError::Begin`] if the store cannot open one
    fn open_transaction(&self) -> Result<(), TransactionError>;

    /// Commit the open transaction, returning whether it took effect
    ///
    /// # Errors
    /// Returns [`TransactionError::Commit`] if the store fails while committing
    fn commit_transaction(&self) -> Result<bool, TransactionError>;

    /// Roll back the open transaction and release its resources
    fn rollback_and_cleanup(&self);
}

/// Lifecycle of a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeState {
    /// Begun, not yet closed
    Open,
    /// Commit succeeded
    Committed,
    /// Rolled back and cleaned up
    RolledBack,
}

impl Display for ScopeState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => f.write_str("open"),
            Self::Committed => f.write_str("committed"),
            Self::RolledBack => f.write_str("rolled back"),
        }
    }
}

/// A begun transaction, exclusively owned by one call
#[must_use = "dropping a scope without committing rolls it back"]
pub struct TransactionScope<'a, M: TransactionManager + ?Sized> {
    manager: &'a M,
    state: ScopeState,
}

impl<'a, M: TransactionManager + ?Sized> TransactionScope<'a, M> {
    /// Begin a scope
    ///
    /// A failed begin is cleaned up before the error is returned.
    ///
    /// # Errors
    /// Propagates the manager's begin failure
    pub fn begin(manager: &'a M) -> Result<Self, TransactionError> {
        if let Err(e) = manager.open_transaction() {
            tracing::warn!(error = %e, "transaction begin failed, cleaning up");
            manager.rollback_and_cleanup();
            return Err(e);
        }
        tracing::debug!("transaction scope opened");
        Ok(Self {
            manager,
            state: ScopeState::Open,
        })
    }

    /// Attempt the commit; consumes the scope so it happens at most once
    ///
    /// Anything but `Ok(true)` leaves the scope uncommitted, and it is rolled
    /// back as it is dropped here.
    ///
    /// # Errors
    /// Propagates the manager's commit failure
    pub fn commit(mut self) -> Result<bool, TransactionError> {
        let result = self.manager.commit_transaction();
        if matches!(result, Ok(true)) {
            self.state = ScopeState::Committed;
            tracing::debug!("transaction scope committed");
        }
        result
    }

    /// Roll back and clean up unless already closed
    pub fn rollback_and_cleanup(&mut self) {
        if self.state != ScopeState::Open {
            return;
        }
        self.state = ScopeState::RolledBack;
        tracing::debug!("rolling back uncommitted transaction scope");
        self.manager.rollback_and_cleanup();
    }

    /// Current state
    #[inline]
    #[must_use]
    pub fn state(&self) -> ScopeState {
        self.state
    }

    /// Check whether commit succeeded
    #[inline]
    #[must_use]
    pub fn is_committed(&self) -> bool {
        self.state == ScopeState::Committed
    }
}

impl<M: TransactionManager + ?Sized> Drop for TransactionScope<'_, M> {
    fn drop(&mut self) {
        self.rollback_and_cleanup();
    }
}

impl<M: TransactionManager + ?Sized> fmt::Debug for TransactionScope<'_, M> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionScope")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Entry point for scoped transactions over one manager
#[derive(Debug)]
pub struct TransactionCoordinator<'a, M: TransactionManager + ?Sized> {
    manager: &'a M,
}

impl<'a, M: TransactionManager + ?Sized> TransactionCoordinator<'a, M> {
    /// Create a coordinator
    #[inline]
    #[must_use]
    pub fn new(manager: &'a M) -> Self {
        Self { manager }
    }

    /// Begin a scope
    ///
    /// # Errors
    /// Propagates the manager's begin failure
    #[inline]
    pub fn begin(&self) -> Result<TransactionScope<'a, M>, TransactionError> {
        TransactionScope::begin(self.manager)
    }

    /// Run `body` inside a scope, committing only if it succeeds
    ///
    /// A commit that reports `false` is a failure.
    ///
    /// # Errors
    /// Returns the body's error, or the begin/commit failure converted into `E`
    pub fn run<T, E>(&self, body: impl FnOnce() -> Result<T, E>) -> Result<T, E>
    where
        E: From<TransactionError>,
    {
        let scope = self.begin()?;
        let value = body()?;
        if scope.commit()? {
            Ok(value)
        } else {
            Err(TransactionError::NotCommitted.into())
        }
    }
}

impl<M: TransactionManager + ?Sized> Clone for TransactionCoordinator<'_, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: TransactionManager + ?Sized> Copy for TransactionCoordinator<'_, M> {}
