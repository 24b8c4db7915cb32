//! Parity Transactions
//!
//! Scoped transactions for verified mutations. A scope is begun, then either
//! committed once or rolled back and cleaned up when it goes out of scope.
//!
//! # Example
//!
//! ```rust
//! use parity_txn::{TransactionCoordinator, TransactionError, TransactionManager};
//! use std::cell::Cell;
//!
//! #[derive(Default)]
//! struct Store {
//!     rollbacks: Cell<u32>,
//! }
//!
//! impl TransactionManager for Store {
//!     fn open_transaction(&self) -> Result<(), TransactionError> {
//!         Ok(())
//!     }
//!     fn commit_transaction(&self) -> Result<bool, TransactionError> {
//!         Ok(true)
//!     }
//!     fn rollback_and_cleanup(&self) {
//!         self.rollbacks.set(self.rollbacks.get() + 1);
//!     }
//! }
//!
//! let store = Store::default();
//! let coordinator = TransactionCoordinator::new(&store);
//!
//! // Dropped without commit: rolled back
//! drop(coordinator.begin().unwrap());
//! assert_eq!(store.rollbacks.get(), 1);
//!
//! // Committed: left alone
//! assert!(coordinator.begin().unwrap().commit().unwrap());
//! assert_eq!(store.rollbacks.get(), 1);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod error;
mod scope;

pub use error::TransactionError;
pub use scope::{ScopeState, TransactionCoordinator, TransactionManager, TransactionScope};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
