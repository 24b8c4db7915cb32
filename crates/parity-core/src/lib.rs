//! Catalog Parity Core
//!
//! Differential verification of catalog operations:
//! - Dispatches every operation to the direct and the indirect backend
//! - Returns the direct result only when both agree structurally
//! - Compares listing truncation flags before any item
//! - Runs bulk mutations inside a transaction scope
//! - Records every divergence in an injected diagnostic sink
//!
//! # Example
//!
//! ```rust,ignore
//! use parity_compare::TracingSink;
//! use parity_core::{OperationDispatcher, TableName, VerifierConfig};
//! use std::sync::Arc;
//!
//! let dispatcher = OperationDispatcher::new(store, Arc::new(TracingSink::new()))
//!     .with_config(VerifierConfig::new().with_max_reported(10));
//!
//! let table = TableName::new("hive", "sales", "orders");
//! let listing = dispatcher.list_by_filter(&table, "ds > '2024-01-01'", None)?;
//! println!("{} entries, truncated: {}", listing.items.len(), listing.truncated);
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

// Core modules
pub mod backend;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod naming;
pub mod types;

// Re-exports for convenience
pub use backend::CatalogStore;
pub use config::{VerifierConfig, DEFAULT_WRITE_ID_ATTRIBUTE};
pub use dispatcher::{OperationDispatcher, ACTIVE_NOTICE};
pub use error::{BackendError, ParityError};
pub use naming::{EntryNameResolver, PathStyleNames, DEFAULT_ENTRY_VALUE};
pub use types::{
    normalize_identifier, ConcurrencyToken, EntryCoordinates, ExecutionPath, FilteredListing,
    LogicalRequest, Resolution, TableName, TargetHandle,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with Catalog Parity Core
    pub use crate::{
        BackendError, CatalogStore, ConcurrencyToken, EntryCoordinates, ExecutionPath,
        LogicalRequest, OperationDispatcher, ParityError, Resolution, TableName, TargetHandle,
        VerifierConfig,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
