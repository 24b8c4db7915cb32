//! Parity Comparison
//!
//! Structural equivalence checking between the direct and indirect backend
//! results, with bounded divergence reporting into an injected sink.
//!
//! # Core Concepts
//!
//! - [`EquivalenceChecker`]: pure comparison producing a [`ComparisonOutcome`]
//! - [`DivergenceRecord`]: one located leaf mismatch
//! - [`DiagnosticReporter`]: budgeted accumulation of per-item findings
//! - [`DiagnosticSink`]: durable destination of structured dumps
//! - [`ParityVerifier`]: single-value and multi-item comparison passes
//!
//! # Example
//!
//! ```rust
//! use parity_compare::{DiagnosticLog, ParityVerifier};
//! use parity_value::ResultValue;
//!
//! let log = DiagnosticLog::new();
//! let verifier = ParityVerifier::new(&log);
//!
//! let direct = vec![ResultValue::text("a"), ResultValue::text("b")];
//! let indirect = vec![ResultValue::text("a"), ResultValue::text("c")];
//!
//! let err = verifier.items("list_by_names", &direct, &indirect).unwrap_err();
//! assert!(err.to_string().contains("see diagnostic entry #1"));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod checker;
mod divergence;
mod reporter;
mod sink;

pub use checker::EquivalenceChecker;
pub use divergence::{ComparisonOutcome, DivergenceKind, DivergenceRecord, Side};
pub use reporter::{CompareError, DiagnosticReporter, ParityVerifier, DEFAULT_MAX_REPORTED};
pub use sink::{
    DiagnosticEntry, DiagnosticLog, DiagnosticSink, EntryId, ItemFinding, LogIntegrityError,
    LoggedEntry, Severity, TracingSink, TRUNCATION_NOTICE,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
