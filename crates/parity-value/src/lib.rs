//! Parity Value Model
//!
//! Explicitly classified result values for cross-backend comparison.
//!
//! # Core Concepts
//!
//! - [`ResultValue`]: a backend result tagged as scalar, sequence, mapping or record
//! - [`ToResultValue`]: explicit classification of backend entity types
//! - [`DivergencePath`]: dotted location of a mismatch inside a value
//! - [`Dump`]: indented tree rendering used in diagnostic logs
//!
//! # Example
//!
//! ```rust
//! use parity_value::{Record, ResultValue, ValueCategory};
//!
//! let partition: ResultValue = Record::new("Partition")
//!     .with("values", vec!["2024", "01"])
//!     .with("write_id", 7_i64)
//!     .into();
//!
//! assert_eq!(partition.category(), ValueCategory::Record);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod dump;
mod path;
mod value;

pub use dump::{Dump, DEFAULT_INDENT};
pub use path::{DivergencePath, PathSegment};
pub use value::{Record, ResultValue, Scalar, ToResultValue, ValueCategory, ValueError};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
