//! Divergence records and comparison outcomes

use parity_value::{DivergencePath, ResultValue, ValueCategory};
use serde::Serialize;
use std::fmt::{self, Display, Formatter};

/// Which backend path a value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Authoritative, optimized path
    Direct,
    /// Generic path used only for validation
    Indirect,
}

impl Display for Side {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => f.write_str("direct"),
            Self::Indirect => f.write_str("indirect"),
        }
    }
}

/// Why a leaf diverged
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DivergenceKind {
    /// Two scalars differ
    ValueMismatch,
    /// The two sides were classified into different categories
    CategoryMismatch {
        /// Category on the direct side
        direct: ValueCategory,
        /// Category on the indirect side
        indirect: ValueCategory,
    },
    /// Two sequences differ in length; no element was compared
    LengthMismatch {
        /// Length on the direct side
        direct: usize,
        /// Length on the indirect side
        indirect: usize,
    },
    /// Mapping key present on one side only
    MissingKey {
        /// Side lacking the key
        absent_from: Side,
    },
    /// Record attribute present on one side only
    MissingAttribute {
        /// Side lacking the attribute
        absent_from: Side,
    },
    /// Records declare different type names
    RecordTypeMismatch,
}

impl DivergenceKind {
    /// Shape divergences are about presence or layout, not about a value
    #[inline]
    #[must_use]
    pub fn is_shape(&self) -> bool {
        matches!(
            self,
            Self::MissingKey { .. } | Self::MissingAttribute { .. } | Self::CategoryMismatch { .. }
        )
    }
}

impl Display for DivergenceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValueMismatch => f.write_str("values differ"),
            Self::CategoryMismatch { direct, indirect } => {
                write!(f, "category differs: direct {direct}, indirect {indirect}")
            }
            Self::LengthMismatch { direct, indirect } => {
                write!(f, "sequence length differs: direct {direct}, indirect {indirect}")
            }
            Self::MissingKey { absent_from } => write!(f, "key absent from {absent_from} side"),
            Self::MissingAttribute { absent_from } => {
                write!(f, "attribute absent from {absent_from} side")
            }
            Self::RecordTypeMismatch => f.write_str("record type differs"),
        }
    }
}

/// A located leaf mismatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DivergenceRecord {
    /// Location of the mismatch
    pub path: DivergencePath,
    /// Value on the direct side, if present there
    pub direct: Option<ResultValue>,
    /// Value on the indirect side, if present there
    pub indirect: Option<ResultValue>,
    /// Reason
    pub kind: DivergenceKind,
}

impl DivergenceRecord {
    /// Create a record carrying both values
    #[inline]
    #[must_use]
    pub fn new(
        path: DivergencePath,
        direct: Option<ResultValue>,
        indirect: Option<ResultValue>,
        kind: DivergenceKind,
    ) -> Self {
        Self {
            path,
            direct,
            indirect,
            kind,
        }
    }

    /// Human-readable reason
    #[inline]
    #[must_use]
    pub fn reason(&self) -> String {
        self.kind.to_string()
    }
}

impl Display for DivergenceRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.kind)?;
        if let (Some(ResultValue::Scalar(d)), Some(ResultValue::Scalar(i))) =
            (&self.direct, &self.indirect)
        {
            write!(f, " (direct [{d}], indirect [{i}])")?;
        }
        Ok(())
    }
}

/// Result of comparing two values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComparisonOutcome {
    /// No divergence found
    Equivalent,
    /// At least one leaf diverged
    Divergent {
        /// Leaves in discovery order, never empty
        records: Vec<DivergenceRecord>,
        /// Whether discovery stopped at the checker's leaf limit
        truncated: bool,
    },
}

impl ComparisonOutcome {
    /// Build an outcome from collected leaves
    #[inline]
    #[must_use]
    pub fn from_records(records: Vec<DivergenceRecord>, truncated: bool) -> Self {
        if records.is_empty() {
            Self::Equivalent
        } else {
            Self::Divergent { records, truncated }
        }
    }

    /// Check for equivalence
    #[inline]
    #[must_use]
    pub fn is_equivalent(&self) -> bool {
        matches!(self, Self::Equivalent)
    }

    /// Divergent leaves (empty when equivalent)
    #[inline]
    #[must_use]
    pub fn records(&self) -> &[DivergenceRecord] {
        match self {
            Self::Equivalent => &[],
            Self::Divergent { records, .. } => records,
        }
    }

    /// Consume into the divergent leaves
    #[inline]
    #[must_use]
    pub fn into_records(self) -> Vec<DivergenceRecord> {
        match self {
            Self::Equivalent => Vec::new(),
            Self::Divergent { records, .. } => records,
        }
    }
}
