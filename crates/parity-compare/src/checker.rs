//! Structural equivalence checking
//!
//! Compares two [`ResultValue`]s that are believed to describe the same
//! logical item and reports every located leaf mismatch. Dispatch is on the
//! category tag only; nothing is inferred from coincidental shape.
//!
//! # Rules
//! - Scalars are equal iff identical (two nulls are equal).
//! - Sequences must have equal length before any element is compared; a
//!   length mismatch yields one leaf carrying both lengths and stops there.
//!   Only that sequence stops: sibling values are still compared.
//!   Elements are never realigned.
//! - Mappings are checked for key-set equality, then shared keys are compared
//!   value by value. The two checks report independently.
//! - Records are compared attribute by attribute; an attribute on one side
//!   only is a shape leaf.

use crate::divergence::{ComparisonOutcome, DivergenceKind, DivergenceRecord, Side};
use parity_value::{DivergencePath, Record, ResultValue};
use std::collections::BTreeMap;

/// Pure structural comparison of two result values
#[derive(Debug, Clone, Copy, Default)]
pub struct EquivalenceChecker {
    leaf_limit: Option<usize>,
}

impl EquivalenceChecker {
    /// Create a checker that reports every leaf
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self { leaf_limit: None }
    }

    /// Stop collecting after `limit` leaves, marking the outcome truncated
    ///
    /// A limit of 0 is treated as 1.
    #[inline]
    #[must_use]
    pub fn with_leaf_limit(mut self, limit: usize) -> Self {
        self.leaf_limit = Some(limit.max(1));
        self
    }

    /// Compare the direct-path value against the indirect-path value
    #[must_use]
    pub fn compare(&self, direct: &ResultValue, indirect: &ResultValue) -> ComparisonOutcome {
        let mut walk = Walk {
            limit: self.leaf_limit,
            records: Vec::new(),
            truncated: false,
        };
        walk.value(&DivergencePath::root(), direct, indirect);
        ComparisonOutcome::from_records(walk.records, walk.truncated)
    }

    /// Compare two values, answering only whether they are equivalent
    #[inline]
    #[must_use]
    pub fn equivalent(&self, direct: &ResultValue, indirect: &ResultValue) -> bool {
        self.with_leaf_limit(1).compare(direct, indirect).is_equivalent()
    }
}

struct Walk {
    limit: Option<usize>,
    records: Vec<DivergenceRecord>,
    truncated: bool,
}

impl Walk {
    fn full(&self) -> bool {
        self.truncated
    }

    fn push(&mut self, record: DivergenceRecord) {
        if self.truncated {
            return;
        }
        if self.limit.is_some_and(|limit| self.records.len() >= limit) {
            self.truncated = true;
            return;
        }
        self.records.push(record);
    }

    fn value(&mut self, path: &DivergencePath, direct: &ResultValue, indirect: &ResultValue) {
        if self.full() {
            return;
        }
        match (direct, indirect) {
            (ResultValue::Scalar(d), ResultValue::Scalar(i)) => {
                if d != i {
                    self.push(DivergenceRecord::new(
                        path.clone(),
                        Some(direct.clone()),
                        Some(indirect.clone()),
                        DivergenceKind::ValueMismatch,
                    ));
                }
            }
            (ResultValue::Sequence(d), ResultValue::Sequence(i)) => self.sequence(path, d, i),
            (ResultValue::Mapping(d), ResultValue::Mapping(i)) => self.mapping(path, d, i),
            (ResultValue::Record(d), ResultValue::Record(i)) => self.record(path, d, i),
            _ => self.push(DivergenceRecord::new(
                path.clone(),
                Some(direct.clone()),
                Some(indirect.clone()),
                DivergenceKind::CategoryMismatch {
                    direct: direct.category(),
                    indirect: indirect.category(),
                },
            )),
        }
    }

    fn sequence(&mut self, path: &DivergencePath, direct: &[ResultValue], indirect: &[ResultValue]) {
        if direct.len() != indirect.len() {
            self.push(DivergenceRecord::new(
                path.clone(),
                None,
                None,
                DivergenceKind::LengthMismatch {
                    direct: direct.len(),
                    indirect: indirect.len(),
                },
            ));
            return;
        }
        for (index, (d, i)) in direct.iter().zip(indirect).enumerate() {
            self.value(&path.index(index), d, i);
        }
    }

    fn mapping(
        &mut self,
        path: &DivergencePath,
        direct: &BTreeMap<String, ResultValue>,
        indirect: &BTreeMap<String, ResultValue>,
    ) {
        // Key-set check
        for (key, value) in direct {
            if !indirect.contains_key(key) {
                self.push(DivergenceRecord::new(
                    path.key(key.as_str()),
                    Some(value.clone()),
                    None,
                    DivergenceKind::MissingKey {
                        absent_from: Side::Indirect,
                    },
                ));
            }
        }
        for (key, value) in indirect {
            if !direct.contains_key(key) {
                self.push(DivergenceRecord::new(
                    path.key(key.as_str()),
                    None,
                    Some(value.clone()),
                    DivergenceKind::MissingKey {
                        absent_from: Side::Direct,
                    },
                ));
            }
        }

        // Shared keys
        for (key, d) in direct {
            if let Some(i) = indirect.get(key) {
                self.value(&path.key(key.as_str()), d, i);
            }
        }
    }

    fn record(&mut self, path: &DivergencePath, direct: &Record, indirect: &Record) {
        if direct.type_name() != indirect.type_name() {
            self.push(DivergenceRecord::new(
                path.clone(),
                Some(ResultValue::text(direct.type_name())),
                Some(ResultValue::text(indirect.type_name())),
                DivergenceKind::RecordTypeMismatch,
            ));
        }

        for (name, d) in direct.attributes() {
            match indirect.get(name) {
                Some(i) => self.value(&path.attribute(name), d, i),
                None => self.push(DivergenceRecord::new(
                    path.attribute(name),
                    Some(d.clone()),
                    None,
                    DivergenceKind::MissingAttribute {
                        absent_from: Side::Indirect,
                    },
                )),
            }
        }
        for (name, i) in indirect.attributes() {
            if direct.get(name).is_none() {
                self.push(DivergenceRecord::new(
                    path.attribute(name),
                    None,
                    Some(i.clone()),
                    DivergenceKind::MissingAttribute {
                        absent_from: Side::Direct,
                    },
                ));
            }
        }
    }
}
