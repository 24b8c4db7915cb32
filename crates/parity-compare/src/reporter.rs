//! Bounded divergence reporting
//!
//! [`DiagnosticReporter`] accumulates per-item findings during a multi-item
//! comparison pass. After the budget is spent the next finding is not kept;
//! instead a single truncation notice is recorded, since further divergences
//! usually share one systemic cause such as a different sort order.

use crate::checker::EquivalenceChecker;
use crate::divergence::{ComparisonOutcome, DivergenceRecord};
use crate::sink::{DiagnosticEntry, DiagnosticSink, EntryId, ItemFinding, Severity};
use parity_value::{Dump, ResultValue, DEFAULT_INDENT};
use std::ops::ControlFlow;

/// Default number of differing items kept per pass
pub const DEFAULT_MAX_REPORTED: usize = 5;

/// Errors raised by a verification pass
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompareError {
    /// Items diverged; details are in the referenced diagnostic entry
    #[error("different results from direct and indirect paths for {operation}, see diagnostic entry {entry}")]
    Divergent {
        /// Operation being verified
        operation: String,
        /// Entry holding the structured dump
        entry: EntryId,
        /// Number of findings kept in the entry
        divergent_items: usize,
        /// Whether the reporting budget was exhausted
        truncated: bool,
    },

    /// The two multi-item results differ in cardinality
    #[error("results are not the same size: direct {direct}, indirect {indirect}")]
    SizeMismatch {
        /// Operation being verified
        operation: String,
        /// Item count on the direct side
        direct: usize,
        /// Item count on the indirect side
        indirect: usize,
        /// Entry recording the mismatch
        entry: EntryId,
    },
}

/// Accumulates findings within a budget
#[derive(Debug)]
pub struct DiagnosticReporter {
    operation: String,
    budget: usize,
    indent: usize,
    findings: Vec<ItemFinding>,
    truncated: bool,
}

impl DiagnosticReporter {
    /// Create a reporter for one comparison pass
    ///
    /// `budget` is raised to 1 if it is 0, so the first differing item is
    /// always reported.
    #[inline]
    #[must_use]
    pub fn new(operation: impl Into<String>, budget: usize) -> Self {
        Self {
            operation: operation.into(),
            budget: budget.max(1),
            indent: DEFAULT_INDENT,
            findings: Vec::new(),
            truncated: false,
        }
    }

    /// Override dump indentation
    #[inline]
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Record one differing item
    ///
    /// Returns `Break` once the budget is exhausted; the caller should stop
    /// iterating.
    pub fn observe(
        &mut self,
        index: Option<usize>,
        direct: &ResultValue,
        indirect: &ResultValue,
        divergences: Vec<DivergenceRecord>,
    ) -> ControlFlow<()> {
        if self.truncated {
            return ControlFlow::Break(());
        }
        if self.findings.len() >= self.budget {
            self.truncated = true;
            return ControlFlow::Break(());
        }
        self.findings.push(ItemFinding {
            index,
            divergences,
            direct_dump: Dump::new("direct", direct).with_indent(self.indent).to_string(),
            indirect_dump: Dump::new("indirect", indirect)
                .with_indent(self.indent)
                .to_string(),
        });
        ControlFlow::Continue(())
    }

    /// Findings kept so far
    #[inline]
    #[must_use]
    pub fn findings(&self) -> &[ItemFinding] {
        &self.findings
    }

    /// Whether the truncation notice has been recorded
    #[inline]
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Log the structured dump and raise, if anything was found
    ///
    /// # Errors
    /// Returns [`CompareError::Divergent`] referencing the logged entry when
    /// at least one finding was recorded
    pub fn finish(self, sink: &dyn DiagnosticSink) -> Result<(), CompareError> {
        if self.findings.is_empty() {
            return Ok(());
        }
        let divergent_items = self.findings.len();
        let truncated = self.truncated;
        let entry = sink.record(DiagnosticEntry {
            severity: Severity::Error,
            operation: self.operation.clone(),
            message: "different results from direct and indirect paths".to_string(),
            findings: self.findings,
            truncated,
        });
        Err(CompareError::Divergent {
            operation: self.operation,
            entry,
            divergent_items,
            truncated,
        })
    }
}

/// Runs comparison passes against a sink
#[derive(Clone, Copy)]
pub struct ParityVerifier<'a> {
    checker: EquivalenceChecker,
    budget: usize,
    indent: usize,
    sink: &'a dyn DiagnosticSink,
}

impl<'a> ParityVerifier<'a> {
    /// Create a verifier with the default budget
    #[inline]
    #[must_use]
    pub fn new(sink: &'a dyn DiagnosticSink) -> Self {
        Self {
            checker: EquivalenceChecker::new(),
            budget: DEFAULT_MAX_REPORTED,
            indent: DEFAULT_INDENT,
            sink,
        }
    }

    /// Override the per-pass reporting budget; 0 is treated as 1
    #[inline]
    #[must_use]
    pub fn with_budget(mut self, budget: usize) -> Self {
        self.budget = budget;
        self
    }

    /// Override dump indentation
    #[inline]
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Sink receiving the records
    #[inline]
    #[must_use]
    pub fn sink(&self) -> &'a dyn DiagnosticSink {
        self.sink
    }

    /// Verify two single-value results
    ///
    /// # Errors
    /// Returns [`CompareError::Divergent`] if the values are not equivalent
    pub fn single(
        &self,
        operation: &str,
        direct: &ResultValue,
        indirect: &ResultValue,
    ) -> Result<(), CompareError> {
        let mut reporter = self.reporter(operation);
        if let ComparisonOutcome::Divergent { records, .. } = self.checker.compare(direct, indirect) {
            let _ = reporter.observe(None, direct, indirect, records);
        }
        reporter.finish(self.sink)
    }

    /// Verify two multi-item results position by position
    ///
    /// Cardinality is checked first and raises immediately, bypassing the
    /// reporter.
    ///
    /// # Errors
    /// Returns [`CompareError::SizeMismatch`] or [`CompareError::Divergent`]
    pub fn items(
        &self,
        operation: &str,
        direct: &[ResultValue],
        indirect: &[ResultValue],
    ) -> Result<(), CompareError> {
        if direct.len() != indirect.len() {
            let message = format!(
                "results are not the same size: direct {}, indirect {}",
                direct.len(),
                indirect.len()
            );
            let entry = self
                .sink
                .record(DiagnosticEntry::message(Severity::Error, operation, message));
            return Err(CompareError::SizeMismatch {
                operation: operation.to_string(),
                direct: direct.len(),
                indirect: indirect.len(),
                entry,
            });
        }

        let mut reporter = self.reporter(operation);
        for (index, (d, i)) in direct.iter().zip(indirect).enumerate() {
            let outcome = self.checker.compare(d, i);
            if outcome.is_equivalent() {
                continue;
            }
            if reporter
                .observe(Some(index), d, i, outcome.into_records())
                .is_break()
            {
                break;
            }
        }
        reporter.finish(self.sink)
    }

    fn reporter(&self, operation: &str) -> DiagnosticReporter {
        DiagnosticReporter::new(operation, self.budget).with_indent(self.indent)
    }
}

impl std::fmt::Debug for ParityVerifier<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParityVerifier")
            .field("checker", &self.checker)
            .field("budget", &self.budget)
            .field("indent", &self.indent)
            .finish_non_exhaustive()
    }
}
