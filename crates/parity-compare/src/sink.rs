//! Diagnostic sinks
//!
//! The durable record of a divergence is a [`DiagnosticEntry`] written to an
//! injected [`DiagnosticSink`]. Raised errors only carry the [`EntryId`] that
//! points back into the sink.

use crate::divergence::DivergenceRecord;
use parking_lot::Mutex;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt::{self, Display, Formatter, Write as _};
use std::sync::atomic::{AtomicU64, Ordering};

/// Notice appended when the reporting budget is exhausted
pub const TRUNCATION_NOTICE: &str = "too many diffs, giving up (results might be sorted differently)";

/// Entry severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Notable but not a failure
    Warn,
    /// Divergence or failure
    Error,
}

/// Identifier of an entry within a sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct EntryId(pub u64);

impl Display for EntryId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One differing item within a comparison pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemFinding {
    /// Position in the multi-item result; `None` for single-value results
    pub index: Option<usize>,
    /// Located leaf mismatches
    pub divergences: Vec<DivergenceRecord>,
    /// Rendered direct-side value
    pub direct_dump: String,
    /// Rendered indirect-side value
    pub indirect_dump: String,
}

/// Structured diagnostic record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticEntry {
    /// Severity
    pub severity: Severity,
    /// Logical operation being verified
    pub operation: String,
    /// Summary line
    pub message: String,
    /// Differing items, in discovery order
    pub findings: Vec<ItemFinding>,
    /// Whether the reporting budget was exhausted
    pub truncated: bool,
}

impl DiagnosticEntry {
    /// Entry without item findings
    #[inline]
    #[must_use]
    pub fn message(
        severity: Severity,
        operation: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            operation: operation.into(),
            message: message.into(),
            findings: Vec::new(),
            truncated: false,
        }
    }

    /// Full text rendering: summary, each finding with both dumps, truncation notice
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = self.render_into(&mut out);
        out
    }

    fn render_into(&self, out: &mut String) -> fmt::Result {
        writeln!(out, "[{}] {}", self.operation, self.message)?;
        for finding in &self.findings {
            match finding.index {
                Some(index) => writeln!(out, "Results are different at list index {index}:")?,
                None => writeln!(out, "Objects are different:")?,
            }
            for record in &finding.divergences {
                writeln!(out, "  {record}")?;
            }
            out.push_str(&finding.direct_dump);
            out.push('\n');
            out.push_str(&finding.indirect_dump);
            out.push('\n');
        }
        if self.truncated {
            writeln!(out, "{TRUNCATION_NOTICE}")?;
        }
        Ok(())
    }
}

/// Destination for durable diagnostic records
pub trait DiagnosticSink: Send + Sync {
    /// Append an entry, returning its identifier
    fn record(&self, entry: DiagnosticEntry) -> EntryId;
}

/// Sink that emits every entry as a `tracing` event
#[derive(Debug, Default)]
pub struct TracingSink {
    next_id: AtomicU64,
}

impl TracingSink {
    /// Create a new sink
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl DiagnosticSink for TracingSink {
    fn record(&self, entry: DiagnosticEntry) -> EntryId {
        let id = EntryId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let rendered = entry.render();
        match entry.severity {
            Severity::Warn => tracing::warn!(
                entry = %id,
                operation = %entry.operation,
                "{rendered}"
            ),
            Severity::Error => tracing::error!(
                entry = %id,
                operation = %entry.operation,
                findings = entry.findings.len(),
                truncated = entry.truncated,
                "Different results: \n{rendered}"
            ),
        }
        id
    }
}

/// An entry as stored by [`DiagnosticLog`]
#[derive(Debug, Clone, Serialize)]
pub struct LoggedEntry {
    /// Identifier
    pub id: EntryId,
    /// Entry payload
    pub entry: DiagnosticEntry,
    /// Hash of the previous entry, zeroes for the first
    #[serde(serialize_with = "serialize_hash")]
    pub prev_hash: [u8; 32],
    /// Hash over id, rendered payload and `prev_hash`
    #[serde(serialize_with = "serialize_hash")]
    pub hash: [u8; 32],
}

fn serialize_hash<S: serde::Serializer>(hash: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode(hash))
}

/// Append-only in-memory sink with a hash-chained record
#[derive(Debug, Default)]
pub struct DiagnosticLog {
    inner: Mutex<Vec<LoggedEntry>>,
}

impl DiagnosticLog {
    /// Create an empty log
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every entry
    #[must_use]
    pub fn entries(&self) -> Vec<LoggedEntry> {
        self.inner.lock().clone()
    }

    /// Look up an entry by id
    #[must_use]
    pub fn get(&self, id: EntryId) -> Option<DiagnosticEntry> {
        self.inner
            .lock()
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.entry.clone())
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Check for an empty log
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Entries at the given severity
    #[must_use]
    pub fn with_severity(&self, severity: Severity) -> Vec<DiagnosticEntry> {
        self.inner
            .lock()
            .iter()
            .filter(|e| e.entry.severity == severity)
            .map(|e| e.entry.clone())
            .collect()
    }

    /// Re-derive every hash and check the chain
    ///
    /// # Errors
    /// Returns [`LogIntegrityError`] naming the first entry that does not verify
    pub fn verify_integrity(&self) -> Result<(), LogIntegrityError> {
        let guard = self.inner.lock();
        let mut prev = [0u8; 32];
        for e in guard.iter() {
            if e.prev_hash != prev || e.hash != compute_hash(e.id, &e.entry, &e.prev_hash) {
                return Err(LogIntegrityError(e.id));
            }
            prev = e.hash;
        }
        Ok(())
    }

    /// Serialize every entry as JSON
    ///
    /// # Errors
    /// Returns the serializer error, if any
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&*self.inner.lock())
    }
}

impl DiagnosticSink for DiagnosticLog {
    fn record(&self, entry: DiagnosticEntry) -> EntryId {
        let mut guard = self.inner.lock();
        let id = EntryId(guard.len() as u64 + 1);
        let prev_hash = guard.last().map_or([0u8; 32], |e| e.hash);
        let hash = compute_hash(id, &entry, &prev_hash);
        guard.push(LoggedEntry {
            id,
            entry,
            prev_hash,
            hash,
        });
        id
    }
}

/// The hash chain of a [`DiagnosticLog`] is broken at this entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("diagnostic log integrity violated at entry {0}")]
pub struct LogIntegrityError(pub EntryId);

fn compute_hash(id: EntryId, entry: &DiagnosticEntry, prev_hash: &[u8; 32]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(id.0.to_le_bytes());
    hasher.update([entry.severity as u8]);
    hasher.update(entry.render().as_bytes());
    hasher.update([0]);
    hasher.update(prev_hash);
    hasher.finalize().into()
}
