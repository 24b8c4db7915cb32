//! Entry name resolution
//!
//! Mutations name entries by their key values; backends address them by an
//! encoded name string. [`PathStyleNames`] encodes `col=value/col=value`.

use crate::error::BackendError;
use std::fmt::Write as _;

/// Value substituted for an empty key value
pub const DEFAULT_ENTRY_VALUE: &str = "__DEFAULT_ENTRY__";

/// Translates typed keys into encoded entry names
pub trait EntryNameResolver: Send + Sync {
    /// Encode one entry name
    ///
    /// # Errors
    /// Returns [`BackendError::InvalidObject`] if the key values do not match
    /// the key columns
    fn entry_name(&self, key_columns: &[String], key_values: &[String]) -> Result<String, BackendError>;
}

/// `col=value/col=value` names with path-special characters escaped as `%XX`
#[derive(Debug, Clone)]
pub struct PathStyleNames {
    default_value: String,
}

impl PathStyleNames {
    /// Create a resolver with the default empty-value placeholder
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            default_value: DEFAULT_ENTRY_VALUE.to_string(),
        }
    }

    /// Override the placeholder for empty key values
    #[inline]
    #[must_use]
    pub fn with_default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = value.into();
        self
    }
}

impl Default for PathStyleNames {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryNameResolver for PathStyleNames {
    fn entry_name(&self, key_columns: &[String], key_values: &[String]) -> Result<String, BackendError> {
        if key_columns.len() != key_values.len() {
            return Err(BackendError::InvalidObject(format!(
                "expected {} key values, got {}",
                key_columns.len(),
                key_values.len()
            )));
        }
        let mut name = String::new();
        for (i, (column, value)) in key_columns.iter().zip(key_values).enumerate() {
            if i > 0 {
                name.push('/');
            }
            let value = if value.is_empty() {
                self.default_value.as_str()
            } else {
                value.as_str()
            };
            escape_into(&mut name, column);
            name.push('=');
            escape_into(&mut name, value);
        }
        Ok(name)
    }
}

fn needs_escape(c: char) -> bool {
    matches!(
        c,
        '\u{01}'..='\u{1F}'
            | '"'
            | '#'
            | '%'
            | '\''
            | '*'
            | '/'
            | ':'
            | '='
            | '?'
            | '\\'
            | '\u{7F}'
            | '{'
            | '['
            | ']'
            | '^'
    )
}

fn escape_into(out: &mut String, raw: &str) {
    for c in raw.chars() {
        if needs_escape(c) {
            // Writing into a String cannot fail
            let _ = write!(out, "%{:02X}", u32::from(c));
        } else {
            out.push(c);
        }
    }
}
