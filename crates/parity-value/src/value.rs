//! Result values returned by catalog backends
//!
//! Every backend result is classified into exactly one [`ValueCategory`]
//! before it is compared. Classification is explicit: callers build a
//! [`ResultValue`] through [`ToResultValue`] or the constructors here, and the
//! comparison engine dispatches on the variant tag only.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

/// The four categories a result value can belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueCategory {
    /// Null, boolean, number, text or bytes
    Scalar,
    /// Ordered sequence; order is part of the value
    Sequence,
    /// Associative mapping with unique string keys
    Mapping,
    /// Composite record with named attributes
    Record,
}

impl Display for ValueCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Scalar => "scalar",
            Self::Sequence => "sequence",
            Self::Mapping => "mapping",
            Self::Record => "record",
        };
        f.write_str(name)
    }
}

/// Leaf value
///
/// Floats compare by bit pattern, so `NaN` equals `NaN` and `0.0` differs
/// from `-0.0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scalar {
    /// Absent value
    Null,
    /// Boolean
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Floating point number
    Float(f64),
    /// Text
    Text(String),
    /// Raw bytes
    Bytes(Vec<u8>),
}

impl Scalar {
    /// Check for null
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Scalar {}

impl Display for Scalar {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
            Self::Bytes(b) => write!(f, "0x{}", hex::encode(b)),
        }
    }
}

/// Composite record: a type name plus its declared attributes in order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    type_name: String,
    attributes: IndexMap<String, ResultValue>,
}

impl Record {
    /// Create an empty record of the given type
    #[inline]
    #[must_use]
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            attributes: IndexMap::new(),
        }
    }

    /// Add an attribute, returning the record
    #[inline]
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl ToResultValue) -> Self {
        self.set(name, value);
        self
    }

    /// Set an attribute, keeping its declared position if it already exists
    #[inline]
    pub fn set(&mut self, name: impl Into<String>, value: impl ToResultValue) {
        self.attributes.insert(name.into(), value.to_result_value());
    }

    /// Type name
    #[inline]
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Look up an attribute
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ResultValue> {
        self.attributes.get(name)
    }

    /// Attributes in declared order
    #[inline]
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &ResultValue)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of declared attributes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Check for a record without attributes
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

/// A classified backend result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultValue {
    /// Leaf value
    Scalar(Scalar),
    /// Ordered sequence
    Sequence(Vec<ResultValue>),
    /// Associative mapping
    Mapping(BTreeMap<String, ResultValue>),
    /// Composite record
    Record(Record),
}

impl ResultValue {
    /// Null scalar
    #[inline]
    #[must_use]
    pub fn null() -> Self {
        Self::Scalar(Scalar::Null)
    }

    /// Text scalar
    #[inline]
    #[must_use]
    pub fn text(s: impl Into<String>) -> Self {
        Self::Scalar(Scalar::Text(s.into()))
    }

    /// Sequence from anything classifiable
    #[must_use]
    pub fn sequence<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToResultValue,
    {
        Self::Sequence(items.into_iter().map(|v| v.to_result_value()).collect())
    }

    /// Mapping from key/value pairs
    #[must_use]
    pub fn mapping<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToResultValue,
    {
        Self::Mapping(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.to_result_value()))
                .collect(),
        )
    }

    /// Category tag of this value
    #[inline]
    #[must_use]
    pub fn category(&self) -> ValueCategory {
        match self {
            Self::Scalar(_) => ValueCategory::Scalar,
            Self::Sequence(_) => ValueCategory::Sequence,
            Self::Mapping(_) => ValueCategory::Mapping,
            Self::Record(_) => ValueCategory::Record,
        }
    }

    /// Borrow as a record
    #[inline]
    #[must_use]
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Mutably borrow as a record
    #[inline]
    pub fn as_record_mut(&mut self) -> Option<&mut Record> {
        match self {
            Self::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Borrow as a sequence
    #[inline]
    #[must_use]
    pub fn as_sequence(&self) -> Option<&[ResultValue]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Consume into sequence items
    ///
    /// # Errors
    /// Returns [`ValueError::NotASequence`] for any other category
    pub fn into_sequence(self) -> Result<Vec<ResultValue>, ValueError> {
        match self {
            Self::Sequence(items) => Ok(items),
            other => Err(ValueError::NotASequence(other.category())),
        }
    }

    /// Parse an explicitly tagged JSON dump
    ///
    /// # Errors
    /// Returns [`ValueError::Json`] when the input is not a tagged value
    pub fn from_json(input: &str) -> Result<Self, ValueError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Serialize into the tagged JSON form accepted by [`Self::from_json`]
    ///
    /// # Errors
    /// Returns [`ValueError::Json`] if serialization fails
    pub fn to_json(&self) -> Result<String, ValueError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl From<Scalar> for ResultValue {
    fn from(value: Scalar) -> Self {
        Self::Scalar(value)
    }
}

impl From<Record> for ResultValue {
    fn from(value: Record) -> Self {
        Self::Record(value)
    }
}

/// Explicit mapping of a type onto a [`ResultValue`]
///
/// Backend adapters implement this for their entity types, normally by
/// building a [`Record`].
pub trait ToResultValue {
    /// Classify and convert
    fn to_result_value(&self) -> ResultValue;
}

impl ToResultValue for ResultValue {
    fn to_result_value(&self) -> ResultValue {
        self.clone()
    }
}

impl ToResultValue for Scalar {
    fn to_result_value(&self) -> ResultValue {
        ResultValue::Scalar(self.clone())
    }
}

impl ToResultValue for Record {
    fn to_result_value(&self) -> ResultValue {
        ResultValue::Record(self.clone())
    }
}

impl ToResultValue for bool {
    fn to_result_value(&self) -> ResultValue {
        ResultValue::Scalar(Scalar::Bool(*self))
    }
}

macro_rules! int_to_result_value {
    ($($t:ty),*) => {
        $(
            impl ToResultValue for $t {
                fn to_result_value(&self) -> ResultValue {
                    ResultValue::Scalar(Scalar::Int(i64::from(*self)))
                }
            }
        )*
    };
}

int_to_result_value!(i8, i16, i32, i64, u8, u16, u32);

impl ToResultValue for f64 {
    fn to_result_value(&self) -> ResultValue {
        ResultValue::Scalar(Scalar::Float(*self))
    }
}

impl ToResultValue for str {
    fn to_result_value(&self) -> ResultValue {
        ResultValue::text(self)
    }
}

impl ToResultValue for String {
    fn to_result_value(&self) -> ResultValue {
        ResultValue::text(self.as_str())
    }
}

impl<T: ToResultValue + ?Sized> ToResultValue for &T {
    fn to_result_value(&self) -> ResultValue {
        (**self).to_result_value()
    }
}

impl<T: ToResultValue> ToResultValue for Option<T> {
    fn to_result_value(&self) -> ResultValue {
        self.as_ref()
            .map_or_else(ResultValue::null, ToResultValue::to_result_value)
    }
}

impl<T: ToResultValue> ToResultValue for Vec<T> {
    fn to_result_value(&self) -> ResultValue {
        ResultValue::sequence(self.iter())
    }
}

impl<T: ToResultValue> ToResultValue for [T] {
    fn to_result_value(&self) -> ResultValue {
        ResultValue::sequence(self.iter())
    }
}

impl<V: ToResultValue> ToResultValue for BTreeMap<String, V> {
    fn to_result_value(&self) -> ResultValue {
        ResultValue::mapping(self.iter().map(|(k, v)| (k.clone(), v)))
    }
}

/// Errors raised while handling result values
#[derive(Debug, thiserror::Error)]
pub enum ValueError {
    /// A sequence was required
    #[error("expected a sequence, found a {0}")]
    NotASequence(ValueCategory),

    /// Tagged JSON could not be read or written
    #[error("invalid value dump: {0}")]
    Json(#[from] serde_json::Error),
}
