//! Core value type flowing through constructors, validators and codecs.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::collections::{LtMap, LtVec};
use crate::instance::Instance;
use crate::lookup::{Keyed, LookupTable};
use crate::pattern::Pattern;

/// Core value type for all tagtype data.
///
/// Values are immutable and cheaply cloneable. Composite values use
/// structural sharing via persistent data structures.
#[derive(Clone, Debug)]
pub enum Value {
    /// Explicit null. Optional fields treat it exactly like absence.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Number (a single numeric kind, as in the document wire format).
    Number(f64),
    /// String value.
    String(Arc<str>),
    /// A point in time.
    Timestamp(DateTime<Utc>),
    /// A regex value.
    Pattern(Pattern),
    /// Sequence.
    Array(LtVec<Value>),
    /// Plain structured value (not produced by a generated constructor).
    Object(LtMap<Arc<str>, Value>),
    /// Value produced by a generated constructor.
    Instance(Instance),
    /// Ordered, id-indexed collection.
    Table(LookupTable<Value>),
}

impl Value {
    /// Builds a plain object from key-value pairs.
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<Arc<str>>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Self::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Builds a sequence from values.
    pub fn array<I: IntoIterator<Item = Value>>(items: I) -> Self {
        Self::Array(items.into_iter().collect())
    }

    /// Returns true if this value is null.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short name of the value's kind, for type-mismatch messages.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Timestamp(_) => "timestamp",
            Self::Pattern(_) => "pattern",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
            Self::Instance(_) => "instance",
            Self::Table(_) => "lookup table",
        }
    }

    /// Attempts to extract a boolean value.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to extract a number.
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a string reference.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to extract a timestamp.
    #[must_use]
    pub const fn as_timestamp(&self) -> Option<&DateTime<Utc>> {
        match self {
            Self::Timestamp(t) => Some(t),
            _ => None,
        }
    }

    /// Attempts to extract a sequence reference.
    #[must_use]
    pub const fn as_array(&self) -> Option<&LtVec<Value>> {
        match self {
            Self::Array(v) => Some(v),
            _ => None,
        }
    }

    /// Attempts to extract a plain-object reference.
    #[must_use]
    pub const fn as_object(&self) -> Option<&LtMap<Arc<str>, Value>> {
        match self {
            Self::Object(m) => Some(m),
            _ => None,
        }
    }

    /// Attempts to extract an instance reference.
    #[must_use]
    pub const fn as_instance(&self) -> Option<&Instance> {
        match self {
            Self::Instance(i) => Some(i),
            _ => None,
        }
    }

    /// Attempts to extract a lookup-table reference.
    #[must_use]
    pub const fn as_table(&self) -> Option<&LookupTable<Value>> {
        match self {
            Self::Table(t) => Some(t),
            _ => None,
        }
    }

    /// Reads a named field of an instance or plain object.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Self::Instance(i) => i.get(name),
            Self::Object(m) => m.get(name),
            _ => None,
        }
    }
}

/// Formats a number the way the document layer writes it: integral values
/// without a fractional part.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 9.0e15 {
        return format!("{}", n as i64);
    }
    format!("{n}")
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a.to_bits() == b.to_bits(),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Timestamp(a), Self::Timestamp(b)) => a == b,
            (Self::Pattern(a), Self::Pattern(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            (Self::Instance(a), Self::Instance(b)) => a == b,
            (Self::Table(a), Self::Table(b)) => a == b,
            _ => false,
        }
    }
}

/// Renders values the way validation failures report them.
///
/// Strings are quoted, sequences bracketed, timestamps in ISO-8601 with
/// milliseconds, patterns in literal form, instances through their own
/// `Display`, and plain objects as a JSON-like dump.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{}", format_number(*n)),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Timestamp(t) => write!(f, "{}", t.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Self::Pattern(p) => write!(f, "{p}"),
            Self::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Object(m) => {
                write!(f, "{{")?;
                for (i, (k, v)) in m.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k:?}: {v}")?;
                }
                write!(f, "}}")
            }
            Self::Instance(i) => write!(f, "{i}"),
            Self::Table(t) => write!(f, "{t}"),
        }
    }
}

impl Keyed for Value {
    fn key(&self, id_field: &str) -> Option<Arc<str>> {
        match self.field(id_field)? {
            Self::String(s) if !s.is_empty() => Some(s.clone()),
            Self::Number(n) => Some(format_number(*n).into()),
            _ => None,
        }
    }
}

// Convenience From implementations

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s.into())
    }
}

impl From<Arc<str>> for Value {
    fn from(s: Arc<str>) -> Self {
        Self::String(s)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Self::Timestamp(t)
    }
}

impl From<Pattern> for Value {
    fn from(p: Pattern) -> Self {
        Self::Pattern(p)
    }
}

impl From<Instance> for Value {
    fn from(i: Instance) -> Self {
        Self::Instance(i)
    }
}

impl From<LookupTable<Value>> for Value {
    fn from(t: LookupTable<Value>) -> Self {
        Self::Table(t)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::Array(v.into_iter().map(Into::into).collect())
    }
}
