//! Error types for the tagtype system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

/// The main error type for tagtype operations.
#[derive(Debug, Clone, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Prepends a document path frame, creating the context if needed.
    ///
    /// Frames are pushed innermost first while a failure unwinds through
    /// nested fields, so the stored path reads outermost to innermost.
    #[must_use]
    pub fn in_frame(mut self, frame: impl Into<String>) -> Self {
        let context = self.context.get_or_insert_with(ErrorContext::new);
        context.path.insert(0, frame.into());
        self
    }

    /// Records the type whose decode or construction failed, creating the
    /// context if needed.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.context.get_or_insert_with(ErrorContext::new).source = Some(source.into());
        self
    }

    /// Creates an arity error for a positional constructor.
    #[must_use]
    pub fn arity(type_name: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::new(ErrorKind::Arity {
            type_name: type_name.into(),
            expected,
            actual,
        })
    }

    /// Creates a field-shape error from already-rendered parts.
    #[must_use]
    pub fn field_shape(
        context: impl Into<String>,
        field: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::FieldShape(FieldShapeError {
            context: context.into(),
            field: field.into(),
            expected: expected.into(),
            found: found.into(),
        }))
    }

    /// Creates an unrecognized-variant error.
    #[must_use]
    pub fn unrecognized_variant(type_name: impl Into<String>, tag: Option<String>) -> Self {
        Self::new(ErrorKind::UnrecognizedVariant {
            type_name: type_name.into(),
            tag,
        })
    }

    /// Creates an exhaustiveness error listing every variant without a handler.
    #[must_use]
    pub fn exhaustiveness(type_name: impl Into<String>, missing: Vec<String>) -> Self {
        Self::new(ErrorKind::Exhaustiveness {
            type_name: type_name.into(),
            missing,
        })
    }

    /// Creates a grammar error for a field-type spec.
    #[must_use]
    pub fn grammar(spec: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Grammar {
            spec: spec.into(),
            message: message.into(),
        })
    }

    /// Creates an invalid-definition error.
    #[must_use]
    pub fn invalid_definition(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidDefinition(message.into()))
    }

    /// Creates an unknown-type error.
    #[must_use]
    pub fn unknown_type(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownType(name.into()))
    }

    /// Creates a malformed-document error.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedDocument(message.into()))
    }

    /// Returns true if this is an arity failure.
    #[must_use]
    pub const fn is_arity(&self) -> bool {
        matches!(self.kind, ErrorKind::Arity { .. })
    }

    /// Returns true if this is a field-shape failure.
    #[must_use]
    pub const fn is_field_shape(&self) -> bool {
        matches!(self.kind, ErrorKind::FieldShape(_))
    }

    /// Returns true if this is an unrecognized-variant failure.
    #[must_use]
    pub const fn is_unrecognized_variant(&self) -> bool {
        matches!(self.kind, ErrorKind::UnrecognizedVariant { .. })
    }

    /// Returns true if this is an exhaustiveness failure.
    #[must_use]
    pub const fn is_exhaustiveness(&self) -> bool {
        matches!(self.kind, ErrorKind::Exhaustiveness { .. })
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// A sum type was asked to construct without naming a variant.
    #[error("{0} is a sum type; construct through one of its variants")]
    VariantRequired(String),

    /// A positional constructor was called with the wrong number of arguments.
    #[error("arity mismatch: {type_name} expects {expected} argument(s), got {actual}")]
    Arity {
        /// The type or variant being constructed.
        type_name: String,
        /// Number of declared fields.
        expected: usize,
        /// Number of arguments supplied.
        actual: usize,
    },

    /// A field failed primitive, regex, array, reference or collection validation.
    #[error("{0}")]
    FieldShape(FieldShapeError),

    /// A document's variant discriminant is absent or names no declared variant.
    #[error("unrecognized variant for {type_name}: {}", .tag.as_deref().unwrap_or("<missing tag>"))]
    UnrecognizedVariant {
        /// The sum type being decoded.
        type_name: String,
        /// The discriminant found, if any.
        tag: Option<String>,
    },

    /// `match_with` was called without a handler for every declared variant.
    #[error("non-exhaustive match on {type_name}: missing handler(s) for {}", .missing.join(", "))]
    Exhaustiveness {
        /// The sum type being matched.
        type_name: String,
        /// Declared variants that have no handler.
        missing: Vec<String>,
    },

    /// `match_with` was called on an instance of a single-variant type.
    #[error("{0} is not a sum type")]
    NotSumType(String),

    /// A field-type spec string could not be parsed.
    #[error("invalid field type spec {spec:?}: {message}")]
    Grammar {
        /// The offending spec.
        spec: String,
        /// What went wrong.
        message: String,
    },

    /// An update named a field the variant does not declare.
    #[error("{type_name} has no field {field:?}")]
    UnknownField {
        /// The type or variant being updated.
        type_name: String,
        /// The undeclared field.
        field: String,
    },

    /// A type definition is structurally invalid.
    #[error("invalid type definition: {0}")]
    InvalidDefinition(String),

    /// A referenced type is not defined in the registry.
    #[error("unknown type: {0}")]
    UnknownType(String),

    /// A value was given to a handle for a different type.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// The type the handle generates.
        expected: String,
        /// The discriminant (or value kind) actually supplied.
        actual: String,
    },

    /// Two elements of a lookup table share an id.
    #[error("duplicate id in lookup table: {0}")]
    DuplicateId(String),

    /// An element has no usable value in the table's id field.
    #[error("element has no id in field {field:?}")]
    MissingId {
        /// The table's id field.
        field: String,
    },

    /// A lookup table is keyed by a field other than the registry's id field.
    #[error("lookup table keyed by {actual:?}; tables here are keyed by {expected:?}")]
    IdFieldMismatch {
        /// The registry's id field.
        expected: String,
        /// The table's id field.
        actual: String,
    },

    /// An id was requested that the table does not contain.
    #[error("unknown id in lookup table: {0}")]
    UnknownId(String),

    /// A transform changed an element's id.
    #[error("transform changed id {from:?} to {to:?}")]
    IdChanged {
        /// Id before the transform.
        from: String,
        /// Id after the transform.
        to: String,
    },

    /// Index out of bounds.
    #[error("index out of bounds: {index} (length {length})")]
    IndexOutOfBounds {
        /// The index that was accessed.
        index: usize,
        /// The actual length of the collection.
        length: usize,
    },

    /// Two encoded table entries carry the same `_order`.
    #[error("duplicate _order {order} in encoded lookup table (ids {first:?} and {second:?})")]
    DuplicateOrder {
        /// The repeated order value.
        order: i64,
        /// First id carrying it.
        first: String,
        /// Second id carrying it.
        second: String,
    },

    /// A document does not have the shape its type requires.
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// Serialization or deserialization error.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// I/O error (file operations).
    #[error("I/O error: {0}")]
    IoError(String),
}

/// A field failed validation.
///
/// The message shape is stable and relied upon by callers:
/// `In <context>: expected <field> to have type <expected>; found <found>.`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldShapeError {
    /// Label of the constructor that ran the check (e.g. `Shape.Circle`).
    pub context: String,
    /// The field being checked.
    pub field: String,
    /// Rendered field-type spec.
    pub expected: String,
    /// Rendered offending value.
    pub found: String,
}

impl fmt::Display for FieldShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "In {}: expected {} to have type {}; found {}.",
            self.context, self.field, self.expected, self.found
        )
    }
}

/// Context about where an error occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Type being decoded or constructed when the failure happened.
    pub source: Option<String>,
    /// Document path, outermost first (`["members", "[2]", "name"]`).
    pub path: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self {
            source: None,
            path: Vec::new(),
        }
    }

    /// Sets the source type.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Appends a path frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.path.push(frame.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "in {source}")?;
            if !self.path.is_empty() {
                write!(f, " ")?;
            }
        }
        if !self.path.is_empty() {
            write!(f, "at {}", self.path.join("."))?;
        }
        Ok(())
    }
}
