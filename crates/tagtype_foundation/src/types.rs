//! Field-type descriptors and the spec grammar.
//!
//! Every field of a generated type is declared with a short spec string:
//!
//! ```text
//! Spec    := Inner '?'?
//! Inner   := '[' Inner ']' | Keyword | '/' pattern '/' flags? | TypeName
//! Keyword := "String" | "Number" | "Boolean" | "Object" | "Any"
//! ```
//!
//! [`FieldType::parse`] turns a spec into a [`FieldType`] and `Display`
//! prints the canonical spec back.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::pattern::Pattern;
use crate::{Error, Result};

/// Name of the built-in ordered collection type.
pub const LOOKUP_TABLE: &str = "LookupTable";

/// Keywords in resolution priority order.
///
/// Detection is substring based, so a type name such as `StringList` resolves
/// to `String`. The order decides which keyword wins when several occur.
const KEYWORDS: [(&str, BaseType); 5] = [
    ("String", BaseType::String),
    ("Number", BaseType::Number),
    ("Boolean", BaseType::Boolean),
    ("Object", BaseType::Object),
    ("Any", BaseType::Any),
];

/// The base kind of a field, after array nesting is stripped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BaseType {
    /// Text, optionally constrained by a [`Pattern`].
    String,
    /// Any number.
    Number,
    /// `true` or `false`.
    Boolean,
    /// Any structured, non-sequence value.
    Object,
    /// Anything present.
    Any,
    /// A reference to another declared type.
    Tagged,
}

impl BaseType {
    /// The grammar keyword for this base type, if it has one.
    #[must_use]
    pub const fn keyword(self) -> Option<&'static str> {
        match self {
            Self::String => Some("String"),
            Self::Number => Some("Number"),
            Self::Boolean => Some("Boolean"),
            Self::Object => Some("Object"),
            Self::Any => Some("Any"),
            Self::Tagged => None,
        }
    }
}

/// Parsed descriptor of one field's declared type.
///
/// `regex` is only ever set when `base` is [`BaseType::String`], and
/// `tagged_type` is set exactly when `base` is [`BaseType::Tagged`]. The
/// constructors below keep both invariants.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldType {
    /// Base kind at the innermost nesting level.
    pub base: BaseType,
    /// Whether the field may be absent or null.
    pub optional: bool,
    /// Number of enclosing sequence levels.
    pub array_depth: usize,
    /// Regex constraint for string fields.
    pub regex: Option<Pattern>,
    /// Referenced type name for tagged fields.
    pub tagged_type: Option<Arc<str>>,
}

impl FieldType {
    const fn primitive(base: BaseType) -> Self {
        Self {
            base,
            optional: false,
            array_depth: 0,
            regex: None,
            tagged_type: None,
        }
    }

    /// A plain `String` field.
    #[must_use]
    pub const fn string() -> Self {
        Self::primitive(BaseType::String)
    }

    /// A `Number` field.
    #[must_use]
    pub const fn number() -> Self {
        Self::primitive(BaseType::Number)
    }

    /// A `Boolean` field.
    #[must_use]
    pub const fn boolean() -> Self {
        Self::primitive(BaseType::Boolean)
    }

    /// An `Object` field.
    #[must_use]
    pub const fn object() -> Self {
        Self::primitive(BaseType::Object)
    }

    /// An `Any` field.
    #[must_use]
    pub const fn any() -> Self {
        Self::primitive(BaseType::Any)
    }

    /// A string field constrained by `pattern`.
    #[must_use]
    pub fn pattern(pattern: Pattern) -> Self {
        Self {
            regex: Some(pattern),
            ..Self::string()
        }
    }

    /// A reference to the declared type `name`.
    #[must_use]
    pub fn tagged(name: impl Into<Arc<str>>) -> Self {
        Self {
            tagged_type: Some(name.into()),
            ..Self::primitive(BaseType::Tagged)
        }
    }

    /// Wraps this type in one more sequence level.
    #[must_use]
    pub fn array(mut self) -> Self {
        self.array_depth += 1;
        self
    }

    /// Marks this type optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// The type of one element, one sequence level down.
    ///
    /// Elements are never optional. Returns `self` unchanged (minus
    /// optionality) at depth zero.
    #[must_use]
    pub fn element(&self) -> Self {
        Self {
            optional: false,
            array_depth: self.array_depth.saturating_sub(1),
            ..self.clone()
        }
    }

    /// Returns true if the field holds a sequence.
    #[must_use]
    pub const fn is_array(&self) -> bool {
        self.array_depth > 0
    }

    /// Returns true if this names the built-in ordered collection.
    #[must_use]
    pub fn is_lookup_table(&self) -> bool {
        self.tagged_type.as_deref().is_some_and(|name| {
            name == LOOKUP_TABLE
                || name
                    .strip_prefix(LOOKUP_TABLE)
                    .is_some_and(|rest| rest.starts_with('<') && rest.ends_with('>'))
        })
    }

    /// The item type of a `LookupTable<Item>` field.
    #[must_use]
    pub fn table_item(&self) -> Option<&str> {
        if !self.is_lookup_table() {
            return None;
        }
        let name = self.tagged_type.as_deref()?;
        let inner = name.strip_prefix(LOOKUP_TABLE)?.strip_prefix('<')?.strip_suffix('>')?;
        let inner = inner.trim();
        (!inner.is_empty()).then_some(inner)
    }

    /// Parses a field-type spec.
    ///
    /// Strips one trailing `?`, then one matching bracket pair at a time,
    /// then classifies what is left: a regex literal, a keyword (substring
    /// match, priority ordered), or a type name.
    ///
    /// # Errors
    ///
    /// Returns a grammar error for an empty spec or base, stray brackets,
    /// whitespace inside a type name, or a regex that does not compile.
    pub fn parse(spec: &str) -> Result<Self> {
        let trimmed = spec.trim();
        let (rest, optional) = match trimmed.strip_suffix('?') {
            Some(rest) => (rest, true),
            None => (trimmed, false),
        };

        let mut inner = rest;
        let mut array_depth = 0;
        while encloses(inner) {
            inner = &inner[1..inner.len() - 1];
            array_depth += 1;
        }

        let mut ty = classify(spec, inner)?;
        ty.optional = optional;
        ty.array_depth = array_depth;
        Ok(ty)
    }
}

/// True if `s` is wrapped in one bracket pair that matches end to end.
///
/// A regex literal inside is opaque: once a `/` is reached the outer pair is
/// taken to match, since the pattern may contain brackets of its own.
fn encloses(s: &str) -> bool {
    if s.len() < 2 || !s.starts_with('[') || !s.ends_with(']') {
        return false;
    }
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return i == s.len() - 1;
                }
            }
            '/' => return true,
            _ => {}
        }
    }
    false
}

fn classify(spec: &str, token: &str) -> Result<FieldType> {
    if token.is_empty() {
        return Err(Error::grammar(spec, "missing base type"));
    }
    if let Some(pattern) = Pattern::parse_literal(token)? {
        return Ok(FieldType::pattern(pattern));
    }
    if token.contains(['[', ']']) {
        return Err(Error::grammar(spec, "unbalanced brackets"));
    }
    if let Some((_, base)) = KEYWORDS.iter().find(|(kw, _)| token.contains(kw)) {
        return Ok(FieldType::primitive(*base));
    }
    if token.contains(char::is_whitespace) || token.contains('?') {
        return Err(Error::grammar(spec, format!("invalid type name {token:?}")));
    }
    Ok(FieldType::tagged(token))
}

impl FromStr for FieldType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in 0..self.array_depth {
            f.write_str("[")?;
        }
        match (&self.regex, &self.tagged_type, self.base.keyword()) {
            (Some(pattern), _, _) => write!(f, "{pattern}")?,
            (None, Some(name), _) => f.write_str(name)?,
            (None, None, Some(keyword)) => f.write_str(keyword)?,
            (None, None, None) => f.write_str("?")?,
        }
        for _ in 0..self.array_depth {
            f.write_str("]")?;
        }
        if self.optional {
            f.write_str("?")?;
        }
        Ok(())
    }
}
