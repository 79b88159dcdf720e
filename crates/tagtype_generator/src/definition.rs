//! Type-definition documents.
//!
//! A definition is plain data: a type name plus field specs (or, for a sum,
//! variants of field specs). Declaration order is significant, since it is
//! the positional order of the strict constructors, so maps are [`IndexMap`]s.
//!
//! ```json
//! { "name": "Point", "kind": "tagged", "fields": { "x": "Number", "y": "Number" } }
//! { "name": "Shape", "kind": "taggedSum",
//!   "variants": { "Circle": { "radius": "Number" }, "Square": { "side": "Number" } } }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tagtype_foundation::{Error, ErrorKind, Result, TypeKind};

/// Field name → field-type spec, in declaration order.
pub type FieldSpecs = IndexMap<String, String>;

/// A type definition as written by hand or loaded from JSON.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TypeDefinition {
    /// A single-variant record type.
    #[serde(rename = "tagged")]
    Tagged {
        /// Type name.
        name: String,
        /// Fields in declaration order.
        fields: FieldSpecs,
    },
    /// A closed set of named variants.
    #[serde(rename = "taggedSum")]
    TaggedSum {
        /// Type name.
        name: String,
        /// Variants in declaration order.
        variants: IndexMap<String, FieldSpecs>,
    },
}

fn specs<F, S>(fields: impl IntoIterator<Item = (F, S)>) -> FieldSpecs
where
    F: Into<String>,
    S: Into<String>,
{
    fields
        .into_iter()
        .map(|(f, s)| (f.into(), s.into()))
        .collect()
}

impl TypeDefinition {
    /// Defines a single-variant type.
    #[must_use]
    pub fn tagged<F, S>(name: impl Into<String>, fields: impl IntoIterator<Item = (F, S)>) -> Self
    where
        F: Into<String>,
        S: Into<String>,
    {
        Self::Tagged {
            name: name.into(),
            fields: specs(fields),
        }
    }

    /// Defines a sum type with no variants yet; add them with
    /// [`with_variant`](Self::with_variant).
    #[must_use]
    pub fn tagged_sum(name: impl Into<String>) -> Self {
        Self::TaggedSum {
            name: name.into(),
            variants: IndexMap::new(),
        }
    }

    /// Builder method to append a variant to a sum type.
    ///
    /// Has no effect on a single-variant definition.
    #[must_use]
    pub fn with_variant<F, S>(
        mut self,
        variant: impl Into<String>,
        fields: impl IntoIterator<Item = (F, S)>,
    ) -> Self
    where
        F: Into<String>,
        S: Into<String>,
    {
        if let Self::TaggedSum { variants, .. } = &mut self {
            variants.insert(variant.into(), specs(fields));
        }
        self
    }

    /// The type name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Tagged { name, .. } | Self::TaggedSum { name, .. } => name,
        }
    }

    /// Single- or multi-variant.
    #[must_use]
    pub const fn kind(&self) -> TypeKind {
        match self {
            Self::Tagged { .. } => TypeKind::Tagged,
            Self::TaggedSum { .. } => TypeKind::TaggedSum,
        }
    }

    /// Parses a definition from JSON.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDefinition` if the JSON does not describe a definition.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::invalid_definition(e.to_string()))
    }

    /// Renders the definition as JSON.
    ///
    /// # Errors
    ///
    /// Returns `SerializationError` if encoding fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| Error::new(ErrorKind::SerializationError(e.to_string())))
    }
}
