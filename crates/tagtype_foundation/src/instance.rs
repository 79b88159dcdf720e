//! Compiled type shapes and the instances generated constructors produce.
//!
//! The discriminant of an instance lives in its [`TypeShape`] and variant
//! index, never among its data fields, so enumerating or encoding the fields
//! of an instance cannot leak it.

use std::fmt;
use std::sync::Arc;

use crate::collections::LtMap;
use crate::Result;
use crate::error::{Error, ErrorKind};
use crate::types::FieldType;
use crate::value::Value;

/// Whether a type has one variant or several.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// A single-variant record type.
    Tagged,
    /// A closed set of named variants.
    TaggedSum,
}

impl TypeKind {
    /// The `kind` string used in type-definition documents.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tagged => "tagged",
            Self::TaggedSum => "taggedSum",
        }
    }
}

/// A compiled field: name plus parsed type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldShape {
    /// Field name.
    pub name: Arc<str>,
    /// Parsed field type.
    pub ty: FieldType,
}

impl FieldShape {
    /// Creates a field shape.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A compiled variant: name plus fields in declaration order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariantShape {
    /// Variant name. For single-variant types this is the type name.
    pub name: Arc<str>,
    /// Fields in declaration order.
    pub fields: Vec<FieldShape>,
}

impl VariantShape {
    /// Creates a variant shape.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>, fields: Vec<FieldShape>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Returns the field with the given name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldShape> {
        self.fields.iter().find(|f| &*f.name == name)
    }

    /// Number of declared fields (the strict constructor's arity).
    #[must_use]
    pub fn arity(&self) -> usize {
        self.fields.len()
    }
}

/// A compiled type: everything a constructor needs to validate and tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeShape {
    /// Type name.
    pub name: Arc<str>,
    /// Single- or multi-variant.
    pub kind: TypeKind,
    /// Variants in declaration order. Exactly one for [`TypeKind::Tagged`].
    pub variants: Vec<VariantShape>,
}

impl TypeShape {
    /// Creates a single-variant shape.
    #[must_use]
    pub fn tagged(name: impl Into<Arc<str>>, fields: Vec<FieldShape>) -> Self {
        let name = name.into();
        Self {
            variants: vec![VariantShape::new(name.clone(), fields)],
            name,
            kind: TypeKind::Tagged,
        }
    }

    /// Creates a multi-variant shape.
    #[must_use]
    pub fn tagged_sum(name: impl Into<Arc<str>>, variants: Vec<VariantShape>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::TaggedSum,
            variants,
        }
    }

    /// Returns true for sum types.
    #[must_use]
    pub fn is_sum(&self) -> bool {
        self.kind == TypeKind::TaggedSum
    }

    /// Index of the named variant.
    #[must_use]
    pub fn variant_index(&self, name: &str) -> Option<usize> {
        self.variants.iter().position(|v| &*v.name == name)
    }

    /// Label used in validation messages: `Type` or `Type.Variant`.
    #[must_use]
    pub fn label(&self, variant: usize) -> String {
        match (self.kind, self.variants.get(variant)) {
            (TypeKind::TaggedSum, Some(v)) => format!("{}.{}", self.name, v.name),
            _ => self.name.to_string(),
        }
    }
}

/// Identifies where an instance came from.
///
/// Two instances have the same discriminant exactly when they were produced
/// by the same generated constructor (or adapter). Field contents play no
/// part, so the check survives serialization.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Discriminant {
    /// The generated type.
    pub type_name: Arc<str>,
    /// The variant, for sum types.
    pub tag_name: Option<Arc<str>>,
}

impl fmt::Display for Discriminant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.tag_name {
            Some(tag) => write!(f, "{}.{tag}", self.type_name),
            None => write!(f, "{}", self.type_name),
        }
    }
}

/// A value produced by a generated constructor.
///
/// Instances are immutable. Absent optional fields are not stored at all, so
/// "omitted" and "explicitly null" look the same from outside.
#[derive(Clone)]
pub struct Instance {
    shape: Arc<TypeShape>,
    variant: usize,
    fields: LtMap<Arc<str>, Value>,
}

impl Instance {
    /// Assembles an instance from fields that have already passed validation.
    ///
    /// Only the variant index is checked. The generator is the only intended
    /// caller; everything else should construct through a type handle.
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfBounds` if `variant` is not one of the shape's
    /// variants.
    pub fn from_validated_parts(
        shape: Arc<TypeShape>,
        variant: usize,
        fields: LtMap<Arc<str>, Value>,
    ) -> Result<Self> {
        if variant >= shape.variants.len() {
            return Err(Error::new(ErrorKind::IndexOutOfBounds {
                index: variant,
                length: shape.variants.len(),
            }));
        }
        Ok(Self {
            shape,
            variant,
            fields,
        })
    }

    /// The compiled shape of this instance's type.
    #[must_use]
    pub fn shape(&self) -> &Arc<TypeShape> {
        &self.shape
    }

    /// The generated type's name.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.shape.name
    }

    /// The variant name, for sum-type instances.
    #[must_use]
    pub fn tag_name(&self) -> Option<&str> {
        if self.shape.is_sum() {
            Some(&self.variant_shape().name)
        } else {
            None
        }
    }

    /// The instance's discriminant.
    #[must_use]
    pub fn discriminant(&self) -> Discriminant {
        Discriminant {
            type_name: self.shape.name.clone(),
            tag_name: self.tag_name().map(Arc::from),
        }
    }

    /// Index of the variant within the type's declaration order.
    #[must_use]
    pub fn variant(&self) -> usize {
        self.variant
    }

    /// The shape of this instance's variant.
    #[must_use]
    pub fn variant_shape(&self) -> &VariantShape {
        &self.shape.variants[self.variant]
    }

    /// `Type` or `Type.Variant`.
    #[must_use]
    pub fn label(&self) -> String {
        self.shape.label(self.variant)
    }

    /// Reads a field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Returns true if the field is present.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Present fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.variant_shape()
            .fields
            .iter()
            .filter_map(|f| self.fields.get(&*f.name).map(|v| (&*f.name, v)))
    }

    /// Names of present fields in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields().map(|(k, _)| k)
    }

    /// Number of present fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no field is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The raw field map.
    #[must_use]
    pub fn field_map(&self) -> &LtMap<Arc<str>, Value> {
        &self.fields
    }

    /// The fields as a plain object, suitable for the loose adapter.
    #[must_use]
    pub fn to_object(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.shape.name == other.shape.name
            && self.tag_name() == other.tag_name()
            && self.fields == other.fields
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.label())?;
        for (i, (name, value)) in self.fields().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        write!(f, ")")
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self.label();
        let mut s = f.debug_struct(&label);
        for (name, value) in self.fields() {
            s.field(name, value);
        }
        s.finish()
    }
}
