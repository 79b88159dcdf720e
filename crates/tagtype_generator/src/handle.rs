//! Generated constructors.
//!
//! A [`TypeHandle`] is what a hand-written module per type would otherwise
//! be: the strict positional constructor, the loose `from` adapter, the
//! identity check and the reverse definition. Sum types hand out one
//! [`VariantHandle`] per variant.

use std::sync::Arc;

use tracing::trace;

use tagtype_foundation::{
    BaseType, Error, ErrorKind, FieldShape, FieldType, Instance, LookupTable, LtMap, LtVec,
    Result, TypeKind, TypeShape, Value, VariantShape,
};
use tagtype_validate::validate_field;

use crate::TAG_KEY;
use crate::definition::TypeDefinition;
use crate::json::value_from_json;
use crate::registry::Registry;

/// Constructors and checks for one generated type.
#[derive(Clone, Debug)]
pub struct TypeHandle {
    registry: Registry,
    shape: Arc<TypeShape>,
}

impl TypeHandle {
    pub(crate) fn new(registry: Registry, shape: Arc<TypeShape>) -> Self {
        Self { registry, shape }
    }

    /// The type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.shape.name
    }

    /// Single- or multi-variant.
    #[must_use]
    pub fn kind(&self) -> TypeKind {
        self.shape.kind
    }

    /// Returns true for sum types.
    #[must_use]
    pub fn is_sum(&self) -> bool {
        self.shape.is_sum()
    }

    /// The compiled shape.
    #[must_use]
    pub fn shape(&self) -> &Arc<TypeShape> {
        &self.shape
    }

    /// The registry this type was compiled in.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    fn variant_at(&self, index: usize) -> VariantHandle {
        VariantHandle {
            ty: self.clone(),
            index,
        }
    }

    /// Returns the handle for a named variant.
    ///
    /// # Errors
    ///
    /// Returns `UnrecognizedVariant` if the type declares no such variant.
    pub fn variant(&self, name: &str) -> Result<VariantHandle> {
        if !self.is_sum() {
            return Err(Error::new(ErrorKind::NotSumType(self.name().to_string())));
        }
        self.shape
            .variant_index(name)
            .map(|index| self.variant_at(index))
            .ok_or_else(|| Error::unrecognized_variant(self.name(), Some(name.to_string())))
    }

    /// Variant handles in declaration order. A single-variant type yields one.
    pub fn variants(&self) -> impl Iterator<Item = VariantHandle> + '_ {
        (0..self.shape.variants.len()).map(|index| self.variant_at(index))
    }

    /// Strict positional constructor of a single-variant type.
    ///
    /// # Errors
    ///
    /// Returns `VariantRequired` for a sum type, an arity failure if
    /// `args.len()` differs from the number of declared fields, or the first
    /// field-shape failure in declaration order.
    pub fn construct(&self, args: Vec<Value>) -> Result<Instance> {
        if self.is_sum() {
            return Err(Error::new(ErrorKind::VariantRequired(self.name().to_string())));
        }
        self.variant_at(0).construct(args)
    }

    /// Loose adapter: builds a validated instance from a plain object.
    ///
    /// Sum types read the variant from the object's `@@tagName` key. Nested
    /// plain objects in tagged positions are adapted through their own type,
    /// and sequences in lookup-table positions become tables. An instance of
    /// this type is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns `UnrecognizedVariant` for a missing or unknown tag,
    /// `TypeMismatch` if the value is not an object, or the first
    /// field-shape failure.
    pub fn from_value(&self, value: &Value) -> Result<Instance> {
        match value {
            Value::Instance(instance) if self.is_instance(instance) => Ok(instance.clone()),
            _ if !self.is_sum() => self.variant_at(0).from_value(value),
            Value::Object(fields) => self.resolve_variant(fields.get(TAG_KEY))?.from_value(value),
            other => Err(mismatch(self.name(), other)),
        }
    }

    /// Picks the variant a discriminant names.
    ///
    /// Single-variant types ignore `tag`. Sum types require a string naming
    /// one of their variants.
    ///
    /// # Errors
    ///
    /// Returns `UnrecognizedVariant` for a missing, non-string or unknown tag.
    pub fn resolve_variant(&self, tag: Option<&Value>) -> Result<VariantHandle> {
        if !self.is_sum() {
            return Ok(self.variant_at(0));
        }
        match tag {
            Some(Value::String(tag)) => self.variant(tag),
            other => Err(Error::unrecognized_variant(
                self.name(),
                other.map(ToString::to_string),
            )),
        }
    }

    /// Loose adapter over a JSON value.
    ///
    /// # Errors
    ///
    /// As [`from_value`](Self::from_value).
    pub fn from_json(&self, json: &serde_json::Value) -> Result<Instance> {
        self.from_value(&value_from_json(json))
    }

    /// Identity check: true only for instances this type generated.
    ///
    /// Field contents are not looked at, so a plain object with the same
    /// fields is not an instance.
    #[must_use]
    pub fn is(&self, value: &Value) -> bool {
        value.as_instance().is_some_and(|i| self.is_instance(i))
    }

    /// Identity check on an instance.
    #[must_use]
    pub fn is_instance(&self, instance: &Instance) -> bool {
        instance.type_name() == self.name()
    }

    /// Returns a copy of `instance` with `changes` applied.
    ///
    /// A `Null` change clears an optional field. The result is validated
    /// like any other construction; `instance` itself is untouched.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if `instance` is of another type,
    /// `UnknownField` for an undeclared field, or a field-shape failure.
    pub fn update<I, K>(&self, instance: &Instance, changes: I) -> Result<Instance>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<Arc<str>>,
    {
        if !self.is_instance(instance) {
            return Err(Error::new(ErrorKind::TypeMismatch {
                expected: self.name().to_string(),
                actual: instance.type_name().to_string(),
            }));
        }
        let variant = self.variant_at(instance.variant());
        let mut fields = instance.field_map().clone();
        for (key, value) in changes {
            let key = key.into();
            if variant.shape().field(&key).is_none() {
                return Err(Error::new(ErrorKind::UnknownField {
                    type_name: variant.label(),
                    field: key.to_string(),
                }));
            }
            fields = fields.insert(key, value);
        }
        variant.from_object(&fields)
    }

    /// The definition this type was compiled from, with every field spec
    /// printed back through the grammar.
    #[must_use]
    pub fn definition(&self) -> TypeDefinition {
        let specs = |v: &VariantShape| {
            v.fields
                .iter()
                .map(|f| (f.name.to_string(), f.ty.to_string()))
                .collect::<Vec<_>>()
        };
        match self.shape.kind {
            TypeKind::Tagged => TypeDefinition::tagged(self.name(), specs(&self.shape.variants[0])),
            TypeKind::TaggedSum => self
                .shape
                .variants
                .iter()
                .fold(TypeDefinition::tagged_sum(self.name()), |def, v| {
                    def.with_variant(&*v.name, specs(v))
                }),
        }
    }
}

/// Constructors and checks for one variant.
///
/// For a single-variant type the one variant carries the type's name and
/// label.
#[derive(Clone, Debug)]
pub struct VariantHandle {
    ty: TypeHandle,
    index: usize,
}

impl VariantHandle {
    /// The variant name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.shape().name
    }

    /// `Type` or `Type.Variant`, as used in failure messages.
    #[must_use]
    pub fn label(&self) -> String {
        self.ty.shape.label(self.index)
    }

    /// The owning type.
    #[must_use]
    pub fn type_handle(&self) -> &TypeHandle {
        &self.ty
    }

    /// Position in the type's declaration order.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The compiled variant.
    #[must_use]
    pub fn shape(&self) -> &VariantShape {
        &self.ty.shape.variants[self.index]
    }

    /// Declared fields in positional order.
    #[must_use]
    pub fn fields(&self) -> &[FieldShape] {
        &self.shape().fields
    }

    /// Strict positional constructor.
    ///
    /// # Errors
    ///
    /// Returns an arity failure if `args.len()` differs from the number of
    /// declared fields, or the first field-shape failure in declaration
    /// order.
    pub fn construct(&self, args: Vec<Value>) -> Result<Instance> {
        let arity = self.fields().len();
        if args.len() != arity {
            let err = Error::arity(self.label(), arity, args.len());
            trace!(type_name = %self.label(), error = %err, "construction rejected");
            return Err(err);
        }
        self.assemble(self.fields().iter().zip(args.into_iter().map(Some)))
    }

    /// Loose adapter: builds this variant from a plain object.
    ///
    /// Keys the variant does not declare are ignored.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if the value is not an object, or the first
    /// field-shape failure.
    pub fn from_value(&self, value: &Value) -> Result<Instance> {
        match value {
            Value::Instance(instance) if self.is_instance(instance) => Ok(instance.clone()),
            Value::Instance(instance) => self.from_object(instance.field_map()),
            Value::Object(fields) => self.from_object(fields),
            other => Err(mismatch(&self.label(), other)),
        }
    }

    /// Loose adapter over a JSON value.
    ///
    /// # Errors
    ///
    /// As [`from_value`](Self::from_value).
    pub fn from_json(&self, json: &serde_json::Value) -> Result<Instance> {
        self.from_value(&value_from_json(json))
    }

    /// Identity check: true only for instances of exactly this variant.
    #[must_use]
    pub fn is(&self, value: &Value) -> bool {
        value.as_instance().is_some_and(|i| self.is_instance(i))
    }

    fn is_instance(&self, instance: &Instance) -> bool {
        self.ty.is_instance(instance) && instance.variant_shape().name == self.shape().name
    }

    pub(crate) fn from_object(&self, object: &LtMap<Arc<str>, Value>) -> Result<Instance> {
        let registry = &self.ty.registry;
        let mut values = Vec::with_capacity(self.fields().len());
        for field in self.fields() {
            let value = match object.get(&*field.name) {
                Some(raw) => Some(
                    coerce(registry, &field.ty, raw)
                        .map_err(|e| e.in_frame(&*field.name))
                        .inspect_err(|e| {
                            trace!(type_name = %self.label(), error = %e, "adapter rejected");
                        })?,
                ),
                None => None,
            };
            values.push(value);
        }
        self.assemble(self.fields().iter().zip(values))
    }

    /// Validates in declaration order, then stores every present field.
    fn assemble<'a>(
        &self,
        values: impl Iterator<Item = (&'a FieldShape, Option<Value>)>,
    ) -> Result<Instance> {
        let label = self.label();
        let config = &self.ty.registry.config().validation;
        let id_field = &*self.ty.registry.config().id_field;
        let mut fields = LtMap::new();
        for (field, value) in values {
            validate_field(&label, &field.name, &field.ty, value.as_ref(), config)
                .and_then(|()| match value.as_ref() {
                    Some(v) => check_id_fields(v, id_field).map_err(|e| {
                        e.in_frame(&*field.name).with_source(label.as_str())
                    }),
                    None => Ok(()),
                })
                .inspect_err(|e| trace!(type_name = %label, error = %e, "construction rejected"))?;
            if let Some(value) = value.filter(|v| !v.is_null()) {
                fields = fields.insert(field.name.clone(), value);
            }
        }
        Instance::from_validated_parts(self.ty.shape.clone(), self.index, fields)
    }
}

/// Tables must use the registry's id field so decoding can rebuild them.
fn check_id_fields(value: &Value, id_field: &str) -> Result<()> {
    match value {
        Value::Table(table) if table.id_field() != id_field => {
            Err(Error::new(ErrorKind::IdFieldMismatch {
                expected: id_field.to_string(),
                actual: table.id_field().to_string(),
            }))
        }
        Value::Array(items) => items.iter().enumerate().try_for_each(|(i, v)| {
            check_id_fields(v, id_field).map_err(|e| e.in_frame(format!("[{i}]")))
        }),
        _ => Ok(()),
    }
}

fn mismatch(expected: &str, value: &Value) -> Error {
    Error::new(ErrorKind::TypeMismatch {
        expected: expected.to_string(),
        actual: match value {
            Value::Instance(i) => i.label(),
            other => other.kind_name().to_string(),
        },
    })
}

/// Adapts loosely shaped values to a field type before validation.
///
/// Plain objects in tagged positions go through the referenced type's
/// adapter, and sequences in lookup-table positions become tables keyed by
/// the registry's id field. Everything else is left for the validator.
fn coerce(registry: &Registry, ty: &FieldType, value: &Value) -> Result<Value> {
    if ty.is_array() {
        let Value::Array(items) = value else {
            return Ok(value.clone());
        };
        let element = ty.element();
        return items
            .iter()
            .enumerate()
            .map(|(i, v)| coerce(registry, &element, v).map_err(|e| e.in_frame(format!("[{i}]"))))
            .collect::<Result<LtVec<_>>>()
            .map(Value::Array);
    }
    if ty.is_lookup_table() {
        let Value::Array(items) = value else {
            return Ok(value.clone());
        };
        let item_type = ty.table_item().map(FieldType::tagged);
        let items = items
            .iter()
            .enumerate()
            .map(|(i, v)| match &item_type {
                Some(item_type) => {
                    coerce(registry, item_type, v).map_err(|e| e.in_frame(format!("[{i}]")))
                }
                None => Ok(v.clone()),
            })
            .collect::<Result<Vec<_>>>()?;
        return LookupTable::from_items(registry.config().id_field.clone(), items).map(Value::Table);
    }
    match (value, ty.base, ty.tagged_type.as_deref()) {
        (Value::Object(_), BaseType::Tagged, Some(name)) => {
            registry.get(name)?.from_value(value).map(Value::Instance)
        }
        _ => Ok(value.clone()),
    }
}
