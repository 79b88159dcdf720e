//! The compile pass from definitions to type handles.
//!
//! Every field spec is parsed exactly once, in [`RegistryBuilder::build`].
//! Everything a constructor needs afterwards is a [`TypeShape`] shared by
//! `Arc`, so handles are cheap to clone and send between threads.

use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, warn};

use tagtype_foundation::{
    Error, ErrorContext, FieldShape, FieldType, LOOKUP_TABLE, Result, TypeShape, VariantShape,
};

use crate::RESERVED_FIELDS;
use crate::config::GeneratorConfig;
use crate::definition::{FieldSpecs, TypeDefinition};
use crate::handle::TypeHandle;

const KEYWORDS: [&str; 5] = ["String", "Number", "Boolean", "Object", "Any"];

/// Collects definitions and compiles them into a [`Registry`].
#[derive(Clone, Debug, Default)]
pub struct RegistryBuilder {
    definitions: Vec<TypeDefinition>,
    config: GeneratorConfig,
}

impl RegistryBuilder {
    /// Creates an empty builder with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the configuration.
    #[must_use]
    pub fn with_config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    /// Adds a definition.
    #[must_use]
    pub fn define(mut self, definition: TypeDefinition) -> Self {
        self.definitions.push(definition);
        self
    }

    /// Adds a definition given as JSON.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDefinition` if the JSON is not a definition.
    pub fn define_json(self, json: &str) -> Result<Self> {
        Ok(self.define(TypeDefinition::from_json(json)?))
    }

    /// Compiles every definition.
    ///
    /// # Errors
    ///
    /// - `InvalidDefinition` for an empty or repeated type name, a reserved
    ///   name, or a sum type without variants.
    /// - `Grammar` for a field spec that does not parse.
    /// - `UnknownType` for a reference to a type not defined here.
    pub fn build(self) -> Result<Registry> {
        let mut types = IndexMap::with_capacity(self.definitions.len());

        for definition in &self.definitions {
            let shape = compile(definition)?;
            let name = shape.name.clone();
            if types.insert(name.clone(), Arc::new(shape)).is_some() {
                return Err(Error::invalid_definition(format!(
                    "type {name} is defined more than once"
                )));
            }
        }

        check_references(&types)?;

        debug!(types = types.len(), "compiled type registry");
        Ok(Registry {
            inner: Arc::new(RegistryInner {
                types,
                config: self.config,
            }),
        })
    }
}

fn compile(definition: &TypeDefinition) -> Result<TypeShape> {
    let name = definition.name();
    check_name(name, "type")?;
    if name == LOOKUP_TABLE {
        return Err(Error::invalid_definition(format!(
            "{LOOKUP_TABLE} is a built-in type"
        )));
    }
    if let Some(keyword) = KEYWORDS.iter().find(|kw| name.contains(**kw)) {
        warn!(
            type_name = name,
            keyword = *keyword,
            "type name contains a keyword; references to it resolve to the keyword"
        );
    }

    match definition {
        TypeDefinition::Tagged { fields, .. } => {
            Ok(TypeShape::tagged(name, compile_fields(name, fields)?))
        }
        TypeDefinition::TaggedSum { variants, .. } => {
            if variants.is_empty() {
                return Err(Error::invalid_definition(format!(
                    "sum type {name} declares no variants"
                )));
            }
            let variants = variants
                .iter()
                .map(|(variant, fields)| {
                    check_name(variant, "variant")?;
                    let label = format!("{name}.{variant}");
                    Ok(VariantShape::new(variant.as_str(), compile_fields(&label, fields)?))
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(TypeShape::tagged_sum(name, variants))
        }
    }
}

fn compile_fields(label: &str, fields: &FieldSpecs) -> Result<Vec<FieldShape>> {
    fields
        .iter()
        .map(|(field, spec)| {
            if field.is_empty() {
                return Err(Error::invalid_definition(format!("{label} has an empty field name")));
            }
            if RESERVED_FIELDS.contains(&field.as_str()) {
                return Err(Error::invalid_definition(format!(
                    "{label} declares reserved field name {field:?}"
                )));
            }
            let ty = FieldType::parse(spec).map_err(|e| {
                e.with_context(ErrorContext::new().with_source(label).with_frame(field.as_str()))
            })?;
            Ok(FieldShape::new(field.as_str(), ty))
        })
        .collect()
}

fn check_name(name: &str, what: &str) -> Result<()> {
    if name.is_empty() || name.contains(|c: char| c.is_whitespace() || "[]?/.<>".contains(c)) {
        return Err(Error::invalid_definition(format!("invalid {what} name {name:?}")));
    }
    Ok(())
}

fn check_references(types: &IndexMap<Arc<str>, Arc<TypeShape>>) -> Result<()> {
    let known: HashSet<&str> = types.keys().map(|k| &**k).collect();
    for shape in types.values() {
        for variant in &shape.variants {
            for field in &variant.fields {
                let referenced = if field.ty.is_lookup_table() {
                    field.ty.table_item()
                } else {
                    field.ty.tagged_type.as_deref()
                };
                let Some(target) = referenced else {
                    continue;
                };
                if !known.contains(target) {
                    let label = shape.label(shape.variant_index(&variant.name).unwrap_or(0));
                    return Err(Error::unknown_type(target).with_context(
                        ErrorContext::new().with_source(label).with_frame(&*field.name),
                    ));
                }
            }
        }
    }
    Ok(())
}

#[derive(Debug)]
struct RegistryInner {
    types: IndexMap<Arc<str>, Arc<TypeShape>>,
    config: GeneratorConfig,
}

/// A compiled set of types.
///
/// Cloning is O(1). Handles keep the registry alive, so referenced types can
/// always be resolved while an instance is being built or decoded.
#[derive(Clone, Debug)]
pub struct Registry {
    inner: Arc<RegistryInner>,
}

impl Registry {
    /// Starts a new [`RegistryBuilder`].
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Returns the handle for a type.
    ///
    /// # Errors
    ///
    /// Returns `UnknownType` if no such type was defined.
    pub fn get(&self, name: &str) -> Result<TypeHandle> {
        self.inner
            .types
            .get(name)
            .map(|shape| TypeHandle::new(self.clone(), shape.clone()))
            .ok_or_else(|| Error::unknown_type(name))
    }

    /// Returns true if the type is defined.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.inner.types.contains_key(name)
    }

    /// Type names in definition order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.inner.types.keys().map(|k| &**k)
    }

    /// Handles for every type, in definition order.
    pub fn handles(&self) -> impl Iterator<Item = TypeHandle> + '_ {
        self.inner
            .types
            .values()
            .map(|shape| TypeHandle::new(self.clone(), shape.clone()))
    }

    /// Number of defined types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.types.len()
    }

    /// Returns true if no type is defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.types.is_empty()
    }

    /// The registry's configuration.
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.inner.config
    }
}
