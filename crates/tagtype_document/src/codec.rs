//! Instance ⇄ document encoding.
//!
//! Encoding is driven by each field's declared type. Decoding reads the
//! document back through the same types, then hands the fields to the
//! type's loose adapter so every decoded instance is re-validated.
//!
//! Values in `Object`/`Any` positions carry no declared type, so they are
//! self-describing on the wire: instances gain `@@typeName`, patterns become
//! `{ "@@regex": "/source/flags" }` and timestamps become
//! `{ "@@timestamp": ... }` with the payload shaped by the policy. Strings and
//! plain objects are never reinterpreted on the way back.

use serde_json::{Number, Value as Json};
use tracing::trace;

use tagtype_foundation::{
    BaseType, Error, ErrorKind, FieldType, Instance, LtVec, Pattern, Result, Value,
};
use tagtype_generator::{Registry, TAG_KEY, TYPE_KEY, TypeHandle};

use crate::policy::TimestampPolicy;
use crate::table::{decode_table, encode_table};
use crate::{Document, PATTERN_KEY, TIMESTAMP_KEY};

/// Document encode/decode for a generated type.
pub trait DocumentCodec {
    /// Encodes an instance of this type.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` for an instance of another type, or
    /// `SerializationError` for a value the wire format cannot carry.
    fn encode(&self, instance: &Instance, policy: TimestampPolicy) -> Result<Document>;

    /// Decodes and re-validates an instance of this type.
    ///
    /// # Errors
    ///
    /// Returns `UnrecognizedVariant` for a sum document without a known
    /// `@@tagName`, `MalformedDocument` for a field of the wrong wire shape,
    /// or any failure of the loose adapter. The error context names the type
    /// and the path to the offending field.
    fn decode(&self, doc: &Document, policy: TimestampPolicy) -> Result<Instance>;
}

impl DocumentCodec for TypeHandle {
    fn encode(&self, instance: &Instance, policy: TimestampPolicy) -> Result<Document> {
        if !self.is_instance(instance) {
            return Err(Error::new(ErrorKind::TypeMismatch {
                expected: self.name().to_string(),
                actual: instance.type_name().to_string(),
            }));
        }
        encode_instance(instance, policy)
    }

    fn decode(&self, doc: &Document, policy: TimestampPolicy) -> Result<Instance> {
        Decoder::new(self.registry(), policy)
            .instance(self, doc)
            .map_err(|e| e.with_source(self.name()))
            .inspect_err(|e| trace!(type_name = self.name(), error = %e, "decode rejected"))
    }
}

/// Encodes any instance; the instance's own shape drives the encoding.
///
/// # Errors
///
/// Returns `SerializationError` for a non-finite number or a lookup table in
/// an untyped position.
pub fn encode_instance(instance: &Instance, policy: TimestampPolicy) -> Result<Document> {
    Encoder { policy }.instance(instance)
}

/// Decodes a document that names its own type under `@@typeName`.
///
/// # Errors
///
/// Returns `MalformedDocument` without `@@typeName`, `UnknownType` for a type
/// the registry does not define, or any failure of
/// [`DocumentCodec::decode`].
pub fn decode_any(registry: &Registry, doc: &Document, policy: TimestampPolicy) -> Result<Instance> {
    let Some(name) = doc.get(TYPE_KEY).and_then(Json::as_str) else {
        return Err(Error::malformed(format!("document has no {TYPE_KEY}")));
    };
    registry.get(name)?.decode(doc, policy)
}

struct Encoder {
    policy: TimestampPolicy,
}

impl Encoder {
    fn instance(&self, instance: &Instance) -> Result<Document> {
        let mut doc = Document::new();
        if let Some(tag) = instance.tag_name() {
            doc.insert(TAG_KEY.to_string(), Json::from(tag));
        }
        for field in &instance.variant_shape().fields {
            let Some(value) = instance.get(&field.name) else {
                continue;
            };
            let encoded = self
                .field(&field.ty, value)
                .map_err(|e| e.in_frame(&*field.name))?;
            doc.insert(field.name.to_string(), encoded);
        }
        Ok(doc)
    }

    fn field(&self, ty: &FieldType, value: &Value) -> Result<Json> {
        match value {
            Value::Array(items) if ty.is_array() => {
                let element = ty.element();
                items
                    .iter()
                    .enumerate()
                    .map(|(i, v)| self.field(&element, v).map_err(|e| e.in_frame(format!("[{i}]"))))
                    .collect::<Result<Vec<_>>>()
                    .map(Json::Array)
            }
            Value::Table(table) if ty.is_lookup_table() => {
                let item_type = ty.table_item().map(FieldType::tagged);
                encode_table(table, |item| match &item_type {
                    Some(item_type) => self.field(item_type, item),
                    None => self.untyped(item),
                })
                .map(Json::Object)
            }
            Value::Instance(instance) if ty.base == BaseType::Tagged => {
                self.instance(instance).map(Json::Object)
            }
            other => self.untyped(other),
        }
    }

    fn untyped(&self, value: &Value) -> Result<Json> {
        Ok(match value {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Number(n) => number(*n)?,
            Value::String(s) => Json::from(&**s),
            Value::Timestamp(t) => marked(TIMESTAMP_KEY, self.policy.encode(t)),
            Value::Pattern(p) => marked(PATTERN_KEY, Json::from(p.to_string())),
            Value::Array(items) => Json::Array(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, v)| self.untyped(v).map_err(|e| e.in_frame(format!("[{i}]"))))
                    .collect::<Result<_>>()?,
            ),
            Value::Object(map) => Json::Object(
                map.iter()
                    .map(|(k, v)| Ok((k.to_string(), self.untyped(v).map_err(|e| e.in_frame(&**k))?)))
                    .collect::<Result<_>>()?,
            ),
            Value::Instance(instance) => {
                let mut doc = Document::new();
                doc.insert(TYPE_KEY.to_string(), Json::from(instance.type_name()));
                doc.extend(self.instance(instance)?);
                Json::Object(doc)
            }
            Value::Table(_) => {
                return Err(Error::new(ErrorKind::SerializationError(
                    "a lookup table can only be encoded in a LookupTable field".to_string(),
                )));
            }
        })
    }
}

fn marked(key: &str, payload: Json) -> Json {
    let mut doc = Document::new();
    doc.insert(key.to_string(), payload);
    Json::Object(doc)
}

/// Integral values are written as integers. Negative zero stays a float.
#[allow(clippy::cast_possible_truncation)]
fn number(n: f64) -> Result<Json> {
    const EXACT: f64 = 9_007_199_254_740_992.0;
    if !n.is_finite() {
        return Err(Error::new(ErrorKind::SerializationError(format!(
            "{n} cannot be stored in a document"
        ))));
    }
    if n.fract() == 0.0 && n.abs() <= EXACT && !(n == 0.0 && n.is_sign_negative()) {
        return Ok(Json::from(n as i64));
    }
    Ok(Number::from_f64(n).map_or(Json::Null, Json::Number))
}

struct Decoder<'r> {
    registry: &'r Registry,
    policy: TimestampPolicy,
}

impl<'r> Decoder<'r> {
    fn new(registry: &'r Registry, policy: TimestampPolicy) -> Self {
        Self { registry, policy }
    }

    fn instance(&self, handle: &TypeHandle, doc: &Document) -> Result<Instance> {
        let tag = doc.get(TAG_KEY).map(|t| self.untyped(t)).transpose()?;
        let variant = handle.resolve_variant(tag.as_ref())?;

        let mut fields = Vec::with_capacity(variant.fields().len());
        for field in variant.fields() {
            let Some(json) = doc.get(&*field.name) else {
                continue;
            };
            let value = self
                .field(&field.ty, json)
                .map_err(|e| e.in_frame(&*field.name))?;
            fields.push((field.name.clone(), value));
        }
        variant.from_value(&Value::object(fields))
    }

    fn field(&self, ty: &FieldType, json: &Json) -> Result<Value> {
        if json.is_null() {
            return Ok(Value::Null);
        }
        if ty.is_array() {
            let Json::Array(items) = json else {
                return Err(Error::malformed(format!("expected an array for {ty}")));
            };
            let element = ty.element();
            return items
                .iter()
                .enumerate()
                .map(|(i, v)| self.field(&element, v).map_err(|e| e.in_frame(format!("[{i}]"))))
                .collect::<Result<LtVec<_>>>()
                .map(Value::Array);
        }
        if ty.is_lookup_table() {
            let Json::Object(doc) = json else {
                return Err(Error::malformed(format!("expected a document for {ty}")));
            };
            let item_type = ty.table_item().map(|name| self.registry.get(name)).transpose()?;
            let id_field = self.registry.config().id_field.clone();
            return decode_table(doc, id_field, |item| match &item_type {
                Some(handle) => self.instance(handle, item).map(Value::Instance),
                None => self.untyped_document(item),
            })
            .map(Value::Table);
        }
        match (ty.base, ty.tagged_type.as_deref(), json) {
            (BaseType::Tagged, Some(name), Json::Object(doc)) => {
                let handle = self.registry.get(name)?;
                self.instance(&handle, doc).map(Value::Instance)
            }
            (BaseType::Tagged, Some(name), _) => {
                Err(Error::malformed(format!("expected a {name} document")))
            }
            _ => self.untyped(json),
        }
    }

    fn untyped(&self, json: &Json) -> Result<Value> {
        Ok(match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => n.as_f64().map_or(Value::Null, Value::Number),
            Json::String(s) => Value::from(s.as_str()),
            Json::Array(items) => Value::Array(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, v)| self.untyped(v).map_err(|e| e.in_frame(format!("[{i}]"))))
                    .collect::<Result<_>>()?,
            ),
            Json::Object(doc) => self.untyped_document(doc)?,
        })
    }

    fn untyped_document(&self, doc: &Document) -> Result<Value> {
        if let Some(name) = doc.get(TYPE_KEY).and_then(Json::as_str) {
            let handle = self.registry.get(name)?;
            return self.instance(&handle, doc).map(Value::Instance);
        }
        if doc.len() == 1 {
            if let Some(literal) = doc.get(PATTERN_KEY).and_then(Json::as_str) {
                return match Pattern::parse_literal(literal)? {
                    Some(pattern) => Ok(Value::Pattern(pattern)),
                    None => Err(Error::malformed(format!("{literal:?} is not a regex literal"))),
                };
            }
            if let Some(payload) = doc.get(TIMESTAMP_KEY) {
                return match self.policy.decode(payload) {
                    Some(t) => Ok(Value::Timestamp(t)),
                    None => Err(Error::malformed(format!(
                        "{payload} is not a {policy:?} timestamp",
                        policy = self.policy
                    ))),
                };
            }
        }
        doc.iter()
            .map(|(k, v)| Ok((k.as_str(), self.untyped(v).map_err(|e| e.in_frame(k))?)))
            .collect::<Result<Vec<_>>>()
            .map(Value::object)
    }
}
