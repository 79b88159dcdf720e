//! Shape checks shared by the validators.
//!
//! [`conforms`] answers whether a present value has the shape a field type
//! describes; the crate-private helpers turn a mismatch into the standard
//! field-shape failure.

use std::fmt;

use tagtype_foundation::{BaseType, Error, FieldType, LookupTable, Value};

use crate::config::ArrayScan;

/// Renders a possibly-absent value the way failure messages show it.
#[must_use]
pub fn render_found(value: Option<&Value>) -> String {
    value.map_or_else(|| "undefined".to_string(), ToString::to_string)
}

/// Returns true if `value` has the shape `ty` describes.
///
/// Optionality is ignored: the value is assumed present. Sequences are
/// descended exactly `ty.array_depth` levels, an empty sequence is accepted
/// as is, and `scan` decides whether every element or only the first is
/// looked at.
#[must_use]
pub fn conforms(ty: &FieldType, value: &Value, scan: ArrayScan) -> bool {
    if ty.is_array() {
        let Value::Array(items) = value else {
            return false;
        };
        let element = ty.element();
        return match scan {
            ArrayScan::FirstSample => items.first().is_none_or(|v| conforms(&element, v, scan)),
            ArrayScan::FullScan => items.iter().all(|v| conforms(&element, v, scan)),
        };
    }
    if ty.is_lookup_table() {
        return match value {
            Value::Table(table) => table_items_conform(table, ty.table_item(), scan),
            _ => false,
        };
    }
    match ty.base {
        BaseType::String => match (value, &ty.regex) {
            (Value::String(s), Some(pattern)) => pattern.is_match(s),
            (Value::String(_), None) => true,
            _ => false,
        },
        BaseType::Number => matches!(value, Value::Number(_)),
        BaseType::Boolean => matches!(value, Value::Bool(_)),
        BaseType::Object => is_object_like(value),
        BaseType::Any => !value.is_null(),
        BaseType::Tagged => match (value, ty.tagged_type.as_deref()) {
            (Value::Instance(instance), Some(name)) => instance.type_name() == name,
            _ => false,
        },
    }
}

/// Anything structured that is not a sequence.
pub(crate) fn is_object_like(value: &Value) -> bool {
    matches!(
        value,
        Value::Object(_)
            | Value::Instance(_)
            | Value::Table(_)
            | Value::Timestamp(_)
            | Value::Pattern(_)
    )
}

pub(crate) fn table_items_conform(
    table: &LookupTable<Value>,
    item_type: Option<&str>,
    scan: ArrayScan,
) -> bool {
    let Some(item_type) = item_type else {
        return true;
    };
    let is_item = |v: &Value| v.as_instance().is_some_and(|i| i.type_name() == item_type);
    match scan {
        ArrayScan::FirstSample => table.first().is_none_or(is_item),
        ArrayScan::FullScan => table.iter().all(is_item),
    }
}

/// Absent and null both count as missing.
pub(crate) fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

pub(crate) fn fail(
    context: &str,
    field: &str,
    expected: impl fmt::Display,
    value: Option<&Value>,
) -> Error {
    Error::field_shape(context, field, expected.to_string(), render_found(value))
}

/// Runs the shared missing-or-conforms check for `ty`.
pub(crate) fn check(
    context: &str,
    field: &str,
    ty: &FieldType,
    value: Option<&Value>,
    scan: ArrayScan,
) -> tagtype_foundation::Result<()> {
    match present(value) {
        None if ty.optional => Ok(()),
        Some(v) if conforms(ty, v, scan) => Ok(()),
        _ => Err(fail(context, field, ty, value)),
    }
}
