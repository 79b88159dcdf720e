//! Validators for primitive, regex and tagged-reference fields.
//!
//! `optional` fields accept an absent value or null. A required field
//! rejects both.

use tagtype_foundation::{FieldType, Pattern, Result, Value};

use crate::config::ArrayScan;
use crate::shape::{check, fail, present};

fn optional_if(ty: FieldType, optional: bool) -> FieldType {
    if optional { ty.optional() } else { ty }
}

/// Validates a `String` field.
///
/// # Errors
///
/// Returns a field-shape failure unless the value is a string (or missing
/// and `optional`).
pub fn validate_string(context: &str, field: &str, optional: bool, value: Option<&Value>) -> Result<()> {
    let ty = optional_if(FieldType::string(), optional);
    check(context, field, &ty, value, ArrayScan::FirstSample)
}

/// Validates a `Number` field.
///
/// # Errors
///
/// Returns a field-shape failure unless the value is a number (or missing
/// and `optional`).
pub fn validate_number(context: &str, field: &str, optional: bool, value: Option<&Value>) -> Result<()> {
    let ty = optional_if(FieldType::number(), optional);
    check(context, field, &ty, value, ArrayScan::FirstSample)
}

/// Validates a `Boolean` field.
///
/// # Errors
///
/// Returns a field-shape failure unless the value is a boolean (or missing
/// and `optional`).
pub fn validate_boolean(context: &str, field: &str, optional: bool, value: Option<&Value>) -> Result<()> {
    let ty = optional_if(FieldType::boolean(), optional);
    check(context, field, &ty, value, ArrayScan::FirstSample)
}

/// Validates an `Object` field: any structured value except a sequence.
///
/// # Errors
///
/// Returns a field-shape failure for primitives and sequences.
pub fn validate_object(context: &str, field: &str, optional: bool, value: Option<&Value>) -> Result<()> {
    let ty = optional_if(FieldType::object(), optional);
    check(context, field, &ty, value, ArrayScan::FirstSample)
}

/// Validates an `Any` field: anything present.
///
/// # Errors
///
/// Returns a field-shape failure if a required field is absent or null.
pub fn validate_any(context: &str, field: &str, optional: bool, value: Option<&Value>) -> Result<()> {
    let ty = optional_if(FieldType::any(), optional);
    check(context, field, &ty, value, ArrayScan::FirstSample)
}

/// Validates a regex-constrained string field.
///
/// The plain string check runs first, so a non-string reports `String`;
/// only a string that fails the pattern reports the pattern.
///
/// # Errors
///
/// Returns a field-shape failure for a non-string or a non-matching string.
pub fn validate_regex(
    context: &str,
    field: &str,
    optional: bool,
    pattern: &Pattern,
    value: Option<&Value>,
) -> Result<()> {
    validate_string(context, field, optional, value)?;
    let ty = optional_if(FieldType::pattern(pattern.clone()), optional);
    check(context, field, &ty, value, ArrayScan::FirstSample)
}

/// Validates a reference to another generated type.
///
/// The value must first be an instance of some generated type, then an
/// instance of `type_name` in particular.
///
/// # Errors
///
/// Returns a field-shape failure for anything else.
pub fn validate_tag(
    context: &str,
    field: &str,
    optional: bool,
    type_name: &str,
    value: Option<&Value>,
) -> Result<()> {
    let ty = optional_if(FieldType::tagged(type_name), optional);
    match present(value) {
        None if optional => Ok(()),
        Some(Value::Instance(instance)) if instance.type_name() == type_name => Ok(()),
        _ => Err(fail(context, field, &ty, value)),
    }
}
