//! Dispatch from a parsed [`FieldType`] to the matching validator.

use tagtype_foundation::{BaseType, FieldType, Result, Value};

use crate::composite::{validate_array, validate_lookup_table};
use crate::config::ValidationConfig;
use crate::primitive::{
    validate_any, validate_boolean, validate_number, validate_object, validate_regex,
    validate_string, validate_tag,
};

/// Validates one field value against its declared type.
///
/// # Errors
///
/// Returns the field-shape failure of whichever validator the type selects.
pub fn validate_field(
    context: &str,
    field: &str,
    ty: &FieldType,
    value: Option<&Value>,
    config: &ValidationConfig,
) -> Result<()> {
    if ty.is_array() {
        return validate_array(context, field, ty, value, config.array_scan);
    }
    if ty.is_lookup_table() {
        return validate_lookup_table(
            context,
            field,
            ty.optional,
            ty.table_item(),
            value,
            config.array_scan,
        );
    }
    let optional = ty.optional;
    match (ty.base, &ty.regex, ty.tagged_type.as_deref()) {
        (BaseType::String, Some(pattern), _) => {
            validate_regex(context, field, optional, pattern, value)
        }
        (BaseType::String, None, _) => validate_string(context, field, optional, value),
        (BaseType::Number, ..) => validate_number(context, field, optional, value),
        (BaseType::Boolean, ..) => validate_boolean(context, field, optional, value),
        (BaseType::Object, ..) => validate_object(context, field, optional, value),
        (BaseType::Any, ..) => validate_any(context, field, optional, value),
        (BaseType::Tagged, _, name) => {
            validate_tag(context, field, optional, name.unwrap_or_default(), value)
        }
    }
}
