//! Validators for sequence and lookup-table fields.

use tagtype_foundation::{FieldType, LOOKUP_TABLE, Result, Value};

use crate::config::ArrayScan;
use crate::shape::{check, fail, present, table_items_conform};

/// Validates a sequence field described by `ty`.
///
/// Descends exactly `ty.array_depth` levels confirming a sequence at each
/// one. An empty sequence at any level is valid and ends the descent. With
/// [`ArrayScan::FirstSample`] only the first element of each level is
/// checked. A failure anywhere reports the whole spec and the whole value.
///
/// # Errors
///
/// Returns a field-shape failure if a level is not a sequence or a sampled
/// element has the wrong base type.
pub fn validate_array(
    context: &str,
    field: &str,
    ty: &FieldType,
    value: Option<&Value>,
    scan: ArrayScan,
) -> Result<()> {
    check(context, field, ty, value, scan)
}

/// Validates a lookup-table field.
///
/// The value must be a lookup table (an id field and a length); when
/// `item_type` is given and the table is non-empty, its first element (every
/// element under [`ArrayScan::FullScan`]) must be an instance of that type.
///
/// # Errors
///
/// Returns a field-shape failure otherwise.
pub fn validate_lookup_table(
    context: &str,
    field: &str,
    optional: bool,
    item_type: Option<&str>,
    value: Option<&Value>,
    scan: ArrayScan,
) -> Result<()> {
    let name = item_type.map_or_else(
        || LOOKUP_TABLE.to_string(),
        |item| format!("{LOOKUP_TABLE}<{item}>"),
    );
    let mut ty = FieldType::tagged(name);
    ty.optional = optional;
    match present(value) {
        None if optional => Ok(()),
        Some(Value::Table(table)) if table_items_conform(table, item_type, scan) => Ok(()),
        _ => Err(fail(context, field, &ty, value)),
    }
}
