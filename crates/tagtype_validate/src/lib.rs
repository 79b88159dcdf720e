//! Runtime field validators for tagtype.
//!
//! Every validator takes the constructor label, the field name and the value
//! (`None` when the field is absent) and either returns `Ok(())` or a
//! field-shape failure reading
//! `In <context>: expected <field> to have type <spec>; found <value>.`
//!
//! Validators are pure: they never log, allocate only to build a failure, and
//! hold no state between calls.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod composite;
pub mod config;
pub mod field;
pub mod primitive;
mod shape;

pub use composite::{validate_array, validate_lookup_table};
pub use config::{ArrayScan, ValidationConfig};
pub use field::validate_field;
pub use primitive::{
    validate_any, validate_boolean, validate_number, validate_object, validate_regex,
    validate_string, validate_tag,
};
pub use shape::{conforms, render_found};
