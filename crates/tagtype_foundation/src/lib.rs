//! Field-type grammar, runtime values, instances and lookup tables for tagtype.
//!
//! This crate provides:
//! - [`FieldType`] - Parsed descriptor of a field-type spec string (`"[String]?"`, `"/^a+$/"`, `"Point"`)
//! - [`Pattern`] - Regex constraint carried by string fields
//! - [`Value`] - The dynamic value type flowing through constructors and validators
//! - [`Instance`] - A value produced by a generated constructor, with its discriminant kept apart from its fields
//! - [`LookupTable`] - Ordered, id-indexed collection used for has-many relationships
//! - [`Error`] - Error taxonomy shared by every layer
//! - Persistent collections ([`LtVec`], [`LtMap`])

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod collections;
pub mod error;
pub mod instance;
pub mod lookup;
pub mod pattern;
pub mod types;
pub mod value;

pub use collections::{LtMap, LtVec};
pub use error::{Error, ErrorContext, ErrorKind, FieldShapeError};
pub use instance::{Discriminant, FieldShape, Instance, TypeKind, TypeShape, VariantShape};
pub use lookup::{Keyed, LookupTable};
pub use pattern::Pattern;
pub use types::{BaseType, FieldType, LOOKUP_TABLE};
pub use value::Value;

/// Result type alias using the tagtype [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
