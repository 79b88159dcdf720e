//! Type definitions, validated constructors and variant dispatch for tagtype.
//!
//! Definitions go into a [`RegistryBuilder`]; [`RegistryBuilder::build`]
//! parses every field spec once and checks every cross-reference, producing
//! a [`Registry`] of [`TypeHandle`]s.
//!
//! ```ignore
//! let registry = Registry::builder()
//!     .define(TypeDefinition::tagged("Point", [("x", "Number"), ("y", "Number")]))
//!     .build()?;
//! let point = registry.get("Point")?;
//! let p = point.construct(vec![Value::from(1), Value::from(2)])?;
//! assert!(point.is(&Value::Instance(p)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod definition;
pub mod dispatch;
pub mod handle;
pub mod json;
pub mod registry;

pub use config::GeneratorConfig;
pub use definition::{FieldSpecs, TypeDefinition};
pub use dispatch::{Handlers, Match};
pub use handle::{TypeHandle, VariantHandle};
pub use json::value_from_json;
pub use registry::{Registry, RegistryBuilder};

/// Key carrying a sum variant's name in plain objects and documents.
pub const TAG_KEY: &str = "@@tagName";

/// Key carrying the type name of an instance stored in an untyped position.
pub const TYPE_KEY: &str = "@@typeName";

/// Key carrying a lookup-table element's position in documents.
pub const ORDER_KEY: &str = "_order";

/// Key carrying a regex literal in untyped document positions.
pub const PATTERN_KEY: &str = "@@regex";

/// Key carrying a timestamp in untyped document positions.
pub const TIMESTAMP_KEY: &str = "@@timestamp";

/// Keys the document encoding writes beside declared fields. No field may use
/// one of these names.
pub const RESERVED_FIELDS: [&str; 5] = [TAG_KEY, TYPE_KEY, ORDER_KEY, PATTERN_KEY, TIMESTAMP_KEY];
