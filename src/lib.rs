//! Tagtype - declarative algebraic data types with validated constructors
//!
//! This crate re-exports all layers of the tagtype system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: tagtype_document   — Document codec, lookup-table ordering, snapshots
//! Layer 2: tagtype_generator  — Registries, constructors, adapters, dispatch
//! Layer 1: tagtype_validate   — Field validators
//! Layer 0: tagtype_foundation — Core types (Value, FieldType, LookupTable, Error)
//! ```
//!
//! # Example
//!
//! ```
//! use tagtype::prelude::*;
//!
//! let registry = Registry::builder()
//!     .define(
//!         TypeDefinition::tagged_sum("Shape")
//!             .with_variant("Circle", [("radius", "Number")])
//!             .with_variant("Square", [("side", "Number")]),
//!     )
//!     .build()?;
//!
//! let shape = registry.get("Shape")?;
//! let circle = shape.variant("Circle")?.construct(vec![Value::from(2)])?;
//!
//! let handlers: Handlers<'_, f64> = Handlers::new()
//!     .on("Circle", |_, c| c.get("radius").and_then(Value::as_number).unwrap_or(0.0))
//!     .on("Square", |_, s| s.get("side").and_then(Value::as_number).unwrap_or(0.0));
//! assert_eq!(circle.match_with(&handlers)?, 2.0);
//!
//! let doc = shape.encode(&circle, TimestampPolicy::default())?;
//! assert_eq!(shape.decode(&doc, TimestampPolicy::default())?, circle);
//! # Ok::<(), tagtype::foundation::Error>(())
//! ```

pub use tagtype_document as document;
pub use tagtype_foundation as foundation;
pub use tagtype_generator as generator;
pub use tagtype_validate as validate;

/// The types most programs need.
pub mod prelude {
    pub use tagtype_document::{Document, DocumentCodec, TimestampPolicy, decode_any};
    pub use tagtype_foundation::{
        Error, ErrorKind, FieldType, Instance, LookupTable, Pattern, Result, Value,
    };
    pub use tagtype_generator::{
        GeneratorConfig, Handlers, Match, Registry, TypeDefinition, TypeHandle, VariantHandle,
    };
    pub use tagtype_validate::{ArrayScan, ValidationConfig};
}
