//! Order-preserving document encoding for tagtype.
//!
//! Instances encode to flat, schemaless documents ([`Document`], a JSON
//! object) suitable for a key→document store:
//!
//! - sum variants carry their name under `@@tagName`;
//! - nested instances and sequences are encoded recursively;
//! - lookup tables become `{ id: { ...item, "_order": n } }`, and decoding
//!   sorts by `_order` to recover the original order;
//! - timestamps are written as `{ "@@timestamp": ... }` with a payload shaped
//!   by a [`TimestampPolicy`].
//!
//! Decoding always re-runs validation, so a decoded instance is as
//! trustworthy as a constructed one.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod codec;
pub mod policy;
pub mod snapshot;
pub mod table;

pub use codec::{DocumentCodec, decode_any, encode_instance};
pub use policy::TimestampPolicy;
pub use table::{decode_table, encode_table};
pub use tagtype_generator::{ORDER_KEY, PATTERN_KEY, TAG_KEY, TIMESTAMP_KEY, TYPE_KEY};

/// The flat wire shape: a JSON object.
pub type Document = serde_json::Map<String, serde_json::Value>;
