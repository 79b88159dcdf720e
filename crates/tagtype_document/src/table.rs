//! Lookup tables in an unordered key→document store.
//!
//! A table encodes as one document per element, keyed by id, each carrying
//! a dense `_order` written at encode time. The in-memory table never sees
//! `_order`; it exists only between these two functions.

use std::sync::Arc;

use tagtype_foundation::{Error, ErrorKind, Keyed, LookupTable, Result};

use crate::{Document, ORDER_KEY};

/// Encodes a table as `{ id: { ...item, "_order": n } }`.
///
/// `encode_item` must produce a document for every element; `_order` is
/// assigned densely from zero in table order.
///
/// # Errors
///
/// Returns whatever `encode_item` fails with (framed by the element id), or
/// `SerializationError` if an element does not encode to a document.
pub fn encode_table<T, F>(table: &LookupTable<T>, mut encode_item: F) -> Result<Document>
where
    T: Clone,
    F: FnMut(&T) -> Result<serde_json::Value>,
{
    let mut out = Document::new();
    for (order, (id, item)) in table.entries().enumerate() {
        let encoded = encode_item(item).map_err(|e| e.in_frame(id))?;
        let serde_json::Value::Object(mut doc) = encoded else {
            return Err(Error::new(ErrorKind::SerializationError(format!(
                "lookup table element {id:?} did not encode to a document"
            ))));
        };
        doc.insert(ORDER_KEY.to_string(), order.into());
        out.insert(id.to_string(), serde_json::Value::Object(doc));
    }
    Ok(out)
}

/// Decodes a table written by [`encode_table`], in any key order.
///
/// `decode_item` receives each element's document with `_order` removed.
///
/// # Errors
///
/// - `MalformedDocument` if an entry is not a document, lacks an integer
///   `_order`, or decodes to an element whose id differs from its key.
/// - `DuplicateOrder` if two entries share an `_order`.
/// - Whatever `decode_item` fails with, framed by the entry key.
pub fn decode_table<T, F>(
    doc: &Document,
    id_field: impl Into<Arc<str>>,
    mut decode_item: F,
) -> Result<LookupTable<T>>
where
    T: Clone + Keyed,
    F: FnMut(&Document) -> Result<T>,
{
    let id_field = id_field.into();
    let mut entries = Vec::with_capacity(doc.len());
    for (key, entry) in doc {
        let serde_json::Value::Object(entry) = entry else {
            return Err(Error::malformed("lookup table entry is not a document").in_frame(key));
        };
        let Some(order) = entry.get(ORDER_KEY).and_then(serde_json::Value::as_i64) else {
            return Err(Error::malformed(format!("missing integer {ORDER_KEY}")).in_frame(key));
        };
        let mut item_doc = entry.clone();
        item_doc.remove(ORDER_KEY);
        let item = decode_item(&item_doc).map_err(|e| e.in_frame(key))?;
        match item.key(&id_field) {
            Some(id) if *id != **key => {
                return Err(Error::malformed(format!(
                    "entry keyed {key:?} holds an element with id {id:?}"
                ))
                .in_frame(key));
            }
            _ => {}
        }
        entries.push((order, key.as_str(), item));
    }

    entries.sort_by_key(|(order, ..)| *order);
    if let Some(pair) = entries.windows(2).find(|w| w[0].0 == w[1].0) {
        return Err(Error::new(ErrorKind::DuplicateOrder {
            order: pair[0].0,
            first: pair[0].1.to_string(),
            second: pair[1].1.to_string(),
        }));
    }

    LookupTable::from_items(id_field, entries.into_iter().map(|(.., item)| item))
}
