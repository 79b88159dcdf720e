//! Plain JSON input for the loose adapter.

use tagtype_foundation::Value;

/// Converts a JSON value into a [`Value`].
///
/// Objects become plain objects and arrays become sequences; nothing is
/// adapted to a generated type here. Numbers that do not fit an `f64` become
/// `Null`.
#[must_use]
pub fn value_from_json(json: &serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => n.as_f64().map_or(Value::Null, Value::Number),
        serde_json::Value::String(s) => Value::from(s.as_str()),
        serde_json::Value::Array(items) => Value::array(items.iter().map(value_from_json)),
        serde_json::Value::Object(map) => {
            Value::object(map.iter().map(|(k, v)| (k.as_str(), value_from_json(v))))
        }
    }
}
