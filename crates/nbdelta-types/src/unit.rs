//! The addressable piece of a document.

use std::collections::BTreeMap;

use serde_json::Value;

/// One addressable unit of a document, such as a notebook cell.
///
/// A unit is a mapping of field names to JSON values. Units are compared only
/// through their fingerprints, never by position.
pub type Unit = BTreeMap<String, Value>;

/// Convert a JSON value into a [`Unit`].
///
/// Returns `None` if the value is not a JSON object.
pub fn unit_from_value(value: Value) -> Option<Unit> {
    match value {
        Value::Object(map) => Some(map.into_iter().collect()),
        _ => None,
    }
}
