//! Canonical serialization of units.
//!
//! The canonical form is compact JSON with object keys sorted by byte value at
//! every level. Array order is preserved. The output does not depend on the
//! iteration order of the input maps.

use nbdelta_types::Unit;
use serde_json::Value;

/// Canonical bytes of a unit.
pub fn canonical_bytes(unit: &Unit) -> Vec<u8> {
    let mut out = String::new();
    write_object(unit.iter(), &mut out);
    out.into_bytes()
}

/// Canonical bytes of an arbitrary JSON value.
pub fn canonical_value_bytes(value: &Value) -> Vec<u8> {
    let mut out = String::new();
    write_value(value, &mut out);
    out.into_bytes()
}

fn write_value(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => write_object(map.iter(), out),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(item, out);
            }
            out.push(']');
        }
        // Display on scalars yields their compact, escaped JSON form.
        scalar => out.push_str(&scalar.to_string()),
    }
}

fn write_object<'a>(entries: impl Iterator<Item = (&'a String, &'a Value)>, out: &mut String) {
    let mut entries: Vec<_> = entries.collect();
    entries.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

    out.push('{');
    for (i, (key, value)) in entries.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&Value::from(key.as_str()).to_string());
        out.push(':');
        write_value(value, out);
    }
    out.push('}');
}
