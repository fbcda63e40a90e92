//! Helpers for walking project documents as `serde_json::Value` trees.

use crate::error::DocumentError;
use serde_json::Value as JsonValue;

pub(crate) fn field<'a>(
    doc: &'a JsonValue,
    field: &'static str,
) -> Result<&'a JsonValue, DocumentError> {
    doc.get(field).ok_or(DocumentError::MissingField { field })
}

pub(crate) fn get_bool(doc: &JsonValue, name: &'static str) -> Result<bool, DocumentError> {
    field(doc, name)?.as_bool().ok_or(DocumentError::InvalidField {
        field: name,
        expected: "a boolean",
    })
}

pub(crate) fn get_u32(doc: &JsonValue, name: &'static str) -> Result<u32, DocumentError> {
    field(doc, name)?
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or(DocumentError::InvalidField {
            field: name,
            expected: "an unsigned 32-bit integer",
        })
}

pub(crate) fn get_i64(doc: &JsonValue, name: &'static str) -> Result<i64, DocumentError> {
    field(doc, name)?.as_i64().ok_or(DocumentError::InvalidField {
        field: name,
        expected: "an integer",
    })
}

pub(crate) fn get_str<'a>(
    doc: &'a JsonValue,
    name: &'static str,
) -> Result<&'a str, DocumentError> {
    field(doc, name)?.as_str().ok_or(DocumentError::InvalidField {
        field: name,
        expected: "a string",
    })
}

pub(crate) fn get_array<'a>(
    doc: &'a JsonValue,
    name: &'static str,
) -> Result<&'a Vec<JsonValue>, DocumentError> {
    field(doc, name)?.as_array().ok_or(DocumentError::InvalidField {
        field: name,
        expected: "an array",
    })
}

/// Reads a fixed-length array of numbers, e.g. `rotation: [x, y, z]`.
pub(crate) fn get_floats<const N: usize>(
    doc: &JsonValue,
    name: &'static str,
) -> Result<[f32; N], DocumentError> {
    let invalid = || DocumentError::InvalidField {
        field: name,
        expected: "an array of numbers",
    };
    let items = field(doc, name)?.as_array().ok_or_else(invalid)?;
    if items.len() != N {
        return Err(invalid());
    }

    let mut out = [0.0; N];
    for (slot, item) in out.iter_mut().zip(items) {
        *slot = item.as_f64().ok_or_else(invalid)? as f32;
    }
    Ok(out)
}
