//! Bidirectional conversion between host values and tagged values.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Two directions, asymmetric by design:
//!
//! - [`to_native`] (host → compiler) is total. Whatever the host hands over,
//!   the compiler gets back a `Value`: unrecognized shapes and encoding
//!   failures become `Value::Error` carrying a user-facing diagnostic, so a
//!   bad function return value fails that one Sass call, not the process.
//! - [`to_host`] (compiler → host) is partial. The compiler only ever passes
//!   the data-bearing tags as function arguments; a `Warning` or `Error`
//!   showing up here is a contract violation and is reported as such rather
//!   than silently mapped to null.
//!
//! Dispatch in `to_native` follows a fixed priority order (null, bool, text,
//! bytes, mappings, then the wrapper types). The order matters for the host
//! classifiers that feed this enum: mapping-like probes can overlap
//! sequence-like shapes, so concrete shapes are classified before generic
//! capability checks ever run.

use crate::error::BridgeError;
use crate::host::{HostValue, SassColor, SassList, SassMap, SassNumber};
use crate::value::Value;

/// The accepted-shapes list quoted by the unknown-type diagnostic.
const EXPECTED_TYPES: &str = "- None\n\
                              - bool\n\
                              - str\n\
                              - SassNumber\n\
                              - SassColor\n\
                              - SassList\n\
                              - dict\n\
                              - SassMap\n\
                              - SassWarning\n\
                              - SassError\n";

/// Convert a host value into the compiler's tagged representation.
///
/// Never fails: shapes outside the recognized set produce a `Value::Error`
/// naming the offending type and enumerating the accepted alternatives, and
/// byte strings that are not valid UTF-8 produce a `Value::Error` with the
/// encoding failure. The host value is only borrowed, never mutated.
pub fn to_native(value: &HostValue) -> Value {
    match value {
        HostValue::Null => Value::Null,
        HostValue::Bool(b) => Value::Boolean(*b),
        HostValue::Text(s) => Value::String(s.clone()),
        // Raw bytes pass through unmodified, but the native string tag is
        // UTF-8; a failed decode is the encoding-error class.
        HostValue::Bytes(bytes) => match std::str::from_utf8(bytes) {
            Ok(s) => Value::String(s.to_string()),
            Err(err) => Value::Error(format!("invalid UTF-8 in byte string: {err}")),
        },
        HostValue::Mapping(entries) => mapping_to_native(entries),
        HostValue::Number(n) => Value::Number {
            value: n.value,
            unit: n.unit.clone(),
        },
        HostValue::Color(c) => Value::Color {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        },
        HostValue::List(list) => Value::List {
            items: list.items.iter().map(to_native).collect(),
            separator: list.separator,
        },
        HostValue::Map(map) => mapping_to_native(&map.entries),
        HostValue::Warning(w) => Value::Warning(w.msg.clone()),
        HostValue::Error(e) => Value::Error(e.msg.clone()),
        HostValue::Foreign(type_name) => unknown_type_to_error(type_name),
    }
}

fn mapping_to_native(entries: &[(HostValue, HostValue)]) -> Value {
    Value::Map(
        entries
            .iter()
            .map(|(k, v)| (to_native(k), to_native(v)))
            .collect(),
    )
}

/// The diagnostic produced for a host value outside the recognized set.
fn unknown_type_to_error(type_name: &str) -> Value {
    Value::Error(format!(
        "Unexpected type: `{type_name}`.\nExpected one of:\n{EXPECTED_TYPES}"
    ))
}

/// Convert a compiler value into the host representation.
///
/// Used for custom function arguments. `Warning` and `Error` tags cannot
/// appear as arguments; encountering one returns
/// [`BridgeError::UnexpectedTag`].
pub fn to_host(value: &Value) -> Result<HostValue, BridgeError> {
    match value {
        Value::Null => Ok(HostValue::Null),
        Value::Boolean(b) => Ok(HostValue::Bool(*b)),
        Value::String(s) => Ok(HostValue::Text(s.clone())),
        Value::Number { value, unit } => {
            Ok(HostValue::Number(SassNumber::new(*value, unit.clone())))
        }
        Value::Color { r, g, b, a } => Ok(HostValue::Color(SassColor::new(*r, *g, *b, *a))),
        Value::List { items, separator } => {
            let items = items.iter().map(to_host).collect::<Result<Vec<_>, _>>()?;
            Ok(HostValue::List(SassList::new(items, *separator)))
        }
        Value::Map(entries) => {
            let entries = entries
                .iter()
                .map(|(k, v)| Ok((to_host(k)?, to_host(v)?)))
                .collect::<Result<Vec<_>, BridgeError>>()?;
            Ok(HostValue::Map(SassMap::new(entries)))
        }
        Value::Warning(_) | Value::Error(_) => Err(BridgeError::UnexpectedTag {
            tag: value.tag_name(),
        }),
    }
}
