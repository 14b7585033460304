//! The host-side value model.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Host applications hand values to the bridge in a dynamically-shaped form:
//! plain data (null, booleans, text, raw bytes, generic mappings) plus the
//! Sass wrapper types for shapes the plain data cannot express (a number
//! with a unit, a color, a list with a separator, warnings and errors).
//!
//! `HostValue` is an explicit enumeration of every shape the converter
//! recognizes. Making the shapes a closed enum, rather than probing values
//! with overlapping capability checks, is deliberate: the original binding's
//! "is this a mapping?" test also matched sequence types, and the fix was to
//! classify once, up front. Anything outside the recognized set travels as
//! `Foreign` with its type name, so the converter can produce a useful
//! diagnostic instead of a crash.

use serde::{Deserialize, Serialize};

use crate::value::Separator;

/// A Sass number wrapper: a magnitude plus an opaque unit string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SassNumber {
    /// Numeric magnitude
    pub value: f64,
    /// Unit suffix (`""` for unitless)
    pub unit: String,
}

impl SassNumber {
    /// Create a number with a unit.
    pub fn new(value: f64, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: unit.into(),
        }
    }

    /// Create a unitless number.
    pub fn unitless(value: f64) -> Self {
        Self::new(value, "")
    }
}

/// A Sass RGBA color wrapper. Channels are independent floats; the bridge
/// does not clamp them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SassColor {
    /// Red channel
    pub r: f64,
    /// Green channel
    pub g: f64,
    /// Blue channel
    pub b: f64,
    /// Alpha channel
    pub a: f64,
}

impl SassColor {
    /// Create a color from its four channels.
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }
}

/// A Sass list wrapper: ordered items plus the separator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SassList {
    /// List items in order
    pub items: Vec<HostValue>,
    /// Comma or space
    pub separator: Separator,
}

impl SassList {
    /// Create a list from items and a separator.
    pub fn new(items: Vec<HostValue>, separator: Separator) -> Self {
        Self { items, separator }
    }
}

/// A Sass map wrapper: an ordered sequence of key/value pairs.
///
/// Entries are kept exactly as given: no deduplication, no reordering, and
/// keys may be any host value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SassMap {
    /// Key/value pairs in order
    pub entries: Vec<(HostValue, HostValue)>,
}

impl SassMap {
    /// Create a map from its pairs.
    pub fn new(entries: Vec<(HostValue, HostValue)>) -> Self {
        Self { entries }
    }
}

/// A `@warn` message produced by host code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SassWarning {
    /// Warning text
    pub msg: String,
}

impl SassWarning {
    /// Create a warning from a message.
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

/// An `@error` message produced by host code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SassError {
    /// Error text
    pub msg: String,
}

impl SassError {
    /// Create an error from a message.
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

/// A host value, classified into one of the shapes the converter accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HostValue {
    /// The host's null/none
    Null,

    /// A host boolean
    Bool(bool),

    /// Host text (always valid UTF-8)
    Text(String),

    /// A host byte string, passed through to the native side unmodified.
    /// Must decode as UTF-8 to become a Sass string; see the converter.
    Bytes(Vec<u8>),

    /// A generic dict-like mapping in its own iteration order. Distinct from
    /// the `SassMap` wrapper only in how the host produced it; both convert
    /// to the native map tag.
    Mapping(Vec<(HostValue, HostValue)>),

    /// Number wrapper
    Number(SassNumber),

    /// Color wrapper
    Color(SassColor),

    /// List wrapper
    List(SassList),

    /// Map wrapper
    Map(SassMap),

    /// Warning wrapper
    Warning(SassWarning),

    /// Error wrapper
    Error(SassError),

    /// Any host object outside the recognized set, carrying its type name
    /// for the unknown-type diagnostic.
    Foreign(String),
}

impl HostValue {
    /// Host text from anything string-like.
    pub fn text(s: impl Into<String>) -> Self {
        HostValue::Text(s.into())
    }

    /// A number wrapper value.
    pub fn number(value: f64, unit: impl Into<String>) -> Self {
        HostValue::Number(SassNumber::new(value, unit))
    }

    /// A list wrapper value.
    pub fn list(items: Vec<HostValue>, separator: Separator) -> Self {
        HostValue::List(SassList::new(items, separator))
    }

    /// A map wrapper value.
    pub fn map(entries: Vec<(HostValue, HostValue)>) -> Self {
        HostValue::Map(SassMap::new(entries))
    }
}
