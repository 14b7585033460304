//! The tagged value model shared with the Sass compiler.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! `Value` is the closed set of Sass-visible value shapes that cross the
//! compiler boundary in both directions: custom function arguments arrive as
//! `Value`s and custom function results leave as `Value`s. The model mirrors
//! the compiler's own tagged union, so every variant carries exactly the
//! fields the compiler tracks (a number keeps its unit, a list keeps its
//! separator, a map keeps its entry order).
//!
//! A `Value` is created fresh for each conversion and owned by whoever asked
//! for it; nothing in this crate retains one across calls.

use serde::{Deserialize, Serialize};

/// List separator for Sass lists.
///
/// Semantically significant: `(1px 2px)` and `(1px, 2px)` are different
/// values and must survive a round trip through the bridge unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Separator {
    /// Comma-separated list (`a, b, c`)
    #[default]
    Comma,
    /// Space-separated list (`a b c`)
    Space,
}

/// A Sass value in the compiler's tagged representation.
///
/// `Warning` and `Error` are one-way: host code may construct them as
/// function results (they become `@warn`/`@error` on the compiler side), but
/// the compiler never passes them back as function arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// The Sass `null` value
    Null,

    /// `true` or `false`
    Boolean(bool),

    /// A string (quoted or unquoted on the Sass side; the bridge does not
    /// distinguish)
    String(String),

    /// A number with an attached unit (`""` for unitless numbers)
    Number {
        /// Numeric magnitude
        value: f64,
        /// Unit suffix, e.g. `"px"`, `"%"`, or `""`
        unit: String,
    },

    /// An RGBA color. Channels are carried as-is; the bridge performs no
    /// clamping or normalization.
    Color {
        /// Red channel
        r: f64,
        /// Green channel
        g: f64,
        /// Blue channel
        b: f64,
        /// Alpha channel
        a: f64,
    },

    /// An ordered list with its separator
    List {
        /// List items, order preserved exactly
        items: Vec<Value>,
        /// Separator used when the list is serialized
        separator: Separator,
    },

    /// An ordered sequence of key/value pairs.
    ///
    /// Not deduplicated here: if the host hands over duplicate keys they are
    /// passed through verbatim, and any last-write-wins behavior belongs to
    /// the compiler. Keys may be any `Value`, not only strings.
    Map(Vec<(Value, Value)>),

    /// A `@warn` message (host→native only)
    Warning(String),

    /// An `@error` message (host→native only)
    Error(String),
}

impl Value {
    /// Construct a string value.
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    /// Construct a number with a unit.
    pub fn number(value: f64, unit: impl Into<String>) -> Self {
        Value::Number {
            value,
            unit: unit.into(),
        }
    }

    /// Construct an error value from a message.
    pub fn error(message: impl Into<String>) -> Self {
        Value::Error(message.into())
    }

    /// The tag name of this value, as used in diagnostics.
    pub fn tag_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::String(_) => "string",
            Value::Number { .. } => "number",
            Value::Color { .. } => "color",
            Value::List { .. } => "list",
            Value::Map(_) => "map",
            Value::Warning(_) => "warning",
            Value::Error(_) => "error",
        }
    }

    /// Whether this value is the error tag.
    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }
}
