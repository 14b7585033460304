//! The engine boundary: compile options, the result triple, and the
//! `SassEngine` trait.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! An engine is whatever actually turns Sass into CSS. Everything above it
//! speaks this vocabulary: a [`CompileOptions`] bundle, the registration
//! slices from `sassbind-bridge`, and a [`CompileResult`] triple of
//! `(ok, output-or-error-message, sourcemap)`. Engines never panic across
//! this boundary and never return a structured error: failure is `ok =
//! false` with the message in `output`, which is the historical binding
//! contract.
//!
//! The option enums keep their fixed native integer codes so engines that
//! speak the numeric convention can be driven without a translation table.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use sassbind_bridge::{SassFunction, SassImporter};

/// Errors from option construction and validation. These are the only
/// errors that surface as `Result`; once a compile starts, everything is
/// reported through the [`CompileResult`] triple.
#[derive(Debug, Error)]
pub enum OptionsError {
    /// Unknown output style name
    #[error("`{name}` is unsupported output_style; choose one of {}", and_join(OutputStyle::NAMES))]
    UnsupportedOutputStyle {
        /// The rejected name
        name: String,
    },

    /// Unknown source comments name
    #[error("`{name}` is unsupported source_comments; choose one of {}", and_join(SourceComments::NAMES))]
    UnsupportedSourceComments {
        /// The rejected name
        name: String,
    },

    /// `source_comments = map` without a source map filename
    #[error("source_comments=\"map\" requires source_map_filename")]
    MapRequiresSourceMapFilename,

    /// A source map filename without `source_comments = map`
    #[error("source_map_filename is available only with source_comments=\"map\"")]
    SourceMapFilenameRequiresMap,

    /// `source_comments = map` outside file compilation
    #[error(
        "source_comments=\"map\" is only available when compiling a file, \
         since it has to be aware of it"
    )]
    MapRequiresFile,
}

/// Output style of the compiled CSS.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStyle {
    /// Nested output (the historical default)
    #[default]
    Nested,
    /// Expanded output, one declaration per line
    Expanded,
    /// Compact output, one rule per line
    Compact,
    /// Compressed output, minimal whitespace
    Compressed,
}

impl OutputStyle {
    /// Style names in code order.
    pub const NAMES: &'static [&'static str] = &["nested", "expanded", "compact", "compressed"];

    /// The fixed native integer code for this style.
    pub const fn code(self) -> i32 {
        match self {
            OutputStyle::Nested => 0,
            OutputStyle::Expanded => 1,
            OutputStyle::Compact => 2,
            OutputStyle::Compressed => 3,
        }
    }

    /// The style's canonical name.
    pub const fn name(self) -> &'static str {
        match self {
            OutputStyle::Nested => "nested",
            OutputStyle::Expanded => "expanded",
            OutputStyle::Compact => "compact",
            OutputStyle::Compressed => "compressed",
        }
    }

    /// Parse a style from its name.
    ///
    /// # Errors
    ///
    /// Returns [`OptionsError::UnsupportedOutputStyle`] for unknown names;
    /// the message enumerates the valid choices.
    pub fn from_name(name: &str) -> Result<Self, OptionsError> {
        match name {
            "nested" => Ok(OutputStyle::Nested),
            "expanded" => Ok(OutputStyle::Expanded),
            "compact" => Ok(OutputStyle::Compact),
            "compressed" => Ok(OutputStyle::Compressed),
            _ => Err(OptionsError::UnsupportedOutputStyle {
                name: name.to_string(),
            }),
        }
    }
}

/// Source comments emission mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceComments {
    /// No source comments
    #[default]
    None,
    /// Emit line-number comments (historical alias: `default`)
    LineNumbers,
    /// Emit a source map; file compilation only
    Map,
}

impl SourceComments {
    /// Mode names in code order.
    pub const NAMES: &'static [&'static str] = &["none", "line_numbers", "map"];

    /// The fixed native integer code for this mode.
    pub const fn code(self) -> i32 {
        match self {
            SourceComments::None => 0,
            SourceComments::LineNumbers => 1,
            SourceComments::Map => 2,
        }
    }

    /// Parse a mode from its name. `default` is accepted as an alias for
    /// `line_numbers`.
    ///
    /// # Errors
    ///
    /// Returns [`OptionsError::UnsupportedSourceComments`] for unknown
    /// names.
    pub fn from_name(name: &str) -> Result<Self, OptionsError> {
        match name {
            "none" => Ok(SourceComments::None),
            "line_numbers" | "default" => Ok(SourceComments::LineNumbers),
            "map" => Ok(SourceComments::Map),
            _ => Err(OptionsError::UnsupportedSourceComments {
                name: name.to_string(),
            }),
        }
    }
}

/// Options for one compile call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileOptions {
    /// Output style of the compiled CSS
    pub output_style: OutputStyle,

    /// Source comments mode
    pub source_comments: SourceComments,

    /// Ordered directories to search for `@import` resolution
    pub include_paths: Vec<PathBuf>,

    /// Numeric precision (digits after the decimal point)
    pub precision: u32,

    /// Whether the source uses the indented (`.sass`) syntax
    pub indented: bool,

    /// Source map output filename; requires `source_comments = map`
    pub source_map_filename: Option<PathBuf>,

    /// Where the compiled output will be written, used by engines to
    /// relativize source map paths
    pub output_filename_hint: Option<PathBuf>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            output_style: OutputStyle::Nested,
            source_comments: SourceComments::None,
            include_paths: Vec::new(),
            precision: 5,
            indented: false,
            source_map_filename: None,
            output_filename_hint: None,
        }
    }
}

impl CompileOptions {
    /// Check cross-field constraints before a compile.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint: `map` mode requires a source
    /// map filename and file compilation, and a source map filename is
    /// meaningless outside `map` mode.
    pub fn validate(&self, compiling_file: bool) -> Result<(), OptionsError> {
        if self.source_comments == SourceComments::Map {
            if self.source_map_filename.is_none() {
                return Err(OptionsError::MapRequiresSourceMapFilename);
            }
            if !compiling_file {
                return Err(OptionsError::MapRequiresFile);
            }
        } else if self.source_map_filename.is_some() {
            return Err(OptionsError::SourceMapFilenameRequiresMap);
        }
        Ok(())
    }
}

/// The result triple of a compile call.
///
/// When `ok` is false, `output` carries the error message and `source_map`
/// is empty. `source_map` is also empty when the engine produced none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileResult {
    /// Whether compilation succeeded
    pub ok: bool,
    /// Compiled CSS, or the error message when `ok` is false
    pub output: String,
    /// Source map text, or empty
    pub source_map: String,
}

impl CompileResult {
    /// A successful result.
    pub fn success(output: impl Into<String>, source_map: impl Into<String>) -> Self {
        Self {
            ok: true,
            output: output.into(),
            source_map: source_map.into(),
        }
    }

    /// A failed result carrying an error message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            output: message.into(),
            source_map: String::new(),
        }
    }
}

/// A Sass compiler engine.
///
/// Implementations own all engine-side state for the duration of one call
/// and release it on every exit path; the registration slices are only
/// borrowed for the call, during which the engine may invoke them any number
/// of times (strictly nested, never concurrent).
pub trait SassEngine {
    /// Compile inline source text.
    fn compile_string(
        &self,
        source: &str,
        options: &CompileOptions,
        functions: &[SassFunction],
        importers: &[SassImporter],
    ) -> CompileResult;

    /// Compile the file at `path`.
    fn compile_file(
        &self,
        path: &Path,
        options: &CompileOptions,
        functions: &[SassFunction],
        importers: &[SassImporter],
    ) -> CompileResult;
}

/// Join words with commas and a final `and`, for diagnostics listing
/// choices: `["a", "b", "c"]` becomes `a, b, and c`.
pub fn and_join(strings: &[&str]) -> String {
    match strings {
        [] => String::new(),
        [only] => (*only).to_string(),
        _ => {
            let last = strings.len() - 1;
            strings
                .iter()
                .enumerate()
                .map(|(i, s)| {
                    if i == last {
                        format!("and {s}")
                    } else {
                        (*s).to_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(", ")
        }
    }
}
