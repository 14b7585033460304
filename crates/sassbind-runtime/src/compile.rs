//! Compile orchestration: the public entry points.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Thin by intent. Each entry point validates options, hands the source and
//! the registration slices to an engine for one synchronous compile, and
//! returns the [`CompileResult`] triple. Nothing here throws across the
//! boundary: every failure, from a bad option to a broken importer, comes
//! back as `(ok = false, message)`.
//!
//! The registrations are borrowed for the duration of the call because the
//! engine may invoke them at any point inside it.

use std::path::Path;

use tracing::debug;

use sassbind_bridge::{SassFunction, SassImporter};

use crate::engine::{CompileOptions, CompileResult, SassEngine};
use crate::grass_native::GrassEngine;

/// Compile inline Sass/SCSS source with the default engine.
pub fn compile_string(
    source: &str,
    options: &CompileOptions,
    functions: &[SassFunction],
    importers: &[SassImporter],
) -> CompileResult {
    compile_string_with_engine(&GrassEngine::new(), source, options, functions, importers)
}

/// Compile inline Sass/SCSS source with a caller-supplied engine.
pub fn compile_string_with_engine(
    engine: &dyn SassEngine,
    source: &str,
    options: &CompileOptions,
    functions: &[SassFunction],
    importers: &[SassImporter],
) -> CompileResult {
    if let Err(err) = options.validate(false) {
        return CompileResult::failure(err.to_string());
    }
    debug!(
        bytes = source.len(),
        functions = functions.len(),
        importers = importers.len(),
        "compiling inline source"
    );
    engine.compile_string(source, options, functions, importers)
}

/// Compile the Sass/SCSS file at `filename` with the default engine.
pub fn compile_filename(
    filename: &Path,
    options: &CompileOptions,
    functions: &[SassFunction],
    importers: &[SassImporter],
) -> CompileResult {
    compile_filename_with_engine(&GrassEngine::new(), filename, options, functions, importers)
}

/// Compile the Sass/SCSS file at `filename` with a caller-supplied engine.
pub fn compile_filename_with_engine(
    engine: &dyn SassEngine,
    filename: &Path,
    options: &CompileOptions,
    functions: &[SassFunction],
    importers: &[SassImporter],
) -> CompileResult {
    if let Err(err) = options.validate(true) {
        return CompileResult::failure(err.to_string());
    }
    if !filename.is_file() {
        return CompileResult::failure(format!("`{}` seems not a file", filename.display()));
    }
    debug!(
        filename = %filename.display(),
        functions = functions.len(),
        importers = importers.len(),
        "compiling file"
    );
    engine.compile_file(filename, options, functions, importers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SourceComments;
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn test_compile_string_basic() {
        let result = compile_string(
            "$x: 1px; a { width: $x; }",
            &CompileOptions::default(),
            &[],
            &[],
        );
        assert!(result.ok, "compile failed: {}", result.output);
        assert!(result.output.contains("width: 1px"));
        assert_eq!(result.source_map, "");
    }

    #[test]
    fn test_compile_string_invalid_options_fail_without_compiling() {
        let options = CompileOptions {
            source_comments: SourceComments::Map,
            source_map_filename: Some(PathBuf::from("out.map")),
            ..Default::default()
        };
        let result = compile_string("a { b: c; }", &options, &[], &[]);
        assert!(!result.ok);
        assert!(result.output.contains("only available when compiling a file"));
    }

    #[test]
    fn test_compile_filename_missing_file() {
        let result = compile_filename(
            Path::new("definitely/not/here.scss"),
            &CompileOptions::default(),
            &[],
            &[],
        );
        assert!(!result.ok);
        assert!(result.output.contains("seems not a file"));
    }

    #[test]
    fn test_compile_filename_basic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.scss");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "$c: teal; a {{ color: $c; }}").unwrap();

        let result = compile_filename(&path, &CompileOptions::default(), &[], &[]);

        assert!(result.ok, "compile failed: {}", result.output);
        assert!(result.output.contains("color: teal"));
    }
}
