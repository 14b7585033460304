//! The production engine, backed by the grass crate.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! grass is a pure Rust Sass implementation targeting dart-sass. It exposes
//! exactly one extension seam, the [`grass::Fs`] trait used for `@import`
//! resolution, and that seam is where the importer chain plugs in:
//! [`ImporterFs`] consults the registered importers first and falls back to
//! the real filesystem when every importer declines.
//!
//! Capability notes:
//! - grass has no custom-function hook, so function registrations are
//!   declined with an explicit failure result.
//! - grass implements the two dart-sass output styles; `nested` and
//!   `compact` render as `expanded`.
//! - grass fixes numeric precision at 10 and emits no source comments or
//!   source maps; those options are accepted upstream and ignored here with
//!   a log.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use grass::{InputSyntax, Options};
use tracing::{debug, warn};

use sassbind_bridge::{ImportResolution, SassFunction, SassImporter, resolve_import};

use crate::engine::{CompileOptions, CompileResult, OutputStyle, SassEngine, SourceComments};

/// The default engine. Stateless; all per-compile state lives in the
/// [`ImporterFs`] built for that call and drops with it.
#[derive(Debug, Default)]
pub struct GrassEngine;

impl GrassEngine {
    /// Create the grass-backed engine.
    pub fn new() -> Self {
        Self
    }

    fn build_result(compiled: Result<String, Box<grass::Error>>) -> CompileResult {
        match compiled {
            Ok(css) => CompileResult::success(css, String::new()),
            Err(err) => CompileResult::failure(err.to_string()),
        }
    }

    fn check_options(options: &CompileOptions) {
        if options.source_comments != SourceComments::None {
            warn!(
                mode = ?options.source_comments,
                "grass does not emit source comments; option ignored"
            );
        }
        if options.precision != CompileOptions::default().precision {
            debug!(
                precision = options.precision,
                "grass uses a fixed precision; option ignored"
            );
        }
        if matches!(
            options.output_style,
            OutputStyle::Nested | OutputStyle::Compact
        ) {
            debug!(
                style = options.output_style.name(),
                "grass renders this style as expanded"
            );
        }
    }

    fn grass_style(style: OutputStyle) -> grass::OutputStyle {
        match style {
            OutputStyle::Compressed => grass::OutputStyle::Compressed,
            OutputStyle::Nested | OutputStyle::Expanded | OutputStyle::Compact => {
                grass::OutputStyle::Expanded
            }
        }
    }
}

impl SassEngine for GrassEngine {
    fn compile_string(
        &self,
        source: &str,
        options: &CompileOptions,
        functions: &[SassFunction],
        importers: &[SassImporter],
    ) -> CompileResult {
        if !functions.is_empty() {
            return CompileResult::failure(
                "custom functions are not supported by the grass engine",
            );
        }
        Self::check_options(options);

        let fs = ImporterFs::new(importers);
        let syntax = if options.indented {
            InputSyntax::Sass
        } else {
            InputSyntax::Scss
        };
        let grass_options = Options::default()
            .fs(&fs)
            .load_paths(&options.include_paths)
            .style(Self::grass_style(options.output_style))
            .input_syntax(syntax);

        Self::build_result(grass::from_string(source, &grass_options))
    }

    fn compile_file(
        &self,
        path: &Path,
        options: &CompileOptions,
        functions: &[SassFunction],
        importers: &[SassImporter],
    ) -> CompileResult {
        if !functions.is_empty() {
            return CompileResult::failure(
                "custom functions are not supported by the grass engine",
            );
        }
        Self::check_options(options);
        if options.source_map_filename.is_some() {
            warn!("grass does not generate source maps; returning an empty map");
        }

        let fs = ImporterFs::new(importers);
        let grass_options = Options::default()
            .fs(&fs)
            .load_paths(&options.include_paths)
            .style(Self::grass_style(options.output_style));

        Self::build_result(grass::from_path(path, &grass_options))
    }
}

/// What the importer chain said about one probed path.
#[derive(Debug, Clone)]
enum Resolved {
    /// An importer supplied the source inline
    Inline(String),
    /// An importer rewrote the path; read the target from disk
    Redirect(PathBuf),
    /// An importer failed on this path
    Failed(String),
    /// Every importer declined; use the real filesystem
    Declined,
}

/// `grass::Fs` adapter that routes import resolution through the importer
/// chain before touching the real filesystem.
///
/// grass probes candidate paths derived from the `@import` text (extension
/// and partial-underscore variants). The chain answers for exactly one
/// candidate per import, the plain `.scss` one, so a resolved import is
/// always read through a path grass parses as SCSS; the other variants fall
/// through to the real filesystem. Resolutions are cached for the duration
/// of the compile call so a candidate probed by `is_file` and then `read`
/// invokes the chain once.
#[derive(Debug)]
pub struct ImporterFs<'a> {
    importers: &'a [SassImporter],
    resolved: RefCell<HashMap<PathBuf, Resolved>>,
}

impl<'a> ImporterFs<'a> {
    /// Create an adapter over the registered importers.
    pub fn new(importers: &'a [SassImporter]) -> Self {
        Self {
            importers,
            resolved: RefCell::new(HashMap::new()),
        }
    }

    fn lookup(&self, path: &Path) -> Resolved {
        if let Some(hit) = self.resolved.borrow().get(path) {
            return hit.clone();
        }

        let resolved = match import_name(path) {
            Some(name) if !self.importers.is_empty() => {
                match resolve_import(self.importers, &name) {
                    ImportResolution::NoMatch => Resolved::Declined,
                    ImportResolution::Imports(entries) => Self::flatten(&name, entries),
                }
            }
            _ => Resolved::Declined,
        };

        self.resolved
            .borrow_mut()
            .insert(path.to_path_buf(), resolved.clone());
        resolved
    }

    /// Collapse chain entries into a single per-path resolution. grass reads
    /// one file per probed path, so multiple inline entries are
    /// concatenated in order.
    fn flatten(name: &str, entries: Vec<sassbind_bridge::ImportEntry>) -> Resolved {
        if let Some(failed) = entries.iter().find_map(|e| e.error.clone()) {
            return Resolved::Failed(failed);
        }
        match entries.as_slice() {
            [] => Resolved::Declined,
            [single] if single.source.is_none() => Resolved::Redirect(PathBuf::from(&single.path)),
            _ if entries.iter().all(|e| e.source.is_some()) => Resolved::Inline(
                entries
                    .iter()
                    .filter_map(|e| e.source.as_deref())
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            _ => Resolved::Failed(format!(
                "importer returned a path rewrite alongside inline sources for `{name}`"
            )),
        }
    }
}

impl grass::Fs for ImporterFs<'_> {
    fn is_dir(&self, path: &Path) -> bool {
        std::fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
    }

    fn is_file(&self, path: &Path) -> bool {
        match self.lookup(path) {
            Resolved::Inline(_) => true,
            // A failed entry still claims the path; read() then supplies a
            // stylesheet that reports the failure at the import site.
            Resolved::Failed(_) => true,
            Resolved::Redirect(target) => target.is_file(),
            Resolved::Declined => std::fs::metadata(path).map(|m| m.is_file()).unwrap_or(false),
        }
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        match self.lookup(path) {
            Resolved::Inline(source) => Ok(source.into_bytes()),
            // An Err here would unwind inside grass; route the failure
            // through the compiler's own error reporting instead.
            Resolved::Failed(message) => Ok(error_directive(&message).into_bytes()),
            Resolved::Redirect(target) => std::fs::read(target),
            Resolved::Declined => std::fs::read(path),
        }
    }
}

/// The import name for the one candidate variant the chain claims: a plain
/// `.scss` path with no partial underscore. Every other probed variant gets
/// `None` and falls through to the real filesystem.
fn import_name(path: &Path) -> Option<String> {
    if path.extension().and_then(|e| e.to_str()) != Some("scss") {
        return None;
    }
    if path.file_name()?.to_str()?.starts_with('_') {
        return None;
    }
    let mut cleaned = path.to_path_buf();
    cleaned.set_extension("");
    let name = cleaned.to_string_lossy().into_owned();
    Some(name.strip_prefix("./").map(str::to_string).unwrap_or(name))
}

/// A synthesized stylesheet whose only statement is an `@error` carrying the
/// importer's failure description, so the compiler reports the failure
/// through its normal error path, anchored at the import site.
fn error_directive(message: &str) -> String {
    let escaped = message
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('#', "\\#")
        .replace(['\n', '\r'], " ");
    format!("@error \"{escaped}\";")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sassbind_bridge::Import;

    #[test]
    fn test_import_name_claims_only_the_plain_scss_candidate() {
        assert_eq!(import_name(Path::new("theme.scss")).as_deref(), Some("theme"));
        assert_eq!(import_name(Path::new("./theme.scss")).as_deref(), Some("theme"));
        assert_eq!(
            import_name(Path::new("nested/dir/part.scss")).as_deref(),
            Some("nested/dir/part")
        );
        // Partial and non-SCSS variants fall through to the filesystem.
        assert_eq!(import_name(Path::new("_theme.scss")), None);
        assert_eq!(import_name(Path::new("theme.sass")), None);
        assert_eq!(import_name(Path::new("theme.css")), None);
        assert_eq!(import_name(Path::new("plain")), None);
    }

    #[test]
    fn test_error_directive_escapes_the_message() {
        let directive = error_directive("she said \"no\"\nat #{line} two");
        assert_eq!(
            directive,
            "@error \"she said \\\"no\\\" at \\#{line} two\";"
        );
    }

    #[test]
    fn test_compile_simple_scss() {
        let engine = GrassEngine::new();
        let scss = "$primary: #007bff; .btn { color: $primary; }";

        let result = engine.compile_string(scss, &CompileOptions::default(), &[], &[]);

        assert!(result.ok, "compile failed: {}", result.output);
        assert!(result.output.contains(".btn"));
        assert!(result.output.contains("#007bff"));
        assert_eq!(result.source_map, "");
    }

    #[test]
    fn test_compile_compressed() {
        let engine = GrassEngine::new();
        let scss = "$primary: blue;\n\n.btn {\n  color: $primary;\n}";
        let options = CompileOptions {
            output_style: OutputStyle::Compressed,
            ..Default::default()
        };

        let result = engine.compile_string(scss, &options, &[], &[]);

        assert!(result.ok);
        assert!(!result.output.contains("\n\n"));
        assert!(result.output.contains(".btn"));
        assert!(result.output.contains("blue"));
    }

    #[test]
    fn test_compile_error_reports_message() {
        let engine = GrassEngine::new();
        let scss = ".btn { color: $undefined-variable; }";

        let result = engine.compile_string(scss, &CompileOptions::default(), &[], &[]);

        assert!(!result.ok);
        assert!(!result.output.is_empty());
        assert_eq!(result.source_map, "");
    }

    #[test]
    fn test_functions_declined() {
        let engine = GrassEngine::new();
        let functions = vec![
            SassFunction::new("f()", |_: &[sassbind_bridge::HostValue]| {
                Ok(sassbind_bridge::HostValue::Null)
            })
            .unwrap(),
        ];

        let result =
            engine.compile_string("a { b: c; }", &CompileOptions::default(), &functions, &[]);

        assert!(!result.ok);
        assert!(result.output.contains("custom functions"));
    }

    #[test]
    fn test_inline_import_through_fs_adapter() {
        let importers = vec![SassImporter::new(0, |name: &str| {
            if name == "vars" {
                Ok(Some(vec![Import::with_source("vars", "$w: 42px;")]))
            } else {
                Ok(None)
            }
        })];
        let fs = ImporterFs::new(&importers);

        use grass::Fs;
        assert!(fs.is_file(Path::new("vars.scss")));
        assert_eq!(fs.read(Path::new("vars.scss")).unwrap(), b"$w: 42px;");
        assert!(!fs.is_file(Path::new("missing.scss")));
        // Only the plain `.scss` candidate is claimed; the indented and
        // partial variants of the same import are not.
        assert!(!fs.is_file(Path::new("vars.sass")));
        assert!(!fs.is_file(Path::new("_vars.scss")));
    }

    #[test]
    fn test_failed_import_surfaces_from_read() {
        let importers = vec![SassImporter::new(0, |_: &str| Err("backend down".into()))];
        let fs = ImporterFs::new(&importers);

        use grass::Fs;
        assert!(fs.is_file(Path::new("anything.scss")));
        let content = fs.read(Path::new("anything.scss")).unwrap();
        let content = String::from_utf8(content).unwrap();
        assert!(content.starts_with("@error "));
        assert!(content.contains("backend down"));
    }

    #[test]
    fn test_multiple_inline_entries_concatenated() {
        let importers = vec![SassImporter::new(0, |name: &str| {
            Ok(Some(vec![
                Import::with_source(name, "$a: 1;"),
                Import::with_source(name, "$b: 2;"),
            ]))
        })];
        let fs = ImporterFs::new(&importers);

        use grass::Fs;
        let content = fs.read(Path::new("both.scss")).unwrap();
        assert_eq!(content, b"$a: 1;\n$b: 2;");
    }
}
