//! Custom importer registration and the importer callback adapter.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! An importer is a host callable invoked when the compiler resolves an
//! `@import` path. It can decline (try the next importer, then the
//! compiler's own file resolution), rewrite the path, or supply the source
//! text (and optionally a source map) inline.
//!
//! The historical wire form was a sequence of 1/2/3-tuples of
//! `(path, source, sourcemap)`. [`Import`] is the typed equivalent, which
//! makes bad arity unrepresentable. The one malformed shape the types still
//! admit (a source map with no inline source) is classified as an importer
//! failure, the same as a host error.
//!
//! Like the function adapter, importer failures never unwind into the
//! compiler: an error or panic in the host callable becomes a single error
//! entry anchored at the path being imported, so the compiler reports it
//! against the right source location.

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use tracing::debug;

use crate::error::{describe_failure, describe_panic};

/// One import result produced by a host importer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// Resolved or rewritten import path
    pub path: String,
    /// Inline source replacing file reading, if supplied
    pub source: Option<String>,
    /// Inline source map, only meaningful together with `source`
    pub source_map: Option<String>,
}

impl Import {
    /// A path rewrite: the compiler reads the file at `path` itself.
    pub fn path(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            source: None,
            source_map: None,
        }
    }

    /// An inline source: `source` replaces reading the file at `path`.
    pub fn with_source(path: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            source: Some(source.into()),
            source_map: None,
        }
    }

    /// An inline source plus an inline source map.
    pub fn with_source_map(
        path: impl Into<String>,
        source: impl Into<String>,
        source_map: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            source: Some(source.into()),
            source_map: Some(source_map.into()),
        }
    }
}

/// An entry handed to the compiler's import machinery. Either a successful
/// import (fields copied out of an [`Import`], storage owned by the entry)
/// or an error anchored at the path that was being imported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEntry {
    /// Import path the entry is anchored at
    pub path: String,
    /// Inline source, if the importer supplied one
    pub source: Option<String>,
    /// Inline source map, if the importer supplied one
    pub source_map: Option<String>,
    /// Failure description, when the importer failed on this path
    pub error: Option<String>,
}

impl ImportEntry {
    fn from_import(import: Import) -> Self {
        Self {
            path: import.path,
            source: import.source,
            source_map: import.source_map,
            error: None,
        }
    }

    /// An error entry anchored at `path`.
    pub fn error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            source: None,
            source_map: None,
            error: Some(message.into()),
        }
    }

    /// Whether this entry carries a failure.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Outcome of asking one importer (or the whole chain) about a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportResolution {
    /// The importer does not handle this path; try the next one, then the
    /// compiler's default file resolution.
    NoMatch,
    /// The importer handled the path. Entries may include error entries.
    Imports(Vec<ImportEntry>),
}

/// Result type host importer callables return. `Ok(None)` means "no match".
pub type ImporterResult = Result<Option<Vec<Import>>, Box<dyn std::error::Error + Send + Sync>>;

/// The host callable behind a registered importer.
pub type ImporterCallable = Arc<dyn Fn(&str) -> ImporterResult + Send + Sync>;

/// A registered custom importer with its chain priority.
pub struct SassImporter {
    priority: i32,
    callable: ImporterCallable,
}

impl fmt::Debug for SassImporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SassImporter")
            .field("priority", &self.priority)
            .field("callable", &"<host fn>")
            .finish()
    }
}

impl SassImporter {
    /// Register a host importer with a chain priority. Higher priorities run
    /// first; ties keep registration order.
    pub fn new<F>(priority: i32, callable: F) -> Self
    where
        F: Fn(&str) -> ImporterResult + Send + Sync + 'static,
    {
        Self {
            priority,
            callable: Arc::new(callable),
        }
    }

    /// This importer's chain priority.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Invoke this importer for `path`.
    ///
    /// Host failures (errors, panics, and the source-map-without-source
    /// shape) produce a single error entry anchored at `path`. Never panics.
    pub fn invoke(&self, path: &str) -> ImportResolution {
        let outcome = catch_unwind(AssertUnwindSafe(|| (self.callable)(path)));

        let imports = match outcome {
            Ok(Ok(None)) => return ImportResolution::NoMatch,
            Ok(Ok(Some(imports))) => imports,
            Ok(Err(err)) => {
                debug!(%path, "importer returned an error");
                return ImportResolution::Imports(vec![ImportEntry::error(
                    path,
                    describe_failure(err.as_ref()),
                )]);
            }
            Err(payload) => {
                debug!(%path, "importer panicked");
                return ImportResolution::Imports(vec![ImportEntry::error(
                    path,
                    describe_panic(payload.as_ref()),
                )]);
            }
        };

        let mut entries = Vec::with_capacity(imports.len());
        for import in imports {
            if import.source_map.is_some() && import.source.is_none() {
                return ImportResolution::Imports(vec![ImportEntry::error(
                    path,
                    format!(
                        "importer returned a source map without an inline source for `{}`",
                        import.path
                    ),
                )]);
            }
            entries.push(ImportEntry::from_import(import));
        }
        ImportResolution::Imports(entries)
    }
}

/// Run the importer chain for `path`.
///
/// Importers are consulted in descending priority (stable, so equal
/// priorities keep registration order); the first importer that does not
/// decline wins. Returns [`ImportResolution::NoMatch`] when every importer
/// declines, telling the compiler to fall back to its own file resolution.
pub fn resolve_import(importers: &[SassImporter], path: &str) -> ImportResolution {
    let mut order: Vec<usize> = (0..importers.len()).collect();
    order.sort_by_key(|&i| std::cmp::Reverse(importers[i].priority()));

    for i in order {
        match importers[i].invoke(path) {
            ImportResolution::NoMatch => continue,
            resolution => return resolution,
        }
    }
    ImportResolution::NoMatch
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_constructors_populate_expected_fields() {
        let p = Import::path("a.scss");
        assert_eq!(p.source, None);
        assert_eq!(p.source_map, None);

        let s = Import::with_source("a.scss", "b { c: d; }");
        assert_eq!(s.source.as_deref(), Some("b { c: d; }"));
        assert_eq!(s.source_map, None);

        let m = Import::with_source_map("a.scss", "b { c: d; }", "{}");
        assert_eq!(m.source_map.as_deref(), Some("{}"));
    }

    #[test]
    fn test_none_result_is_no_match() {
        let importer = SassImporter::new(0, |_| Ok(None));
        assert_eq!(importer.invoke("anything"), ImportResolution::NoMatch);
    }

    #[test]
    fn test_tuple_arities_map_to_entry_fields() {
        let importer = SassImporter::new(0, |path| {
            Ok(Some(vec![
                Import::path(format!("{path}.scss")),
                Import::with_source("inline", "a { b: c; }"),
                Import::with_source_map("mapped", "d { e: f; }", "{\"version\":3}"),
            ]))
        });

        let ImportResolution::Imports(entries) = importer.invoke("base") else {
            panic!("expected imports");
        };
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].path, "base.scss");
        assert!(entries[0].source.is_none());
        assert_eq!(entries[1].source.as_deref(), Some("a { b: c; }"));
        assert!(entries[1].source_map.is_none());
        assert_eq!(entries[2].source_map.as_deref(), Some("{\"version\":3}"));
        assert!(entries.iter().all(|e| !e.is_error()));
    }

    #[test]
    fn test_host_error_anchored_at_import_path() {
        let importer = SassImporter::new(0, |_| Err("no database today".into()));
        let ImportResolution::Imports(entries) = importer.invoke("styles/db") else {
            panic!("expected imports");
        };
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "styles/db");
        assert!(entries[0].error.as_deref().unwrap().contains("no database"));
    }

    #[test]
    fn test_panic_anchored_at_import_path() {
        let importer = SassImporter::new(0, |_| -> ImporterResult { panic!("ouch") });
        let ImportResolution::Imports(entries) = importer.invoke("p") else {
            panic!("expected imports");
        };
        assert!(entries[0].is_error());
        assert!(entries[0].error.as_deref().unwrap().contains("ouch"));
    }

    #[test]
    fn test_source_map_without_source_is_malformed() {
        let importer = SassImporter::new(0, |_| {
            Ok(Some(vec![Import {
                path: "x".to_string(),
                source: None,
                source_map: Some("{}".to_string()),
            }]))
        });
        let ImportResolution::Imports(entries) = importer.invoke("x") else {
            panic!("expected imports");
        };
        assert_eq!(entries.len(), 1);
        assert!(entries[0].is_error());
    }

    #[test]
    fn test_chain_tries_next_importer_on_no_match() {
        let importers = vec![
            SassImporter::new(10, |_| Ok(None)),
            SassImporter::new(5, |path: &str| {
                Ok(Some(vec![Import::with_source(path, "a { b: c; }")]))
            }),
        ];

        let ImportResolution::Imports(entries) = resolve_import(&importers, "theme") else {
            panic!("expected imports");
        };
        assert_eq!(entries[0].source.as_deref(), Some("a { b: c; }"));
    }

    #[test]
    fn test_chain_runs_in_priority_order() {
        let importers = vec![
            SassImporter::new(1, |path: &str| {
                Ok(Some(vec![Import::with_source(path, "low")]))
            }),
            SassImporter::new(9, |path: &str| {
                Ok(Some(vec![Import::with_source(path, "high")]))
            }),
        ];

        let ImportResolution::Imports(entries) = resolve_import(&importers, "theme") else {
            panic!("expected imports");
        };
        assert_eq!(entries[0].source.as_deref(), Some("high"));
    }

    #[test]
    fn test_chain_all_decline() {
        let importers = vec![
            SassImporter::new(2, |_| Ok(None)),
            SassImporter::new(1, |_| Ok(None)),
        ];
        assert_eq!(
            resolve_import(&importers, "theme"),
            ImportResolution::NoMatch
        );
    }
}
