//! Value bridge and callback adapters for embedded Sass compilation.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! This crate is the boundary layer between host application code and a Sass
//! compiler engine:
//!
//! - A tagged value model ([`Value`]) mirroring the compiler's own value
//!   union, and a host-side shape enumeration ([`HostValue`]) with the Sass
//!   wrapper types.
//! - Bidirectional converters ([`to_native`], [`to_host`]) that preserve
//!   list order, map entry order, and separators exactly.
//! - Callback adapters ([`SassFunction`], [`SassImporter`]) that let a
//!   compiler re-enter host code during a synchronous compile, with total
//!   error containment: host failures become native error values, never
//!   unwinds into the compiler.
//!
//! Compilation itself lives in `sassbind-runtime`; this crate knows nothing
//! about any particular engine.

mod convert;
mod error;
mod functions;
mod host;
mod importers;
mod value;

pub use convert::{to_host, to_native};
pub use error::BridgeError;
pub use functions::{HostCallable, HostCallableResult, SassFunction};
pub use host::{
    HostValue, SassColor, SassError, SassList, SassMap, SassNumber, SassWarning,
};
pub use importers::{
    Import, ImportEntry, ImportResolution, ImporterCallable, ImporterResult, SassImporter,
    resolve_import,
};
pub use value::{Separator, Value};
