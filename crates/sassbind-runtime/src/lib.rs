//! Engine abstraction and compile orchestration for embedded Sass.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! This crate provides:
//! - The [`SassEngine`] trait and its option/result vocabulary
//!   ([`CompileOptions`], [`CompileResult`], [`OutputStyle`],
//!   [`SourceComments`])
//! - [`GrassEngine`], the default engine backed by the grass crate, with
//!   importer-chain `@import` resolution
//! - The [`compile_string`] / [`compile_filename`] entry points
//!
//! Value marshalling and the callback adapters live in `sassbind-bridge`.

mod compile;
mod engine;
mod grass_native;

pub use compile::{
    compile_filename, compile_filename_with_engine, compile_string, compile_string_with_engine,
};
pub use engine::{
    CompileOptions, CompileResult, OptionsError, OutputStyle, SassEngine, SourceComments, and_join,
};
pub use grass_native::{GrassEngine, ImporterFs};
