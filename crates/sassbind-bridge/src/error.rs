//! Error types for the value bridge.
//!
//! Copyright (c) 2025 Posit, PBC

use std::any::Any;

use thiserror::Error;

/// Errors raised by the bridge itself (as opposed to failures inside host
/// callables, which are converted into native error values and never surface
/// as `Err`).
#[derive(Debug, Error)]
pub enum BridgeError {
    /// A native value with a tag that cannot be passed to host code appeared
    /// as a function argument. Warnings and errors are one-way; seeing one
    /// here means the caller violated the callback contract.
    #[error("Unexpected sass type: {tag}")]
    UnexpectedTag {
        /// Tag name of the offending value
        tag: &'static str,
    },

    /// A function signature the compiler's convention cannot parse
    /// (expected `name(...)` with a leading identifier).
    #[error("invalid function signature: `{signature}`")]
    InvalidSignature {
        /// The rejected signature text
        signature: String,
    },
}

/// Render a host error with its full cause chain, one cause per line.
///
/// This is the closest analog to the original binding's captured traceback:
/// the complete failure description ends up inside a native error value, so
/// the compiler's own error reporting is the single place it is composed.
pub(crate) fn describe_failure(err: &(dyn std::error::Error + 'static)) -> String {
    let mut description = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        description.push_str("\ncaused by: ");
        description.push_str(&cause.to_string());
        source = cause.source();
    }
    description
}

/// Extract a message from a panic payload.
///
/// Panics carry `&str` or `String` payloads in practice; anything else gets
/// a generic description rather than losing the failure entirely.
pub(crate) fn describe_panic(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "host callable panicked".to_string()
    }
}
