//! Custom function registration and the function callback adapter.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! A [`SassFunction`] pairs a Sass function signature (the compiler's
//! convention: `name($arg, $other: default)`) with a host callable. During a
//! compile, the engine invokes [`SassFunction::invoke`] once per matching
//! call site. Each invocation is one synchronous round trip: tagged
//! arguments in, host call, tagged result out.
//!
//! The one hard rule is that control never returns to the compiler without a
//! [`Value`]. Argument conversion failures, errors returned by the host
//! callable, and panics inside it are all funneled into `Value::Error`, so a
//! broken host function fails the surrounding compile with a message instead
//! of tearing down the process.

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::convert::{to_host, to_native};
use crate::error::{BridgeError, describe_failure, describe_panic};
use crate::host::HostValue;
use crate::value::Value;

/// Leading identifier of a function signature, e.g. `double` in
/// `double($n)`. Sass identifiers allow hyphens but cannot start with a
/// digit.
static SIGNATURE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(-?[a-zA-Z_][a-zA-Z0-9_-]*)\(.*\)$").unwrap());

/// Result type host callables return. The error side is deliberately open:
/// any error type the host produces is captured with its full cause chain.
pub type HostCallableResult = Result<HostValue, Box<dyn std::error::Error + Send + Sync>>;

/// The host callable behind a registered function.
pub type HostCallable = Arc<dyn Fn(&[HostValue]) -> HostCallableResult + Send + Sync>;

/// A registered custom Sass function.
///
/// Registrations are plain values owned by the caller; they must outlive the
/// compile call they are attached to (the compiler may invoke them at any
/// point during it), which borrowing `&[SassFunction]` for the call enforces.
pub struct SassFunction {
    signature: String,
    name: String,
    callable: HostCallable,
}

impl fmt::Debug for SassFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SassFunction")
            .field("signature", &self.signature)
            .field("callable", &"<host fn>")
            .finish()
    }
}

impl SassFunction {
    /// Register a host callable under a Sass function signature.
    ///
    /// The signature text is passed through to the compiler unmodified; only
    /// the leading name is parsed out here, for engines that key call sites
    /// by function name.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidSignature`] if no leading identifier
    /// followed by a parameter list can be found.
    pub fn new<F>(signature: impl Into<String>, callable: F) -> Result<Self, BridgeError>
    where
        F: Fn(&[HostValue]) -> HostCallableResult + Send + Sync + 'static,
    {
        let signature = signature.into();
        let name = SIGNATURE_NAME
            .captures(&signature)
            .map(|caps| caps[1].to_string())
            .ok_or_else(|| BridgeError::InvalidSignature {
                signature: signature.clone(),
            })?;

        Ok(Self {
            signature,
            name,
            callable: Arc::new(callable),
        })
    }

    /// The full signature as registered, e.g. `double($n)`.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// The function name parsed from the signature, e.g. `double`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// One synchronous callback round trip.
    ///
    /// Converts every argument to the host representation (positions
    /// preserved), calls the host callable, and converts the result back.
    /// Every failure mode yields a `Value::Error`; this function never
    /// panics and never returns without a value.
    pub fn invoke(&self, args: &[Value]) -> Value {
        let mut host_args = Vec::with_capacity(args.len());
        for arg in args {
            match to_host(arg) {
                Ok(value) => host_args.push(value),
                Err(err) => {
                    debug!(function = %self.name, %err, "argument conversion failed");
                    return Value::Error(format!(
                        "error in custom function `{}`: {err}",
                        self.signature
                    ));
                }
            }
        }

        let outcome = catch_unwind(AssertUnwindSafe(|| (self.callable)(&host_args)));

        match outcome {
            Ok(Ok(result)) => to_native(&result),
            Ok(Err(err)) => {
                debug!(function = %self.name, "host function returned an error");
                Value::Error(format!(
                    "error in custom function `{}`: {}",
                    self.signature,
                    describe_failure(err.as_ref())
                ))
            }
            Err(payload) => {
                debug!(function = %self.name, "host function panicked");
                Value::Error(format!(
                    "error in custom function `{}`: {}",
                    self.signature,
                    describe_panic(payload.as_ref())
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::SassNumber;
    use crate::value::Separator;

    fn double() -> SassFunction {
        SassFunction::new("double($n)", |args: &[HostValue]| {
            let HostValue::Number(n) = &args[0] else {
                return Err("expected a number".into());
            };
            Ok(HostValue::Number(SassNumber::new(
                n.value * 2.0,
                n.unit.clone(),
            )))
        })
        .unwrap()
    }

    #[test]
    fn test_signature_name_parsing() {
        let f = double();
        assert_eq!(f.name(), "double");
        assert_eq!(f.signature(), "double($n)");

        let f = SassFunction::new("grid-width($n: 1)", |_| Ok(HostValue::Null)).unwrap();
        assert_eq!(f.name(), "grid-width");
    }

    #[test]
    fn test_invalid_signatures_rejected() {
        for signature in ["", "noparens", "3bad($n)", "($n)"] {
            let result = SassFunction::new(signature, |_| Ok(HostValue::Null));
            assert!(
                matches!(result, Err(BridgeError::InvalidSignature { .. })),
                "expected `{signature}` to be rejected"
            );
        }
    }

    #[test]
    fn test_invoke_converts_both_directions() {
        let f = double();
        let result = f.invoke(&[Value::number(2.0, "px")]);
        assert_eq!(result, Value::number(4.0, "px"));
    }

    #[test]
    fn test_invoke_preserves_argument_positions() {
        let f = SassFunction::new("second($a, $b)", |args: &[HostValue]| {
            Ok(args[1].clone())
        })
        .unwrap();
        let result = f.invoke(&[Value::string("first"), Value::string("second")]);
        assert_eq!(result, Value::string("second"));
    }

    #[test]
    fn test_host_error_becomes_error_value() {
        let f = SassFunction::new("fail()", |_: &[HostValue]| Err("it broke".into())).unwrap();
        let result = f.invoke(&[]);
        let Value::Error(msg) = result else {
            panic!("expected error value");
        };
        assert!(msg.contains("fail()"));
        assert!(msg.contains("it broke"));
    }

    #[test]
    fn test_host_panic_is_contained() {
        let f = SassFunction::new("explode()", |_: &[HostValue]| -> HostCallableResult {
            panic!("kaboom");
        })
        .unwrap();
        let result = f.invoke(&[]);
        let Value::Error(msg) = result else {
            panic!("expected error value");
        };
        assert!(msg.contains("kaboom"));
    }

    #[test]
    fn test_illegal_argument_tag_becomes_error_value() {
        // Warning/error tags are not legal arguments; the adapter reports
        // the contract violation through the same error path.
        let f = double();
        let result = f.invoke(&[Value::Warning("w".to_string())]);
        let Value::Error(msg) = result else {
            panic!("expected error value");
        };
        assert!(msg.contains("Unexpected sass type"));
    }

    #[test]
    fn test_host_function_may_return_error_explicitly() {
        let f = SassFunction::new("deliberate()", |_: &[HostValue]| {
            Ok(HostValue::Error(crate::host::SassError::new("on purpose")))
        })
        .unwrap();
        assert_eq!(f.invoke(&[]), Value::Error("on purpose".to_string()));
    }
}
