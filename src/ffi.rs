//! C ABI for evaluating plans from other languages.
//!
//! Instances and configurations cross the boundary as JSON, plans in their
//! text encoding. Every call returns a heap-allocated JSON string
//!
//! ```json
//! {"feasible": true, "objective": 12.5, "error": null}
//! ```
//!
//! which the caller must release with [`strpd_string_free`]. Bad input is
//! reported in `error` with `feasible = false`; panics never unwind into the
//! caller.

use std::ffi::{CStr, CString};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::ptr;

use libc::c_char;
use serde::Serialize;

use crate::config::OracleConfig;
use crate::evaluation::{EvaluationResult, Oracle};
use crate::models::Instance;

#[derive(Debug, Serialize)]
struct Response {
    feasible: bool,
    objective: f64,
    error: Option<String>,
}

impl Response {
    fn from_outcome(outcome: Result<EvaluationResult, String>) -> Self {
        match outcome {
            Ok(result) => Self {
                feasible: result.feasible,
                objective: result.objective,
                error: None,
            },
            Err(error) => Self {
                feasible: false,
                objective: 0.0,
                error: Some(error),
            },
        }
    }

    fn into_raw(self) -> *mut c_char {
        serde_json::to_string(&self)
            .ok()
            .and_then(|json| CString::new(json).ok())
            .map_or(ptr::null_mut(), CString::into_raw)
    }
}

/// Reads a NUL-terminated UTF-8 argument.
///
/// # Safety
///
/// `ptr` must be null or point to a NUL-terminated string that outlives `'a`.
unsafe fn read_arg<'a>(ptr: *const c_char, name: &str) -> Result<&'a str, String> {
    if ptr.is_null() {
        return Err(format!("{name} is null"));
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map_err(|e| format!("{name} is not valid UTF-8: {e}"))
}

fn evaluate(
    instance_json: &str,
    config_json: Option<&str>,
    plan_text: &str,
) -> Result<EvaluationResult, String> {
    let instance: Instance =
        serde_json::from_str(instance_json).map_err(|e| format!("invalid instance: {e}"))?;
    let config: OracleConfig = match config_json {
        Some(json) => serde_json::from_str(json).map_err(|e| format!("invalid config: {e}"))?,
        None => OracleConfig::default(),
    };
    let oracle = Oracle::with_config(&instance, config).map_err(|e| e.to_string())?;
    oracle
        .evaluate_str(plan_text)
        .map_err(|e| format!("invalid plan: {e}"))
}

fn guarded(f: impl FnOnce() -> Result<EvaluationResult, String>) -> *mut c_char {
    let outcome = catch_unwind(AssertUnwindSafe(f))
        .unwrap_or_else(|_| Err("internal error: evaluation panicked".to_string()));
    Response::from_outcome(outcome).into_raw()
}

/// Evaluates a plan against a JSON instance with the default configuration.
///
/// # Safety
///
/// Both arguments must be null or valid NUL-terminated strings. The returned
/// pointer must be freed with [`strpd_string_free`].
#[no_mangle]
pub unsafe extern "C" fn strpd_evaluate(
    instance_json: *const c_char,
    plan_text: *const c_char,
) -> *mut c_char {
    guarded(|| {
        let instance = read_arg(instance_json, "instance_json")?;
        let plan = read_arg(plan_text, "plan_text")?;
        evaluate(instance, None, plan)
    })
}

/// Evaluates a plan against a JSON instance with a JSON [`OracleConfig`].
///
/// Fields missing from the configuration take their defaults.
///
/// # Safety
///
/// All arguments must be null or valid NUL-terminated strings. The returned
/// pointer must be freed with [`strpd_string_free`].
#[no_mangle]
pub unsafe extern "C" fn strpd_evaluate_with_config(
    instance_json: *const c_char,
    config_json: *const c_char,
    plan_text: *const c_char,
) -> *mut c_char {
    guarded(|| {
        let instance = read_arg(instance_json, "instance_json")?;
        let config = read_arg(config_json, "config_json")?;
        let plan = read_arg(plan_text, "plan_text")?;
        evaluate(instance, Some(config), plan)
    })
}

/// Frees a string returned by this library. Null is ignored.
///
/// # Safety
///
/// `ptr` must come from a `strpd_*` call and not have been freed already.
#[no_mangle]
pub unsafe extern "C" fn strpd_string_free(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}
