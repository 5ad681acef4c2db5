//! The textual status convention used at the host boundary.
//!
//! Every status starts with `SUCCESS: ` or `ERROR: ` followed by a
//! human-readable message.

use log::error;
use std::any::Any;
use std::fmt::Display;
use std::panic::{self, AssertUnwindSafe};

pub const SUCCESS_PREFIX: &str = "SUCCESS: ";
pub const ERROR_PREFIX: &str = "ERROR: ";

pub fn success(message: impl Display) -> String {
    format!("{}{}", SUCCESS_PREFIX, message)
}

pub fn failure(message: impl Display) -> String {
    format!("{}{}", ERROR_PREFIX, message)
}

pub fn is_success(status: &str) -> bool {
    status.starts_with(SUCCESS_PREFIX)
}

/// `SUCCESS: <message>` for `Ok`, `ERROR: <error>` for `Err`.
pub fn report<T, E: Display>(result: Result<T, E>, message: &str) -> String {
    match result {
        Ok(_) => success(message),
        Err(e) => failure(e),
    }
}

/// Run one host-facing operation; a panic inside it becomes an `ERROR` status.
pub fn guarded(operation: &str, body: impl FnOnce() -> String) -> String {
    panic::catch_unwind(AssertUnwindSafe(body)).unwrap_or_else(|payload| {
        let detail = panic_message(payload.as_ref());
        error!("{} panicked: {}", operation, detail);
        failure(format_args!("internal fault in {}: {}", operation, detail))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
