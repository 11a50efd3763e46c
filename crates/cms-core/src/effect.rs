//! Non-fatal effects
//!
//! Best-effort steps (alias normalization, schema compilation, audit writes)
//! go through these combinators: a failure is logged as a warning and turned
//! into `None`, never propagated.

use std::fmt::Display;
use std::future::Future;

/// Run a best-effort step, logging and discarding its error
pub fn non_fatal<T, E: Display>(effect: &str, result: Result<T, E>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(effect, error = %err, "non-fatal effect failed");
            None
        }
    }
}

/// Await a best-effort step, logging and discarding its error
pub async fn non_fatal_async<T, E, F>(effect: &str, future: F) -> Option<T>
where
    E: Display,
    F: Future<Output = Result<T, E>>,
{
    non_fatal(effect, future.await)
}
