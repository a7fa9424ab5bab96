//! Teloxide error classification
//!
//! The export pipeline only distinguishes timeouts, which are recoverable
//! at item or part granularity, from everything else, which terminates
//! the job. Collapse teloxide's error surface accordingly.

#[cfg(test)]
#[path = "errors_tests.rs"]
mod errors_tests;

use teloxide::RequestError;

/// Whether `err` is a timeout in the transport sense.
///
/// Flood-control waits are deliberately not timeouts: retrying later
/// would succeed, so they must surface as job-level failures instead of
/// silently dropping items.
pub fn is_timeout(err: &RequestError) -> bool {
    match err {
        RequestError::Network(e) => e.is_timeout(),
        RequestError::Io(e) => e.kind() == std::io::ErrorKind::TimedOut,
        _ => false,
    }
}
