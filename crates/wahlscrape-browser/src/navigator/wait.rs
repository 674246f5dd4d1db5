//! Bounded polling.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use crate::manager::BrowserError;

/// Interval between probes.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Run `probe` until it yields a value or `timeout` elapses.
///
/// The probe always runs at least once, so a zero timeout is a single check.
/// Errors from the probe end the wait immediately.
pub async fn poll_until<T, F, Fut>(
    timeout: Duration,
    what: impl std::fmt::Display,
    mut probe: F,
) -> Result<T, BrowserError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, BrowserError>>,
{
    let deadline = Instant::now() + timeout;

    loop {
        if let Some(value) = probe().await? {
            return Ok(value);
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(BrowserError::Timeout(what.to_string()));
        }

        tokio::time::sleep(POLL_INTERVAL.min(deadline - now)).await;
    }
}
