//! Page navigation.

use std::time::{Duration, Instant};

use serde_json::json;
use tracing::debug;

use crate::cdp::error::CdpError;

use super::core::PageSession;

const READY_POLL: Duration = Duration::from_millis(100);

impl PageSession {
    /// Navigate and wait until the new document is at least interactive.
    pub async fn navigate(&self, url: &str, load_timeout: Duration) -> Result<(), CdpError> {
        let result = self
            .call("Page.navigate", Some(json!({ "url": url })))
            .await?;

        if let Some(reason) = Self::navigation_error(&result) {
            return Err(CdpError::NavigationFailed {
                url: url.to_string(),
                reason,
            });
        }

        self.wait_until_ready(load_timeout).await?;
        debug!("Loaded {}", url);
        Ok(())
    }

    async fn wait_until_ready(&self, timeout: Duration) -> Result<(), CdpError> {
        let start = Instant::now();
        loop {
            let state = self.evaluate_string("document.readyState").await?;
            if Self::is_loaded(&state) {
                return Ok(());
            }
            if start.elapsed() > timeout {
                return Err(CdpError::Timeout(format!(
                    "document still '{}' after {:?}",
                    state, timeout
                )));
            }
            tokio::time::sleep(READY_POLL).await;
        }
    }

    /// `Page.navigate` reports network failures in the reply, not as a fault.
    pub(crate) fn navigation_error(result: &serde_json::Value) -> Option<String> {
        result
            .get("errorText")
            .and_then(|e| e.as_str())
            .filter(|e| !e.is_empty())
            .map(str::to_string)
    }

    pub(crate) fn is_loaded(ready_state: &str) -> bool {
        matches!(ready_state, "complete" | "interactive")
    }
}
