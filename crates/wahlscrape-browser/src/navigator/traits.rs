//! Navigation session abstraction.

use std::time::Duration;

use async_trait::async_trait;

use super::locator::{Locator, UrlCondition};
use crate::manager::BrowserError;

/// One browser session bound to one isolated profile.
///
/// All waits are bounded; an elapsed wait returns [`BrowserError::Timeout`].
/// A JavaScript dialog encountered by any operation is accepted and reported
/// as [`BrowserError::UnexpectedDialog`].
#[async_trait]
pub trait NavigationSession: Send + Sync {
    /// Load `url` and wait for the document.
    async fn goto(&self, url: &str) -> Result<(), BrowserError>;

    async fn current_url(&self) -> Result<String, BrowserError>;

    async fn title(&self) -> Result<String, BrowserError>;

    /// Wait until any locator matches; returns the position of the first match.
    async fn wait_any_present(
        &self,
        locators: &[Locator],
        timeout: Duration,
    ) -> Result<usize, BrowserError>;

    async fn wait_present(&self, locator: &Locator, timeout: Duration) -> Result<(), BrowserError> {
        self.wait_any_present(std::slice::from_ref(locator), timeout)
            .await
            .map(|_| ())
    }

    /// Wait until the element is rendered and enabled.
    async fn wait_clickable(&self, locator: &Locator, timeout: Duration)
    -> Result<(), BrowserError>;

    /// Wait for the page address to satisfy `condition`; returns the address.
    async fn wait_url(
        &self,
        condition: &UrlCondition,
        timeout: Duration,
    ) -> Result<String, BrowserError>;

    /// Immediate existence check.
    async fn exists(&self, locator: &Locator) -> Result<bool, BrowserError>;

    /// Trimmed element text.
    async fn text(&self, locator: &Locator) -> Result<String, BrowserError>;

    /// Absolute link address, `None` when the element has none.
    async fn href(&self, locator: &Locator) -> Result<Option<String>, BrowserError>;

    async fn scroll_into_view(&self, locator: &Locator) -> Result<(), BrowserError>;

    /// Script-driven click.
    async fn click(&self, locator: &Locator) -> Result<(), BrowserError>;

    /// Serialized HTML of the current document.
    async fn content(&self) -> Result<String, BrowserError>;

    /// Tear the session down. Idempotent.
    async fn close(&self);
}

/// Opens fresh sessions, one per attempt.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn open(&self) -> Result<Box<dyn NavigationSession>, BrowserError>;
}
