//! [`NavigationSession`] over a CDP-controlled Chrome process.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::locator::{Locator, UrlCondition};
use super::script::{self, ElementProbe};
use super::traits::{NavigationSession, SessionFactory};
use super::wait::poll_until;
use crate::cdp::{CdpError, PageSession};
use crate::manager::{BrowserError, BrowserInstance, BrowserManager};

/// A live browser session. The browser is shut down by [`NavigationSession::close`]
/// or, failing that, when the value is dropped.
pub struct CdpNavigator {
    instance: Mutex<Option<BrowserInstance>>,
    page_load_timeout: Duration,
}

impl CdpNavigator {
    pub fn new(instance: BrowserInstance, page_load_timeout: Duration) -> Self {
        Self {
            instance: Mutex::new(Some(instance)),
            page_load_timeout,
        }
    }

    /// Map a CDP error, accepting the dialog that caused it if any.
    async fn settle(page: &PageSession, err: CdpError) -> BrowserError {
        if let CdpError::DialogOpened(message) = &err {
            debug!("Accepting dialog: {}", message);
            if let Err(e) = page.accept_dialog().await {
                warn!("Failed to accept dialog: {}", e);
            }
        }
        err.into()
    }

    async fn eval(&self, expression: &str) -> Result<Value, BrowserError> {
        let guard = self.instance.lock().await;
        let page = guard.as_ref().ok_or(BrowserError::NotConnected)?.page();

        if let Some(message) = page.pending_dialog().await {
            return Err(Self::settle(page, CdpError::DialogOpened(message)).await);
        }

        match page.evaluate(expression).await {
            Ok(value) => Ok(value),
            Err(e) => Err(Self::settle(page, e).await),
        }
    }

    async fn probe(&self, locator: &Locator, body: &str) -> Result<Option<Value>, BrowserError> {
        let raw = self.eval(&script::with_element(locator, body)).await?;
        let probe: ElementProbe = serde_json::from_value(raw)
            .map_err(|e| BrowserError::ActionFailed(format!("unexpected probe result: {}", e)))?;
        Ok(probe.into_value())
    }

    async fn require(&self, locator: &Locator, body: &str) -> Result<Value, BrowserError> {
        self.probe(locator, body)
            .await?
            .ok_or_else(|| BrowserError::ElementNotFound(locator.to_string()))
    }
}

#[async_trait]
impl NavigationSession for CdpNavigator {
    async fn goto(&self, url: &str) -> Result<(), BrowserError> {
        let guard = self.instance.lock().await;
        let page = guard.as_ref().ok_or(BrowserError::NotConnected)?.page();

        match tokio::time::timeout(self.page_load_timeout, page.navigate(url, self.page_load_timeout))
            .await
        {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(Self::settle(page, e).await),
            Err(_) => Err(BrowserError::Timeout(format!("page load of {}", url))),
        }
    }

    async fn current_url(&self) -> Result<String, BrowserError> {
        let value = self.eval("window.location.href").await?;
        Ok(value.as_str().unwrap_or("").to_string())
    }

    async fn title(&self) -> Result<String, BrowserError> {
        let value = self.eval("document.title").await?;
        Ok(value.as_str().unwrap_or("").to_string())
    }

    async fn wait_any_present(
        &self,
        locators: &[Locator],
        timeout: Duration,
    ) -> Result<usize, BrowserError> {
        let expression = script::first_present(locators);
        let expression = expression.as_str();
        let what = locators
            .iter()
            .map(Locator::to_string)
            .collect::<Vec<_>>()
            .join(" or ");

        poll_until(timeout, what, move || async move {
            let index = self.eval(expression).await?.as_i64().unwrap_or(-1);
            Ok(usize::try_from(index).ok())
        })
        .await
    }

    async fn wait_clickable(&self, locator: &Locator, timeout: Duration) -> Result<(), BrowserError> {
        poll_until(timeout, format!("{} to be clickable", locator), move || async move {
            let clickable = self.probe(locator, script::CLICKABLE).await?;
            Ok(clickable.and_then(|v| v.as_bool()).filter(|c| *c).map(|_| ()))
        })
        .await
    }

    async fn wait_url(
        &self,
        condition: &UrlCondition,
        timeout: Duration,
    ) -> Result<String, BrowserError> {
        poll_until(timeout, condition, move || async move {
            let url = self.current_url().await?;
            Ok(condition.matches(&url).then_some(url))
        })
        .await
    }

    async fn exists(&self, locator: &Locator) -> Result<bool, BrowserError> {
        Ok(self.probe(locator, "true").await?.is_some())
    }

    async fn text(&self, locator: &Locator) -> Result<String, BrowserError> {
        let value = self.require(locator, script::TEXT).await?;
        Ok(value.as_str().unwrap_or("").to_string())
    }

    async fn href(&self, locator: &Locator) -> Result<Option<String>, BrowserError> {
        let value = self.require(locator, script::HREF).await?;
        Ok(value.as_str().map(str::to_string))
    }

    async fn scroll_into_view(&self, locator: &Locator) -> Result<(), BrowserError> {
        self.require(locator, script::SCROLL_INTO_VIEW).await?;
        Ok(())
    }

    async fn click(&self, locator: &Locator) -> Result<(), BrowserError> {
        self.require(locator, script::CLICK).await?;
        debug!("Clicked {}", locator);
        Ok(())
    }

    async fn content(&self) -> Result<String, BrowserError> {
        let value = self.eval("document.documentElement.outerHTML").await?;
        Ok(value.as_str().unwrap_or("").to_string())
    }

    async fn close(&self) {
        if let Some(instance) = self.instance.lock().await.take() {
            instance.shutdown().await;
        }
    }
}

/// Launches one Chrome process per session.
pub struct CdpSessionFactory {
    manager: BrowserManager,
}

impl CdpSessionFactory {
    pub fn new(manager: BrowserManager) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl SessionFactory for CdpSessionFactory {
    async fn open(&self) -> Result<Box<dyn NavigationSession>, BrowserError> {
        let instance = self.manager.launch().await?;
        let timeout = self.manager.config().page_load_timeout;
        Ok(Box::new(CdpNavigator::new(instance, timeout)))
    }
}
