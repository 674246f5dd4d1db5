//! Page session state, command dispatch and dialog events.

use serde_json::{Value, json};
use tokio::sync::mpsc;
use tracing::debug;

use crate::cdp::client::Wire;
use crate::cdp::error::CdpError;
use crate::cdp::protocol::Event;

/// Flattened CDP session attached to the one page of a browser process.
pub struct PageSession {
    pub(super) session_id: String,
    pub(super) wire: Wire,
    pub(super) events: tokio::sync::Mutex<mpsc::UnboundedReceiver<Event>>,
}

impl PageSession {
    pub(crate) fn new(
        session_id: String,
        wire: Wire,
        events: mpsc::UnboundedReceiver<Event>,
    ) -> Self {
        Self {
            session_id,
            wire,
            events: tokio::sync::Mutex::new(events),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Send a command scoped to this page.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.wire
            .call(method, params, Some(&self.session_id))
            .await
    }

    pub(crate) async fn enable_domains(&self) -> Result<(), CdpError> {
        self.call("Page.enable", None).await?;
        self.call("Runtime.enable", None).await?;
        Ok(())
    }

    /// Wait for the next dialog, discarding other events. Pends forever once
    /// the event channel is closed.
    pub(crate) async fn next_dialog(&self) -> String {
        let mut events = self.events.lock().await;
        while let Some(event) = events.recv().await {
            if let Some(message) = event.dialog_message() {
                return message;
            }
        }
        drop(events);
        std::future::pending().await
    }

    /// Drain queued events and report the first dialog, if any.
    pub async fn pending_dialog(&self) -> Option<String> {
        let mut events = self.events.lock().await;
        let mut found = None;
        while let Ok(event) = events.try_recv() {
            if found.is_none() {
                found = event.dialog_message();
            }
        }
        found
    }

    pub async fn accept_dialog(&self) -> Result<(), CdpError> {
        self.call(
            "Page.handleJavaScriptDialog",
            Some(json!({ "accept": true })),
        )
        .await?;
        debug!("Accepted dialog on {}", self.session_id);
        Ok(())
    }
}
