//! Chrome DevTools Protocol (CDP) client.
//!
//! Connects to a Chrome/Chromium instance over WebSocket and speaks the CDP
//! JSON-RPC protocol. Only the domains the scraper needs are wrapped:
//! `Target` for the page, `Page` for navigation and dialogs, `Runtime` for
//! script evaluation.
//!
//! ```rust,ignore
//! let client = CdpClient::connect("http://127.0.0.1:9222").await?;
//! let page = client.new_page().await?;
//! page.navigate("https://example.org", Duration::from_secs(20)).await?;
//! ```

mod client;
mod error;
mod protocol;
mod session;

pub use client::CdpClient;
pub use error::CdpError;
pub use protocol::{BrowserVersion, DIALOG_OPENING_EVENT, DialogOpening, Event, Incoming, ProtocolFault};
pub use session::PageSession;
