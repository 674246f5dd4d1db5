//! Isolated Chrome sessions driven over the Chrome DevTools Protocol.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐   spawn + DevToolsActivePort   ┌──────────────────┐
//! │  BrowserManager  │ ─────────────────────────────► │  Chrome process  │
//! └──────────────────┘                                │  (temp profile)  │
//!          │                                          └──────────────────┘
//!          ▼                                                   ▲
//! ┌──────────────────┐      CdpClient / PageSession            │
//! │   CdpNavigator   │ ────────────── WebSocket ───────────────┘
//! └──────────────────┘
//! ```
//!
//! Each session gets its own process and profile directory; closing the
//! session kills the process and deletes the profile.

pub mod cdp;
pub mod manager;
pub mod navigator;

pub use cdp::{CdpClient, CdpError, PageSession};
pub use manager::{BrowserError, BrowserInstance, BrowserManager, BrowserManagerConfig};
pub use navigator::{
    CdpNavigator, CdpSessionFactory, Locator, NavigationSession, SessionFactory, UrlCondition,
    poll_until,
};
