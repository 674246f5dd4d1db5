//! Browser process manager.
//!
//! Every [`BrowserManager::launch`] starts a dedicated Chrome process bound to a
//! fresh temporary profile directory. The returned [`BrowserInstance`] owns the
//! process, the profile and the CDP connection; shutting it down kills the
//! process and removes the profile.

mod manager_core;
mod manager_types;

pub use manager_core::{BrowserInstance, BrowserManager};
pub use manager_types::{BrowserError, BrowserManagerConfig};

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
