//! Element-level navigation on top of the CDP page session.
//!
//! [`NavigationSession`] is the seam the scraper is written against;
//! [`CdpNavigator`] implements it with a real browser.

mod cdp_navigator;
mod locator;
pub mod script;
mod traits;
mod wait;

pub use cdp_navigator::{CdpNavigator, CdpSessionFactory};
pub use locator::{Locator, UrlCondition};
pub use traits::{NavigationSession, SessionFactory};
pub use wait::{POLL_INTERVAL, poll_until};
