//! The attached page: commands, script evaluation, navigation and dialogs.

mod core;
mod js;
mod navigation;

pub use self::core::PageSession;

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
