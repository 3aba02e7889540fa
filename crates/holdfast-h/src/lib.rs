//! Chromium backend driven over the DevTools protocol.

pub mod backend;
pub mod cdp;

pub use backend::HeadlessBackend;
