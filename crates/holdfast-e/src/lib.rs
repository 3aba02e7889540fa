//! WebDriver backend for Firefox and WebKit runs.

pub mod backend;
pub mod webdriver;

pub use backend::WebDriverBackend;
