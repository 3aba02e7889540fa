pub mod artifacts;
pub mod backend;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod executor;
pub mod formatter;
pub mod resolution;
pub mod scenario;
pub mod script;
pub mod sink;
pub mod steps;
pub mod verifier;

pub use holdfast_common::formatter::format_result;
pub use holdfast_common::intent;
pub use holdfast_common::locator;
pub use holdfast_common::protocol;
pub use holdfast_common::result;
pub use holdfast_common::roles;
