pub mod formatter;
pub mod intent;
pub mod locator;
pub mod matching;
pub mod protocol;
pub mod result;
pub mod roles;
