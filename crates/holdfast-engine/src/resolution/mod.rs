//! Turning a locator candidate into a live element.

pub mod association;
pub mod engine;

pub use association::{AssociationResult, find_associated_control};
pub use engine::{FORM_CONTROLS, Probe, resolve_once, resolve_within, satisfies};
