//! Natural-language steps mapped onto executor calls.

pub mod builtin;
pub mod registry;

pub use builtin::registration_steps;
pub use registry::{StepCommand, StepError, StepRegistry};
