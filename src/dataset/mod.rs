//! Labeled profiles: the training input of the learner.
//!
//! # Key Components
//!
//! - [`Dataset`]: profiles on a common grade scale with known categories
//! - [`SyntheticGenerator`]: random MR-Sort ground truth ([`HiddenRule`])
//!   and datasets labeled by it, optionally with label noise

mod generator;
mod types;

pub use generator::{GeneratorConfig, HiddenRule, SyntheticGenerator};
pub use types::{Dataset, Grade, ACCEPTED, DEFAULT_GRADE_LEVELS, REJECTED};

pub(crate) use types::check_profile;
