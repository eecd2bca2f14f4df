//! Learning a sorting model end to end.
//!
//! # Key Components
//!
//! - **Configuration**: [`LearnerConfig`], [`EncodingMode`]
//! - **Runner**: [`SortingLearner`] builds the variable index and clause
//!   set, calls the oracle and decodes its answer
//! - **Results**: [`TrainReport`], [`TrainOutcome`]
//!
//! # Design
//!
//! The learner is oracle-agnostic: any [`Oracle`](crate::oracle::Oracle)
//! works, from an external MaxSAT executable to the in-process exhaustive
//! search. Oracle failures come back as [`TrainOutcome::OracleFailed`] so a
//! batch of runs can continue past a crashed or timed-out solver.

mod config;
mod runner;
mod types;

pub use config::{EncodingMode, LearnerConfig};
pub use runner::SortingLearner;
pub use types::{TrainOutcome, TrainReport};
