//! Results of a training call.

use crate::error::OracleError;
use crate::model::{Evaluation, SortingModel};
use std::time::Duration;

/// What the oracle's answer amounted to.
#[derive(Debug)]
pub enum TrainOutcome {
    /// A model was found and decoded.
    Model {
        model: SortingModel,
        /// Predicted category of each training entity.
        predictions: Vec<usize>,
        /// Predictions against the training labels.
        evaluation: Evaluation,
        /// Violated soft weight, when the oracle reported it.
        cost: Option<u64>,
    },
    /// No model is consistent with the hard clauses (and, in SAT mode, with
    /// every training label).
    Unsatisfiable,
    /// The oracle could not be run or its answer could not be read.
    OracleFailed(OracleError),
}

/// Result of [`SortingLearner::train`](super::SortingLearner::train).
#[derive(Debug)]
pub struct TrainReport {
    pub outcome: TrainOutcome,

    /// Variables declared in the instance.
    pub num_variables: u32,

    /// Clauses emitted, hard and soft.
    pub num_clauses: usize,

    /// Wall time spent inside the oracle.
    pub oracle_elapsed: Duration,
}

impl TrainReport {
    /// The learned model, if one was found.
    pub fn model(&self) -> Option<&SortingModel> {
        match &self.outcome {
            TrainOutcome::Model { model, .. } => Some(model),
            _ => None,
        }
    }

    pub fn evaluation(&self) -> Option<&Evaluation> {
        match &self.outcome {
            TrainOutcome::Model { evaluation, .. } => Some(evaluation),
            _ => None,
        }
    }

    pub fn is_unsatisfiable(&self) -> bool {
        matches!(self.outcome, TrainOutcome::Unsatisfiable)
    }
}
