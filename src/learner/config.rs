//! Learner configuration.

use crate::encoding::{ClauseSet, Weighting};

/// Whether data-fit clauses may be violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EncodingMode {
    /// Plain SAT: every training entity must be restored exactly, otherwise
    /// the instance is unsatisfiable.
    #[default]
    Sat,
    /// Weighted MaxSAT: consistency clauses are soft, so the oracle returns
    /// the model that violates the least soft weight.
    MaxSat,
}

/// Configuration for [`SortingLearner`](super::SortingLearner).
///
/// # Examples
///
/// ```
/// use u_mrsort::learner::{EncodingMode, LearnerConfig};
///
/// let config = LearnerConfig::default()
///     .with_mode(EncodingMode::MaxSat)
///     .with_soft_weight(2);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LearnerConfig {
    /// SAT or MaxSAT encoding.
    pub mode: EncodingMode,

    /// Weight of each consistency clause in MaxSAT mode.
    pub soft_weight: u64,

    /// Weight of each well-formedness clause in MaxSAT mode.
    ///
    /// `None` = total soft weight + 1.
    pub hard_weight: Option<u64>,

    /// Check threshold, boundary and coalition monotonicity of the returned
    /// assignment before decoding.
    pub verify_model: bool,
}

impl Default for LearnerConfig {
    fn default() -> Self {
        Self {
            mode: EncodingMode::Sat,
            soft_weight: 1,
            hard_weight: None,
            verify_model: true,
        }
    }
}

impl LearnerConfig {
    pub fn with_mode(mut self, mode: EncodingMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_soft_weight(mut self, w: u64) -> Self {
        self.soft_weight = w;
        self
    }

    pub fn with_hard_weight(mut self, w: u64) -> Self {
        self.hard_weight = Some(w);
        self
    }

    pub fn with_verify_model(mut self, verify: bool) -> Self {
        self.verify_model = verify;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.soft_weight == 0 {
            return Err("soft_weight must be positive".into());
        }
        if let Some(hard) = self.hard_weight {
            if hard <= self.soft_weight {
                return Err(format!(
                    "hard_weight must exceed soft_weight ({hard} <= {})",
                    self.soft_weight
                ));
            }
        }
        Ok(())
    }

    /// Weighting to hand the oracle for `clauses`.
    pub fn weighting(&self, clauses: &ClauseSet) -> Weighting {
        match self.mode {
            EncodingMode::Sat => Weighting::Unweighted,
            EncodingMode::MaxSat => clauses.weighted(self.soft_weight, self.hard_weight),
        }
    }
}
