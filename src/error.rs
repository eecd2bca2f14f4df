//! Error types for encoding, solving and decoding.
//!
//! Input and invariant failures surface as [`SortError`] and abort the call.
//! Failures at the oracle process boundary are [`OracleError`]s; the learner
//! recovers those into a structured outcome instead of propagating them.

use miette::Diagnostic;
use thiserror::Error;

/// Errors raised while validating input, encoding, or decoding.
#[derive(Debug, Error, Diagnostic)]
pub enum SortError {
    #[error("entity {entity}: grade {grade} on criterion {criterion} is outside [0, {levels})")]
    #[diagnostic(
        code(u_mrsort::grade_out_of_range),
        help("Every grade must lie in [0, grade_levels). Raise grade_levels or clamp the input.")
    )]
    GradeOutOfRange {
        entity: usize,
        criterion: usize,
        grade: u32,
        levels: u32,
    },

    #[error("entity {entity}: profile has {actual} grades, expected {expected}")]
    #[diagnostic(
        code(u_mrsort::profile_length),
        help("All profiles must carry exactly one grade per criterion.")
    )]
    ProfileLength {
        entity: usize,
        expected: usize,
        actual: usize,
    },

    #[error("entity {entity}: category {category} is outside [0, {boundaries}]")]
    #[diagnostic(
        code(u_mrsort::category_out_of_range),
        help("With H boundaries, categories are numbered 0 (lowest) to H (highest).")
    )]
    CategoryOutOfRange {
        entity: usize,
        category: usize,
        boundaries: usize,
    },

    #[error("{criteria} criteria requested, at most {max} are supported")]
    #[diagnostic(
        code(u_mrsort::too_many_criteria),
        help("The coalition space grows as 2^G; the encoding is only practical for small G.")
    )]
    TooManyCriteria { criteria: usize, max: usize },

    #[error("unknown variable: {0}")]
    #[diagnostic(
        code(u_mrsort::unknown_variable),
        help("The variable index is closed over its layout; this indicates an encoding bug.")
    )]
    UnknownVariable(String),

    #[error("assignment has no value for {variable}")]
    #[diagnostic(
        code(u_mrsort::incomplete_model),
        help("The oracle returned a partial model. Check that it prints every variable.")
    )]
    IncompleteModel { variable: String },

    #[error("assignment violates model well-formedness: {reason}")]
    #[diagnostic(
        code(u_mrsort::inconsistent_model),
        help("Hard clauses guarantee monotonicity; an oracle model breaking it is not trustworthy.")
    )]
    InconsistentModel { reason: String },

    #[error("invalid configuration: {0}")]
    #[diagnostic(code(u_mrsort::invalid_config))]
    InvalidConfig(String),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Oracle(#[from] OracleError),
}

/// Failures at the boundary with the external solver.
#[derive(Debug, Error, Diagnostic)]
pub enum OracleError {
    #[error("could not launch oracle '{program}': {source}")]
    #[diagnostic(
        code(u_mrsort::oracle::unavailable),
        help("Check that the solver executable exists and is on PATH.")
    )]
    Unavailable {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("oracle did not answer within {limit_ms} ms")]
    #[diagnostic(
        code(u_mrsort::oracle::timeout),
        help("Raise time_limit_ms or reduce the number of criteria.")
    )]
    Timeout { limit_ms: u64 },

    #[error("malformed oracle response: {message}")]
    #[diagnostic(code(u_mrsort::oracle::protocol))]
    Protocol { message: String },

    #[error("instance has {variables} variables, oracle accepts at most {limit}")]
    #[diagnostic(
        code(u_mrsort::oracle::too_large),
        help("The exhaustive oracle is for tiny instances; use a ProcessOracle instead.")
    )]
    TooLarge { variables: u32, limit: u32 },

    #[error("exchange file i/o failed: {0}")]
    #[diagnostic(code(u_mrsort::oracle::io))]
    Io(#[from] std::io::Error),
}

impl OracleError {
    pub(crate) fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }
}

/// Result alias used across the crate.
pub type SortResult<T> = std::result::Result<T, SortError>;
