//! SAT/MaxSAT learning of non-compensatory sorting models.
//!
//! Learns an MR-Sort rule (U-B-MR-Sort: unanimous, binary or multi-category)
//! from entities graded on several criteria and labeled with a category:
//!
//! - **Encoding**: threshold and coalition variables, and the clause
//!   families that make a model well formed and consistent with the labels.
//! - **Oracle**: DIMACS `cnf`/`wcnf` serialization, an external solver
//!   client, response parsing, and an in-process oracle for tiny instances.
//! - **Model**: decoding an oracle assignment into thresholds and sufficient
//!   coalitions, checking it, and classifying profiles with it.
//! - **Learner**: the encode-solve-decode pipeline with SAT or MaxSAT
//!   semantics, reporting the model and its restoration rate.
//! - **Dataset**: labeled profiles, plus a generator of synthetic data from a
//!   hidden MR-Sort rule.
//!
//! # Architecture
//!
//! No search happens in this crate. The learner reduces the question to a
//! propositional instance and trusts an [`oracle::Oracle`] to answer it; the
//! answer is validated before it is decoded.
//!
//! # Example
//!
//! ```
//! use u_mrsort::dataset::Dataset;
//! use u_mrsort::learner::{LearnerConfig, SortingLearner};
//! use u_mrsort::oracle::ExhaustiveOracle;
//!
//! let data = Dataset::binary(2, 3, vec![vec![2, 1], vec![0, 2]], &[true, false]);
//! let report =
//!     SortingLearner::train(&data, &LearnerConfig::default(), &ExhaustiveOracle::new()).unwrap();
//! let model = report.model().unwrap();
//! assert_eq!(model.predict(&[2, 1]).unwrap(), 1);
//! assert_eq!(model.predict(&[0, 2]).unwrap(), 0);
//! ```

pub mod dataset;
pub mod encoding;
mod error;
pub mod learner;
pub mod model;
pub mod oracle;

pub use error::{OracleError, SortError, SortResult};
