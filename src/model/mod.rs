//! Decoding oracle answers into MR-Sort models.
//!
//! # Key Components
//!
//! - **Decoder**: [`ModelDecoder`] reads thresholds, sufficiency and
//!   predictions straight from an assignment, and checks it is well formed
//! - **Model**: [`SortingModel`] is the extracted, encoding-free rule
//! - **Evaluation**: [`Evaluation`] scores predictions against labels
//!
//! # Design
//!
//! Prediction never consults the clause set: it replays the MR-Sort rule on
//! the decoded variables. A consistent model restores every entity whose
//! consistency clauses the oracle satisfied.

mod decoder;
mod evaluation;
mod types;

pub use decoder::ModelDecoder;
pub use evaluation::Evaluation;
pub use types::SortingModel;
