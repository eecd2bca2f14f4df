//! Oracle boundary: instance serialization, solver invocation, answers.
//!
//! The encoder never searches for models itself. It hands a clause set to an
//! [`Oracle`] and receives either a model or an explicit "unsatisfiable".
//!
//! # Key Components
//!
//! - **Exchange format**: [`write_instance`]: DIMACS `cnf` / `wcnf`
//! - **Answers**: [`parse_response`], [`OracleOutcome`], [`Assignment`]
//! - **Oracles**: [`ProcessOracle`] runs an external solver executable
//!   (e.g. gophersat); [`ExhaustiveOracle`] searches tiny instances
//!   in-process
//!
//! # Design
//!
//! Each solve writes a fresh temporary exchange file and blocks until the
//! solver exits or the time limit expires. Spawn failures, timeouts and
//! unreadable output are distinct [`OracleError`](crate::OracleError)
//! variants; an unsatisfiable instance is a normal outcome.

mod dimacs;
mod exhaustive;
mod process;
mod response;
mod types;

pub use dimacs::{to_dimacs_string, write_instance};
pub use exhaustive::{ExhaustiveOracle, DEFAULT_MAX_VARIABLES};
pub use process::{OracleConfig, ProcessOracle};
pub use response::parse_response;
pub use types::{Assignment, Oracle, OracleOutcome};
