//! Propositional encoding of sorting-model learning.
//!
//! Translates "is there a sorting model consistent with these labeled
//! profiles?" into a CNF (or weighted CNF) instance.
//!
//! # Key Components
//!
//! - **Coalitions**: [`Coalition`], [`powerset`], [`subset_of`]
//! - **Variables**: [`VariableIndex`]: dense bijection between
//!   [`VariableKey`]s and DIMACS ids
//! - **Clauses**: [`ClauseBuilder`]: well-formedness (hard) and data-fit
//!   (soft) clause families
//!
//! # Model
//!
//! A threshold variable `alpha(i, k)` states that criterion `i`'s cut-off is
//! at most grade `k`. A coalition variable `beta(C)` states that the criteria
//! in `C`, validated together, are sufficient. An entity is accepted when the
//! set of criteria it validates is sufficient.
//!
//! # References
//!
//! Belahcène, Labreuche, Maudet, Mousseau & Ouerdane (2018), "An efficient
//! SAT formulation for learning multiple criteria non-compensatory sorting
//! rules from examples"

mod clauses;
mod coalition;
mod variables;

pub use clauses::{Clause, ClauseBuilder, ClauseFamily, ClauseSet, Weighting};
pub use coalition::{powerset, subset_of, Coalition, MAX_CRITERIA};
pub use variables::{IndexLayout, Literal, VarId, VariableIndex, VariableKey};
