//! Oracle trait, raw answers and decoded assignments.

use crate::encoding::{ClauseSet, Literal, VarId, VariableIndex, Weighting};
use crate::error::OracleError;

/// Raw answer of an oracle for one instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OracleOutcome {
    /// A model was found.
    Satisfiable {
        /// Signed literals of the model, without the `0` terminator.
        literals: Vec<Literal>,
        /// Total weight of violated soft clauses, when the oracle reports it.
        cost: Option<u64>,
    },
    /// The hard clauses admit no model.
    Unsatisfiable,
}

/// A discrete-constraint oracle.
///
/// Implementors decide satisfiability of a clause set and return a model.
/// [`ProcessOracle`](super::ProcessOracle) delegates to an external solver
/// executable; [`ExhaustiveOracle`](super::ExhaustiveOracle) searches tiny
/// instances in-process for tests.
pub trait Oracle: Send + Sync {
    /// Solves `clauses`; `weighting` selects SAT or MaxSAT semantics.
    fn solve(&self, clauses: &ClauseSet, weighting: Weighting) -> Result<OracleOutcome, OracleError>;
}

/// Truth values of variables `1..=N`, possibly partial.
///
/// # Examples
///
/// ```
/// use u_mrsort::encoding::{IndexLayout, VariableIndex};
/// use u_mrsort::oracle::Assignment;
///
/// let index = VariableIndex::new(IndexLayout::binary(1, 2)).unwrap();
/// let assignment = Assignment::from_literals(&index, &[1, -2, 3]).unwrap();
/// assert_eq!(assignment.value(1), Some(true));
/// assert_eq!(assignment.value(2), Some(false));
/// assert_eq!(assignment.value(4), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    values: Vec<Option<bool>>,
}

impl Assignment {
    /// An assignment over `variable_count` variables with nothing set.
    pub fn unassigned(variable_count: u32) -> Self {
        Self {
            values: vec![None; variable_count as usize + 1],
        }
    }

    /// Converts an oracle literal list, checking every id against `index`.
    ///
    /// Ids the index does not know and literals contradicting an earlier one
    /// are protocol errors: the oracle answered a different instance.
    pub fn from_literals(index: &VariableIndex, literals: &[Literal]) -> Result<Self, OracleError> {
        let mut assignment = Self::unassigned(index.variable_count());
        for &lit in literals {
            let id = lit.unsigned_abs();
            if lit == 0 || index.key_of(id).is_err() {
                return Err(OracleError::protocol(format!(
                    "literal {lit} outside variable range 1..={}",
                    index.variable_count()
                )));
            }
            let value = lit > 0;
            match assignment.value(id) {
                Some(previous) if previous != value => {
                    return Err(OracleError::protocol(format!(
                        "variable {id} assigned both true and false"
                    )));
                }
                _ => assignment.set(id, value),
            }
        }
        Ok(assignment)
    }

    /// Value of variable `id`, if assigned.
    pub fn value(&self, id: VarId) -> Option<bool> {
        self.values.get(id as usize).copied().flatten()
    }

    /// Sets variable `id`.
    ///
    /// # Panics
    /// Panics if `id` is 0 or beyond the variable count.
    pub fn set(&mut self, id: VarId, value: bool) {
        assert!(id != 0 && (id as usize) < self.values.len(), "variable {id} out of range");
        self.values[id as usize] = Some(value);
    }

    pub fn variable_count(&self) -> u32 {
        (self.values.len() - 1) as u32
    }

    /// Number of variables with a value.
    pub fn assigned_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    /// Assigned variables as signed literals, in id order.
    pub fn to_literals(&self) -> Vec<Literal> {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(id, v)| v.map(|b| if b { id as Literal } else { -(id as Literal) }))
            .collect()
    }
}
