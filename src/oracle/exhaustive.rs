//! In-process branch-and-bound oracle for tiny instances.

use super::types::{Oracle, OracleOutcome};
use crate::encoding::{ClauseSet, Literal, Weighting};
use crate::error::OracleError;

/// Default variable budget of [`ExhaustiveOracle`].
pub const DEFAULT_MAX_VARIABLES: u32 = 32;

/// A depth-first branch-and-bound search over all assignments.
///
/// Assigns variables in id order and checks each clause as soon as its
/// highest variable is set. Unweighted instances stop at the first model;
/// weighted instances keep the model with the lowest violated soft weight.
///
/// # Limitations
///
/// - Exponential in the variable count; refuses instances above
///   `max_variables`
/// - No propagation or learning: a reference oracle for tests and small
///   experiments, not a SAT solver
#[derive(Debug, Clone)]
pub struct ExhaustiveOracle {
    max_variables: u32,
}

impl ExhaustiveOracle {
    pub fn new() -> Self {
        Self {
            max_variables: DEFAULT_MAX_VARIABLES,
        }
    }

    pub fn with_max_variables(mut self, n: u32) -> Self {
        self.max_variables = n;
        self
    }
}

impl Default for ExhaustiveOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl Oracle for ExhaustiveOracle {
    fn solve(&self, clauses: &ClauseSet, weighting: Weighting) -> Result<OracleOutcome, OracleError> {
        let n = clauses.variable_count;
        if n > self.max_variables {
            return Err(OracleError::TooLarge {
                variables: n,
                limit: self.max_variables,
            });
        }

        // Bucket clauses by their highest variable; `None` weight = hard.
        let mut buckets: Vec<Vec<(&[Literal], Option<u64>)>> = vec![Vec::new(); n as usize + 1];
        for clause in &clauses.clauses {
            let last = clause
                .literals
                .iter()
                .map(|l| l.unsigned_abs())
                .max()
                .unwrap_or(0);
            if last > n {
                return Err(OracleError::protocol(format!(
                    "clause mentions variable {last} beyond declared {n}"
                )));
            }
            let weight = match weighting {
                Weighting::Unweighted => None,
                Weighting::Weighted { .. } if clause.family.is_hard() => None,
                Weighting::Weighted { .. } => weighting.weight_of(clause),
            };
            buckets[last as usize].push((&clause.literals, weight));
        }

        let mut search = Search {
            buckets: &buckets,
            values: vec![false; n as usize + 1],
            best: None,
            first_only: !weighting.is_weighted(),
        };

        // Empty clauses are decided before any branching.
        let Some(base) = search.settle(0, 0) else {
            return Ok(OracleOutcome::Unsatisfiable);
        };
        search.descend(1, base);

        Ok(match search.best {
            Some((cost, values)) => OracleOutcome::Satisfiable {
                literals: (1..=n)
                    .map(|v| {
                        if values[v as usize] {
                            v as Literal
                        } else {
                            -(v as Literal)
                        }
                    })
                    .collect(),
                cost: weighting.is_weighted().then_some(cost),
            },
            None => OracleOutcome::Unsatisfiable,
        })
    }
}

struct Search<'a> {
    buckets: &'a [Vec<(&'a [Literal], Option<u64>)>],
    values: Vec<bool>,
    best: Option<(u64, Vec<bool>)>,
    first_only: bool,
}

impl Search<'_> {
    /// Cost after checking the clauses closed by variable `var`, or `None`
    /// if a hard clause fails or the bound is reached.
    fn settle(&self, var: usize, mut cost: u64) -> Option<u64> {
        for &(literals, weight) in &self.buckets[var] {
            let satisfied = literals
                .iter()
                .any(|&l| self.values[l.unsigned_abs() as usize] == (l > 0));
            if !satisfied {
                cost = cost.saturating_add(weight?);
            }
        }
        match &self.best {
            Some((best, _)) if cost >= *best => None,
            _ => Some(cost),
        }
    }

    fn descend(&mut self, var: usize, cost: u64) -> bool {
        if var == self.values.len() {
            self.best = Some((cost, self.values.clone()));
            return self.first_only || cost == 0;
        }
        for value in [false, true] {
            self.values[var] = value;
            if let Some(next) = self.settle(var, cost) {
                if self.descend(var + 1, next) {
                    return true;
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{Clause, ClauseFamily};

    fn set(n: u32, clauses: Vec<(Vec<Literal>, ClauseFamily)>) -> ClauseSet {
        ClauseSet {
            variable_count: n,
            clauses: clauses
                .into_iter()
                .map(|(literals, family)| Clause { literals, family })
                .collect(),
        }
    }

    const HARD: ClauseFamily = ClauseFamily::ThresholdMonotonicity;
    const SOFT: ClauseFamily = ClauseFamily::PositiveConsistency;

    fn satisfies(literals: &[Literal], clause: &[Literal]) -> bool {
        clause.iter().any(|l| literals.contains(l))
    }

    #[test]
    fn test_finds_model() {
        let s = set(3, vec![(vec![1, 2], HARD), (vec![-1], HARD), (vec![-2, 3], HARD)]);
        match ExhaustiveOracle::new().solve(&s, Weighting::Unweighted).unwrap() {
            OracleOutcome::Satisfiable { literals, cost } => {
                assert_eq!(cost, None);
                for c in &s.clauses {
                    assert!(satisfies(&literals, &c.literals));
                }
            }
            OracleOutcome::Unsatisfiable => panic!("expected a model"),
        }
    }

    #[test]
    fn test_detects_unsat() {
        let s = set(1, vec![(vec![1], HARD), (vec![-1], HARD)]);
        assert_eq!(
            ExhaustiveOracle::new().solve(&s, Weighting::Unweighted).unwrap(),
            OracleOutcome::Unsatisfiable
        );
    }

    #[test]
    fn test_empty_hard_clause_is_unsat() {
        let s = set(2, vec![(vec![], HARD)]);
        assert_eq!(
            ExhaustiveOracle::new().solve(&s, Weighting::Unweighted).unwrap(),
            OracleOutcome::Unsatisfiable
        );
    }

    #[test]
    fn test_minimizes_soft_cost() {
        // Soft clauses pull variable 1 both ways; 2 of 3 can hold.
        let s = set(
            2,
            vec![
                (vec![1], SOFT),
                (vec![1], SOFT),
                (vec![-1], SOFT),
                (vec![-1, 2], HARD),
            ],
        );
        let weighting = Weighting::Weighted { hard: 4, soft: 1 };
        match ExhaustiveOracle::new().solve(&s, weighting).unwrap() {
            OracleOutcome::Satisfiable { literals, cost } => {
                assert_eq!(cost, Some(1));
                assert_eq!(literals, vec![1, 2]);
            }
            OracleOutcome::Unsatisfiable => panic!("expected a model"),
        }
    }

    #[test]
    fn test_soft_conflict_is_unsat_when_unweighted() {
        let s = set(1, vec![(vec![1], SOFT), (vec![-1], SOFT)]);
        assert_eq!(
            ExhaustiveOracle::new().solve(&s, Weighting::Unweighted).unwrap(),
            OracleOutcome::Unsatisfiable
        );
        let weighted = ExhaustiveOracle::new()
            .solve(&s, Weighting::Weighted { hard: 3, soft: 1 })
            .unwrap();
        assert!(matches!(
            weighted,
            OracleOutcome::Satisfiable { cost: Some(1), .. }
        ));
    }

    #[test]
    fn test_refuses_large_instances() {
        let s = set(40, vec![]);
        let err = ExhaustiveOracle::new().solve(&s, Weighting::Unweighted).unwrap_err();
        assert!(matches!(err, OracleError::TooLarge { variables: 40, limit: 32 }));
        assert!(ExhaustiveOracle::new()
            .with_max_variables(40)
            .solve(&s, Weighting::Unweighted)
            .is_ok());
    }
}
