//! DIMACS CNF / WCNF rendering.

use crate::encoding::{ClauseSet, Weighting};
use std::io::{self, Write};

/// Writes `clauses` in the oracle exchange format.
///
/// Unweighted instances get a `p cnf <vars> <clauses>` header and one
/// zero-terminated literal line per clause. Weighted instances get a
/// `p wcnf <vars> <clauses>` header and each line is prefixed by the clause
/// weight. Output depends only on the clause order, so the same clause set
/// always renders to the same bytes.
pub fn write_instance<W: Write>(
    out: &mut W,
    clauses: &ClauseSet,
    weighting: Weighting,
) -> io::Result<()> {
    let kind = if weighting.is_weighted() { "wcnf" } else { "cnf" };
    writeln!(out, "p {kind} {} {}", clauses.variable_count, clauses.len())?;

    for clause in &clauses.clauses {
        if let Some(weight) = weighting.weight_of(clause) {
            write!(out, "{weight} ")?;
        }
        for lit in &clause.literals {
            write!(out, "{lit} ")?;
        }
        writeln!(out, "0")?;
    }
    Ok(())
}

/// Renders `clauses` to a string.
pub fn to_dimacs_string(clauses: &ClauseSet, weighting: Weighting) -> String {
    let mut buf = Vec::new();
    write_instance(&mut buf, clauses, weighting).expect("writing to a Vec cannot fail");
    String::from_utf8(buf).expect("DIMACS output is ASCII")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::encoding::{Clause, ClauseBuilder, ClauseFamily, VariableIndex};

    fn sample() -> ClauseSet {
        ClauseSet {
            variable_count: 3,
            clauses: vec![
                Clause {
                    literals: vec![-1, 2],
                    family: ClauseFamily::ThresholdMonotonicity,
                },
                Clause {
                    literals: vec![1, 3],
                    family: ClauseFamily::PositiveConsistency,
                },
                Clause {
                    literals: vec![-3],
                    family: ClauseFamily::NegativeConsistency,
                },
            ],
        }
    }

    #[test]
    fn test_cnf_format() {
        let text = to_dimacs_string(&sample(), Weighting::Unweighted);
        assert_eq!(text, "p cnf 3 3\n-1 2 0\n1 3 0\n-3 0\n");
    }

    #[test]
    fn test_wcnf_format() {
        let text = to_dimacs_string(&sample(), Weighting::Weighted { hard: 100, soft: 1 });
        assert_eq!(text, "p wcnf 3 3\n100 -1 2 0\n1 1 3 0\n1 -3 0\n");
    }

    #[test]
    fn test_serialization_is_idempotent() {
        let set = sample();
        let first = to_dimacs_string(&set, Weighting::Weighted { hard: 9, soft: 1 });
        let second = to_dimacs_string(&set, Weighting::Weighted { hard: 9, soft: 1 });
        assert_eq!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn test_rebuilt_instance_is_byte_identical() {
        let data = Dataset::ordered(
            3,
            4,
            2,
            vec![vec![0, 1, 3], vec![2, 2, 1], vec![3, 3, 3]],
            vec![0, 1, 2],
        );
        let render = || {
            let index = VariableIndex::new(data.layout()).unwrap();
            let clauses = ClauseBuilder::new(&index).build(&data).unwrap();
            let weighting = clauses.weighted(1, None);
            to_dimacs_string(&clauses, weighting)
        };
        let first = render();
        assert!(first.starts_with("p wcnf "));
        assert_eq!(first.as_bytes(), render().as_bytes());
    }

    #[test]
    fn test_empty_instance() {
        let set = ClauseSet {
            variable_count: 0,
            clauses: Vec::new(),
        };
        assert_eq!(to_dimacs_string(&set, Weighting::Unweighted), "p cnf 0 0\n");
    }
}
