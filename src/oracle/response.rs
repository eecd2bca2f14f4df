//! Parsing of solver standard output.

use super::types::OracleOutcome;
use crate::encoding::Literal;
use crate::error::OracleError;

#[derive(Debug, PartialEq, Eq)]
enum Verdict {
    Satisfiable,
    Unsatisfiable,
    Other(String),
}

/// Parses solver output into an [`OracleOutcome`].
///
/// Understands both layouts seen in practice:
///
/// - plain SAT: an `s SATISFIABLE` / `s UNSATISFIABLE` verdict line and a
///   `v ... 0` model;
/// - MaxSAT: `o <cost>` progress lines, then a line containing `FOUND`
///   (e.g. `s OPTIMUM FOUND`) ahead of the best model.
///
/// The first `v` line after a line containing `FOUND`, or after a
/// terminated model, starts a new model, so the last reported model wins.
/// A `FOUND` line with no model after it leaves the current model intact.
/// Models may span several `v` lines.
pub fn parse_response(output: &str) -> Result<OracleOutcome, OracleError> {
    let mut verdict = None;
    let mut cost = None;
    let mut literals: Vec<Literal> = Vec::new();
    let mut seen_model = false;
    let mut terminated = false;
    let mut restart = false;

    for line in output.lines().map(str::trim) {
        if line.contains("FOUND") {
            restart = true;
        }

        let (tag, rest) = match line.split_once(char::is_whitespace) {
            Some((tag, rest)) => (tag, rest.trim()),
            None => (line, ""),
        };

        match tag {
            "s" => verdict = Some(parse_verdict(rest)),
            "o" => {
                let value = rest
                    .parse::<u64>()
                    .map_err(|_| OracleError::protocol(format!("bad cost line: {line}")))?;
                cost = Some(value);
            }
            "v" => {
                if terminated || restart {
                    literals.clear();
                    terminated = false;
                    restart = false;
                }
                seen_model = true;
                for token in rest.split_whitespace() {
                    if terminated {
                        break;
                    }
                    let lit = token
                        .parse::<Literal>()
                        .map_err(|_| OracleError::protocol(format!("bad model token: {token}")))?;
                    if lit == 0 {
                        terminated = true;
                    } else {
                        literals.push(lit);
                    }
                }
            }
            _ => {}
        }
    }

    match verdict {
        Some(Verdict::Unsatisfiable) => Ok(OracleOutcome::Unsatisfiable),
        Some(Verdict::Other(text)) => Err(OracleError::protocol(format!(
            "oracle gave no answer: s {text}"
        ))),
        Some(Verdict::Satisfiable) | None if seen_model => {
            if !terminated {
                tracing::debug!(literals = literals.len(), "model line not terminated by 0");
            }
            Ok(OracleOutcome::Satisfiable { literals, cost })
        }
        Some(Verdict::Satisfiable) => Err(OracleError::protocol(
            "satisfiable verdict without a model line",
        )),
        None => Err(OracleError::protocol("no verdict or model line in output")),
    }
}

fn parse_verdict(text: &str) -> Verdict {
    let upper = text.to_ascii_uppercase();
    match upper.as_str() {
        "SATISFIABLE" | "OPTIMUM FOUND" => Verdict::Satisfiable,
        "UNSATISFIABLE" => Verdict::Unsatisfiable,
        _ => Verdict::Other(text.to_string()),
    }
}
