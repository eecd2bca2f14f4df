//! Encode, solve, decode.

use super::config::{EncodingMode, LearnerConfig};
use super::types::{TrainOutcome, TrainReport};
use crate::dataset::Dataset;
use crate::encoding::{ClauseBuilder, VariableIndex};
use crate::error::{SortError, SortResult};
use crate::model::{Evaluation, ModelDecoder};
use crate::oracle::{Assignment, Oracle, OracleOutcome};
use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Learns a sorting model from a labeled dataset through an [`Oracle`].
///
/// # Examples
///
/// ```
/// use u_mrsort::dataset::Dataset;
/// use u_mrsort::learner::{LearnerConfig, SortingLearner, TrainOutcome};
/// use u_mrsort::oracle::ExhaustiveOracle;
///
/// let data = Dataset::binary(2, 3, vec![vec![1, 2], vec![0, 0]], &[true, false]);
/// let report = SortingLearner::train(&data, &LearnerConfig::default(), &ExhaustiveOracle::new())
///     .unwrap();
///
/// match report.outcome {
///     TrainOutcome::Model { predictions, .. } => assert_eq!(predictions, vec![1, 0]),
///     other => panic!("unexpected outcome: {other:?}"),
/// }
/// ```
pub struct SortingLearner;

impl SortingLearner {
    /// Trains one model.
    ///
    /// Invalid input and malformed models are errors. An unsatisfiable
    /// instance and a failing oracle are outcomes in the returned report.
    pub fn train<O: Oracle + ?Sized>(
        data: &Dataset,
        config: &LearnerConfig,
        oracle: &O,
    ) -> SortResult<TrainReport> {
        config.validate().map_err(SortError::InvalidConfig)?;
        data.validate()?;

        let index = VariableIndex::new(data.layout())?;
        let clauses = ClauseBuilder::new(&index).build(data)?;
        let weighting = config.weighting(&clauses);

        tracing::info!(
            entities = data.len(),
            criteria = data.criteria,
            boundaries = ?data.boundaries,
            variables = clauses.variable_count,
            clauses = clauses.len(),
            mode = ?config.mode,
            "encoded training problem"
        );

        let start = Instant::now();
        let answer = oracle.solve(&clauses, weighting);
        let oracle_elapsed = start.elapsed();

        let report = |outcome| TrainReport {
            outcome,
            num_variables: clauses.variable_count,
            num_clauses: clauses.len(),
            oracle_elapsed,
        };

        let (literals, cost) = match answer {
            Ok(OracleOutcome::Satisfiable { literals, cost }) => (literals, cost),
            Ok(OracleOutcome::Unsatisfiable) => {
                tracing::info!(elapsed_ms = oracle_elapsed.as_millis() as u64, "no consistent model");
                return Ok(report(TrainOutcome::Unsatisfiable));
            }
            Err(err) => {
                tracing::warn!(error = %err, "oracle failed");
                return Ok(report(TrainOutcome::OracleFailed(err)));
            }
        };

        let assignment = match Assignment::from_literals(&index, &literals) {
            Ok(a) => a,
            Err(err) => {
                tracing::warn!(error = %err, "oracle answer rejected");
                return Ok(report(TrainOutcome::OracleFailed(err)));
            }
        };
        tracing::debug!(
            assigned = assignment.assigned_count(),
            variables = index.variable_count(),
            "decoding model"
        );

        let decoder = ModelDecoder::new(&index, &assignment);
        if config.verify_model {
            decoder.check_consistency()?;
        }
        let predictions = decoder.predict_all(&data.profiles)?;
        let model = decoder.extract()?;
        let evaluation = Evaluation::compare(&predictions, &data.categories);

        if config.verify_model && config.mode == EncodingMode::Sat && !evaluation.is_perfect() {
            return Err(SortError::InconsistentModel {
                reason: format!(
                    "model misclassifies {} of {} training entities under plain SAT",
                    evaluation.mismatches, evaluation.total
                ),
            });
        }

        tracing::info!(
            mismatches = evaluation.mismatches,
            accuracy = evaluation.accuracy(),
            cost = ?cost,
            elapsed_ms = oracle_elapsed.as_millis() as u64,
            "learned model"
        );

        Ok(report(TrainOutcome::Model {
            model,
            predictions,
            evaluation,
            cost,
        }))
    }

    /// Trains one model per dataset, in input order.
    ///
    /// Runs in parallel with the `parallel` feature.
    pub fn train_batch<O: Oracle + ?Sized>(
        datasets: &[Dataset],
        config: &LearnerConfig,
        oracle: &O,
    ) -> Vec<SortResult<TrainReport>> {
        #[cfg(feature = "parallel")]
        {
            datasets
                .par_iter()
                .map(|data| Self::train(data, config, oracle))
                .collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            datasets
                .iter()
                .map(|data| Self::train(data, config, oracle))
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{GeneratorConfig, SyntheticGenerator, ACCEPTED, REJECTED};
    use crate::encoding::{ClauseSet, Literal, Weighting};
    use crate::error::OracleError;
    use crate::oracle::{ExhaustiveOracle, OracleConfig, ProcessOracle};

    /// Answers every instance with the same outcome.
    enum FixedOracle {
        Answer(OracleOutcome),
        Fail(fn() -> OracleError),
    }

    impl Oracle for FixedOracle {
        fn solve(&self, _: &ClauseSet, _: Weighting) -> Result<OracleOutcome, OracleError> {
            match self {
                FixedOracle::Answer(outcome) => Ok(outcome.clone()),
                FixedOracle::Fail(make) => Err(make()),
            }
        }
    }

    fn all_true(n: u32) -> Vec<Literal> {
        (1..=n as Literal).collect()
    }

    fn contradictory() -> Dataset {
        Dataset::binary(
            2,
            3,
            vec![vec![2, 2], vec![2, 2], vec![0, 0]],
            &[true, false, false],
        )
    }

    #[test]
    fn test_binary_restores_labels() {
        let data = Dataset::binary(2, 3, vec![vec![1, 2], vec![0, 0]], &[true, false]);
        let report =
            SortingLearner::train(&data, &LearnerConfig::default(), &ExhaustiveOracle::new())
                .unwrap();

        assert_eq!(report.num_variables, 10);
        match report.outcome {
            TrainOutcome::Model {
                model,
                predictions,
                evaluation,
                cost,
            } => {
                assert_eq!(predictions, vec![ACCEPTED, REJECTED]);
                assert!(evaluation.is_perfect());
                assert_eq!(cost, None);
                assert_eq!(model.predict_all(&data.profiles).unwrap(), predictions);
            }
            other => panic!("expected a model, got {other:?}"),
        }
    }

    #[test]
    fn test_ordered_chain() {
        let data = Dataset::ordered(
            2,
            3,
            2,
            vec![vec![0, 0], vec![1, 1], vec![2, 2]],
            vec![0, 1, 2],
        );
        let report =
            SortingLearner::train(&data, &LearnerConfig::default(), &ExhaustiveOracle::new())
                .unwrap();

        assert_eq!(report.num_variables, 22);
        match report.outcome {
            TrainOutcome::Model {
                model, predictions, ..
            } => {
                assert_eq!(predictions, vec![0, 1, 2]);
                assert_eq!(model.boundaries, Some(2));
                assert_eq!(model.predict(&[2, 2]).unwrap(), 2);
            }
            other => panic!("expected a model, got {other:?}"),
        }
    }

    #[test]
    fn test_contradictory_labels_unsat() {
        let report = SortingLearner::train(
            &contradictory(),
            &LearnerConfig::default(),
            &ExhaustiveOracle::new(),
        )
        .unwrap();
        assert!(report.is_unsatisfiable());
        assert!(report.model().is_none());
        assert!(report.num_clauses > 0);
    }

    #[test]
    fn test_maxsat_tolerates_noise() {
        let config = LearnerConfig::default().with_mode(EncodingMode::MaxSat);
        let data = contradictory();
        let report = SortingLearner::train(&data, &config, &ExhaustiveOracle::new()).unwrap();

        match report.outcome {
            TrainOutcome::Model {
                evaluation, cost, ..
            } => {
                assert_eq!(evaluation.mismatches, 1);
                assert_eq!(cost, Some(1));
            }
            other => panic!("expected a model, got {other:?}"),
        }
    }

    #[test]
    fn test_ordered_maxsat_tolerates_noise() {
        // The last entity duplicates the top one with a lower label.
        let data = Dataset::ordered(
            2,
            3,
            2,
            vec![vec![0, 0], vec![1, 1], vec![2, 2], vec![2, 2]],
            vec![0, 1, 2, 1],
        );
        let oracle = ExhaustiveOracle::new();

        let sat = SortingLearner::train(&data, &LearnerConfig::default(), &oracle).unwrap();
        assert!(sat.is_unsatisfiable());

        let config = LearnerConfig::default().with_mode(EncodingMode::MaxSat);
        let report = SortingLearner::train(&data, &config, &oracle).unwrap();
        match report.outcome {
            TrainOutcome::Model {
                predictions,
                evaluation,
                cost,
                ..
            } => {
                assert_eq!(evaluation.total, 4);
                assert_eq!(evaluation.mismatches, 1);
                assert_eq!(cost, Some(1));
                assert_eq!(&predictions[..2], &[0, 1]);
                assert_eq!(predictions[2], predictions[3]);
            }
            other => panic!("expected a model, got {other:?}"),
        }
    }

    #[test]
    fn test_recovers_generated_rule() {
        let config = GeneratorConfig::default()
            .with_entities(12)
            .with_criteria(2)
            .with_grade_levels(3)
            .with_seed(17);
        let (_, data) = SyntheticGenerator::generate(&config).unwrap();
        let report =
            SortingLearner::train(&data, &LearnerConfig::default(), &ExhaustiveOracle::new())
                .unwrap();
        assert!(report.evaluation().is_some_and(|e| e.is_perfect()));
    }

    #[test]
    fn test_missing_oracle_is_an_outcome() {
        let oracle = ProcessOracle::new(OracleConfig::new("/nonexistent/u-mrsort-solver"));
        let data = Dataset::binary(1, 2, vec![vec![1]], &[true]);
        let report = SortingLearner::train(&data, &LearnerConfig::default(), &oracle).unwrap();
        assert!(matches!(
            report.outcome,
            TrainOutcome::OracleFailed(OracleError::Unavailable { .. })
        ));
    }

    #[test]
    fn test_foreign_literals_are_an_outcome() {
        let oracle = FixedOracle::Answer(OracleOutcome::Satisfiable {
            literals: vec![1, -99],
            cost: None,
        });
        let data = Dataset::binary(1, 2, vec![vec![1]], &[true]);
        let report = SortingLearner::train(&data, &LearnerConfig::default(), &oracle).unwrap();
        assert!(matches!(
            report.outcome,
            TrainOutcome::OracleFailed(OracleError::Protocol { .. })
        ));
    }

    #[test]
    fn test_timeout_is_an_outcome() {
        let oracle = FixedOracle::Fail(|| OracleError::Timeout { limit_ms: 5 });
        let data = Dataset::binary(1, 2, vec![vec![1]], &[true]);
        let report = SortingLearner::train(&data, &LearnerConfig::default(), &oracle).unwrap();
        assert!(matches!(
            report.outcome,
            TrainOutcome::OracleFailed(OracleError::Timeout { limit_ms: 5 })
        ));
    }

    #[test]
    fn test_non_monotone_model_rejected() {
        let data = Dataset::binary(2, 3, vec![vec![1, 2], vec![0, 0]], &[true, false]);
        let index = VariableIndex::new(data.layout()).unwrap();
        let broken = index.alpha(0, 2, None).unwrap() as Literal;
        let literals: Vec<Literal> = all_true(index.variable_count())
            .into_iter()
            .map(|l| if l == broken { -l } else { l })
            .collect();
        let oracle = FixedOracle::Answer(OracleOutcome::Satisfiable {
            literals,
            cost: None,
        });

        let err = SortingLearner::train(&data, &LearnerConfig::default(), &oracle).unwrap_err();
        assert!(matches!(err, SortError::InconsistentModel { .. }));

        let unchecked = LearnerConfig::default().with_verify_model(false);
        let report = SortingLearner::train(&data, &unchecked, &oracle).unwrap();
        assert!(report.model().is_some());
    }

    #[test]
    fn test_sat_model_must_restore_labels() {
        // Everything sufficient and validated: [0,0] would be accepted.
        let data = Dataset::binary(2, 3, vec![vec![1, 2], vec![0, 0]], &[true, false]);
        let oracle = FixedOracle::Answer(OracleOutcome::Satisfiable {
            literals: all_true(10),
            cost: None,
        });
        let err = SortingLearner::train(&data, &LearnerConfig::default(), &oracle).unwrap_err();
        match err {
            SortError::InconsistentModel { reason } => assert!(reason.contains("1 of 2")),
            other => panic!("expected InconsistentModel, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_input_is_an_error() {
        let data = Dataset::binary(2, 3, vec![vec![1, 5]], &[true]);
        assert!(matches!(
            SortingLearner::train(&data, &LearnerConfig::default(), &ExhaustiveOracle::new()),
            Err(SortError::GradeOutOfRange { .. })
        ));
        let ok = Dataset::binary(2, 3, vec![vec![1, 2]], &[true]);
        assert!(matches!(
            SortingLearner::train(
                &ok,
                &LearnerConfig::default().with_soft_weight(0),
                &ExhaustiveOracle::new()
            ),
            Err(SortError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_batch_keeps_order() {
        let datasets = vec![
            Dataset::binary(2, 3, vec![vec![1, 2], vec![0, 0]], &[true, false]),
            contradictory(),
        ];
        let oracle: &dyn Oracle = &ExhaustiveOracle::new();
        let reports = SortingLearner::train_batch(&datasets, &LearnerConfig::default(), oracle);
        assert_eq!(reports.len(), 2);
        assert!(reports[0].as_ref().unwrap().model().is_some());
        assert!(reports[1].as_ref().unwrap().is_unsatisfiable());
    }
}
