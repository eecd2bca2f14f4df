//! Reading a sorting model out of an oracle assignment.

use super::types::SortingModel;
use crate::dataset::{check_profile, Grade, ACCEPTED, REJECTED};
use crate::encoding::{Coalition, VariableIndex, VariableKey};
use crate::error::{SortError, SortResult};
use crate::oracle::Assignment;

/// Interprets an [`Assignment`] through the [`VariableIndex`] it answers.
///
/// Oracle output is untrusted: every lookup fails with
/// [`SortError::IncompleteModel`] when the variable has no value, and
/// [`check_consistency`](Self::check_consistency) verifies the monotonicity
/// the hard clauses should have enforced.
pub struct ModelDecoder<'a> {
    index: &'a VariableIndex,
    assignment: &'a Assignment,
}

impl<'a> ModelDecoder<'a> {
    pub fn new(index: &'a VariableIndex, assignment: &'a Assignment) -> Self {
        Self { index, assignment }
    }

    fn value(&self, key: VariableKey) -> SortResult<bool> {
        let id = self.index.id_of(&key)?;
        self.assignment
            .value(id)
            .ok_or_else(|| SortError::IncompleteModel {
                variable: key.to_string(),
            })
    }

    fn alpha(&self, criterion: usize, grade: Grade, boundary: Option<usize>) -> SortResult<bool> {
        self.value(VariableKey::Threshold {
            criterion,
            grade,
            boundary,
        })
    }

    /// `beta(coalition)` in the assignment.
    pub fn is_sufficient(&self, coalition: Coalition) -> SortResult<bool> {
        self.value(VariableKey::Coalition(coalition))
    }

    /// Criteria `i` with `alpha(i, profile[i][, boundary])` true.
    pub fn validated_coalition(
        &self,
        profile: &[Grade],
        boundary: Option<usize>,
    ) -> SortResult<Coalition> {
        let mut coalition = Coalition::empty();
        for (i, &grade) in profile.iter().enumerate() {
            if self.alpha(i, grade, boundary)? {
                coalition.insert(i);
            }
        }
        Ok(coalition)
    }

    /// Predicted category of one profile.
    ///
    /// Binary: accepted iff the validated coalition is sufficient. Ordered:
    /// promote from category 0 through boundary `c + 1` while the coalition
    /// validated against that boundary's thresholds is sufficient.
    pub fn predict(&self, profile: &[Grade]) -> SortResult<usize> {
        self.predict_entity(0, profile)
    }

    /// Predicted category of every profile.
    pub fn predict_all(&self, profiles: &[Vec<Grade>]) -> SortResult<Vec<usize>> {
        profiles
            .iter()
            .enumerate()
            .map(|(entity, profile)| self.predict_entity(entity, profile))
            .collect()
    }

    fn predict_entity(&self, entity: usize, profile: &[Grade]) -> SortResult<usize> {
        let layout = self.index.layout();
        check_profile(entity, profile, layout.criteria, layout.grade_levels)?;

        match layout.boundaries {
            None => {
                let validated = self.validated_coalition(profile, None)?;
                Ok(if self.is_sufficient(validated)? {
                    ACCEPTED
                } else {
                    REJECTED
                })
            }
            Some(top) => {
                let mut category = 0;
                while category < top {
                    let candidate = category + 1;
                    let validated = self.validated_coalition(profile, Some(candidate))?;
                    if !self.is_sufficient(validated)? {
                        break;
                    }
                    category = candidate;
                }
                Ok(category)
            }
        }
    }

    /// Verifies threshold monotonicity, boundary ordering and coalition
    /// monotonicity over the whole assignment.
    ///
    /// Adjacent pairs are enough: each relation is transitive.
    pub fn check_consistency(&self) -> SortResult<()> {
        let layout = self.index.layout();

        for tag in layout.tags() {
            for i in 0..layout.criteria {
                for k in 1..layout.grade_levels {
                    if self.alpha(i, k - 1, tag)? && !self.alpha(i, k, tag)? {
                        return Err(inconsistent(format!(
                            "{} is true but {} is false",
                            threshold_key(i, k - 1, tag),
                            threshold_key(i, k, tag)
                        )));
                    }
                }
            }
        }

        if let Some(top) = layout.boundaries {
            for h in 0..top {
                for i in 0..layout.criteria {
                    for k in 0..layout.grade_levels {
                        if self.alpha(i, k, Some(h + 1))? && !self.alpha(i, k, Some(h))? {
                            return Err(inconsistent(format!(
                                "{} is true but {} is false",
                                threshold_key(i, k, Some(h + 1)),
                                threshold_key(i, k, Some(h))
                            )));
                        }
                    }
                }
            }
        }

        let full = Coalition::full(layout.criteria);
        for mask in 0..=full.mask() {
            let coalition = Coalition::from_mask(mask);
            if !self.is_sufficient(coalition)? {
                continue;
            }
            for i in coalition.complement(layout.criteria).members() {
                let larger = coalition.with(i);
                if !self.is_sufficient(larger)? {
                    return Err(inconsistent(format!(
                        "beta({coalition}) is true but beta({larger}) is false"
                    )));
                }
            }
        }

        Ok(())
    }

    /// Extracts a standalone [`SortingModel`].
    ///
    /// Each threshold is the lowest grade whose `alpha` is true. This reads
    /// the assignment faithfully only if it is consistent, so callers should
    /// run [`check_consistency`](Self::check_consistency) first.
    pub fn extract(&self) -> SortResult<SortingModel> {
        let layout = self.index.layout();

        let mut thresholds = Vec::with_capacity(layout.tag_count());
        for tag in layout.tags() {
            let mut row = Vec::with_capacity(layout.criteria);
            for i in 0..layout.criteria {
                let mut threshold = None;
                for k in 0..layout.grade_levels {
                    if self.alpha(i, k, tag)? {
                        threshold = Some(k);
                        break;
                    }
                }
                row.push(threshold);
            }
            thresholds.push(row);
        }

        let sufficient = (0..=Coalition::full(layout.criteria).mask())
            .map(|mask| self.is_sufficient(Coalition::from_mask(mask)))
            .collect::<SortResult<Vec<bool>>>()?;

        Ok(SortingModel {
            criteria: layout.criteria,
            grade_levels: layout.grade_levels,
            boundaries: layout.boundaries,
            thresholds,
            sufficient,
        })
    }
}

fn threshold_key(criterion: usize, grade: Grade, boundary: Option<usize>) -> VariableKey {
    VariableKey::Threshold {
        criterion,
        grade,
        boundary,
    }
}

fn inconsistent(reason: String) -> SortError {
    SortError::InconsistentModel { reason }
}
