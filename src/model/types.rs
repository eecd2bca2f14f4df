//! A decoded sorting model, independent of the variable encoding.

use crate::dataset::{check_profile, Grade, ACCEPTED, REJECTED};
use crate::encoding::{powerset, Coalition};
use crate::error::SortResult;

/// Per-criterion thresholds plus a sufficiency table over coalitions.
///
/// An entity validates criterion `i` for a boundary when its grade is at
/// least that boundary's threshold. It is accepted (binary) or promoted
/// through a boundary (ordered) when the validated coalition is sufficient.
/// Promotion starts at category 0 and stops at the first boundary that fails.
///
/// # Examples
///
/// ```
/// use u_mrsort::model::SortingModel;
///
/// // Two criteria, threshold 10 on each; both must be validated.
/// let model = SortingModel {
///     criteria: 2,
///     grade_levels: 21,
///     boundaries: None,
///     thresholds: vec![vec![Some(10), Some(10)]],
///     sufficient: vec![false, false, false, true],
/// };
/// assert_eq!(model.predict(&[12, 15]).unwrap(), 1);
/// assert_eq!(model.predict(&[12, 9]).unwrap(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SortingModel {
    pub criteria: usize,
    pub grade_levels: u32,
    /// Number of boundaries `H`; `None` for the binary model.
    pub boundaries: Option<usize>,
    /// `thresholds[tag][criterion]`: lowest validating grade, `None` when no
    /// grade validates. Binary models have one tag; ordered models `H + 1`,
    /// of which tag 0 is never used for promotion.
    pub thresholds: Vec<Vec<Option<Grade>>>,
    /// Sufficiency of each coalition, indexed by bitmask.
    pub sufficient: Vec<bool>,
}

impl SortingModel {
    /// Threshold of `criterion` for `boundary` (`None` in the binary case).
    pub fn threshold(&self, criterion: usize, boundary: Option<usize>) -> Option<Grade> {
        self.thresholds
            .get(boundary.unwrap_or(0))
            .and_then(|row| row.get(criterion))
            .copied()
            .flatten()
    }

    pub fn is_sufficient(&self, coalition: Coalition) -> bool {
        self.sufficient
            .get(coalition.mask() as usize)
            .copied()
            .unwrap_or(false)
    }

    /// Criteria whose threshold for `boundary` the profile reaches.
    pub fn validated(&self, profile: &[Grade], boundary: Option<usize>) -> Coalition {
        let mut coalition = Coalition::empty();
        for (i, &grade) in profile.iter().enumerate() {
            if self.threshold(i, boundary).is_some_and(|t| grade >= t) {
                coalition.insert(i);
            }
        }
        coalition
    }

    /// Predicted category of one profile.
    pub fn predict(&self, profile: &[Grade]) -> SortResult<usize> {
        check_profile(0, profile, self.criteria, self.grade_levels)?;
        Ok(self.category_of(profile))
    }

    /// Predicted category of every profile.
    pub fn predict_all(&self, profiles: &[Vec<Grade>]) -> SortResult<Vec<usize>> {
        profiles
            .iter()
            .enumerate()
            .map(|(entity, profile)| {
                check_profile(entity, profile, self.criteria, self.grade_levels)?;
                Ok(self.category_of(profile))
            })
            .collect()
    }

    /// Sufficient coalitions none of whose strict subsets are sufficient.
    pub fn minimal_sufficient_coalitions(&self) -> Vec<Coalition> {
        let all = powerset(Coalition::full(self.criteria));
        all.iter()
            .copied()
            .filter(|&c| self.is_sufficient(c))
            .filter(|&c| {
                !all.iter()
                    .any(|&d| d != c && d.is_subset_of(c) && self.is_sufficient(d))
            })
            .collect()
    }

    fn category_of(&self, profile: &[Grade]) -> usize {
        match self.boundaries {
            None => {
                if self.is_sufficient(self.validated(profile, None)) {
                    ACCEPTED
                } else {
                    REJECTED
                }
            }
            Some(top) => (1..=top)
                .take_while(|&h| self.is_sufficient(self.validated(profile, Some(h))))
                .last()
                .unwrap_or(0),
        }
    }
}
