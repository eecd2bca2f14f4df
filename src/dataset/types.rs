//! Labeled training data.

use crate::encoding::IndexLayout;
use crate::error::{SortError, SortResult};

/// A grade value in `[0, grade_levels)`.
pub type Grade = u32;

/// Number of grade levels in the reference domain (grades 0 to 20).
pub const DEFAULT_GRADE_LEVELS: u32 = 21;

/// Category number of a rejected entity in the binary problem.
pub const REJECTED: usize = 0;

/// Category number of an accepted entity in the binary problem.
pub const ACCEPTED: usize = 1;

/// Entity profiles with their known categories.
///
/// The binary problem stores `accepted` as category [`ACCEPTED`] and
/// `rejected` as [`REJECTED`]. The ordered problem with `H` boundaries uses
/// categories `0..=H`, where 0 is the lowest.
///
/// # Examples
///
/// ```
/// use u_mrsort::dataset::Dataset;
///
/// let data = Dataset::binary(2, 3, vec![vec![1, 2], vec![0, 0]], &[true, false]);
/// assert!(data.validate().is_ok());
/// assert_eq!(data.categories, vec![1, 0]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dataset {
    /// Number of criteria `G`.
    pub criteria: usize,
    /// Number of grade levels `MAXG`.
    pub grade_levels: u32,
    /// Number of category boundaries `H`; `None` for the binary problem.
    pub boundaries: Option<usize>,
    /// One profile per entity, `criteria` grades each.
    pub profiles: Vec<Vec<Grade>>,
    /// Known category per entity (parallel to `profiles`).
    pub categories: Vec<usize>,
}

impl Dataset {
    /// Builds a binary (accepted/rejected) dataset.
    pub fn binary(
        criteria: usize,
        grade_levels: u32,
        profiles: Vec<Vec<Grade>>,
        accepted: &[bool],
    ) -> Self {
        Self {
            criteria,
            grade_levels,
            boundaries: None,
            profiles,
            categories: accepted
                .iter()
                .map(|&a| if a { ACCEPTED } else { REJECTED })
                .collect(),
        }
    }

    /// Builds an ordered dataset with `boundaries + 1` categories.
    pub fn ordered(
        criteria: usize,
        grade_levels: u32,
        boundaries: usize,
        profiles: Vec<Vec<Grade>>,
        categories: Vec<usize>,
    ) -> Self {
        Self {
            criteria,
            grade_levels,
            boundaries: Some(boundaries),
            profiles,
            categories,
        }
    }

    pub fn is_binary(&self) -> bool {
        self.boundaries.is_none()
    }

    /// Highest category number.
    pub fn top_category(&self) -> usize {
        self.boundaries.unwrap_or(ACCEPTED)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Variable layout for encoding this dataset.
    pub fn layout(&self) -> IndexLayout {
        IndexLayout {
            criteria: self.criteria,
            grade_levels: self.grade_levels,
            boundaries: self.boundaries,
        }
    }

    /// Binary labels, if this is a binary dataset.
    pub fn accepted(&self) -> Option<Vec<bool>> {
        self.is_binary()
            .then(|| self.categories.iter().map(|&c| c == ACCEPTED).collect())
    }

    /// Checks shapes and value ranges.
    pub fn validate(&self) -> SortResult<()> {
        self.layout().validate()?;

        if self.profiles.len() != self.categories.len() {
            return Err(SortError::InvalidConfig(format!(
                "{} profiles but {} labels",
                self.profiles.len(),
                self.categories.len()
            )));
        }

        let top = self.top_category();
        for (entity, (profile, &category)) in self.profiles.iter().zip(&self.categories).enumerate()
        {
            check_profile(entity, profile, self.criteria, self.grade_levels)?;
            if category > top {
                return Err(SortError::CategoryOutOfRange {
                    entity,
                    category,
                    boundaries: top,
                });
            }
        }
        Ok(())
    }
}

/// Checks one profile's length and grade range.
pub(crate) fn check_profile(
    entity: usize,
    profile: &[Grade],
    criteria: usize,
    grade_levels: u32,
) -> SortResult<()> {
    if profile.len() != criteria {
        return Err(SortError::ProfileLength {
            entity,
            expected: criteria,
            actual: profile.len(),
        });
    }
    if let Some((criterion, &grade)) = profile
        .iter()
        .enumerate()
        .find(|&(_, &g)| g >= grade_levels)
    {
        return Err(SortError::GradeOutOfRange {
            entity,
            criterion,
            grade,
            levels: grade_levels,
        });
    }
    Ok(())
}
