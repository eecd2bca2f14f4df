//! Bijection between encoding concepts and DIMACS variable ids.

use super::coalition::{powerset, Coalition, MAX_CRITERIA};
use crate::error::{SortError, SortResult};

/// A DIMACS variable id, in `[1, N]`.
pub type VarId = u32;

/// A signed DIMACS literal: positive means the variable is true.
pub type Literal = i32;

/// Shape of the variable space.
///
/// `boundaries` is `None` for the binary (accepted/rejected) problem and
/// `Some(H)` for the ordered problem with `H + 1` categories. In the ordered
/// case every threshold variable carries a boundary tag in `[0, H]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexLayout {
    /// Number of criteria `G`.
    pub criteria: usize,
    /// Number of grade levels `MAXG`; grades lie in `[0, MAXG)`.
    pub grade_levels: u32,
    /// Number of category boundaries `H`, if ordered.
    pub boundaries: Option<usize>,
}

impl IndexLayout {
    pub fn binary(criteria: usize, grade_levels: u32) -> Self {
        Self {
            criteria,
            grade_levels,
            boundaries: None,
        }
    }

    pub fn ordered(criteria: usize, grade_levels: u32, boundaries: usize) -> Self {
        Self {
            criteria,
            grade_levels,
            boundaries: Some(boundaries),
        }
    }

    /// Number of threshold tags per `(criterion, grade)` pair.
    pub fn tag_count(&self) -> usize {
        self.boundaries.map_or(1, |h| h + 1)
    }

    /// Tag values used for threshold keys: `[None]` or `Some(0..=H)`.
    pub fn tags(&self) -> Vec<Option<usize>> {
        match self.boundaries {
            None => vec![None],
            Some(h) => (0..=h).map(Some).collect(),
        }
    }

    /// Checks the layout can be indexed.
    pub fn validate(&self) -> SortResult<()> {
        if self.criteria > MAX_CRITERIA {
            return Err(SortError::TooManyCriteria {
                criteria: self.criteria,
                max: MAX_CRITERIA,
            });
        }
        if self.criteria == 0 {
            return Err(SortError::InvalidConfig(
                "at least one criterion is required".into(),
            ));
        }
        if self.grade_levels == 0 {
            return Err(SortError::InvalidConfig(
                "grade_levels must be positive".into(),
            ));
        }
        if self.boundaries == Some(0) {
            return Err(SortError::InvalidConfig(
                "an ordered problem needs at least one boundary".into(),
            ));
        }
        let alpha = self.criteria as u64 * self.grade_levels as u64 * self.tag_count() as u64;
        let total = alpha + (1u64 << self.criteria);
        if total > i32::MAX as u64 {
            return Err(SortError::InvalidConfig(format!(
                "{total} variables exceed the DIMACS literal range"
            )));
        }
        Ok(())
    }
}

/// A domain concept that owns a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VariableKey {
    /// `alpha(i, k[, h])`: the threshold of `criterion` (for `boundary`) is
    /// at most `grade`.
    Threshold {
        criterion: usize,
        grade: u32,
        boundary: Option<usize>,
    },
    /// `beta(C)`: the coalition is sufficient.
    Coalition(Coalition),
}

impl std::fmt::Display for VariableKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VariableKey::Threshold {
                criterion,
                grade,
                boundary: None,
            } => write!(f, "alpha({criterion},{grade})"),
            VariableKey::Threshold {
                criterion,
                grade,
                boundary: Some(h),
            } => write!(f, "alpha({criterion},{grade},{h})"),
            VariableKey::Coalition(c) => write!(f, "beta({c})"),
        }
    }
}

/// Dense two-way map between [`VariableKey`]s and ids `1..=N`.
///
/// Threshold ids come first, ordered by criterion, then grade, then tag.
/// Coalition ids follow in [`powerset`] order. Forward lookup is arithmetic
/// for thresholds and a mask-indexed table for coalitions; reverse lookup is
/// a plain array access.
///
/// # Examples
///
/// ```
/// use u_mrsort::encoding::{IndexLayout, VariableIndex, VariableKey, Coalition};
///
/// let index = VariableIndex::new(IndexLayout::binary(2, 3)).unwrap();
/// assert_eq!(index.variable_count(), 2 * 3 + 4);
///
/// let key = VariableKey::Coalition(Coalition::full(2));
/// let id = index.id_of(&key).unwrap();
/// assert_eq!(index.key_of(id).unwrap(), key);
/// ```
#[derive(Debug, Clone)]
pub struct VariableIndex {
    layout: IndexLayout,
    threshold_count: u32,
    coalition_ids: Vec<VarId>,
    keys: Vec<VariableKey>,
}

impl VariableIndex {
    /// Enumerates the full variable space of `layout`.
    pub fn new(layout: IndexLayout) -> SortResult<Self> {
        layout.validate()?;

        let tags = layout.tags();
        let mut keys = Vec::new();
        for criterion in 0..layout.criteria {
            for grade in 0..layout.grade_levels {
                for &boundary in &tags {
                    keys.push(VariableKey::Threshold {
                        criterion,
                        grade,
                        boundary,
                    });
                }
            }
        }
        let threshold_count = keys.len() as u32;

        let mut coalition_ids = vec![0; 1 << layout.criteria];
        for coalition in powerset(Coalition::full(layout.criteria)) {
            keys.push(VariableKey::Coalition(coalition));
            coalition_ids[coalition.mask() as usize] = keys.len() as VarId;
        }

        Ok(Self {
            layout,
            threshold_count,
            coalition_ids,
            keys,
        })
    }

    pub fn layout(&self) -> &IndexLayout {
        &self.layout
    }

    /// Total number of variables `N`.
    pub fn variable_count(&self) -> u32 {
        self.keys.len() as u32
    }

    /// Number of threshold variables; coalition ids start right after.
    pub fn threshold_count(&self) -> u32 {
        self.threshold_count
    }

    /// Id of `key`.
    pub fn id_of(&self, key: &VariableKey) -> SortResult<VarId> {
        match *key {
            VariableKey::Threshold {
                criterion,
                grade,
                boundary,
            } => self.alpha(criterion, grade, boundary),
            VariableKey::Coalition(c) => self.beta(c),
        }
    }

    /// Key owning `id`.
    pub fn key_of(&self, id: VarId) -> SortResult<VariableKey> {
        if id == 0 {
            return Err(SortError::UnknownVariable("id 0".into()));
        }
        self.keys
            .get(id as usize - 1)
            .copied()
            .ok_or_else(|| SortError::UnknownVariable(format!("id {id}")))
    }

    /// Id of `alpha(criterion, grade[, boundary])`.
    pub fn alpha(&self, criterion: usize, grade: u32, boundary: Option<usize>) -> SortResult<VarId> {
        let layout = &self.layout;
        let tag = match (layout.boundaries, boundary) {
            (None, None) => 0,
            (Some(h), Some(b)) if b <= h => b,
            _ => return Err(Self::unknown_threshold(criterion, grade, boundary)),
        };
        if criterion >= layout.criteria || grade >= layout.grade_levels {
            return Err(Self::unknown_threshold(criterion, grade, boundary));
        }
        let pair = criterion * layout.grade_levels as usize + grade as usize;
        Ok((pair * layout.tag_count() + tag) as VarId + 1)
    }

    /// Id of `beta(coalition)`.
    pub fn beta(&self, coalition: Coalition) -> SortResult<VarId> {
        self.coalition_ids
            .get(coalition.mask() as usize)
            .copied()
            .ok_or_else(|| {
                SortError::UnknownVariable(VariableKey::Coalition(coalition).to_string())
            })
    }

    /// All `(id, key)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (VarId, &VariableKey)> {
        self.keys
            .iter()
            .enumerate()
            .map(|(n, key)| (n as VarId + 1, key))
    }

    fn unknown_threshold(criterion: usize, grade: u32, boundary: Option<usize>) -> SortError {
        SortError::UnknownVariable(
            VariableKey::Threshold {
                criterion,
                grade,
                boundary,
            }
            .to_string(),
        )
    }
}
