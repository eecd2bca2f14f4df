//! Clause families for learning a sorting model.

use super::coalition::{powerset, Coalition};
use super::variables::{Literal, VarId, VariableIndex};
use crate::dataset::{Dataset, Grade, ACCEPTED};
use crate::error::{SortError, SortResult};

/// The constraint family a clause belongs to.
///
/// Well-formedness families are hard; data-fit families are soft, so a
/// weighted oracle trades misclassified training entities against each other
/// instead of failing on noisy labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClauseFamily {
    /// `alpha(i,k[,h]) → alpha(i,j[,h])` for `k < j`.
    ThresholdMonotonicity,
    /// `alpha(i,k,j) → alpha(i,k,h)` for boundaries `h < j`.
    BoundaryOrdering,
    /// `beta(C) → beta(C')` for `C ⊊ C'`.
    CoalitionMonotonicity,
    /// An entity reaches its own category.
    PositiveConsistency,
    /// An entity does not reach the category above its own.
    NegativeConsistency,
}

impl ClauseFamily {
    pub fn is_hard(self) -> bool {
        matches!(
            self,
            ClauseFamily::ThresholdMonotonicity
                | ClauseFamily::BoundaryOrdering
                | ClauseFamily::CoalitionMonotonicity
        )
    }
}

/// A disjunction of literals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub literals: Vec<Literal>,
    pub family: ClauseFamily,
}

/// How clause weights are rendered for the oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weighting {
    /// Plain SAT: every clause must hold.
    Unweighted,
    /// MaxSAT: hard clauses get `hard`, soft clauses get `soft`.
    Weighted { hard: u64, soft: u64 },
}

impl Weighting {
    /// Weight of `clause`, or `None` when unweighted.
    pub fn weight_of(&self, clause: &Clause) -> Option<u64> {
        match *self {
            Weighting::Unweighted => None,
            Weighting::Weighted { hard, soft } => Some(if clause.family.is_hard() {
                hard
            } else {
                soft
            }),
        }
    }

    pub fn is_weighted(&self) -> bool {
        matches!(self, Weighting::Weighted { .. })
    }
}

/// The complete clause set of one training problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClauseSet {
    /// Number of variables `N` declared in the instance header.
    pub variable_count: u32,
    /// Clauses in emission order.
    pub clauses: Vec<Clause>,
}

impl ClauseSet {
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Number of clauses of `family`.
    pub fn count(&self, family: ClauseFamily) -> usize {
        self.clauses.iter().filter(|c| c.family == family).count()
    }

    pub fn soft_count(&self) -> usize {
        self.clauses.iter().filter(|c| !c.family.is_hard()).count()
    }

    /// MaxSAT weighting with `soft` per data-fit clause.
    ///
    /// When `hard` is `None` the hard weight is one more than the total soft
    /// weight, so no combination of soft violations outweighs a hard clause.
    pub fn weighted(&self, soft: u64, hard: Option<u64>) -> Weighting {
        let hard = hard.unwrap_or_else(|| {
            (self.soft_count() as u64)
                .saturating_mul(soft)
                .saturating_add(1)
        });
        Weighting::Weighted { hard, soft }
    }
}

/// Emits the clause set for a dataset over a [`VariableIndex`].
///
/// Binary datasets produce threshold monotonicity, coalition monotonicity,
/// and one consistency clause per entity and coalition. Ordered datasets add
/// per-boundary thresholds and the boundary-ordering family.
///
/// # Examples
///
/// ```
/// use u_mrsort::dataset::Dataset;
/// use u_mrsort::encoding::{ClauseBuilder, VariableIndex};
///
/// let data = Dataset::binary(2, 3, vec![vec![1, 2], vec![0, 0]], &[true, false]);
/// let index = VariableIndex::new(data.layout()).unwrap();
/// let clauses = ClauseBuilder::new(&index).build(&data).unwrap();
/// assert_eq!(clauses.variable_count, 10);
/// assert_eq!(clauses.soft_count(), 2 * 4);
/// ```
pub struct ClauseBuilder<'a> {
    index: &'a VariableIndex,
    coalitions: Vec<Coalition>,
}

impl<'a> ClauseBuilder<'a> {
    pub fn new(index: &'a VariableIndex) -> Self {
        let coalitions = powerset(Coalition::full(index.layout().criteria));
        Self { index, coalitions }
    }

    /// Builds every clause family for `data`.
    pub fn build(&self, data: &Dataset) -> SortResult<ClauseSet> {
        if data.layout() != *self.index.layout() {
            return Err(SortError::InvalidConfig(
                "dataset layout does not match the variable index".into(),
            ));
        }
        data.validate()?;

        let mut clauses = Vec::new();
        self.threshold_monotonicity(&mut clauses)?;
        if data.boundaries.is_some() {
            self.boundary_ordering(&mut clauses)?;
        }
        self.coalition_monotonicity(&mut clauses)?;

        for (profile, &category) in data.profiles.iter().zip(&data.categories) {
            match data.boundaries {
                None => {
                    if category == ACCEPTED {
                        self.positive_consistency(profile, None, &mut clauses)?;
                    } else {
                        self.negative_consistency(profile, None, &mut clauses)?;
                    }
                }
                Some(top) => {
                    self.positive_consistency(profile, Some(category), &mut clauses)?;
                    if category < top {
                        self.negative_consistency(profile, Some(category + 1), &mut clauses)?;
                    }
                }
            }
        }

        Ok(ClauseSet {
            variable_count: self.index.variable_count(),
            clauses,
        })
    }

    /// Thresholds reached at grade `k` are reached at every higher grade.
    ///
    /// Emitted for every boundary tag, including the top one that the
    /// decoder reads when promoting into the highest category.
    pub fn threshold_monotonicity(&self, out: &mut Vec<Clause>) -> SortResult<()> {
        let layout = self.index.layout();
        for tag in layout.tags() {
            for i in 0..layout.criteria {
                for k in 0..layout.grade_levels {
                    let low = self.index.alpha(i, k, tag)?;
                    for j in k + 1..layout.grade_levels {
                        let high = self.index.alpha(i, j, tag)?;
                        out.push(clause(
                            vec![neg(low), pos(high)],
                            ClauseFamily::ThresholdMonotonicity,
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    /// Higher boundaries are at least as strict as lower ones.
    pub fn boundary_ordering(&self, out: &mut Vec<Clause>) -> SortResult<()> {
        let layout = self.index.layout();
        let Some(top) = layout.boundaries else {
            return Ok(());
        };
        for k in 0..layout.grade_levels {
            for i in 0..layout.criteria {
                for h in 0..=top {
                    let lower = self.index.alpha(i, k, Some(h))?;
                    for j in h + 1..=top {
                        let upper = self.index.alpha(i, k, Some(j))?;
                        out.push(clause(
                            vec![pos(lower), neg(upper)],
                            ClauseFamily::BoundaryOrdering,
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    /// Supersets of a sufficient coalition are sufficient.
    pub fn coalition_monotonicity(&self, out: &mut Vec<Clause>) -> SortResult<()> {
        for &larger in &self.coalitions {
            let larger_id = self.index.beta(larger)?;
            for &smaller in &self.coalitions {
                if smaller != larger && smaller.is_subset_of(larger) {
                    out.push(clause(
                        vec![neg(self.index.beta(smaller)?), pos(larger_id)],
                        ClauseFamily::CoalitionMonotonicity,
                    ));
                }
            }
        }
        Ok(())
    }

    /// For every coalition `C`: some criterion of `C` fails its threshold at
    /// the entity's grade, or the complement of `C` is sufficient.
    ///
    /// Together these force `beta(V)` for the entity's validated set `V`.
    pub fn positive_consistency(
        &self,
        profile: &[Grade],
        tag: Option<usize>,
        out: &mut Vec<Clause>,
    ) -> SortResult<()> {
        let criteria = self.index.layout().criteria;
        for &c in &self.coalitions {
            let mut literals = Vec::with_capacity(c.len() + 1);
            for i in c.members() {
                literals.push(pos(self.index.alpha(i, profile[i], tag)?));
            }
            literals.push(pos(self.index.beta(c.complement(criteria))?));
            out.push(clause(literals, ClauseFamily::PositiveConsistency));
        }
        Ok(())
    }

    /// For every coalition `C`: some criterion of `C` fails its threshold at
    /// the entity's grade, or `C` is not sufficient.
    ///
    /// Together these forbid `beta(V)` for the entity's validated set `V`.
    pub fn negative_consistency(
        &self,
        profile: &[Grade],
        tag: Option<usize>,
        out: &mut Vec<Clause>,
    ) -> SortResult<()> {
        for &c in &self.coalitions {
            let mut literals = Vec::with_capacity(c.len() + 1);
            for i in c.members() {
                literals.push(neg(self.index.alpha(i, profile[i], tag)?));
            }
            literals.push(neg(self.index.beta(c)?));
            out.push(clause(literals, ClauseFamily::NegativeConsistency));
        }
        Ok(())
    }
}

fn clause(literals: Vec<Literal>, family: ClauseFamily) -> Clause {
    Clause { literals, family }
}

fn pos(id: VarId) -> Literal {
    id as Literal
}

fn neg(id: VarId) -> Literal {
    -(id as Literal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::IndexLayout;

    fn tiny_binary() -> Dataset {
        Dataset::binary(2, 3, vec![vec![1, 2], vec![0, 0]], &[true, false])
    }

    fn build(data: &Dataset) -> (VariableIndex, ClauseSet) {
        let index = VariableIndex::new(data.layout()).unwrap();
        let clauses = ClauseBuilder::new(&index).build(data).unwrap();
        (index, clauses)
    }

    #[test]
    fn test_binary_family_counts() {
        let (_, set) = build(&tiny_binary());
        // 2 criteria * C(3,2) grade pairs
        assert_eq!(set.count(ClauseFamily::ThresholdMonotonicity), 2 * 3);
        // strict subset pairs of a 2-set: 3^2 - 2^2
        assert_eq!(set.count(ClauseFamily::CoalitionMonotonicity), 5);
        assert_eq!(set.count(ClauseFamily::PositiveConsistency), 4);
        assert_eq!(set.count(ClauseFamily::NegativeConsistency), 4);
        assert_eq!(set.count(ClauseFamily::BoundaryOrdering), 0);
        assert_eq!(set.len(), 6 + 5 + 8);
    }

    #[test]
    fn test_positive_clause_shape() {
        let data = tiny_binary();
        let (index, set) = build(&data);
        let positives: Vec<&Clause> = set
            .clauses
            .iter()
            .filter(|c| c.family == ClauseFamily::PositiveConsistency)
            .collect();

        // C = {} : only beta(full)
        assert_eq!(
            positives[0].literals,
            vec![index.beta(Coalition::full(2)).unwrap() as Literal]
        );
        // C = {0,1} : alpha(0,1) ∨ alpha(1,2) ∨ beta({})
        assert_eq!(
            positives[3].literals,
            vec![
                index.alpha(0, 1, None).unwrap() as Literal,
                index.alpha(1, 2, None).unwrap() as Literal,
                index.beta(Coalition::empty()).unwrap() as Literal,
            ]
        );
    }

    #[test]
    fn test_negative_clause_shape() {
        let data = tiny_binary();
        let (index, set) = build(&data);
        let negatives: Vec<&Clause> = set
            .clauses
            .iter()
            .filter(|c| c.family == ClauseFamily::NegativeConsistency)
            .collect();

        assert_eq!(
            negatives[1].literals,
            vec![
                -(index.alpha(0, 0, None).unwrap() as Literal),
                -(index.beta(Coalition::from_criteria([0])).unwrap() as Literal),
            ]
        );
    }

    #[test]
    fn test_ordered_family_counts() {
        let data = Dataset::ordered(
            2,
            3,
            2,
            vec![vec![0, 0], vec![1, 1], vec![2, 2]],
            vec![0, 1, 2],
        );
        let (_, set) = build(&data);
        // 3 tags * 2 criteria * 3 grade pairs
        assert_eq!(set.count(ClauseFamily::ThresholdMonotonicity), 3 * 2 * 3);
        // 3 grades * 2 criteria * 3 tag pairs
        assert_eq!(set.count(ClauseFamily::BoundaryOrdering), 3 * 2 * 3);
        assert_eq!(set.count(ClauseFamily::PositiveConsistency), 3 * 4);
        // only the two entities below the top category
        assert_eq!(set.count(ClauseFamily::NegativeConsistency), 2 * 4);
    }

    #[test]
    fn test_ordered_uses_category_tags() {
        let data = Dataset::ordered(1, 3, 2, vec![vec![2]], vec![1]);
        let (index, set) = build(&data);

        let pos_clause = set
            .clauses
            .iter()
            .find(|c| c.family == ClauseFamily::PositiveConsistency && c.literals.len() == 2)
            .unwrap();
        assert_eq!(pos_clause.literals[0], index.alpha(0, 2, Some(1)).unwrap() as Literal);

        let neg_clause = set
            .clauses
            .iter()
            .find(|c| c.family == ClauseFamily::NegativeConsistency && c.literals.len() == 2)
            .unwrap();
        assert_eq!(
            neg_clause.literals[0],
            -(index.alpha(0, 2, Some(2)).unwrap() as Literal)
        );
    }

    #[test]
    fn test_rejects_out_of_range_grade() {
        let data = Dataset::binary(2, 3, vec![vec![1, 5]], &[true]);
        let index = VariableIndex::new(IndexLayout::binary(2, 3)).unwrap();
        let result = ClauseBuilder::new(&index).build(&data);
        assert!(matches!(result, Err(SortError::GradeOutOfRange { grade: 5, .. })));
    }

    #[test]
    fn test_rejects_layout_mismatch() {
        let index = VariableIndex::new(IndexLayout::binary(3, 3)).unwrap();
        assert!(ClauseBuilder::new(&index).build(&tiny_binary()).is_err());
    }

    #[test]
    fn test_literals_within_range() {
        let data = Dataset::ordered(3, 5, 2, vec![vec![4, 0, 2]], vec![1]);
        let (index, set) = build(&data);
        let n = index.variable_count() as Literal;
        for c in &set.clauses {
            assert!(!c.literals.is_empty());
            for &lit in &c.literals {
                assert!(lit != 0 && lit.abs() <= n);
            }
        }
    }

    #[test]
    fn test_default_hard_weight_dominates() {
        let (_, set) = build(&tiny_binary());
        match set.weighted(1, None) {
            Weighting::Weighted { hard, soft } => {
                assert_eq!(soft, 1);
                assert_eq!(hard, set.soft_count() as u64 + 1);
            }
            Weighting::Unweighted => panic!("expected weighted"),
        }
        assert_eq!(
            set.weighted(1, Some(1_000)),
            Weighting::Weighted { hard: 1_000, soft: 1 }
        );
    }
}
