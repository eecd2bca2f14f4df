//! Coalitions of criteria and power-set enumeration.

/// Maximum number of criteria the encoder accepts.
///
/// The coalition space has `2^G` members and coalition monotonicity emits
/// roughly `3^G` clauses, so the encoding is only practical for small `G`.
pub const MAX_CRITERIA: usize = 16;

/// A subset of the criterion index set, stored as a bitmask.
///
/// Bit `i` is set when criterion `i` belongs to the coalition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coalition {
    mask: u32,
}

impl Coalition {
    /// The empty coalition.
    pub const fn empty() -> Self {
        Self { mask: 0 }
    }

    /// The coalition of all criteria `0..criteria`.
    ///
    /// # Panics
    ///
    /// If `criteria` exceeds [`MAX_CRITERIA`].
    pub fn full(criteria: usize) -> Self {
        assert!(
            criteria <= MAX_CRITERIA,
            "{criteria} criteria exceed the coalition limit of {MAX_CRITERIA}"
        );
        Self {
            mask: (1u32 << criteria) - 1,
        }
    }

    /// Builds a coalition from its raw bitmask.
    pub const fn from_mask(mask: u32) -> Self {
        Self { mask }
    }

    /// Builds a coalition from criterion indices.
    pub fn from_criteria<I: IntoIterator<Item = usize>>(criteria: I) -> Self {
        criteria
            .into_iter()
            .fold(Self::empty(), |c, i| c.with(i))
    }

    /// Raw bitmask.
    pub const fn mask(self) -> u32 {
        self.mask
    }

    /// Returns a copy with criterion `i` added.
    ///
    /// # Panics
    ///
    /// If `i` is not below [`MAX_CRITERIA`].
    pub fn with(self, i: usize) -> Self {
        assert!(
            i < MAX_CRITERIA,
            "criterion {i} outside the coalition limit of {MAX_CRITERIA}"
        );
        Self {
            mask: self.mask | (1 << i),
        }
    }

    /// Adds criterion `i`.
    pub fn insert(&mut self, i: usize) {
        *self = self.with(i);
    }

    pub fn contains(self, i: usize) -> bool {
        i < 32 && self.mask & (1 << i) != 0
    }

    pub fn len(self) -> usize {
        self.mask.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.mask == 0
    }

    /// Criteria of `0..criteria` not in this coalition.
    pub fn complement(self, criteria: usize) -> Self {
        Self {
            mask: Self::full(criteria).mask & !self.mask,
        }
    }

    /// Whether every member of `self` is also a member of `other`.
    pub fn is_subset_of(self, other: Coalition) -> bool {
        self.mask & !other.mask == 0
    }

    /// Members in ascending order.
    pub fn members(self) -> impl Iterator<Item = usize> {
        let mask = self.mask;
        (0..32).filter(move |i| mask & (1 << i) != 0)
    }
}

impl std::fmt::Display for Coalition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (n, i) in self.members().enumerate() {
            if n > 0 {
                write!(f, ",")?;
            }
            write!(f, "{i}")?;
        }
        write!(f, "}}")
    }
}

/// Inclusion test: `a ⊆ b`.
pub fn subset_of(a: Coalition, b: Coalition) -> bool {
    a.is_subset_of(b)
}

/// Enumerates every subset of `universe`.
///
/// Subsets come out by increasing cardinality, and within one cardinality in
/// lexicographic order of their ascending member lists. The order depends
/// only on `universe`, so ids derived from positions are stable.
///
/// # Examples
///
/// ```
/// use u_mrsort::encoding::{powerset, Coalition};
///
/// let subsets = powerset(Coalition::full(2));
/// let expected: Vec<Coalition> = vec![
///     Coalition::empty(),
///     Coalition::from_criteria([0]),
///     Coalition::from_criteria([1]),
///     Coalition::from_criteria([0, 1]),
/// ];
/// assert_eq!(subsets, expected);
/// ```
pub fn powerset(universe: Coalition) -> Vec<Coalition> {
    let members: Vec<usize> = universe.members().collect();
    let n = members.len();
    let mut out = Vec::with_capacity(1 << n);

    for size in 0..=n {
        // Index combinations of `size` out of `n`, lexicographic.
        let mut picks: Vec<usize> = (0..size).collect();
        loop {
            out.push(Coalition::from_criteria(picks.iter().map(|&p| members[p])));

            // Advance to the next combination.
            let mut pos = size;
            while pos > 0 && picks[pos - 1] == n - size + pos - 1 {
                pos -= 1;
            }
            if pos == 0 {
                break;
            }
            picks[pos - 1] += 1;
            for q in pos..size {
                picks[q] = picks[q - 1] + 1;
            }
        }
    }

    out
}
