//! Synthetic datasets labeled by a hidden MR-Sort rule.

use super::types::{Dataset, Grade, ACCEPTED, DEFAULT_GRADE_LEVELS, REJECTED};
use crate::encoding::{Coalition, IndexLayout};
use crate::error::{SortError, SortResult};
use crate::model::SortingModel;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Configuration for [`SyntheticGenerator`].
///
/// # Examples
///
/// ```
/// use u_mrsort::dataset::GeneratorConfig;
///
/// let config = GeneratorConfig::default()
///     .with_entities(50)
///     .with_criteria(3)
///     .with_boundaries(2)
///     .with_noise(0.05)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Number of labeled entities.
    pub entities: usize,

    /// Number of criteria `G`.
    pub criteria: usize,

    /// Number of grade levels `MAXG`.
    pub grade_levels: u32,

    /// Category boundaries `H`; `None` for accepted/rejected labels.
    pub boundaries: Option<usize>,

    /// Probability in [0, 1] that an entity's label is perturbed.
    ///
    /// Binary labels are flipped; ordered labels move one category up or
    /// down.
    pub noise: f64,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            entities: 100,
            criteria: 4,
            grade_levels: DEFAULT_GRADE_LEVELS,
            boundaries: None,
            noise: 0.0,
            seed: None,
        }
    }
}

impl GeneratorConfig {
    pub fn with_entities(mut self, n: usize) -> Self {
        self.entities = n;
        self
    }

    pub fn with_criteria(mut self, g: usize) -> Self {
        self.criteria = g;
        self
    }

    pub fn with_grade_levels(mut self, levels: u32) -> Self {
        self.grade_levels = levels;
        self
    }

    pub fn with_boundaries(mut self, h: usize) -> Self {
        self.boundaries = Some(h);
        self
    }

    pub fn with_noise(mut self, p: f64) -> Self {
        self.noise = p;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.noise) {
            return Err(format!("noise must be in [0, 1], got {}", self.noise));
        }
        let layout = IndexLayout {
            criteria: self.criteria,
            grade_levels: self.grade_levels,
            boundaries: self.boundaries,
        };
        layout.validate().map_err(|e| e.to_string())
    }
}

/// The MR-Sort rule that labeled a synthetic dataset.
///
/// Criterion `i` is validated for boundary `h` when the grade reaches
/// `thresholds[h - 1][i]` (binary rules have a single row). A coalition is
/// sufficient when its weights sum to at least `lambda`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HiddenRule {
    pub grade_levels: u32,
    pub boundaries: Option<usize>,
    /// Normalized criterion weights (sum to 1).
    pub weights: Vec<f64>,
    /// Majority level in [0.2, 0.8).
    pub lambda: f64,
    /// `thresholds[row][criterion]`, non-decreasing down the rows.
    pub thresholds: Vec<Vec<Grade>>,
}

impl HiddenRule {
    /// Whether the weights of `coalition` reach the majority level.
    pub fn is_sufficient(&self, coalition: Coalition) -> bool {
        let weight: f64 = coalition.members().map(|i| self.weights[i]).sum();
        weight >= self.lambda
    }

    fn validated(&self, profile: &[Grade], row: usize) -> Coalition {
        let mut coalition = Coalition::empty();
        for (i, &grade) in profile.iter().enumerate() {
            if grade >= self.thresholds[row][i] {
                coalition.insert(i);
            }
        }
        coalition
    }

    /// Category the rule assigns to `profile`.
    pub fn category(&self, profile: &[Grade]) -> usize {
        match self.boundaries {
            None => {
                if self.is_sufficient(self.validated(profile, 0)) {
                    ACCEPTED
                } else {
                    REJECTED
                }
            }
            Some(top) => (0..top)
                .take_while(|&row| self.is_sufficient(self.validated(profile, row)))
                .count(),
        }
    }

    /// The same rule as a [`SortingModel`], with the sufficiency table
    /// expanded over every coalition.
    pub fn to_model(&self) -> SortingModel {
        let criteria = self.weights.len();
        let as_row = |row: &Vec<Grade>| row.iter().copied().map(Some).collect::<Vec<_>>();
        let thresholds = match self.boundaries {
            None => vec![as_row(&self.thresholds[0])],
            Some(_) => std::iter::once(vec![Some(0); criteria])
                .chain(self.thresholds.iter().map(as_row))
                .collect(),
        };
        SortingModel {
            criteria,
            grade_levels: self.grade_levels,
            boundaries: self.boundaries,
            thresholds,
            sufficient: (0..=Coalition::full(criteria).mask())
                .map(|mask| self.is_sufficient(Coalition::from_mask(mask)))
                .collect(),
        }
    }
}

/// Draws a random [`HiddenRule`] and a dataset labeled by it.
pub struct SyntheticGenerator;

impl SyntheticGenerator {
    /// Generates a rule and `config.entities` profiles with uniform grades.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_mrsort::dataset::{GeneratorConfig, SyntheticGenerator};
    ///
    /// let config = GeneratorConfig::default().with_entities(20).with_seed(42);
    /// let (rule, data) = SyntheticGenerator::generate(&config).unwrap();
    /// assert_eq!(data.len(), 20);
    /// for (profile, &category) in data.profiles.iter().zip(&data.categories) {
    ///     assert_eq!(rule.category(profile), category);
    /// }
    /// ```
    pub fn generate(config: &GeneratorConfig) -> SortResult<(HiddenRule, Dataset)> {
        config.validate().map_err(SortError::InvalidConfig)?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        let rule = Self::draw_rule(config, &mut rng);
        let top = config.boundaries.unwrap_or(ACCEPTED);

        let mut profiles = Vec::with_capacity(config.entities);
        let mut categories = Vec::with_capacity(config.entities);
        for _ in 0..config.entities {
            let profile: Vec<Grade> = (0..config.criteria)
                .map(|_| rng.random_range(0..config.grade_levels))
                .collect();
            let mut category = rule.category(&profile);
            if config.noise > 0.0 && rng.random_bool(config.noise) {
                category = perturb(category, top, &mut rng);
            }
            profiles.push(profile);
            categories.push(category);
        }

        let data = Dataset {
            criteria: config.criteria,
            grade_levels: config.grade_levels,
            boundaries: config.boundaries,
            profiles,
            categories,
        };
        Ok((rule, data))
    }

    fn draw_rule<R: Rng>(config: &GeneratorConfig, rng: &mut R) -> HiddenRule {
        let raw: Vec<f64> = (0..config.criteria)
            .map(|_| rng.random_range(f64::EPSILON..1.0))
            .collect();
        let total: f64 = raw.iter().sum();
        let weights = raw.iter().map(|w| w / total).collect();

        let rows = config.boundaries.unwrap_or(1);
        let mut thresholds = vec![vec![0; config.criteria]; rows];
        for i in 0..config.criteria {
            let mut cuts: Vec<Grade> = (0..rows)
                .map(|_| rng.random_range(0..config.grade_levels))
                .collect();
            cuts.sort_unstable();
            for (row, cut) in cuts.into_iter().enumerate() {
                thresholds[row][i] = cut;
            }
        }

        HiddenRule {
            grade_levels: config.grade_levels,
            boundaries: config.boundaries,
            weights,
            lambda: rng.random_range(0.2..0.8),
            thresholds,
        }
    }
}

/// Moves a label to a different category: flip for two categories, one step
/// up or down otherwise.
fn perturb<R: Rng>(category: usize, top: usize, rng: &mut R) -> usize {
    if category == 0 {
        1
    } else if category == top || rng.random_bool(0.5) {
        category - 1
    } else {
        category + 1
    }
}
