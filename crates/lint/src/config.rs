use std::collections::BTreeSet;
use std::path::Path;

use serde::Deserialize;

use crate::error::LintError;
use crate::model::Category;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Thresholds and toggles for one analysis run.
///
/// Numeric fields are clamped into range rather than rejected; see
/// [`LintConfig::clamped`]. The engine clamps again on entry, so a config
/// built in code with `reporting_threshold = 150` behaves like 100.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    /// Minimum anomalousness (0-100) a fix needs to be reported.
    pub reporting_threshold: i64,
    /// Percentage knocked off the score of fixes whose cells differ in format.
    pub formatting_discount: i64,
    /// Minimum number of cells across both rectangles of a fix.
    pub min_fix_size: i64,
    /// Fixes whose size-balance entropy exceeds this are dropped.
    pub max_entropy: f64,
    /// Fixes with more simultaneous categories than this are dropped.
    pub max_categories: i64,
    /// Skip formula fingerprinting above this many non-empty formula cells.
    pub formulas_threshold: usize,
    /// Skip referenced-data fingerprinting above this many non-empty values.
    pub values_threshold: usize,
    /// Passes allowed per group before the merge loop gives up.
    pub merge_iteration_cap: usize,
    /// Categories whose presence drops a fix.
    pub suppress: BTreeSet<Category>,
    pub metric: MetricConfig,
    /// Report zero elapsed time (stable output for regression runs).
    pub no_elapsed_time: bool,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            reporting_threshold: 20,
            formatting_discount: 50,
            min_fix_size: 3,
            max_entropy: 1.0,
            max_categories: 2,
            formulas_threshold: 10_000,
            values_threshold: 10_000,
            merge_iteration_cap: 2000,
            suppress: BTreeSet::from([Category::FatFix]),
            metric: MetricConfig::default(),
            no_elapsed_time: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Fix metric
// ---------------------------------------------------------------------------

/// Constants of the fix-ranking metric.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct MetricConfig {
    /// Floor on the fingerprint distance between two regions.
    pub min_fix_distance: f64,
    /// Weight of the entropy term in the ranking numerator.
    pub entropy_weight: f64,
}

impl Default for MetricConfig {
    fn default() -> Self {
        Self {
            min_fix_distance: 1.0,
            entropy_weight: 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl LintConfig {
    pub fn from_toml(input: &str) -> Result<Self, LintError> {
        let config: LintConfig =
            toml::from_str(input).map_err(|e| LintError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config.clamped())
    }

    pub fn from_file(path: &Path) -> Result<Self, LintError> {
        let input = std::fs::read_to_string(path)
            .map_err(|e| LintError::Io(format!("{}: {e}", path.display())))?;
        Self::from_toml(&input)
    }

    /// Reject values that have no sensible clamp.
    pub fn validate(&self) -> Result<(), LintError> {
        if self.max_entropy.is_nan() {
            return Err(LintError::ConfigValidation("max_entropy must be a number".into()));
        }
        let m = &self.metric;
        if !m.min_fix_distance.is_finite() || m.min_fix_distance <= 0.0 {
            return Err(LintError::ConfigValidation(format!(
                "metric.min_fix_distance must be finite and positive, got {}",
                m.min_fix_distance
            )));
        }
        if !m.entropy_weight.is_finite() {
            return Err(LintError::ConfigValidation(format!(
                "metric.entropy_weight must be finite, got {}",
                m.entropy_weight
            )));
        }
        Ok(())
    }

    /// A copy with every numeric field forced into its range.
    pub fn clamped(&self) -> Self {
        let mut config = self.clone();
        config.reporting_threshold = self.reporting_threshold.clamp(0, 100);
        config.formatting_discount = self.formatting_discount.clamp(0, 100);
        config.min_fix_size = self.min_fix_size.max(0);
        config.max_entropy = if self.max_entropy.is_nan() {
            1.0
        } else {
            self.max_entropy.clamp(0.0, 1.0)
        };
        config.max_categories = self.max_categories.max(1);
        config.merge_iteration_cap = self.merge_iteration_cap.max(1);
        config
    }

    pub fn is_suppressed(&self, category: Category) -> bool {
        self.suppress.contains(&category)
    }

    /// Multiplier applied to the score of a fix with mixed formatting.
    pub fn discount_factor(&self) -> f64 {
        (100 - self.formatting_discount) as f64 / 100.0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
