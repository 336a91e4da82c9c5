use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize, Serializer};

use gridlint_core::{Rectangle, Vector};

use crate::error::LintError;

// ---------------------------------------------------------------------------
// Fingerprints
// ---------------------------------------------------------------------------

/// Equivalence-class key of a cell.
///
/// Formulas that reference nothing (`=RAND()`), formulas whose vectors sum
/// to zero, and all referenced data cells share `NoDependencies`. Every
/// other formula is keyed by the weighted norm of its summed dependency
/// vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Fingerprint {
    NoDependencies,
    Hash(i64),
}

impl Fingerprint {
    /// Magnitude the fix metric uses for the no-dependency class.
    pub const NO_DEPENDENCIES_VALUE: f64 = 12345.0;

    /// Numeric magnitude, used for the distance between two classes.
    pub fn value(&self) -> f64 {
        match self {
            Self::NoDependencies => Self::NO_DEPENDENCIES_VALUE,
            Self::Hash(h) => *h as f64,
        }
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoDependencies => write!(f, "no_dependencies"),
            Self::Hash(h) => write!(f, "{h}"),
        }
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Fingerprint of every analyzed cell, keyed by its 1-based address.
pub type FingerprintMap = FxHashMap<Vector, Fingerprint>;

/// Maximal rectangles per fingerprint.
pub type Groups = BTreeMap<Fingerprint, Vec<Rectangle>>;

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Heuristic explanation attached to a proposed fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    FatFix,
    RecurrentFormula,
    DifferentReferentCount,
    OneExtraConstant,
    NumberOfConstantsMismatch,
    BothConstants,
    OneIsAllConstants,
    #[serde(rename = "r1c1_mismatch")]
    R1C1Mismatch,
    AbsoluteRefMismatch,
    OffAxisReference,
    Unclassified,
}

impl Category {
    /// Human-readable explanation.
    pub fn label(&self) -> &'static str {
        match self {
            Self::FatFix => "Inconsistent multiple columns/rows",
            Self::RecurrentFormula => "Formula(s) refer to each other",
            Self::DifferentReferentCount => "Formula(s) refer to different numbers of cells",
            Self::OneExtraConstant => "Formula(s) with an extra constant",
            Self::NumberOfConstantsMismatch => "Formula(s) with different numbers of constants",
            Self::BothConstants => "Formulas use only constants",
            Self::OneIsAllConstants => "One formula uses only constants",
            Self::R1C1Mismatch => "Formulas refer to different cells",
            Self::AbsoluteRefMismatch => "Mix of absolute ($) and relative references",
            Self::OffAxisReference => "References refer to cells in other rows/columns",
            Self::Unclassified => "Unclassified",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FatFix => write!(f, "fat_fix"),
            Self::RecurrentFormula => write!(f, "recurrent_formula"),
            Self::DifferentReferentCount => write!(f, "different_referent_count"),
            Self::OneExtraConstant => write!(f, "one_extra_constant"),
            Self::NumberOfConstantsMismatch => write!(f, "number_of_constants_mismatch"),
            Self::BothConstants => write!(f, "both_constants"),
            Self::OneIsAllConstants => write!(f, "one_is_all_constants"),
            Self::R1C1Mismatch => write!(f, "r1c1_mismatch"),
            Self::AbsoluteRefMismatch => write!(f, "absolute_ref_mismatch"),
            Self::OffAxisReference => write!(f, "off_axis_reference"),
            Self::Unclassified => write!(f, "unclassified"),
        }
    }
}

/// Formula metadata for one rectangle of a fix, read at its upper-left cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RectInfo {
    pub formula: String,
    pub r1c1: String,
    pub constants: Vec<f64>,
    pub sum_of_constants: f64,
    pub dependencies: Vec<Vector>,
    pub dependence_count: usize,
    pub absolute_refcount: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Vertical,
    Horizontal,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vertical => write!(f, "vertical"),
            Self::Horizontal => write!(f, "horizontal"),
        }
    }
}

/// Why a fix was accepted: its categories and what each side computes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FixAnalysis {
    pub categories: Vec<Category>,
    pub rect_info: [RectInfo; 2],
    pub direction: Direction,
}

// ---------------------------------------------------------------------------
// Proposed fixes
// ---------------------------------------------------------------------------

/// A candidate merge of two adjacent rectangles with different fingerprints.
///
/// Values are never mutated in place; each pipeline stage returns a
/// decorated copy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProposedFix {
    /// Raw metric while searching (more negative = more anomalous), then the
    /// positive anomalousness once past the threshold filter.
    pub score: f64,
    /// The rectangle with the smaller upper-left corner.
    pub rect1: Rectangle,
    pub rect2: Rectangle,
    pub same_format: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<FixAnalysis>,
}

impl ProposedFix {
    /// Build a fix with `rect1` set to whichever rectangle sorts first.
    pub fn new(score: f64, a: Rectangle, b: Rectangle) -> Self {
        let (rect1, rect2) = if b.upper_left < a.upper_left {
            (b, a)
        } else {
            (a, b)
        };
        Self {
            score,
            rect1,
            rect2,
            same_format: true,
            analysis: None,
        }
    }

    pub fn with_score(&self, score: f64) -> Self {
        Self {
            score,
            ..self.clone()
        }
    }

    /// Mark the two rectangles as differently formatted and scale the score.
    pub fn with_format_discount(&self, factor: f64) -> Self {
        Self {
            score: self.score * factor,
            same_format: false,
            ..self.clone()
        }
    }

    pub fn with_analysis(&self, analysis: FixAnalysis) -> Self {
        Self {
            analysis: Some(analysis),
            ..self.clone()
        }
    }

    pub fn rectangles(&self) -> [Rectangle; 2] {
        [self.rect1, self.rect2]
    }

    pub fn bounding_box(&self) -> Rectangle {
        self.rect1.bounding_box(&self.rect2)
    }

    /// Total cells across both rectangles.
    pub fn cell_count(&self) -> i64 {
        self.rect1.area() + self.rect2.area()
    }

    /// The smaller of the two rectangles (the likelier mistake).
    pub fn smaller(&self) -> Rectangle {
        if self.rect2.area() < self.rect1.area() {
            self.rect2
        } else {
            self.rect1
        }
    }

    /// Vertical iff both rectangles start in the same column.
    pub fn direction(&self) -> Direction {
        if self.rect1.upper_left.x == self.rect2.upper_left.x {
            Direction::Vertical
        } else {
            Direction::Horizontal
        }
    }
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

/// Everything computed for one worksheet.
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    pub formula_fingerprints: FingerprintMap,
    pub data_fingerprints: FingerprintMap,
    pub grouped_formulas: Groups,
    pub grouped_data: Groups,
    /// Accepted fixes, most anomalous first.
    pub proposed_fixes: Vec<ProposedFix>,
}

impl Analysis {
    pub fn fix(&self, index: usize) -> Result<&ProposedFix, LintError> {
        self.proposed_fixes
            .get(index)
            .ok_or(LintError::UnknownFix(index))
    }

    /// Classification of an accepted fix.
    pub fn classification(&self, index: usize) -> Result<&FixAnalysis, LintError> {
        self.fix(index)?
            .analysis
            .as_ref()
            .ok_or(LintError::Unclassified(index))
    }

    /// Sum of accepted scores.
    pub fn weighted_score(&self) -> f64 {
        self.proposed_fixes.iter().map(|f| f.score).sum()
    }
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct FixReport {
    pub score: f64,
    pub rect1: String,
    pub rect2: String,
    pub same_format: bool,
    pub direction: Direction,
    pub categories: Vec<Category>,
    pub labels: Vec<String>,
    pub rect_info: Vec<RectInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorksheetReport {
    pub sheet_name: String,
    pub used_range: String,
    pub reporting_threshold: i64,
    pub formatting_discount: i64,
    pub suspicious_ranges: usize,
    pub weighted_suspicious_ranges: f64,
    pub suspicious_cells: usize,
    pub number_of_cells: i64,
    pub num_formula_cells: usize,
    pub num_value_cells: usize,
    pub elapsed_time_seconds: f64,
    pub proposed_fixes: Vec<FixReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkbookReport {
    pub workbook_name: String,
    pub meta: ReportMeta,
    pub worksheets: Vec<WorksheetReport>,
}

/// One `(formatting_discount, reporting_threshold)` point of a sweep.
#[derive(Debug, Clone, Serialize)]
pub struct SweepPoint {
    pub formatting_discount: i64,
    pub reporting_threshold: i64,
    pub suspicious_ranges: usize,
    pub weighted_suspicious_ranges: f64,
}
