use rustc_hash::FxHashSet;

use gridlint_core::UsedRange;

use crate::config::LintConfig;
use crate::fingerprint::count_non_empty;
use crate::model::{Analysis, FixReport, ProposedFix, WorksheetReport};
use crate::workbook::WorksheetInput;

/// Render one accepted fix for output.
pub fn fix_report(fix: &ProposedFix) -> FixReport {
    let (categories, rect_info, direction) = match &fix.analysis {
        Some(a) => (a.categories.clone(), a.rect_info.to_vec(), a.direction),
        None => (Vec::new(), Vec::new(), fix.direction()),
    };
    FixReport {
        score: fix.score,
        rect1: fix.rect1.to_a1(),
        rect2: fix.rect2.to_a1(),
        same_format: fix.same_format,
        direction,
        labels: categories.iter().map(|c| c.label().to_string()).collect(),
        categories,
        rect_info,
    }
}

/// Number of distinct cells across the smaller rectangle of each fix.
pub fn suspicious_cells(fixes: &[ProposedFix]) -> usize {
    let mut cells = FxHashSet::default();
    for fix in fixes {
        cells.extend(fix.smaller().cells());
    }
    cells.len()
}

/// Summary statistics and fix list for one analyzed worksheet.
pub fn worksheet_report(
    sheet: &WorksheetInput,
    range: &UsedRange,
    analysis: &Analysis,
    config: &LintConfig,
    elapsed_time_seconds: f64,
) -> WorksheetReport {
    WorksheetReport {
        sheet_name: sheet.sheet_name.clone(),
        used_range: range.to_string(),
        reporting_threshold: config.reporting_threshold,
        formatting_discount: config.formatting_discount,
        suspicious_ranges: analysis.proposed_fixes.len(),
        weighted_suspicious_ranges: analysis.weighted_score(),
        suspicious_cells: suspicious_cells(&analysis.proposed_fixes),
        number_of_cells: range.number_of_cells(),
        num_formula_cells: count_non_empty(&sheet.formulas),
        num_value_cells: count_non_empty(&sheet.values),
        elapsed_time_seconds,
        proposed_fixes: analysis.proposed_fixes.iter().map(fix_report).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridlint_core::{Rectangle, Vector};

    fn rect(x1: i64, y1: i64, x2: i64, y2: i64) -> Rectangle {
        Rectangle::new(Vector::cell(x1, y1), Vector::cell(x2, y2))
    }

    #[test]
    fn suspicious_cells_are_distinct() {
        let fixes = vec![
            ProposedFix::new(0.5, rect(4, 12, 4, 20), rect(4, 21, 4, 21)),
            ProposedFix::new(0.4, rect(5, 21, 5, 21), rect(4, 21, 4, 21)),
            ProposedFix::new(0.3, rect(1, 1, 1, 2), rect(2, 1, 2, 1)),
        ];
        // D21 from the first two fixes (equal areas keep rect1), B1 from the last.
        assert_eq!(suspicious_cells(&fixes), 2);
    }

    #[test]
    fn unclassified_fix_report() {
        let fix = ProposedFix::new(0.5, rect(4, 21, 4, 21), rect(4, 12, 4, 20));
        let report = fix_report(&fix);
        assert_eq!(report.rect1, "D12:D20");
        assert_eq!(report.rect2, "D21");
        assert!(report.categories.is_empty());
        assert!(report.rect_info.is_empty());
    }
}
