//! Classification of proposed fixes into explanatory categories.

use gridlint_core::{Rectangle, UsedRange, Vector};
use gridlint_refs::{absolute_ref_count, dependencies, formula_to_r1c1, numeric_constants};

use crate::config::LintConfig;
use crate::model::{Category, Direction, ProposedFix, RectInfo};

/// Formula metadata read from the upper-left cell of `rect`.
pub fn rect_info(rect: &Rectangle, range: &UsedRange, formulas: &[Vec<String>]) -> RectInfo {
    let origin = rect.upper_left;
    let formula = range
        .grid_index(origin)
        .and_then(|(i, j)| formulas.get(i).and_then(|row| row.get(j)))
        .cloned()
        .unwrap_or_default();

    let constants = numeric_constants(&formula);
    let dependencies = dependencies(&formula, origin, false);
    RectInfo {
        r1c1: formula_to_r1c1(&formula, origin),
        sum_of_constants: constants.iter().sum(),
        constants,
        dependence_count: dependencies.len(),
        dependencies,
        absolute_refcount: absolute_ref_count(&formula),
        formula,
    }
}

/// The merged region spans more than one row and more than one column.
fn is_fat(fix: &ProposedFix) -> bool {
    let bb = fix.bounding_box();
    !bb.is_single_row() && !bb.is_single_column()
}

fn sorted(deps: &[Vector]) -> Vec<Vector> {
    let mut out = deps.to_vec();
    out.sort();
    out
}

/// Every category that applies to the fix, in a fixed order.
pub fn classify(fix: &ProposedFix, info: &[RectInfo; 2]) -> Vec<Category> {
    let [first, second] = info;
    let mut out = Vec::new();

    if is_fat(fix) {
        out.push(Category::FatFix);
    }

    // A reference one step back along the fix's own axis is an accumulator
    // (running total), not an inconsistency.
    let backward = match fix.direction() {
        Direction::Vertical => Vector::cell(0, -1),
        Direction::Horizontal => Vector::cell(-1, 0),
    };
    if info.iter().any(|i| i.dependencies.contains(&backward)) {
        out.push(Category::RecurrentFormula);
    }

    if first.dependence_count != second.dependence_count {
        out.push(Category::DifferentReferentCount);
    }

    let constants_delta = first.constants.len().abs_diff(second.constants.len());
    if constants_delta == 1 {
        out.push(Category::OneExtraConstant);
    } else if constants_delta > 1 {
        out.push(Category::NumberOfConstantsMismatch);
    }

    let (c1, c2) = (first.dependence_count, second.dependence_count);
    if c1 == 0 && c2 == 0 {
        out.push(Category::BothConstants);
    } else if c1 == 0 || c2 == 0 {
        out.push(Category::OneIsAllConstants);
    }

    if first.r1c1 != second.r1c1 && sorted(&first.dependencies) != sorted(&second.dependencies) {
        out.push(Category::R1C1Mismatch);
    }

    if first.absolute_refcount != second.absolute_refcount {
        out.push(Category::AbsoluteRefMismatch);
    }

    if info
        .iter()
        .flat_map(|i| i.dependencies.iter())
        .any(|d| d.x != 0 && d.y != 0)
    {
        out.push(Category::OffAxisReference);
    }

    out
}

/// Keep the single best explanation when there is one; never return empty.
pub fn prune(categories: Vec<Category>) -> Vec<Category> {
    if categories.contains(&Category::OneIsAllConstants) {
        return vec![Category::OneIsAllConstants];
    }
    if categories.is_empty() {
        return vec![Category::Unclassified];
    }
    categories
}

/// True when the fix should not be reported: too many explanations, or any
/// suppressed one.
pub fn omit(categories: &[Category], config: &LintConfig) -> bool {
    categories.len() as i64 > config.max_categories
        || categories.iter().any(|c| config.is_suppressed(*c))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x1: i64, y1: i64, x2: i64, y2: i64) -> Rectangle {
        Rectangle::new(Vector::cell(x1, y1), Vector::cell(x2, y2))
    }

    fn info_for(formula: &str, origin: Vector) -> RectInfo {
        let range = UsedRange {
            sheet: "S".into(),
            upper_left: origin,
            bottom_right: origin,
        };
        rect_info(&Rectangle::cell(origin), &range, &[vec![formula.to_string()]])
    }

    fn vertical_fix() -> ProposedFix {
        ProposedFix::new(0.9, rect(4, 12, 4, 20), rect(4, 21, 4, 21))
    }

    #[test]
    fn rect_info_fields() {
        let info = info_for("=$A$1*C5+2.5", Vector::cell(4, 5));
        assert_eq!(info.formula, "=$A$1*C5+2.5");
        assert_eq!(info.constants, vec![2.5]);
        assert_eq!(info.sum_of_constants, 2.5);
        assert_eq!(info.dependence_count, 2);
        assert_eq!(info.absolute_refcount, 2);
        assert_eq!(info.r1c1, "=R1C1*RC[-1]+2.5");
    }

    #[test]
    fn rect_info_outside_grid_is_empty() {
        let range = UsedRange::parse("S!A1:A1").unwrap();
        let info = rect_info(&rect(9, 9, 9, 9), &range, &[vec!["=1".into()]]);
        assert_eq!(info.formula, "");
        assert_eq!(info.dependence_count, 0);
    }

    #[test]
    fn off_by_one_row() {
        let info = [
            info_for("=C12", Vector::cell(4, 12)),
            info_for("=C20", Vector::cell(4, 21)),
        ];
        let bins = classify(&vertical_fix(), &info);
        assert_eq!(bins, vec![Category::R1C1Mismatch, Category::OffAxisReference]);
        assert_eq!(prune(bins.clone()), bins);
    }

    #[test]
    fn recurrent_formula() {
        // Running total: =D11+C12 down the column.
        let info = [
            info_for("=D11+C12", Vector::cell(4, 12)),
            info_for("=C21", Vector::cell(4, 21)),
        ];
        let bins = classify(&vertical_fix(), &info);
        assert!(bins.contains(&Category::RecurrentFormula));
        assert!(bins.contains(&Category::DifferentReferentCount));
    }

    #[test]
    fn constants() {
        let info = [
            info_for("=C12*2", Vector::cell(4, 12)),
            info_for("=C21", Vector::cell(4, 21)),
        ];
        assert_eq!(classify(&vertical_fix(), &info), vec![Category::OneExtraConstant]);

        let info = [
            info_for("=C12*2+3", Vector::cell(4, 12)),
            info_for("=C21", Vector::cell(4, 21)),
        ];
        assert_eq!(
            classify(&vertical_fix(), &info),
            vec![Category::NumberOfConstantsMismatch]
        );
    }

    #[test]
    fn all_constants_wins() {
        let info = [
            info_for("=C12+1", Vector::cell(4, 12)),
            info_for("=42", Vector::cell(4, 21)),
        ];
        let bins = classify(&vertical_fix(), &info);
        assert!(bins.len() > 1);
        assert_eq!(prune(bins), vec![Category::OneIsAllConstants]);

        let info = [
            info_for("=1+1", Vector::cell(4, 12)),
            info_for("=42", Vector::cell(4, 21)),
        ];
        let bins = classify(&vertical_fix(), &info);
        assert!(bins.contains(&Category::BothConstants));
    }

    #[test]
    fn absolute_mismatch() {
        let info = [
            info_for("=$C12", Vector::cell(4, 12)),
            info_for("=C21", Vector::cell(4, 21)),
        ];
        let bins = classify(&vertical_fix(), &info);
        assert!(bins.contains(&Category::AbsoluteRefMismatch));
    }

    #[test]
    fn fat_fix() {
        let fix = ProposedFix::new(0.9, rect(1, 1, 2, 3), rect(1, 4, 2, 4));
        let info = [
            info_for("=1+1", Vector::cell(1, 1)),
            info_for("=1+1", Vector::cell(1, 4)),
        ];
        let bins = classify(&fix, &info);
        assert_eq!(bins[0], Category::FatFix);
        assert!(omit(&bins, &LintConfig::default()));

        // A single row or a single column is never fat.
        let row = ProposedFix::new(0.9, rect(1, 7, 4, 7), rect(5, 7, 5, 7));
        assert!(!is_fat(&row));
        assert!(!is_fat(&vertical_fix()));
        assert!(is_fat(&fix));
    }

    #[test]
    fn prune_falls_back_to_unclassified() {
        assert_eq!(prune(Vec::new()), vec![Category::Unclassified]);
    }

    #[test]
    fn omit_rules() {
        let config = LintConfig::default();
        assert!(!omit(&[Category::R1C1Mismatch, Category::OffAxisReference], &config));
        assert!(omit(
            &[
                Category::R1C1Mismatch,
                Category::OffAxisReference,
                Category::DifferentReferentCount
            ],
            &config
        ));
        assert!(omit(&[Category::FatFix], &config));
        assert!(!omit(&[Category::Unclassified], &config));
    }
}
