//! Formatting check: fixes spanning differently-styled cells are discounted.

use gridlint_core::{UsedRange, Vector};

use crate::config::LintConfig;
use crate::model::ProposedFix;

/// Style token of the cell at `address`; cells outside the grid have none.
fn style_at<'a>(styles: &'a [Vec<String>], range: &UsedRange, address: Vector) -> &'a str {
    range
        .grid_index(address)
        .and_then(|(i, j)| styles.get(i).and_then(|row| row.get(j)))
        .map_or("", String::as_str)
}

/// True when every cell covered by the fix has the same style as its first
/// cell.
pub fn same_format(fix: &ProposedFix, range: &UsedRange, styles: &[Vec<String>]) -> bool {
    let bb = fix.bounding_box();
    let first = style_at(styles, range, bb.upper_left);
    bb.cells().all(|cell| style_at(styles, range, cell) == first)
}

/// Apply the formatting discount if the fix mixes styles.
pub fn adjust_for_format(
    fix: &ProposedFix,
    range: &UsedRange,
    styles: &[Vec<String>],
    config: &LintConfig,
) -> ProposedFix {
    if same_format(fix, range, styles) {
        fix.clone()
    } else {
        fix.with_format_discount(config.discount_factor())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridlint_core::Rectangle;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    fn column_fix() -> ProposedFix {
        // B2:B3 above B4, on a sheet anchored at B2.
        ProposedFix::new(
            0.8,
            Rectangle::new(Vector::cell(2, 2), Vector::cell(2, 3)),
            Rectangle::cell(Vector::cell(2, 4)),
        )
    }

    #[test]
    fn uniform_styles_keep_score() {
        let range = UsedRange::parse("S!B2:B4").unwrap();
        let styles = grid(&[&["s1"], &["s1"], &["s1"]]);
        let fix = adjust_for_format(&column_fix(), &range, &styles, &LintConfig::default());
        assert!(fix.same_format);
        assert_eq!(fix.score, 0.8);
    }

    #[test]
    fn mixed_styles_discount_score() {
        let range = UsedRange::parse("S!B2:B4").unwrap();
        let styles = grid(&[&["s1"], &["s1"], &["bold"]]);
        let config = LintConfig {
            formatting_discount: 25,
            ..LintConfig::default()
        };
        let fix = adjust_for_format(&column_fix(), &range, &styles, &config);
        assert!(!fix.same_format);
        assert!((fix.score - 0.6).abs() < 1e-12);
    }

    #[test]
    fn missing_styles_count_as_empty() {
        let range = UsedRange::parse("S!B2:B4").unwrap();
        assert!(same_format(&column_fix(), &range, &[]));
        let partial = grid(&[&[""], &[""]]);
        assert!(same_format(&column_fix(), &range, &partial));
        let styled = grid(&[&["s1"], &["s1"]]);
        assert!(!same_format(&column_fix(), &range, &styled));
    }
}
