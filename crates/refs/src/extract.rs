//! Dependency vectors and literals of a single formula.

use gridlint_core::{CellRef, Vector};

use crate::patterns::{strip_non_local, NUMBER, RANGE_PAIR, SINGLE_REF};

/// True for formula text: at least two characters, starting with `=`, `+`
/// or `-`.
pub fn is_formula(text: &str) -> bool {
    text.len() > 1 && matches!(text.as_bytes()[0], b'=' | b'+' | b'-')
}

/// Offset of a single reference relative to `origin` (1-based col/row).
///
/// Absolute axes are left unadjusted:
///
/// | reference | result |
/// |-----------|--------|
/// | `$C$5`    | `(3, 5)` |
/// | `$C5`     | `(3, 5 - origin.y)` |
/// | `C$5`     | `(3 - origin.x, 5)` |
/// | `C5`      | `(3 - origin.x, 5 - origin.y)` |
pub fn cell_dependency(cell: &CellRef, origin: Vector) -> Vector {
    let x = if cell.col_absolute {
        cell.col
    } else {
        cell.col - origin.x
    };
    let y = if cell.row_absolute {
        cell.row
    } else {
        cell.row - origin.y
    };
    Vector::cell(x, y)
}

/// Every dependency vector of `formula` evaluated at `origin`.
///
/// Ranges expand to one vector per covered cell. With `include_constants`,
/// each numeric literal left after removing references adds one
/// [`Vector::CONSTANT`]. Duplicates are kept: `=A1+A1` yields two vectors.
pub fn dependencies(formula: &str, origin: Vector, include_constants: bool) -> Vec<Vector> {
    let mut vectors = Vec::new();
    let text = strip_non_local(formula);

    let text = RANGE_PAIR.replace_all(&text, |caps: &regex::Captures| {
        if let (Some(first), Some(last)) = (CellRef::parse(&caps[1]), CellRef::parse(&caps[2])) {
            let first = cell_dependency(&first, origin);
            let last = cell_dependency(&last, origin);
            let length = last.x - first.x + 1;
            let width = last.y - first.y + 1;
            for dx in 0..length {
                for dy in 0..width {
                    vectors.push(Vector::cell(first.x + dx, first.y + dy));
                }
            }
        }
        "_"
    });

    let text = SINGLE_REF.replace_all(&text, |caps: &regex::Captures| {
        if let Some(cell) = CellRef::parse(&caps[1]) {
            vectors.push(cell_dependency(&cell, origin));
        }
        "_"
    });

    if include_constants {
        let count = NUMBER.find_iter(&text).count();
        vectors.extend(std::iter::repeat(Vector::CONSTANT).take(count));
    }
    vectors
}

/// Numeric literals of `formula`, in order, once references are removed.
pub fn numeric_constants(formula: &str) -> Vec<f64> {
    let text = strip_non_local(formula);
    let text = RANGE_PAIR.replace_all(&text, "_");
    let text = SINGLE_REF.replace_all(&text, "_");
    NUMBER
        .find_iter(&text)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .collect()
}

/// Number of `$` anchors in the formula text.
pub fn absolute_ref_count(formula: &str) -> usize {
    formula.matches('$').count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(col: i64, row: i64) -> Vector {
        Vector::cell(col, row)
    }

    #[test]
    fn test_is_formula() {
        assert!(is_formula("=A1"));
        assert!(is_formula("+A1"));
        assert!(is_formula("-A1"));
        assert!(!is_formula("="));
        assert!(!is_formula(""));
        assert!(!is_formula("12"));
    }

    #[test]
    fn test_relative_reference() {
        // =C12 written in D12.
        assert_eq!(dependencies("=C12", at(4, 12), true), vec![Vector::new(-1, 0, 0)]);
        // =C20 written in D21.
        assert_eq!(dependencies("=C20", at(4, 21), true), vec![Vector::new(-1, -1, 0)]);
    }

    #[test]
    fn test_mixed_and_absolute() {
        let origin = at(4, 10);
        assert_eq!(dependencies("=$C$5", origin, false), vec![at(3, 5)]);
        assert_eq!(dependencies("=$C5", origin, false), vec![Vector::new(3, -5, 0)]);
        assert_eq!(dependencies("=C$5", origin, false), vec![Vector::new(-1, 5, 0)]);
    }

    #[test]
    fn test_range_expansion() {
        // =SUM(A1:B2) in C3.
        let deps = dependencies("=SUM(A1:B2)", at(3, 3), false);
        assert_eq!(
            deps,
            vec![
                Vector::new(-2, -2, 0),
                Vector::new(-2, -1, 0),
                Vector::new(-1, -2, 0),
                Vector::new(-1, -1, 0),
            ]
        );
    }

    #[test]
    fn test_constants() {
        let deps = dependencies("=A1*1.5+2", at(2, 1), true);
        assert_eq!(
            deps,
            vec![Vector::new(-1, 0, 0), Vector::CONSTANT, Vector::CONSTANT]
        );
        assert_eq!(dependencies("=A1*1.5+2", at(2, 1), false).len(), 1);
        assert_eq!(numeric_constants("=A1*1.5+2"), vec![1.5, 2.0]);
        assert!(numeric_constants("=A1+B2").is_empty());
    }

    #[test]
    fn test_no_dependencies() {
        assert!(dependencies("=RAND()", at(1, 1), true).is_empty());
        assert!(dependencies("=PI()", at(5, 5), false).is_empty());
    }

    #[test]
    fn test_ignored_references() {
        assert!(dependencies("=LOG10(100)", at(1, 1), false).is_empty());
        assert_eq!(dependencies("=LOG10(100)", at(1, 1), true), vec![Vector::CONSTANT]);
        assert!(dependencies("=Sheet2!A1", at(1, 1), false).is_empty());
        assert!(dependencies("='Q1 Data'!A1:B5", at(1, 1), false).is_empty());
        assert!(dependencies("=SUM(Sales[Amount])", at(1, 1), false).is_empty());
        assert_eq!(
            dependencies("=Sheet2!A1+B1", at(1, 1), false),
            vec![Vector::new(1, 0, 0)]
        );
    }

    #[test]
    fn test_absolute_ref_count() {
        assert_eq!(absolute_ref_count("=A1"), 0);
        assert_eq!(absolute_ref_count("=$A1+B$2"), 2);
        assert_eq!(absolute_ref_count("=$A$1"), 2);
    }
}
