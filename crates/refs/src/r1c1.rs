//! A1 → R1C1 normalization.
//!
//! Two formulas copied down or across a region read differently in A1
//! notation but identically in R1C1, so the R1C1 text is what the
//! classifier compares.

use gridlint_core::{CellRef, Vector};

use crate::patterns::FUNCTION_OR_REF;

fn axis(label: char, absolute: bool, coordinate: i64, offset: i64) -> String {
    if absolute {
        format!("{label}{coordinate}")
    } else if offset == 0 {
        label.to_string()
    } else {
        format!("{label}[{offset}]")
    }
}

/// R1C1 text of one reference seen from `origin`.
fn reference_to_r1c1(cell: &CellRef, origin: Vector) -> String {
    let row = axis('R', cell.row_absolute, cell.row, cell.row - origin.y);
    let col = axis('C', cell.col_absolute, cell.col, cell.col - origin.x);
    format!("{row}{col}")
}

/// Rewrite every A1 reference in `formula` as R1C1 relative to `origin`.
///
/// References are replaced in a single pass, so generated text is never
/// re-read as a reference. Digit-named functions such as `LOG10` are kept
/// verbatim.
pub fn formula_to_r1c1(formula: &str, origin: Vector) -> String {
    FUNCTION_OR_REF
        .replace_all(formula, |caps: &regex::Captures| {
            if let Some(func) = caps.name("func") {
                return func.as_str().to_string();
            }
            let text = caps.name("cell").map_or("", |m| m.as_str());
            match CellRef::parse(text) {
                Some(cell) => reference_to_r1c1(&cell, origin),
                None => text.to_string(),
            }
        })
        .into_owned()
}
