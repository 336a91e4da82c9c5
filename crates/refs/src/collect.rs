//! Referenced-data collection.

use rustc_hash::FxHashSet;

use gridlint_core::Vector;

use crate::extract::{dependencies, is_formula};

/// Absolute addresses of every cell some formula in `formulas` refers to,
/// excluding cells that are themselves formulas.
///
/// `formulas` is a row-major grid whose `[0][0]` cell sits at the 1-based
/// address `origin`. Referenced cells outside the grid are always kept.
pub fn collect_references(formulas: &[Vec<String>], origin: Vector) -> FxHashSet<Vector> {
    let mut refs = FxHashSet::default();

    for row in formulas {
        for cell in row {
            if !is_formula(cell) {
                continue;
            }
            // A zero origin makes every relative reference absolute.
            for dep in dependencies(cell, Vector::ZERO, false) {
                if !dep.is_reference() {
                    continue;
                }
                let referent = usize::try_from(dep.y - origin.y)
                    .ok()
                    .zip(usize::try_from(dep.x - origin.x).ok())
                    .and_then(|(i, j)| formulas.get(i).and_then(|r| r.get(j)));
                match referent {
                    Some(text) if is_formula(text) => {}
                    _ => {
                        refs.insert(dep);
                    }
                }
            }
        }
    }

    refs
}
