//! Cell fingerprinting.

use gridlint_core::{UsedRange, Vector};
use gridlint_refs::{collect_references, dependencies};

use crate::config::LintConfig;
use crate::model::{Fingerprint, FingerprintMap};

/// Number of non-empty cells in a grid.
pub fn count_non_empty(grid: &[Vec<String>]) -> usize {
    grid.iter().flatten().filter(|cell| !cell.is_empty()).count()
}

/// Fingerprint of one formula written at `origin`, or `None` if the cell is
/// not analyzed.
pub fn fingerprint_formula(formula: &str, origin: Vector) -> Option<Fingerprint> {
    if formula.is_empty() {
        return None;
    }
    let deps = dependencies(formula, origin, true);
    if deps.is_empty() {
        return formula
            .starts_with('=')
            .then_some(Fingerprint::NoDependencies);
    }
    let sum: Vector = deps.iter().sum();
    if sum == Vector::ZERO {
        Some(Fingerprint::NoDependencies)
    } else {
        Some(Fingerprint::Hash(sum.weighted_norm()))
    }
}

/// Fingerprint every formula cell of the sheet.
///
/// Returns an empty map when the sheet holds more formulas than
/// `formulas_threshold`.
pub fn fingerprint_formulas(
    range: &UsedRange,
    formulas: &[Vec<String>],
    config: &LintConfig,
) -> FingerprintMap {
    let mut out = FingerprintMap::default();

    let total = count_non_empty(formulas);
    if total > config.formulas_threshold {
        log::warn!(
            "{}: {total} formulas exceeds threshold {}, skipping formula analysis",
            range.sheet,
            config.formulas_threshold
        );
        return out;
    }

    for (i, row) in formulas.iter().enumerate() {
        for (j, cell) in row.iter().enumerate() {
            let address = range.address_of(i, j);
            if let Some(fp) = fingerprint_formula(cell, address) {
                out.insert(address, fp);
            }
        }
    }
    out
}

/// Fingerprint every data cell some formula refers to. All of them share
/// the no-dependency class.
///
/// Returns an empty map when the sheet holds more values than
/// `values_threshold`.
pub fn fingerprint_data(
    range: &UsedRange,
    formulas: &[Vec<String>],
    values: &[Vec<String>],
    config: &LintConfig,
) -> FingerprintMap {
    let total = count_non_empty(values);
    if total > config.values_threshold {
        log::warn!(
            "{}: {total} values exceeds threshold {}, skipping reference analysis",
            range.sheet,
            config.values_threshold
        );
        return FingerprintMap::default();
    }

    collect_references(formulas, range.origin())
        .into_iter()
        .map(|address| (address, Fingerprint::NoDependencies))
        .collect()
}
