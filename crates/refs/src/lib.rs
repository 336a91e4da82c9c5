//! `gridlint-refs` — formula text to dependency vectors.
//!
//! A deliberately shallow, regex-driven reading of A1 formulas: it finds
//! cell references and numeric literals, not a full Excel grammar.
//! Other-sheet references, structured table references and functions whose
//! names contain digits (`LOG10`, `ATAN2`, ...) are stripped before
//! scanning so they are never mistaken for local cells.

mod collect;
mod extract;
mod patterns;
mod r1c1;

pub use collect::collect_references;
pub use extract::{
    absolute_ref_count, cell_dependency, dependencies, is_formula, numeric_constants,
};
pub use r1c1::formula_to_r1c1;
