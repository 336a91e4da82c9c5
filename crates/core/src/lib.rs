//! `gridlint-core` — value types shared by the gridlint crates.
//!
//! Pure data: no IO, no shared state.

pub mod address;
pub mod rect;
pub mod vector;

pub use address::{
    column_index_to_name, column_name_to_index, normalize_address, CellRef, UsedRange,
};
pub use rect::Rectangle;
pub use vector::Vector;
