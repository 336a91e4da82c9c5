//! A1-style addresses: column names, cell references, used ranges.

use serde::{Deserialize, Serialize};

use crate::rect::Rectangle;
use crate::vector::Vector;

/// Convert an Excel column name to its 1-based index (`A` = 1, `AA` = 27).
///
/// Returns `None` for an empty name or any non-letter character.
/// Lowercase letters are accepted.
pub fn column_name_to_index(name: &str) -> Option<i64> {
    if name.is_empty() {
        return None;
    }
    let mut value: i64 = 0;
    for ch in name.chars() {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        let digit = (ch.to_ascii_uppercase() as u8 - b'A') as i64 + 1;
        value = value.checked_mul(26)?.checked_add(digit)?;
    }
    Some(value)
}

/// Convert a 1-based column index to its name (3 => `C`).
///
/// Indices below 1 have no name and yield an empty string.
pub fn column_index_to_name(index: i64) -> String {
    let mut letters = Vec::new();
    let mut n = index;
    while n > 0 {
        letters.push((b'A' + ((n - 1) % 26) as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// A single A1 reference such as `C5`, `$C5`, `C$5` or `$C$5`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRef {
    /// 1-based column.
    pub col: i64,
    /// 1-based row.
    pub row: i64,
    pub col_absolute: bool,
    pub row_absolute: bool,
}

impl CellRef {
    /// Parse a bare reference. The whole string must be the reference.
    pub fn parse(text: &str) -> Option<CellRef> {
        let mut rest = text.trim();

        let col_absolute = rest.starts_with('$');
        if col_absolute {
            rest = &rest[1..];
        }
        let letters_end = rest
            .find(|ch: char| !ch.is_ascii_alphabetic())
            .unwrap_or(rest.len());
        let col = column_name_to_index(&rest[..letters_end])?;
        rest = &rest[letters_end..];

        let row_absolute = rest.starts_with('$');
        if row_absolute {
            rest = &rest[1..];
        }
        if rest.is_empty() || !rest.chars().all(|ch| ch.is_ascii_digit()) {
            return None;
        }
        let row: i64 = rest.parse().ok()?;

        Some(CellRef {
            col,
            row,
            col_absolute,
            row_absolute,
        })
    }

    /// The absolute 1-based address `(col, row, 0)`.
    pub fn address(&self) -> Vector {
        Vector::cell(self.col, self.row)
    }

    /// Number of `$` markers.
    pub fn absolute_count(&self) -> usize {
        self.col_absolute as usize + self.row_absolute as usize
    }
}

/// Collapse runs of `!` into one (`Sheet!!A1` => `Sheet!A1`).
pub fn normalize_address(addr: &str) -> String {
    let mut out = String::with_capacity(addr.len());
    let mut prev_bang = false;
    for ch in addr.chars() {
        if ch == '!' && prev_bang {
            continue;
        }
        prev_bang = ch == '!';
        out.push(ch);
    }
    out
}

/// The used range of a worksheet, e.g. `Sheet1!A1:Z99`.
///
/// Row-major grids handed to the analysis start at `upper_left`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsedRange {
    pub sheet: String,
    pub upper_left: Vector,
    pub bottom_right: Vector,
}

impl UsedRange {
    /// Parse `Sheet!A1:B2` or a singleton `Sheet!C9` (treated as `C9:C9`).
    ///
    /// The sheet name may be quoted (`'My Sheet'!A1`) and may be empty
    /// (`A1:B2`). Returns `None` if either corner is not a valid reference.
    pub fn parse(addr: &str) -> Option<UsedRange> {
        let normalized = normalize_address(addr);
        let (sheet, range) = match normalized.rsplit_once('!') {
            Some((sheet, range)) => (sheet, range),
            None => ("", normalized.as_str()),
        };
        let sheet = sheet
            .strip_prefix('\'')
            .and_then(|s| s.strip_suffix('\''))
            .unwrap_or(sheet);

        let (first, last) = match range.split_once(':') {
            Some((a, b)) => (CellRef::parse(a)?, CellRef::parse(b)?),
            None => {
                let only = CellRef::parse(range)?;
                (only, only)
            }
        };

        Some(UsedRange {
            sheet: sheet.to_string(),
            upper_left: Vector::cell(first.col.min(last.col), first.row.min(last.row)),
            bottom_right: Vector::cell(first.col.max(last.col), first.row.max(last.row)),
        })
    }

    /// The 1-based address of grid cell `[0][0]`.
    pub fn origin(&self) -> Vector {
        self.upper_left
    }

    pub fn rect(&self) -> Rectangle {
        Rectangle::new(self.upper_left, self.bottom_right)
    }

    /// Total number of cells in the range.
    pub fn number_of_cells(&self) -> i64 {
        self.rect().area()
    }

    /// Address of the cell at row `i`, column `j` of a grid anchored here.
    pub fn address_of(&self, i: usize, j: usize) -> Vector {
        Vector::cell(self.upper_left.x + j as i64, self.upper_left.y + i as i64)
    }

    /// Grid indices `(row, col)` of an address, if it falls at or after
    /// the origin.
    pub fn grid_index(&self, v: Vector) -> Option<(usize, usize)> {
        let row = usize::try_from(v.y - self.upper_left.y).ok()?;
        let col = usize::try_from(v.x - self.upper_left.x).ok()?;
        Some((row, col))
    }
}

impl std::fmt::Display for UsedRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}!{}", self.sheet, self.rect().to_a1())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_names() {
        assert_eq!(column_name_to_index("A"), Some(1));
        assert_eq!(column_name_to_index("Z"), Some(26));
        assert_eq!(column_name_to_index("AA"), Some(27));
        assert_eq!(column_name_to_index("ZZ"), Some(702));
        assert_eq!(column_name_to_index("d"), Some(4));
        assert_eq!(column_name_to_index(""), None);
        assert_eq!(column_name_to_index("A1"), None);

        assert_eq!(column_index_to_name(1), "A");
        assert_eq!(column_index_to_name(26), "Z");
        assert_eq!(column_index_to_name(27), "AA");
        assert_eq!(column_index_to_name(702), "ZZ");
        assert_eq!(column_index_to_name(703), "AAA");
        assert_eq!(column_index_to_name(0), "");
    }

    #[test]
    fn test_column_round_trip() {
        for i in 1..=2000 {
            assert_eq!(column_name_to_index(&column_index_to_name(i)), Some(i));
        }
    }

    #[test]
    fn test_cell_ref_parse() {
        let r = CellRef::parse("C5").unwrap();
        assert_eq!((r.col, r.row, r.col_absolute, r.row_absolute), (3, 5, false, false));
        let r = CellRef::parse("$C5").unwrap();
        assert!(r.col_absolute && !r.row_absolute);
        let r = CellRef::parse("C$5").unwrap();
        assert!(!r.col_absolute && r.row_absolute);
        let r = CellRef::parse("$AB$12").unwrap();
        assert_eq!((r.col, r.row), (28, 12));
        assert_eq!(r.absolute_count(), 2);

        assert!(CellRef::parse("C").is_none());
        assert!(CellRef::parse("5").is_none());
        assert!(CellRef::parse("C5x").is_none());
    }

    #[test]
    fn test_used_range_parse() {
        let r = UsedRange::parse("Sheet1!A1:Z99").unwrap();
        assert_eq!(r.sheet, "Sheet1");
        assert_eq!(r.upper_left, Vector::cell(1, 1));
        assert_eq!(r.bottom_right, Vector::cell(26, 99));
        assert_eq!(r.number_of_cells(), 26 * 99);

        let r = UsedRange::parse("Data!C9").unwrap();
        assert_eq!(r.upper_left, Vector::cell(3, 9));
        assert_eq!(r.bottom_right, Vector::cell(3, 9));

        let r = UsedRange::parse("'My Sheet'!!B2:$D$4").unwrap();
        assert_eq!(r.sheet, "My Sheet");
        assert_eq!(r.upper_left, Vector::cell(2, 2));
        assert_eq!(r.bottom_right, Vector::cell(4, 4));

        assert!(UsedRange::parse("Sheet1!").is_none());
        assert!(UsedRange::parse("Sheet1!A1:??").is_none());
    }

    #[test]
    fn test_grid_mapping() {
        let r = UsedRange::parse("S!B3:D9").unwrap();
        assert_eq!(r.address_of(0, 0), Vector::cell(2, 3));
        assert_eq!(r.address_of(2, 1), Vector::cell(3, 5));
        assert_eq!(r.grid_index(Vector::cell(3, 5)), Some((2, 1)));
        assert_eq!(r.grid_index(Vector::cell(1, 5)), None);
    }

    #[test]
    fn test_normalize_address() {
        assert_eq!(normalize_address("Sheet!!!A1"), "Sheet!A1");
        assert_eq!(normalize_address("Sheet!A1"), "Sheet!A1");
        assert_eq!(UsedRange::parse("S!A1:B2").unwrap().to_string(), "S!A1:B2");
    }
}
