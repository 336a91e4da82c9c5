//! Workbook JSON input, as emitted by the external spreadsheet adapter.

use std::path::Path;

use serde::Deserialize;

use crate::error::LintError;

/// A whole workbook: a name plus its worksheets in tab order.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkbookInput {
    pub workbook_name: String,
    #[serde(default)]
    pub worksheets: Vec<WorksheetInput>,
}

/// One worksheet as three row-major grids anchored at the used range's
/// upper-left cell.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorksheetInput {
    pub sheet_name: String,
    pub used_range_address: String,
    #[serde(default)]
    pub formulas: Vec<Vec<String>>,
    #[serde(default)]
    pub values: Vec<Vec<String>>,
    #[serde(default)]
    pub styles: Vec<Vec<String>>,
}

impl WorkbookInput {
    pub fn from_json(input: &str) -> Result<Self, LintError> {
        serde_json::from_str(input).map_err(|e| LintError::WorkbookParse(e.to_string()))
    }

    pub fn from_file(path: &Path) -> Result<Self, LintError> {
        let input = std::fs::read_to_string(path)
            .map_err(|e| LintError::Io(format!("{}: {e}", path.display())))?;
        Self::from_json(&input)
    }

    /// Look up a worksheet by exact name.
    pub fn sheet(&self, name: &str) -> Option<&WorksheetInput> {
        self.worksheets.iter().find(|s| s.sheet_name == name)
    }
}

impl WorksheetInput {
    /// No formula rows and no value rows.
    pub fn is_empty(&self) -> bool {
        self.formulas.is_empty() && self.values.is_empty()
    }

    /// Every non-empty grid must have the same number of rows.
    pub fn check_shape(&self) -> Result<(), LintError> {
        check_grid_shapes(&self.sheet_name, &self.formulas, &self.values, &self.styles)
    }
}

/// Reject grids that disagree on row count. An empty grid stands for "not
/// supplied" and is always accepted.
pub fn check_grid_shapes(
    sheet: &str,
    formulas: &[Vec<String>],
    values: &[Vec<String>],
    styles: &[Vec<String>],
) -> Result<(), LintError> {
    let grids = [("formulas", formulas), ("values", values), ("styles", styles)];
    let Some(expected_rows) = grids
        .iter()
        .map(|(_, g)| g.len())
        .find(|rows| *rows > 0)
    else {
        return Ok(());
    };

    for (name, grid) in grids {
        if !grid.is_empty() && grid.len() != expected_rows {
            return Err(LintError::GridShape {
                sheet: sheet.to_string(),
                grid: name,
                expected_rows,
                found_rows: grid.len(),
            });
        }
    }
    Ok(())
}
