use std::fmt;

#[derive(Debug)]
pub enum LintError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// A config value that cannot be clamped into range.
    ConfigValidation(String),
    /// A used-range address that is not `Sheet!A1[:B2]`.
    InvalidAddress(String),
    /// The formulas, values and styles grids of a sheet disagree on shape.
    GridShape {
        sheet: String,
        grid: &'static str,
        expected_rows: usize,
        found_rows: usize,
    },
    /// Malformed workbook JSON.
    WorkbookParse(String),
    /// IO error (file read, etc.).
    Io(String),
    /// No proposed fix at this index.
    UnknownFix(usize),
    /// The fix at this index was never classified.
    Unclassified(usize),
}

impl fmt::Display for LintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::InvalidAddress(addr) => write!(f, "invalid used range address: '{addr}'"),
            Self::GridShape {
                sheet,
                grid,
                expected_rows,
                found_rows,
            } => write!(
                f,
                "sheet '{sheet}': {grid} grid has {found_rows} row(s), expected {expected_rows}"
            ),
            Self::WorkbookParse(msg) => write!(f, "workbook parse error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
            Self::UnknownFix(index) => write!(f, "no proposed fix at index {index}"),
            Self::Unclassified(index) => write!(f, "proposed fix {index} has not been classified"),
        }
    }
}

impl std::error::Error for LintError {}
