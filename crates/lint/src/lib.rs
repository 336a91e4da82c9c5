//! `gridlint` — Spreadsheet formula anomaly detection.
//!
//! Pure analysis crate: receives a worksheet's formula, value and style
//! grids, fingerprints every formula by its reference offsets, partitions
//! the sheet into same-fingerprint rectangles, and ranks the small regions
//! that break a larger pattern. No CLI or XLSX dependencies.

pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod fixes;
pub mod format;
pub mod model;
pub mod partition;
pub mod report;
pub mod workbook;

pub use config::{LintConfig, MetricConfig};
pub use engine::{analyze, analyze_worksheet, run, sweep};
pub use error::LintError;
pub use model::{
    Analysis, Category, Fingerprint, FixAnalysis, ProposedFix, WorkbookReport, WorksheetReport,
};
pub use workbook::{WorkbookInput, WorksheetInput};
