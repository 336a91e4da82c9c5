use std::time::Instant;

use gridlint_core::{normalize_address, UsedRange};

use crate::classify::{classify, omit, prune, rect_info};
use crate::config::LintConfig;
use crate::error::LintError;
use crate::fingerprint::{fingerprint_data, fingerprint_formulas};
use crate::fixes::{find_all_proposed_fixes, size_entropy};
use crate::format::adjust_for_format;
use crate::model::{
    Analysis, FixAnalysis, ProposedFix, ReportMeta, SweepPoint, WorkbookReport, WorksheetReport,
};
use crate::partition::identify_groups;
use crate::report::worksheet_report;
use crate::workbook::{check_grid_shapes, WorkbookInput, WorksheetInput};

/// Parse a used-range address, tolerating repeated `!`.
pub fn parse_used_range(address: &str) -> Result<UsedRange, LintError> {
    UsedRange::parse(&normalize_address(address))
        .ok_or_else(|| LintError::InvalidAddress(address.to_string()))
}

/// Analyze one worksheet's grids. Returns fingerprints, groups and the
/// accepted fixes, most anomalous first.
pub fn analyze(
    used_range_address: &str,
    formulas: &[Vec<String>],
    values: &[Vec<String>],
    styles: &[Vec<String>],
    config: &LintConfig,
) -> Result<Analysis, LintError> {
    config.validate()?;
    let config = config.clamped();
    let range = parse_used_range(used_range_address)?;
    check_grid_shapes(&range.sheet, formulas, values, styles)?;

    let formula_fingerprints = fingerprint_formulas(&range, formulas, &config);
    let data_fingerprints = fingerprint_data(&range, formulas, values, &config);

    let grouped_formulas = identify_groups(&formula_fingerprints, config.merge_iteration_cap);
    let grouped_data = identify_groups(&data_fingerprints, config.merge_iteration_cap);

    let proposed_fixes = find_all_proposed_fixes(&grouped_formulas, &config.metric)
        .iter()
        .filter_map(|fix| accept_fix(fix, &range, formulas, styles, &config))
        .collect();

    Ok(Analysis {
        formula_fingerprints,
        data_fingerprints,
        grouped_formulas,
        grouped_data,
        proposed_fixes,
    })
}

/// Run one candidate through threshold, formatting, size, entropy and
/// category filters. `None` means the fix is not reported.
fn accept_fix(
    fix: &ProposedFix,
    range: &UsedRange,
    formulas: &[Vec<String>],
    styles: &[Vec<String>],
    config: &LintConfig,
) -> Option<ProposedFix> {
    let adjusted = -fix.score;
    if adjusted * 100.0 < config.reporting_threshold as f64 {
        return None;
    }
    let fix = adjust_for_format(&fix.with_score(adjusted), range, styles, config);

    let info = [
        rect_info(&fix.rect1, range, formulas),
        rect_info(&fix.rect2, range, formulas),
    ];

    if fix.cell_count() < config.min_fix_size {
        log::debug!(
            "omit {} / {}: {} cells below minimum {}",
            info[0].formula,
            info[1].formula,
            fix.cell_count(),
            config.min_fix_size
        );
        return None;
    }

    let balance = size_entropy(fix.rect1.area(), fix.rect2.area());
    if balance > config.max_entropy {
        log::debug!(
            "omit {} / {}: size entropy {balance:.3} above {}",
            info[0].formula,
            info[1].formula,
            config.max_entropy
        );
        return None;
    }

    let categories = prune(classify(&fix, &info));
    if omit(&categories, config) {
        log::debug!(
            "omit {} / {}: categories {categories:?}",
            info[0].formula,
            info[1].formula
        );
        return None;
    }

    let direction = fix.direction();
    Some(fix.with_analysis(FixAnalysis {
        categories,
        rect_info: info,
        direction,
    }))
}

// ---------------------------------------------------------------------------
// Workbook orchestration
// ---------------------------------------------------------------------------

/// Analyze one worksheet and build its report.
pub fn analyze_worksheet(
    sheet: &WorksheetInput,
    config: &LintConfig,
) -> Result<WorksheetReport, LintError> {
    let config = config.clamped();
    let range = parse_used_range(&sheet.used_range_address)?;

    let start = Instant::now();
    let analysis = analyze(
        &sheet.used_range_address,
        &sheet.formulas,
        &sheet.values,
        &sheet.styles,
        &config,
    )?;
    let elapsed = if config.no_elapsed_time {
        0.0
    } else {
        start.elapsed().as_secs_f64()
    };

    log::info!(
        "{}: {} proposed fix(es) in {elapsed:.3}s",
        sheet.sheet_name,
        analysis.proposed_fixes.len()
    );
    Ok(worksheet_report(sheet, &range, &analysis, &config, elapsed))
}

/// Analyze every non-empty worksheet, or only `sheet_filter` if given.
pub fn run(
    workbook: &WorkbookInput,
    sheet_filter: Option<&str>,
    config: &LintConfig,
) -> Result<WorkbookReport, LintError> {
    let mut worksheets = Vec::new();
    for sheet in &workbook.worksheets {
        if sheet_filter.is_some_and(|name| name != sheet.sheet_name) {
            continue;
        }
        if sheet.is_empty() {
            log::debug!("{}: empty, skipping", sheet.sheet_name);
            continue;
        }
        worksheets.push(analyze_worksheet(sheet, config)?);
    }

    Ok(WorkbookReport {
        workbook_name: workbook.workbook_name.clone(),
        meta: ReportMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        worksheets,
    })
}

/// Re-run the workbook for every `(formatting_discount,
/// reporting_threshold)` pair on a `0..=100` grid spaced by `step`.
pub fn sweep(
    workbook: &WorkbookInput,
    base: &LintConfig,
    step: usize,
) -> Result<Vec<SweepPoint>, LintError> {
    if step == 0 {
        return Err(LintError::ConfigValidation("sweep step must be positive".into()));
    }

    let mut points = Vec::new();
    for formatting_discount in (0..=100).step_by(step) {
        for reporting_threshold in (0..=100).step_by(step) {
            let config = LintConfig {
                formatting_discount,
                reporting_threshold,
                no_elapsed_time: true,
                ..base.clone()
            };
            let report = run(workbook, None, &config)?;
            points.push(SweepPoint {
                formatting_discount,
                reporting_threshold,
                suspicious_ranges: report.worksheets.iter().map(|w| w.suspicious_ranges).sum(),
                weighted_suspicious_ranges: report
                    .worksheets
                    .iter()
                    .map(|w| w.weighted_suspicious_ranges)
                    .sum(),
            });
        }
    }
    Ok(points)
}
