use crate::error::Result;
use crate::models::Verdict;
use std::fmt::Write as _;
use std::path::Path;

pub const DEFAULT_REPORT_NAME: &str = "soil_report.txt";

/// Plain-text report: one block per out-of-range attribute, each followed
/// by a blank line. Empty for a fertile sample.
pub fn render_report(verdict: &Verdict) -> String {
    let mut report = String::new();
    for diag in verdict.diagnostics() {
        let _ = write!(
            report,
            "{}:\n{}\nRecommendation: {}\nOrganic Matter Suggestion: {}\n\n",
            diag.attribute, diag.issue, diag.recommendation, diag.organic_matter
        );
    }
    report
}

/// Result text as shown on screen after an evaluation.
pub fn render_summary(verdict: &Verdict) -> String {
    let mut out = format!("The soil is predicted to be: {}\n", verdict.status());
    if verdict.is_fertile() {
        return out;
    }

    out.push_str("Issues with the following parameters:\n");
    for diag in verdict.diagnostics() {
        let _ = writeln!(out, "{}: {}", diag.attribute, diag.issue);
        let _ = writeln!(out, "  - Recommendation: {}", diag.recommendation);
        let _ = writeln!(out, "  - Organic Matter Suggestion: {}", diag.organic_matter);
    }
    out
}

pub fn render_json(verdict: &Verdict) -> Result<String> {
    Ok(serde_json::to_string_pretty(verdict)?)
}

/// Write the report for `verdict` to `path`, creating parent directories.
pub fn write_report(path: &Path, verdict: &Verdict) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, render_report(verdict))?;
    tracing::info!(
        "Wrote report with {} issue(s) to {}",
        verdict.diagnostics().len(),
        path.display()
    );
    Ok(())
}
