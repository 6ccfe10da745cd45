use crate::types::VerificationReport;

// Number of file names listed before the rest is summarized
pub const MAX_LISTED: usize = 5;

/// True when every folder pair passed
pub fn all_passed(reports: &[VerificationReport]) -> bool {
    reports.iter().all(VerificationReport::passed)
}

fn status(passed: bool) -> &'static str {
    if passed {
        "PASSED"
    } else {
        "FAILED"
    }
}

// Render at most MAX_LISTED entries, then "... and N more"
fn push_listing(out: &mut String, title: &str, entries: impl ExactSizeIterator<Item = String>) {
    let total = entries.len();
    out.push_str(&format!("  {}: {}\n", title, total));
    for entry in entries.take(MAX_LISTED) {
        out.push_str(&format!("    - {}\n", entry));
    }
    if total > MAX_LISTED {
        out.push_str(&format!("    ... and {} more\n", total - MAX_LISTED));
    }
}

/// Render one folder pair
pub fn render_report(report: &VerificationReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} -> {}\n",
        report.source_dir.display(),
        report.destination_dir.display()
    ));
    out.push_str(&format!("  Source files: {}\n", report.source_count));
    out.push_str(&format!(
        "  Destination files: {}\n",
        report.destination_count
    ));

    if !report.missing_files.is_empty() {
        push_listing(&mut out, "Missing files", report.missing_files.iter().cloned());
    }
    if !report.unexpected_files.is_empty() {
        push_listing(
            &mut out,
            "Unexpected files",
            report.unexpected_files.iter().cloned(),
        );
    }
    if !report.errors.is_empty() {
        push_listing(
            &mut out,
            "Errors",
            report
                .errors
                .iter()
                .map(|(file, issue)| format!("{}:{}", file, issue)),
        );
    }
    out.push_str(&format!("  Status: {}\n", status(report.passed())));
    out
}

/// Render every folder pair followed by the overall status line
pub fn render_reports(reports: &[VerificationReport]) -> String {
    let mut out = String::from("=== Verification Report ===\n");
    for report in reports {
        out.push_str(&render_report(report));
    }
    out.push_str(&format!("Verification {}\n", status(all_passed(reports))));
    out
}

/// Print the rendered report to stdout
pub fn print_reports(reports: &[VerificationReport]) {
    print!("{}", render_reports(reports));
}
