//! Console and JSON rendering of validation results.

use std::fmt::Write as _;
use std::path::PathBuf;

use serde::Serialize;

use crate::error::Error;
use crate::validate::DocumentReport;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Validation outcome for one document that had issues.
#[derive(Debug, Serialize)]
pub struct DocumentEntry {
    /// Root-relative path.
    pub path: PathBuf,
    #[serde(flatten)]
    pub report: DocumentReport,
}

/// Aggregate counts for a validation or repair run.
#[derive(Debug, Default, Serialize)]
pub struct Summary {
    pub markdown_files: usize,
    pub total_files: usize,
    pub missing: usize,
    pub incorrect: usize,
    pub repaired: usize,
    pub manual: usize,
}

/// Full result of one run over a tree. Only documents with issues appear.
#[derive(Debug, Serialize)]
pub struct TreeReport {
    pub documents: Vec<DocumentEntry>,
    pub summary: Summary,
}

impl TreeReport {
    /// Issues that remain after any repairs: these drive the exit code.
    pub fn unresolved(&self) -> usize {
        self.summary.missing + self.summary.incorrect - self.summary.repaired
    }
}

/// Render the report as markdown.
pub fn render_markdown(report: &TreeReport) -> String {
    let mut out = String::from("# Relative Link Validation\n");

    for entry in &report.documents {
        let _ = write!(out, "\n## {}\n", entry.path.display());
        if !entry.report.missing.is_empty() {
            out.push_str("\n### Missing\n\n");
            for issue in &entry.report.missing {
                let _ = writeln!(out, "- line {}: `{}`", issue.line_number, issue.reference);
            }
        }
        if !entry.report.incorrect.is_empty() {
            out.push_str("\n### Incorrect\n\n");
            for issue in &entry.report.incorrect {
                let candidates = issue
                    .candidates
                    .iter()
                    .map(|p| format!("`{}`", p.display()))
                    .collect::<Vec<_>>()
                    .join(", ");
                let _ = writeln!(
                    out,
                    "- line {}: `{}` — found elsewhere: {candidates}",
                    issue.line_number, issue.reference
                );
            }
        }
    }

    let s = &report.summary;
    let _ = write!(
        out,
        "\n## Summary\n\n\
         Markdown files: {}\n\
         All files:      {}\n\
         Missing:        {}\n\
         Incorrect:      {}\n",
        s.markdown_files, s.total_files, s.missing, s.incorrect
    );
    if s.repaired > 0 || s.manual > 0 {
        let _ = writeln!(out, "Repaired:       {}", s.repaired);
        let _ = writeln!(out, "Manual fixes:   {}", s.manual);
    }
    out
}

/// Print the markdown report with bold headings.
pub fn print_report(report: &TreeReport) {
    for line in render_markdown(report).lines() {
        if line.starts_with('#') {
            println!("{BOLD}{line}{RESET}");
        } else {
            println!("{line}");
        }
    }
}

/// Print the report as pretty JSON.
///
/// # Errors
///
/// Returns `Error::Json` if serialization fails.
pub fn print_json(report: &TreeReport) -> Result<(), Error> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
