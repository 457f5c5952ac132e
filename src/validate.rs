//! Relative-link validation against the asset inventory, and the repair
//! policy for broken-but-unambiguous references.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::classifiers;
use crate::document::Document;
use crate::error::Error;
use crate::inventory::{AssetInventory, normalize_path, relative_to};
use crate::pipeline::AnnotatedLine;

/// One broken relative reference found on a line.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    /// 0-based line index in the document.
    pub line_number: usize,
    /// The full line text.
    pub line_text: String,
    /// The broken file path exactly as written in the link.
    pub reference: String,
    /// Root-relative paths that carry the same bare filename.
    /// Empty when the filename is absent from the inventory.
    pub candidates: Vec<PathBuf>,
}

/// Validation outcome for one document: issues partitioned into `missing`
/// (filename absent from the tree) and `incorrect` (filename exists, but
/// not at the referenced path).
#[derive(Debug, Default, Serialize)]
pub struct DocumentReport {
    pub line_count: usize,
    pub missing: Vec<ValidationIssue>,
    pub incorrect: Vec<ValidationIssue>,
}

impl DocumentReport {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.incorrect.is_empty()
    }

    pub fn issue_count(&self) -> usize {
        self.missing.len() + self.incorrect.len()
    }
}

/// Check every relative reference in a document against the inventory.
///
/// `doc_dir` is the document's directory relative to the scan root; each
/// reference is joined to it and lexically normalized before comparison.
/// Section anchors are not validated: the `#...` suffix is ignored, and a
/// pure-anchor link (empty file portion) is skipped entirely. Hyperlink,
/// image-link, and HTML `<img src>` references all participate.
pub fn validate_relative_links(
    doc: &Document,
    doc_dir: &Path,
    inventory: &AssetInventory,
) -> DocumentReport {
    let mut report = DocumentReport {
        line_count: doc.lines().len(),
        ..DocumentReport::default()
    };

    let lines = doc.all_relative_links().iter().chain(doc.html_image_links().iter());
    for line in lines {
        for record in &line.matches {
            let Some(rel) = classifiers::relative_url(&record.url) else {
                continue;
            };
            if rel.file.is_empty() {
                continue;
            }
            let Some(name) = Path::new(&rel.file).file_name() else {
                continue;
            };
            let referenced = normalize_path(&doc_dir.join(&rel.file));

            match inventory.candidates(&name.to_string_lossy()) {
                None => report.missing.push(issue_for(line, &rel.file, Vec::new())),
                Some(paths) if !paths.contains(&referenced) => {
                    report.incorrect.push(issue_for(line, &rel.file, paths.to_vec()));
                }
                Some(_) => {}
            }
        }
    }

    report
}

fn issue_for(line: &AnnotatedLine, reference: &str, candidates: Vec<PathBuf>) -> ValidationIssue {
    ValidationIssue {
        line_number: line.number,
        line_text: line.text.clone(),
        reference: reference.to_string(),
        candidates,
    }
}

/// A planned line edit: replace the broken path with the one candidate.
#[derive(Debug, Clone)]
pub struct RepairAction {
    /// 0-based line index to rewrite.
    pub line_number: usize,
    /// The broken path substring as written.
    pub broken: String,
    /// The candidate path, rewritten relative to the referencing
    /// document's directory.
    pub replacement: PathBuf,
}

/// Split a report's `incorrect` issues into automatic repairs and
/// manual-intervention leftovers.
///
/// An issue is repairable only when the inventory holds exactly one
/// candidate for its filename; with several candidates guessing would be
/// wrong as often as right, so those stay untouched. `missing` issues are
/// never repairable. The replacement is the candidate re-relativized
/// against `doc_dir`, so the rewritten link resolves from where it is
/// written rather than from the scan root.
pub fn plan_repairs(
    report: &DocumentReport,
    doc_dir: &Path,
) -> (Vec<RepairAction>, Vec<ValidationIssue>) {
    let mut actions = Vec::new();
    let mut manual = Vec::new();

    for issue in &report.incorrect {
        if let [only] = issue.candidates.as_slice() {
            actions.push(RepairAction {
                line_number: issue.line_number,
                broken: issue.reference.clone(),
                replacement: relative_to(only, doc_dir),
            });
        } else {
            manual.push(issue.clone());
        }
    }

    (actions, manual)
}

/// Rewrite a file in place, applying each action to its line. The presence
/// or absence of a trailing newline is preserved. Callers must serialize
/// repair passes per path.
///
/// # Errors
///
/// Returns `Error::Io` if the file cannot be read or written.
pub fn apply_repairs(path: &Path, actions: &[RepairAction]) -> Result<(), Error> {
    if actions.is_empty() {
        return Ok(());
    }

    let content = std::fs::read_to_string(path)?;
    let had_trailing_newline = content.ends_with('\n');
    let mut lines: Vec<String> = content.lines().map(str::to_string).collect();

    for action in actions {
        if let Some(line) = lines.get_mut(action.line_number) {
            *line = line.replace(&action.broken, &action.replacement.to_string_lossy());
        }
    }

    let mut updated = lines.join("\n");
    if had_trailing_newline {
        updated.push('\n');
    }
    std::fs::write(path, updated)?;
    Ok(())
}
