//! ATX header inventory and `{#sec:...}` attribute repair.
//!
//! Cross-references (`[text](doc.md#sec:id)`) only work when the target
//! header carries an attribute block. This module finds headers without one
//! and can append a deterministic identifier derived from the document path,
//! so repeated runs over the same tree produce the same ids.

use std::path::Path;

use sha2::{Digest as _, Sha256};

use crate::classifiers::{self, AtxHeaderRule};
use crate::document::Document;
use crate::error::Error;
use crate::pipeline;

/// One ATX header found outside fenced regions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLine {
    /// Header level, 1–6.
    pub level: u32,
    /// 0-based line index.
    pub number: usize,
    /// Trimmed title text, attribute block included if present.
    pub title: String,
    /// Whether the line already carries a `{...#id...}` attribute block.
    pub has_attribute: bool,
}

/// A planned header edit: append an attribute block to one line.
#[derive(Debug, Clone)]
pub struct HeaderFix {
    /// 0-based line index to rewrite.
    pub line_number: usize,
    /// Identifier to append, without braces or `#`.
    pub id: String,
}

/// Find every ATX header in a document, fenced regions excluded.
///
/// # Errors
///
/// Cannot fail for the fixed 1–6 level range; the `Result` carries the
/// classifier construction contract through.
pub fn header_lines(doc: &Document) -> Result<Vec<HeaderLine>, Error> {
    let rules: Vec<AtxHeaderRule> =
        (1..=6).map(AtxHeaderRule::new).collect::<Result<_, _>>()?;

    let mut headers = Vec::new();
    for record in pipeline::outside_fence(doc.lines(), 0) {
        for rule in &rules {
            let Some(title) = rule.title(&record.text) else {
                continue;
            };
            headers.push(HeaderLine {
                level: rule.level(),
                number: record.number,
                title,
                has_attribute: !classifiers::attribute_matches(&record.text).is_empty(),
            });
            break;
        }
    }
    Ok(headers)
}

/// Deterministic section identifier for a header: a truncated SHA-256 of
/// the document's root-relative path, grouped 3-3-4, plus the line number
/// to keep ids unique within one document.
pub fn section_id(doc_rel: &Path, line_number: usize) -> String {
    let digest = Sha256::digest(doc_rel.to_string_lossy().as_bytes());
    let hex = format!("{digest:x}");
    let (a, rest) = hex.split_at(3);
    let (b, rest) = rest.split_at(3);
    let (c, _) = rest.split_at(4);
    format!("sec:{a}-{b}-{c}_{line_number}")
}

/// Plan attribute fixes for every header lacking one.
///
/// # Errors
///
/// Propagates header classifier construction errors.
pub fn plan_header_fixes(doc: &Document, doc_rel: &Path) -> Result<Vec<HeaderFix>, Error> {
    let fixes = header_lines(doc)?
        .into_iter()
        .filter(|h| !h.has_attribute)
        .map(|h| HeaderFix { line_number: h.number, id: section_id(doc_rel, h.number) })
        .collect();
    Ok(fixes)
}

/// Rewrite a file in place, appending `{#id}` to each fixed line. The
/// presence or absence of a trailing newline is preserved.
///
/// # Errors
///
/// Returns `Error::Io` if the file cannot be read or written.
pub fn apply_header_fixes(path: &Path, fixes: &[HeaderFix]) -> Result<(), Error> {
    if fixes.is_empty() {
        return Ok(());
    }

    let content = std::fs::read_to_string(path)?;
    let had_trailing_newline = content.ends_with('\n');
    let mut lines: Vec<String> = content.lines().map(str::to_string).collect();

    for fix in fixes {
        if let Some(line) = lines.get_mut(fix.line_number) {
            *line = format!("{} {{#{}}}", line.trim_end(), fix.id);
        }
    }

    let mut updated = lines.join("\n");
    if had_trailing_newline {
        updated.push('\n');
    }
    std::fs::write(path, updated)?;
    Ok(())
}
