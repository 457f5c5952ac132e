//! MyST directive handling: iterating directive bodies and resolving
//! `toctree` entries to markdown file paths.

use std::path::{Path, PathBuf};

use crate::classifiers;
use crate::fence::{DirectiveFenceTracker, DirectiveLine};
use crate::inventory::normalize_path;
use crate::pipeline::LineRecord;

/// Yield the lines belonging to directive fences, numbered from `start`.
///
/// When `name` is given only directives with that exact name are entered.
/// With `exclude_tails` the opening and closing fence lines are dropped,
/// leaving pure body content. Directive options are never yielded: lines in
/// a nested YAML block (`---` ... `---`) and lines beginning with `:` are
/// option syntax, not content.
pub fn directive_lines<'a, S: AsRef<str>>(
    lines: &'a [S],
    start: usize,
    name: Option<&'a str>,
    exclude_tails: bool,
) -> impl Iterator<Item = LineRecord> + 'a {
    let mut tracker = DirectiveFenceTracker::new();
    let mut in_options = false;

    lines.iter().enumerate().filter_map(move |(offset, line)| {
        let text = line.as_ref();
        let record = || LineRecord { number: start + offset, text: text.to_string() };

        match tracker.feed(text, name) {
            DirectiveLine::Outside => None,
            DirectiveLine::Opening(_) | DirectiveLine::Closing => {
                in_options = false;
                if exclude_tails { None } else { Some(record()) }
            }
            DirectiveLine::Body => {
                if in_options {
                    if classifiers::yaml_delimiter(text) {
                        in_options = false;
                    }
                    return None;
                }
                if classifiers::yaml_delimiter(text) {
                    in_options = true;
                    return None;
                }
                if text.starts_with(':') {
                    return None;
                }
                Some(record())
            }
        }
    })
}

/// Resolve one toctree entry to a root-relative markdown path.
///
/// Entries with a leading `/` resolve from the tree root; all others from
/// the referencing document's directory. An entry without an extension is
/// a docname and gets `.md` appended. The result is lexically normalized.
pub fn toctree_entry_target(value: &str, document_dir: &Path) -> PathBuf {
    let trimmed = value.trim();
    let mut path = match trimmed.strip_prefix('/') {
        Some(stripped) => PathBuf::from(stripped),
        None => document_dir.join(trimmed),
    };
    if path.extension().is_none() {
        path.set_extension("md");
    }
    normalize_path(&path)
}

/// Resolve a toctree entry, expanding a single `*` wildcard against the
/// known markdown file set (root-relative paths).
///
/// Patterns like `*`, `index*`, `*index`, or `dir/*` are supported. More
/// than one wildcard is unsupported and resolves to nothing. A non-glob
/// entry resolves to its target unconditionally; existence is the
/// validator's concern, not this function's.
pub fn toctree_links(value: &str, document_dir: &Path, markdown: &[PathBuf]) -> Vec<PathBuf> {
    let target = toctree_entry_target(value, document_dir);
    let pattern = target.to_string_lossy();

    match pattern.matches('*').count() {
        0 => vec![target],
        1 => {
            let Some((prefix, suffix)) = pattern.split_once('*') else {
                return Vec::new();
            };
            markdown
                .iter()
                .filter(|p| {
                    let s = p.to_string_lossy();
                    s.len() >= prefix.len() + suffix.len()
                        && s.starts_with(prefix)
                        && s.ends_with(suffix)
                })
                .cloned()
                .collect()
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;

    const TOCTREE_DOC: &[&str] = &[
        "# Title",
        "```{toctree}",
        ":maxdepth: 2",
        "---",
        "caption: Contents",
        "---",
        "intro",
        "chapter1",
        "```",
        "after",
    ];

    #[test]
    fn directive_bodies_exclude_option_syntax() {
        let body: Vec<String> = directive_lines(TOCTREE_DOC, 0, Some("toctree"), true)
            .map(|r| r.text)
            .collect();
        assert_eq!(body, vec!["intro".to_string(), "chapter1".to_string()]);
    }

    #[test]
    fn tails_are_kept_on_request() {
        let lines: Vec<usize> = directive_lines(TOCTREE_DOC, 0, Some("toctree"), false)
            .map(|r| r.number)
            .collect();
        assert_eq!(lines, vec![1, 6, 7, 8]);
    }

    #[test]
    fn named_filter_skips_other_directives() {
        let doc = ["```{note} careful", "body", "```"];
        assert_eq!(directive_lines(&doc, 0, Some("toctree"), true).count(), 0);
        let body: Vec<String> =
            directive_lines(&doc, 0, None, true).map(|r| r.text).collect();
        assert_eq!(body, vec!["body".to_string()]);
    }

    #[test]
    fn entries_resolve_from_document_directory() {
        assert_eq!(toctree_entry_target("test.md", Path::new("")), PathBuf::from("test.md"));
        assert_eq!(
            toctree_entry_target("docs/test.md", Path::new("")),
            PathBuf::from("docs/test.md")
        );
        assert_eq!(
            toctree_entry_target("../intro.md", Path::new("book/ch1")),
            PathBuf::from("book/intro.md")
        );
    }

    #[test]
    fn absolute_entries_resolve_from_the_root() {
        assert_eq!(
            toctree_entry_target("/docs/test.md", Path::new("book/ch1")),
            PathBuf::from("docs/test.md")
        );
    }

    #[test]
    fn docnames_without_extension_get_md_appended() {
        assert_eq!(toctree_entry_target("intro", Path::new("")), PathBuf::from("intro.md"));
    }

    #[test]
    fn single_wildcard_expands_against_the_markdown_set() {
        let markdown = [
            PathBuf::from("ch/a.md"),
            PathBuf::from("ch/b.md"),
            PathBuf::from("index.md"),
        ];
        assert_eq!(
            toctree_links("ch/*", Path::new(""), &markdown),
            vec![PathBuf::from("ch/a.md"), PathBuf::from("ch/b.md")]
        );
        assert_eq!(
            toctree_links("index*", Path::new(""), &markdown),
            vec![PathBuf::from("index.md")]
        );
    }

    #[test]
    fn multiple_wildcards_are_unsupported() {
        let markdown = [PathBuf::from("ch/a.md")];
        assert!(toctree_links("*/al*", Path::new(""), &markdown).is_empty());
    }
}
