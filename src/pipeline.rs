//! Line filter pipeline: drive a sequence of lines through a fence tracker
//! plus one or more token classifiers, yielding only the lines of interest.
//!
//! All filters are lazy, finite, and yield nothing for empty input. Line
//! numbers are 0-based and offset by the caller-supplied start index.

use crate::classifiers;
use crate::fence::FenceTracker;

/// One physical line and its index within the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRecord {
    /// 0-based line index.
    pub number: usize,
    /// Line text without the trailing newline.
    pub text: String,
}

/// Which classifier produced a [`LinkRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// `[text](url)`
    Hyperlink,
    /// `![caption](url)`
    Image,
    /// `<img src="...">`
    HtmlImage,
}

/// One link-shaped match found on a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRecord {
    pub kind: LinkKind,
    /// The full matched substring of the line.
    pub full: String,
    /// Link text or image caption; empty for HTML images.
    pub text: String,
    /// The referenced URL.
    pub url: String,
}

/// A line together with its non-empty list of link matches.
///
/// When several classifier kinds are combined, matches are concatenated in
/// classifier order (all hyperlinks, then all images), each kind's own
/// matches staying in left-to-right position order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedLine {
    pub number: usize,
    pub text: String,
    pub matches: Vec<LinkRecord>,
}

/// Yield the lines outside any code fence or YAML block, numbered from
/// `start`. Fence delimiter lines themselves are skipped.
pub fn outside_fence<S: AsRef<str>>(
    lines: &[S],
    start: usize,
) -> impl Iterator<Item = LineRecord> + '_ {
    let mut tracker = FenceTracker::new();
    lines.iter().enumerate().filter_map(move |(offset, line)| {
        let text = line.as_ref();
        if tracker.feed(text) {
            return None;
        }
        Some(LineRecord { number: start + offset, text: text.to_string() })
    })
}

fn annotated<S, F>(
    lines: &[S],
    start: usize,
    extract: F,
) -> impl Iterator<Item = AnnotatedLine> + '_
where
    S: AsRef<str>,
    F: Fn(&str) -> Vec<LinkRecord> + 'static,
{
    outside_fence(lines, start).filter_map(move |record| {
        let matches = extract(&record.text);
        if matches.is_empty() {
            return None;
        }
        Some(AnnotatedLine { number: record.number, text: record.text, matches })
    })
}

fn hyperlink_records(line: &str) -> Vec<LinkRecord> {
    classifiers::link_matches(line)
        .into_iter()
        .map(|m| LinkRecord { kind: LinkKind::Hyperlink, full: m.full, text: m.text, url: m.url })
        .collect()
}

fn image_records(line: &str) -> Vec<LinkRecord> {
    classifiers::image_link_matches(line)
        .into_iter()
        .map(|m| LinkRecord { kind: LinkKind::Image, full: m.full, text: m.text, url: m.url })
        .collect()
}

fn html_image_records(line: &str) -> Vec<LinkRecord> {
    classifiers::html_image_matches(line)
        .into_iter()
        .map(|m| LinkRecord {
            kind: LinkKind::HtmlImage,
            full: m.full,
            text: String::new(),
            url: m.src,
        })
        .collect()
}

/// Lines containing at least one `[text](url)` hyperlink.
pub fn link_lines<S: AsRef<str>>(
    lines: &[S],
    start: usize,
) -> impl Iterator<Item = AnnotatedLine> + '_ {
    annotated(lines, start, hyperlink_records)
}

/// Lines containing at least one `![caption](url)` image link.
pub fn image_link_lines<S: AsRef<str>>(
    lines: &[S],
    start: usize,
) -> impl Iterator<Item = AnnotatedLine> + '_ {
    annotated(lines, start, image_records)
}

/// Lines containing hyperlinks or image links, hyperlink matches first.
pub fn all_link_lines<S: AsRef<str>>(
    lines: &[S],
    start: usize,
) -> impl Iterator<Item = AnnotatedLine> + '_ {
    annotated(lines, start, |line| {
        let mut matches = hyperlink_records(line);
        matches.extend(image_records(line));
        matches
    })
}

/// Lines containing `<img>` tags with a `src` attribute.
pub fn html_image_lines<S: AsRef<str>>(
    lines: &[S],
    start: usize,
) -> impl Iterator<Item = AnnotatedLine> + '_ {
    annotated(lines, start, html_image_records)
}

/// Like [`all_link_lines`], but each match's URL is re-classified and only
/// relative URLs are kept. Lines whose matches are all absolute are dropped;
/// line identity is preserved for the rest.
pub fn relative_link_lines<S: AsRef<str>>(
    lines: &[S],
    start: usize,
) -> impl Iterator<Item = AnnotatedLine> + '_ {
    all_link_lines(lines, start).filter_map(|mut line| {
        line.matches.retain(|m| classifiers::relative_url(&m.url).is_some());
        if line.matches.is_empty() {
            return None;
        }
        Some(line)
    })
}
