//! Document model: one markdown file, its lines, and cached link views.

use std::cell::OnceCell;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::pipeline::{self, AnnotatedLine};

/// One markdown file with its content loaded and derived views computed on
/// first access, then cached for the document's lifetime. There is no
/// invalidation; re-reading a changed file means opening a new `Document`.
///
/// Identity is the document's path: two instances for the same canonical
/// path compare equal and hash alike, so a set of documents never scans the
/// same file twice.
pub struct Document {
    path: PathBuf,
    lines: Vec<String>,
    links: OnceCell<Vec<AnnotatedLine>>,
    image_links: OnceCell<Vec<AnnotatedLine>>,
    all_links: OnceCell<Vec<AnnotatedLine>>,
    all_relative_links: OnceCell<Vec<AnnotatedLine>>,
    html_image_links: OnceCell<Vec<AnnotatedLine>>,
    line_index: OnceCell<HashMap<String, Vec<usize>>>,
}

impl Document {
    /// Read the file at `path` and split it into lines.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the path cannot be canonicalized or read.
    pub fn open(path: &Path) -> Result<Self, Error> {
        let canonical = path.canonicalize()?;
        let content = std::fs::read_to_string(&canonical)?;
        let lines = content.lines().map(str::to_string).collect();
        Ok(Self::from_lines(canonical, lines))
    }

    /// Build a document from in-memory lines. The path is used for identity
    /// and reporting only; nothing is read from disk.
    pub fn from_lines(path: PathBuf, lines: Vec<String>) -> Self {
        Self {
            path,
            lines,
            links: OnceCell::new(),
            image_links: OnceCell::new(),
            all_links: OnceCell::new(),
            all_relative_links: OnceCell::new(),
            html_image_links: OnceCell::new(),
            line_index: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Lines containing plain hyperlinks, fenced regions excluded.
    pub fn links(&self) -> &[AnnotatedLine] {
        self.links.get_or_init(|| pipeline::link_lines(&self.lines, 0).collect())
    }

    /// Lines containing markdown image links, fenced regions excluded.
    pub fn image_links(&self) -> &[AnnotatedLine] {
        self.image_links.get_or_init(|| pipeline::image_link_lines(&self.lines, 0).collect())
    }

    /// Lines containing hyperlinks or image links, hyperlink matches first.
    pub fn all_links(&self) -> &[AnnotatedLine] {
        self.all_links.get_or_init(|| pipeline::all_link_lines(&self.lines, 0).collect())
    }

    /// [`Self::all_links`] narrowed to matches with relative URLs.
    pub fn all_relative_links(&self) -> &[AnnotatedLine] {
        self.all_relative_links
            .get_or_init(|| pipeline::relative_link_lines(&self.lines, 0).collect())
    }

    /// Lines containing `<img>` tags with a `src` attribute.
    pub fn html_image_links(&self) -> &[AnnotatedLine] {
        self.html_image_links
            .get_or_init(|| pipeline::html_image_lines(&self.lines, 0).collect())
    }

    /// Line numbers whose exact text equals `text`, or `None` if absent.
    /// The reverse index covers every physical line, fenced ones included,
    /// and is built once on first use.
    pub fn line_lookup(&self, text: &str) -> Option<&[usize]> {
        let index = self.line_index.get_or_init(|| {
            let mut index: HashMap<String, Vec<usize>> = HashMap::new();
            for (number, line) in self.lines.iter().enumerate() {
                index.entry(line.clone()).or_default().push(number);
            }
            index
        });
        index.get(text).map(Vec::as_slice)
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for Document {}

impl Hash for Document {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("path", &self.path)
            .field("lines", &self.lines.len())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::pipeline::LinkKind;

    const TEST_CONTENT: &str = "\
---
title: Test
---

import re

# Header [web](https://www.bluebill.net) and [local](../md.txt)

![rel image](../image1.png) and ![abs image](https://example.com/i.png)

```python
import re
[not a link](in_code.md)
```

import re
Last line [doc](./other.md#sec)";

    fn test_document() -> Document {
        let lines = TEST_CONTENT.lines().map(str::to_string).collect();
        Document::from_lines(PathBuf::from("doc.md"), lines)
    }

    #[test]
    fn links_skip_fenced_regions() {
        let doc = test_document();
        let numbers: Vec<usize> = doc.links().iter().map(|l| l.number).collect();
        assert_eq!(numbers, vec![6, 16]);
    }

    #[test]
    fn image_links_are_separate_from_hyperlinks() {
        let doc = test_document();
        let numbers: Vec<usize> = doc.image_links().iter().map(|l| l.number).collect();
        assert_eq!(numbers, vec![8]);
        assert_eq!(doc.image_links()[0].matches.len(), 2);
    }

    #[test]
    fn all_relative_links_keep_only_relative_urls() {
        let doc = test_document();
        let relative = doc.all_relative_links();
        let numbers: Vec<usize> = relative.iter().map(|l| l.number).collect();
        assert_eq!(numbers, vec![6, 8, 16]);
        assert_eq!(relative[0].matches.len(), 1);
        assert_eq!(relative[0].matches[0].url, "../md.txt");
        assert_eq!(relative[1].matches[0].kind, LinkKind::Image);
        assert_eq!(relative[2].matches[0].url, "./other.md#sec");
    }

    #[test]
    fn repeated_access_returns_the_cached_view() {
        let doc = test_document();
        let first = doc.all_links().as_ptr();
        let second = doc.all_links().as_ptr();
        assert_eq!(first, second);
    }

    #[test]
    fn line_lookup_covers_every_physical_line() {
        let doc = test_document();
        assert_eq!(doc.line_lookup("import re"), Some(&[4, 11, 15][..]));
        assert_eq!(doc.line_lookup("not in the document"), None);
    }

    #[test]
    fn open_reads_from_disk_and_canonicalizes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.md");
        std::fs::write(&path, TEST_CONTENT).unwrap();

        let doc = Document::open(&path).unwrap();
        assert_eq!(doc.lines().len(), 17);

        let again = Document::open(&path).unwrap();
        let mut set = HashSet::new();
        set.insert(doc);
        set.insert(again);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn open_propagates_io_errors() {
        assert!(Document::open(Path::new("/nonexistent/x.md")).is_err());
    }
}
