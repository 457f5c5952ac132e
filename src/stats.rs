//! Word and page estimation across a markdown tree.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;

use crate::document::Document;
use crate::error::Error;
use crate::inventory::root_relative;
use crate::pipeline;

/// Assumed words per printed page for the estimate.
const WORDS_PER_PAGE: f64 = 500.0;

/// Word count for one document.
#[derive(Debug, Serialize)]
pub struct DocumentStats {
    /// Root-relative path.
    pub path: PathBuf,
    pub words: usize,
}

/// Aggregate totals over a tree.
#[derive(Debug, Serialize)]
pub struct StatsTotals {
    pub documents: usize,
    pub words: usize,
    pub pages: f64,
}

/// Count whitespace-separated words on the lines outside fenced regions.
/// Code and front matter don't read like prose, so they don't count.
pub fn word_count(doc: &Document) -> usize {
    pipeline::outside_fence(doc.lines(), 0)
        .map(|record| record.text.split_whitespace().count())
        .sum()
}

/// Estimated page count for a word total.
pub fn pages(words: usize) -> f64 {
    #[allow(clippy::cast_precision_loss, reason = "word counts are far below 2^52")]
    let words = words as f64;
    words / WORDS_PER_PAGE
}

/// Open and count every file, fanned out across a thread pool. Each worker
/// owns its own `Document`; results merge by summation, order-independent.
///
/// # Errors
///
/// Returns `Error::Io` if any file cannot be read.
pub fn collect_stats(files: &[PathBuf], root: &Path) -> Result<Vec<DocumentStats>, Error> {
    let mut stats: Vec<DocumentStats> = files
        .par_iter()
        .map(|path| {
            let doc = Document::open(path)?;
            Ok(DocumentStats {
                path: root_relative(path, root),
                words: word_count(&doc),
            })
        })
        .collect::<Result<_, Error>>()?;
    stats.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(stats)
}

/// Sum per-document stats into tree totals.
pub fn totals(stats: &[DocumentStats]) -> StatsTotals {
    let words = stats.iter().map(|s| s.words).sum();
    StatsTotals { documents: stats.len(), words, pages: pages(words) }
}
