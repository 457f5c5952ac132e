//! Link graph between markdown documents: which document points at which.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::classifiers;
use crate::document::Document;
use crate::inventory::normalize_path;
use crate::myst;

/// Directed edges between root-relative markdown paths.
#[derive(Debug, Default)]
pub struct LinkGraph {
    edges: Vec<(PathBuf, PathBuf)>,
}

/// The markdown files a document points at: relative hyperlink targets with
/// a `.md` extension, normalized against the document's directory, plus
/// resolved toctree entries. Section anchors are ignored.
pub fn document_targets(doc: &Document, doc_rel: &Path, markdown: &[PathBuf]) -> Vec<PathBuf> {
    let doc_dir = doc_rel.parent().unwrap_or(Path::new(""));
    let mut targets = Vec::new();

    for line in doc.all_relative_links() {
        for record in &line.matches {
            let Some(rel) = classifiers::relative_url(&record.url) else {
                continue;
            };
            if rel.file.is_empty() {
                continue;
            }
            let target = normalize_path(&doc_dir.join(&rel.file));
            if target.extension().is_some_and(|ext| ext == "md") {
                targets.push(target);
            }
        }
    }

    for record in myst::directive_lines(doc.lines(), 0, Some("toctree"), true) {
        let entry = record.text.trim();
        if entry.is_empty() {
            continue;
        }
        targets.extend(myst::toctree_links(entry, doc_dir, markdown));
    }

    targets
}

impl LinkGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one document's outgoing edges.
    pub fn add_document(&mut self, doc_rel: &Path, targets: Vec<PathBuf>) {
        for target in targets {
            self.edges.push((doc_rel.to_path_buf(), target));
        }
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of distinct documents appearing on either end of an edge.
    pub fn node_count(&self) -> usize {
        let mut nodes = BTreeSet::new();
        for (source, target) in &self.edges {
            nodes.insert(source);
            nodes.insert(target);
        }
        nodes.len()
    }

    /// Incoming links per target, sorted by path for stable output.
    pub fn reverse_links(&self) -> BTreeMap<&Path, Vec<&Path>> {
        let mut reverse: BTreeMap<&Path, Vec<&Path>> = BTreeMap::new();
        for (source, target) in &self.edges {
            reverse.entry(target.as_path()).or_default().push(source.as_path());
        }
        reverse
    }

    /// Render the graph in DOT format for external tooling.
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph mdlinks {\n");
        for (source, target) in &self.edges {
            out.push_str(&format!(
                "    \"{}\" -> \"{}\";\n",
                source.display(),
                target.display()
            ));
        }
        out.push_str("}\n");
        out
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;

    fn doc(path: &str, lines: &[&str]) -> Document {
        Document::from_lines(
            PathBuf::from(path),
            lines.iter().map(|s| (*s).to_string()).collect(),
        )
    }

    #[test]
    fn targets_include_markdown_links_only() {
        let doc = doc("docs/a.md", &[
            "[next](b.md) and [up](../index.md)",
            "[data](table.csv) and [web](https://example.com/x.md)",
        ]);
        let targets = document_targets(&doc, Path::new("docs/a.md"), &[]);
        assert_eq!(targets, vec![PathBuf::from("docs/b.md"), PathBuf::from("index.md")]);
    }

    #[test]
    fn toctree_entries_become_targets() {
        let doc = doc("index.md", &[
            "```{toctree}",
            ":maxdepth: 1",
            "intro",
            "guide/setup",
            "```",
        ]);
        let targets = document_targets(&doc, Path::new("index.md"), &[]);
        assert_eq!(targets, vec![PathBuf::from("intro.md"), PathBuf::from("guide/setup.md")]);
    }

    #[test]
    fn counts_and_reverse_links_agree() {
        let mut graph = LinkGraph::new();
        graph.add_document(Path::new("a.md"), vec![PathBuf::from("b.md"), PathBuf::from("c.md")]);
        graph.add_document(Path::new("b.md"), vec![PathBuf::from("c.md")]);

        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.node_count(), 3);

        let reverse = graph.reverse_links();
        assert_eq!(reverse[Path::new("c.md")].len(), 2);
        assert_eq!(reverse[Path::new("b.md")], vec![Path::new("a.md")]);
    }

    #[test]
    fn dot_output_lists_every_edge() {
        let mut graph = LinkGraph::new();
        graph.add_document(Path::new("a.md"), vec![PathBuf::from("b.md")]);
        let dot = graph.to_dot();
        assert!(dot.starts_with("digraph mdlinks {"));
        assert!(dot.contains("\"a.md\" -> \"b.md\";"));
    }
}
