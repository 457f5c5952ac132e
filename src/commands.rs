//! CLI commands for mdlinks: validate, repair, stats, graph.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::Config;
use crate::document::Document;
use crate::error::Error;
use crate::graph::{self, LinkGraph};
use crate::headers;
use crate::inventory::{self, AssetInventory};
use crate::report::{self, DocumentEntry, Summary, TreeReport};
use crate::stats;
use crate::validate;

/// How the validation runner treats repairable issues.
#[derive(Clone, Copy, PartialEq, Eq)]
enum RepairMode {
    /// Report only.
    Off,
    /// Report what would be rewritten without touching files.
    DryRun,
    /// Rewrite files in place.
    Apply,
}

/// Canonicalize the scan root and insist it is a directory.
fn canonical_root(root: &Path) -> Result<PathBuf, Error> {
    let root = root.canonicalize()?;
    if !root.is_dir() {
        return Err(Error::NotADirectory { path: root });
    }
    Ok(root)
}

/// Walk the tree, validate every markdown document, optionally repair.
fn run_validation(root: &Path, mode: RepairMode) -> Result<TreeReport, Error> {
    let root = canonical_root(root)?;
    let config = Config::load(&root)?;
    let inventory = AssetInventory::build(&root, &config);
    let files = inventory::markdown_files(&root, &config);
    log::debug!("scanning {} markdown files under {}", files.len(), root.display());

    let mut documents = Vec::new();
    let mut summary = Summary {
        markdown_files: files.len(),
        total_files: inventory.total_files(),
        ..Summary::default()
    };

    for path in &files {
        let doc = Document::open(path)?;
        let doc_rel = inventory::root_relative(path, &root);
        let doc_dir = doc_rel.parent().unwrap_or(Path::new("")).to_path_buf();
        let doc_report = validate::validate_relative_links(&doc, &doc_dir, &inventory);
        if doc_report.is_clean() {
            continue;
        }
        log::debug!("{}: {} issues", doc_rel.display(), doc_report.issue_count());

        summary.missing += doc_report.missing.len();
        summary.incorrect += doc_report.incorrect.len();

        if mode != RepairMode::Off {
            let (actions, manual) = validate::plan_repairs(&doc_report, &doc_dir);
            summary.manual += manual.len();
            summary.repaired += actions.len();
            if mode == RepairMode::Apply {
                validate::apply_repairs(path, &actions)?;
            }
        }

        documents.push(DocumentEntry { path: doc_rel, report: doc_report });
    }

    Ok(TreeReport { documents, summary })
}

fn issues_exit(unresolved: usize) -> ExitCode {
    if unresolved == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

/// Validate every relative reference under `root`.
///
/// # Errors
///
/// Returns config loading or I/O errors.
pub fn validate(root: &Path, json: bool) -> Result<ExitCode, Error> {
    let report = run_validation(root, RepairMode::Off)?;
    if json {
        report::print_json(&report)?;
    } else {
        report::print_report(&report);
    }
    Ok(issues_exit(report.summary.missing + report.summary.incorrect))
}

/// Repair unambiguous broken references, or preview with `dry_run`.
///
/// # Errors
///
/// Returns config loading or I/O errors.
pub fn repair_links(root: &Path, dry_run: bool) -> Result<ExitCode, Error> {
    let mode = if dry_run { RepairMode::DryRun } else { RepairMode::Apply };
    let report = run_validation(root, mode)?;
    report::print_report(&report);

    if dry_run {
        println!();
        println!("dry run: {} rewrites pending, no files modified", report.summary.repaired);
        // Preview exits like a plain validation run.
        return Ok(issues_exit(report.summary.missing + report.summary.incorrect));
    }
    Ok(issues_exit(report.unresolved()))
}

/// Add `{#sec:...}` attributes to headers that lack them.
///
/// # Errors
///
/// Returns config loading or I/O errors.
pub fn repair_headers(root: &Path, dry_run: bool) -> Result<ExitCode, Error> {
    let root = canonical_root(root)?;
    let config = Config::load(&root)?;
    let files = inventory::markdown_files(&root, &config);

    let mut pending = 0_usize;
    for path in &files {
        let doc = Document::open(path)?;
        let doc_rel = inventory::root_relative(path, &root);
        let fixes = headers::plan_header_fixes(&doc, &doc_rel)?;
        if fixes.is_empty() {
            continue;
        }

        if dry_run {
            for fix in &fixes {
                println!(
                    "{}:{} would add {{#{}}}",
                    doc_rel.display(),
                    fix.line_number,
                    fix.id
                );
            }
            pending += fixes.len();
        } else {
            headers::apply_header_fixes(path, &fixes)?;
            println!("{}: added {} header ids", doc_rel.display(), fixes.len());
        }
    }

    if dry_run && pending > 0 {
        println!();
        println!("{pending} headers lack ids");
        return Ok(ExitCode::from(1));
    }
    Ok(ExitCode::SUCCESS)
}

/// Estimate word and page counts across the tree.
///
/// # Errors
///
/// Returns config loading or I/O errors.
pub fn stats(root: &Path) -> Result<ExitCode, Error> {
    let root = canonical_root(root)?;
    let config = Config::load(&root)?;
    let files = inventory::markdown_files(&root, &config);

    let per_document = stats::collect_stats(&files, &root)?;
    for entry in &per_document {
        println!("{:>8}  {}", entry.words, entry.path.display());
    }

    let totals = stats::totals(&per_document);
    println!();
    println!("Total Documents:  {}", totals.documents);
    println!("Total Words:      {}", totals.words);
    println!("Estimated Pages:  {:.1}", totals.pages);
    Ok(ExitCode::SUCCESS)
}

/// Show the link graph between markdown documents.
///
/// # Errors
///
/// Returns config loading or I/O errors.
pub fn graph(root: &Path, dot: bool) -> Result<ExitCode, Error> {
    let root = canonical_root(root)?;
    let config = Config::load(&root)?;
    let files = inventory::markdown_files(&root, &config);
    let markdown_rel: Vec<PathBuf> =
        files.iter().map(|p| inventory::root_relative(p, &root)).collect();

    let mut link_graph = LinkGraph::new();
    for path in &files {
        let doc = Document::open(path)?;
        let doc_rel = inventory::root_relative(path, &root);
        let targets = graph::document_targets(&doc, &doc_rel, &markdown_rel);
        link_graph.add_document(&doc_rel, targets);
    }

    if dot {
        print!("{}", link_graph.to_dot());
        return Ok(ExitCode::SUCCESS);
    }

    println!("Documents: {}", files.len());
    println!("Nodes:     {}", link_graph.node_count());
    println!("Edges:     {}", link_graph.edge_count());

    let reverse = link_graph.reverse_links();
    if !reverse.is_empty() {
        let mut ranked: Vec<_> = reverse.iter().collect();
        ranked.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then(a.0.cmp(b.0)));
        println!();
        println!("Most referenced:");
        for (target, sources) in ranked.iter().take(10) {
            println!("  {:>3}  {}", sources.len(), target.display());
        }
    }
    Ok(ExitCode::SUCCESS)
}
