//! Run driver — one linear pass over the tree.
//!
//! Init → enumerate → (per candidate: read → rewrite → decide →
//! skip | backup+write) → verify → report. There is no retry and no
//! resumption; per-file failures become tagged skip records and never
//! abort the run. Only an unresolvable root is fatal.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::backup::BackupSet;
use crate::error::{Error, Result};
use crate::filter::walk_files;
use crate::substitute::DomainRewriter;

/// Immutable configuration for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub root: PathBuf,
    pub old_domain: String,
    pub new_domain: String,
    pub dry_run: bool,
}

/// Why a candidate file was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The file could not be read.
    Unreadable,
    /// The pre-change copy could not be written; the original was left
    /// untouched.
    Backup,
    /// The rewritten content could not be written back.
    Write,
}

/// A per-file failure, surfaced in the report instead of aborting the run.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedFile {
    pub path: String,
    pub reason: SkipReason,
    pub detail: String,
}

/// Counters accumulated over one run.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct RunSummary {
    pub scanned: usize,
    pub changed: usize,
    pub skipped: usize,
}

/// The full result of one run.
#[derive(Debug, Serialize)]
pub struct MigrationReport {
    pub root: String,
    pub old_domain: String,
    pub new_domain: String,
    pub dry_run: bool,
    /// Changed files (or would-change files in dry-run), relative to root.
    pub changed: Vec<String>,
    pub skipped: Vec<SkippedFile>,
    /// Files still containing the old domain after the pass (diagnostic).
    pub leftovers: Vec<String>,
    /// Set only when at least one file was backed up this run.
    pub backup_dir: Option<String>,
    pub summary: RunSummary,
}

/// Execute one migration run.
pub fn run(config: &RunConfig) -> Result<MigrationReport> {
    let root = resolve_root(&config.root)?;
    let rewriter = DomainRewriter::new(&config.old_domain, &config.new_domain)?;

    log_status!(
        "migrate",
        "{} -> {} under {}{}",
        config.old_domain,
        config.new_domain,
        root.display(),
        if config.dry_run { " (dry-run)" } else { "" }
    );

    let candidates = walk_files(&root);
    if candidates.is_empty() {
        log_status!("migrate", "No candidate files found — nothing to do");
    }

    let mut backups = BackupSet::plan(&root);
    let mut changed = Vec::new();
    let mut skipped = Vec::new();
    let mut summary = RunSummary::default();

    for file in &candidates {
        summary.scanned += 1;
        let relative = relative_to(file, &root);

        let text = match read_file_text(file) {
            Ok(t) => t,
            Err(e) => {
                log_status!("migrate", "Skip (unreadable): {}: {}", relative, e);
                summary.skipped += 1;
                skipped.push(SkippedFile {
                    path: relative,
                    reason: SkipReason::Unreadable,
                    detail: e.to_string(),
                });
                continue;
            }
        };

        let rewritten = rewriter.rewrite(&text);
        if rewritten == text {
            continue;
        }

        if config.dry_run {
            log_status!("migrate", "Would change: {}", relative);
            summary.changed += 1;
            changed.push(relative);
            continue;
        }

        // The original must be mirrored before it is overwritten.
        if let Err(e) = backups.preserve(file) {
            log_status!("migrate", "Skip (backup failed): {}: {}", relative, e);
            summary.skipped += 1;
            skipped.push(SkippedFile {
                path: relative,
                reason: SkipReason::Backup,
                detail: e.to_string(),
            });
            continue;
        }

        match fs::write(file, &rewritten) {
            Ok(()) => {
                log_status!("migrate", "Changed: {}", relative);
                summary.changed += 1;
                changed.push(relative);
            }
            Err(e) => {
                log_status!("migrate", "Skip (write failed): {}: {}", relative, e);
                summary.skipped += 1;
                skipped.push(SkippedFile {
                    path: relative,
                    reason: SkipReason::Write,
                    detail: e.to_string(),
                });
            }
        }
    }

    let leftovers = find_leftovers(&root, &config.old_domain);

    log_status!(
        "migrate",
        "Scanned {}, changed {}, skipped {}",
        summary.scanned,
        summary.changed,
        summary.skipped
    );
    if leftovers.is_empty() {
        log_status!("migrate", "No remaining occurrences of {}", config.old_domain);
    } else {
        log_status!(
            "migrate",
            "{} file(s) still mention {}",
            leftovers.len(),
            config.old_domain
        );
    }

    Ok(MigrationReport {
        root: root.display().to_string(),
        old_domain: config.old_domain.clone(),
        new_domain: config.new_domain.clone(),
        dry_run: config.dry_run,
        changed,
        skipped,
        leftovers,
        backup_dir: backups.dir().map(|d| d.display().to_string()),
        summary,
    })
}

/// Search eligible files under `root` for literal occurrences of `domain`.
///
/// Used for the post-run verification pass and the standalone `scan`
/// command. Unreadable files are ignored here; the pass is diagnostic.
pub fn find_leftovers(root: &Path, domain: &str) -> Vec<String> {
    let mut hits = Vec::new();
    for file in walk_files(root) {
        let Ok(text) = read_file_text(&file) else {
            continue;
        };
        if text.contains(domain) {
            hits.push(relative_to(&file, root));
        }
    }
    hits
}

/// Resolve the run root, failing when it does not exist.
pub fn resolve_root(path: &Path) -> Result<PathBuf> {
    path.canonicalize()
        .map_err(|_| Error::PathResolution(path.display().to_string()))
}

/// Read a file as text: UTF-8 first, then a byte-for-byte Latin-1 decode
/// as the fallback encoding. Content survives the round trip; the write
/// side always re-encodes as UTF-8.
pub(crate) fn read_file_text(path: &Path) -> std::io::Result<String> {
    let bytes = fs::read(path)?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) => Ok(e.into_bytes().iter().map(|&b| b as char).collect()),
    }
}

pub(crate) fn relative_to(file: &Path, root: &Path) -> String {
    file.strip_prefix(root)
        .unwrap_or(file)
        .to_string_lossy()
        .replace('\\', "/")
}
