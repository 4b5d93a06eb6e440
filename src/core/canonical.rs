//! Self-canonical tags for generated HTML pages.
//!
//! For every eligible `.html` file under the root, computes the page's own
//! canonical URL, strips any existing canonical tags, and inserts the
//! correct one before `</head>`. Also repairs `<meta name="robots">` tags
//! whose content is accidentally a URL.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Error, Result};
use crate::filter::walk_files;
use crate::migrate::{read_file_text, relative_to, resolve_root, RunSummary, SkipReason, SkippedFile};

/// Configuration for one canonical run.
#[derive(Debug, Clone)]
pub struct CanonicalConfig {
    pub root: PathBuf,
    /// Explicit base URL; when absent it is detected from `CNAME` or the
    /// `GITHUB_REPOSITORY` environment variable.
    pub base_url: Option<String>,
    pub dry_run: bool,
}

#[derive(Debug, Serialize)]
pub struct CanonicalReport {
    pub root: String,
    pub base_url: String,
    pub dry_run: bool,
    pub changed: Vec<String>,
    pub skipped: Vec<SkippedFile>,
    pub summary: RunSummary,
}

/// Compiled rewrite patterns, built once per run.
struct CanonicalRewriter {
    existing_link: regex::Regex,
    head_close: regex::Regex,
    robots_url: regex::Regex,
    slash_runs: regex::Regex,
}

impl CanonicalRewriter {
    fn new() -> Result<Self> {
        let build = |p: &str| regex::Regex::new(p).map_err(|e| Error::Pattern(e.to_string()));
        Ok(Self {
            // Leading \s* keeps repeated runs from accumulating blank lines.
            existing_link: build(r#"(?is)\s*<link[^>]+rel=['"]canonical['"][^>]*>"#)?,
            head_close: build(r"(?is)</head\s*>")?,
            robots_url: build(
                r#"(?is)<meta[^>]+name=['"]robots['"][^>]+content=['"]https?://[^'"]+['"][^>]*>"#,
            )?,
            slash_runs: build(r"/{2,}")?,
        })
    }

    /// Compute the self-canonical URL for a page, or `None` for pages that
    /// must keep no canonical (404 and search-engine verification files).
    fn canonical_url_for(&self, relative: &str, base: &str) -> Option<String> {
        let name = relative.rsplit('/').next().unwrap_or(relative).to_lowercase();
        if name == "404.html" || name.starts_with("yandex_") || name.starts_with("google") {
            return None;
        }

        let url_path = if let Some(dir) = relative.strip_suffix("index.html") {
            format!("/{dir}")
        } else {
            format!("/{relative}")
        };
        let url_path = self.slash_runs.replace_all(&url_path, "/");

        Some(format!("{}{}", base.trim_end_matches('/'), url_path))
    }

    /// Remove existing canonical tags, insert the right one before
    /// `</head>` (or prepend when no head exists), and repair broken
    /// robots tags.
    fn rewrite(&self, html: &str, canonical_url: &str) -> String {
        let stripped = self.existing_link.replace_all(html, "");

        let tag = format!(r#"<link rel="canonical" href="{canonical_url}">"#);
        let with_tag = match self.head_close.find(&stripped) {
            Some(m) => {
                let pos = m.start();
                format!("{}{}\n{}", &stripped[..pos], tag, &stripped[pos..])
            }
            None => format!("{}\n{}", tag, stripped),
        };

        self.robots_url
            .replace_all(&with_tag, r#"<meta name="robots" content="index, follow">"#)
            .into_owned()
    }
}

/// Determine the base URL when `--base-url` was not given.
fn detect_base_url(root: &Path) -> Option<String> {
    // 1) CNAME at the root (custom domain)
    if let Ok(cname) = fs::read_to_string(root.join("CNAME")) {
        if let Some(domain) = cname.lines().map(str::trim).find(|l| !l.is_empty()) {
            if domain.starts_with("http") {
                return Some(domain.to_string());
            }
            return Some(format!("https://{domain}"));
        }
    }

    // 2) GitHub Pages: user site (owner.github.io) or project site
    if let Ok(repo) = std::env::var("GITHUB_REPOSITORY") {
        let (owner, name) = repo.split_once('/').unwrap_or((repo.as_str(), ""));
        if name.ends_with(".github.io") {
            return Some(format!("https://{name}"));
        }
        if !owner.is_empty() && !name.is_empty() {
            return Some(format!("https://{owner}.github.io/{name}"));
        }
    }

    None
}

fn is_html(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("html"))
        .unwrap_or(false)
}

/// Execute one canonical run.
pub fn run(config: &CanonicalConfig) -> Result<CanonicalReport> {
    let root = resolve_root(&config.root)?;
    let base_url = config
        .base_url
        .clone()
        .or_else(|| detect_base_url(&root))
        .ok_or_else(|| {
            Error::Config(
                "Base URL could not be determined: pass --base-url, add a CNAME file, \
                 or set GITHUB_REPOSITORY"
                    .to_string(),
            )
        })?;

    log_status!(
        "canonical",
        "Base URL {} under {}{}",
        base_url,
        root.display(),
        if config.dry_run { " (dry-run)" } else { "" }
    );

    let rewriter = CanonicalRewriter::new()?;
    let mut changed = Vec::new();
    let mut skipped = Vec::new();
    let mut summary = RunSummary::default();

    for file in walk_files(&root).iter().filter(|f| is_html(f)) {
        summary.scanned += 1;
        let relative = relative_to(file, &root);

        let Some(url) = rewriter.canonical_url_for(&relative, &base_url) else {
            continue;
        };

        let html = match read_file_text(file) {
            Ok(t) => t,
            Err(e) => {
                log_status!("canonical", "Skip (unreadable): {}: {}", relative, e);
                summary.skipped += 1;
                skipped.push(SkippedFile {
                    path: relative,
                    reason: SkipReason::Unreadable,
                    detail: e.to_string(),
                });
                continue;
            }
        };

        let rewritten = rewriter.rewrite(&html, &url);
        if rewritten == html {
            continue;
        }

        if config.dry_run {
            log_status!("canonical", "Would fix: {} -> {}", relative, url);
            summary.changed += 1;
            changed.push(relative);
            continue;
        }

        match fs::write(file, &rewritten) {
            Ok(()) => {
                log_status!("canonical", "Fixed: {} -> {}", relative, url);
                summary.changed += 1;
                changed.push(relative);
            }
            Err(e) => {
                log_status!("canonical", "Skip (write failed): {}: {}", relative, e);
                summary.skipped += 1;
                skipped.push(SkippedFile {
                    path: relative,
                    reason: SkipReason::Write,
                    detail: e.to_string(),
                });
            }
        }
    }

    log_status!(
        "canonical",
        "Scanned {}, changed {}, skipped {}",
        summary.scanned,
        summary.changed,
        summary.skipped
    );

    Ok(CanonicalReport {
        root: root.display().to_string(),
        base_url,
        dry_run: config.dry_run,
        changed,
        skipped,
        summary,
    })
}
