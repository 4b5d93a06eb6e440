use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use rehost::canonical::{self, CanonicalConfig};
use rehost::{RunSummary, SkippedFile};

use crate::commands::CmdResult;

#[derive(Args)]
pub struct CanonicalArgs {
    /// Root directory containing the generated HTML
    #[arg(default_value = ".")]
    pub path: String,

    /// Base URL for canonical links (detected from CNAME or
    /// GITHUB_REPOSITORY when omitted)
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Detect and report only; no writes
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum CanonicalOutput {
    #[serde(rename = "canonical.fix")]
    Fix {
        root: String,
        base_url: String,
        dry_run: bool,
        changed: Vec<String>,
        skipped: Vec<SkippedFile>,
        summary: RunSummary,
    },
}

pub fn run(
    args: CanonicalArgs,
    _global: &crate::commands::GlobalArgs,
) -> CmdResult<CanonicalOutput> {
    let report = canonical::run(&CanonicalConfig {
        root: PathBuf::from(&args.path),
        base_url: args.base_url,
        dry_run: args.dry_run,
    })?;

    Ok((
        CanonicalOutput::Fix {
            root: report.root,
            base_url: report.base_url,
            dry_run: report.dry_run,
            changed: report.changed,
            skipped: report.skipped,
            summary: report.summary,
        },
        0,
    ))
}
