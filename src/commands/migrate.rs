use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use rehost::migrate;
use rehost::{RunConfig, RunSummary, SkippedFile};

use crate::commands::CmdResult;

#[derive(Args)]
pub struct MigrateArgs {
    /// Root directory to scan
    #[arg(default_value = ".")]
    pub path: String,

    /// Domain to migrate away from
    #[arg(long, value_name = "DOMAIN")]
    pub old_domain: String,

    /// Domain to migrate to
    #[arg(long, value_name = "DOMAIN")]
    pub new_domain: String,

    /// Detect and report only; no writes, no backups
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum MigrateOutput {
    #[serde(rename = "migrate.run")]
    Run {
        root: String,
        old_domain: String,
        new_domain: String,
        dry_run: bool,
        changed: Vec<String>,
        skipped: Vec<SkippedFile>,
        leftovers: Vec<String>,
        backup_dir: Option<String>,
        summary: RunSummary,
    },
}

pub fn run(args: MigrateArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<MigrateOutput> {
    let config = RunConfig {
        root: PathBuf::from(&args.path),
        old_domain: args.old_domain,
        new_domain: args.new_domain,
        dry_run: args.dry_run,
    };

    let report = migrate::run(&config)?;

    // A completed run exits 0 even when files were skipped; the skip
    // records in the report are the partial-failure signal.
    Ok((
        MigrateOutput::Run {
            root: report.root,
            old_domain: report.old_domain,
            new_domain: report.new_domain,
            dry_run: report.dry_run,
            changed: report.changed,
            skipped: report.skipped,
            leftovers: report.leftovers,
            backup_dir: report.backup_dir,
            summary: report.summary,
        },
        0,
    ))
}
