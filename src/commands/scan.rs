use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use rehost::migrate::{find_leftovers, resolve_root};

use crate::commands::CmdResult;

#[derive(Args)]
pub struct ScanArgs {
    /// Root directory to scan
    #[arg(default_value = ".")]
    pub path: String,

    /// Domain to search for (literal, case-sensitive)
    #[arg(long, value_name = "DOMAIN")]
    pub domain: String,
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum ScanOutput {
    #[serde(rename = "scan.leftovers")]
    Leftovers {
        root: String,
        domain: String,
        files: Vec<String>,
        total: usize,
    },
}

pub fn run(args: ScanArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<ScanOutput> {
    let root = resolve_root(&PathBuf::from(&args.path))?;
    let files = find_leftovers(&root, &args.domain);
    let total = files.len();

    // Diagnostic: leftovers are reported, never an error.
    Ok((
        ScanOutput::Leftovers {
            root: root.display().to_string(),
            domain: args.domain,
            files,
            total,
        },
        0,
    ))
}
