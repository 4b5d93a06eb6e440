use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{canonical, migrate, scan, GlobalArgs};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "rehost")]
#[command(version = VERSION)]
#[command(about = "Bulk domain migration for site/content repositories")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite references to an old domain across a directory tree
    Migrate(migrate::MigrateArgs),
    /// Report files still containing a domain (read-only)
    Scan(scan::ScanArgs),
    /// Insert self-canonical tags into generated HTML pages
    Canonical(canonical::CanonicalArgs),
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let global = GlobalArgs {};

    let (json_result, exit_code) = match cli.command {
        Commands::Migrate(args) => output::map_cmd_result_to_json(migrate::run(args, &global)),
        Commands::Scan(args) => output::map_cmd_result_to_json(scan::run(args, &global)),
        Commands::Canonical(args) => output::map_cmd_result_to_json(canonical::run(args, &global)),
    };

    output::print_json_result(json_result);
    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    code.clamp(0, 255) as u8
}
