//! rando: build self-contained offline bundles of a rando application.
//!
//! # Usage
//!
//! ```text
//! rando sync <destination> [--url http://host] [--source a,b] [--languages en,fr]
//!            [--skip-pdf] [--skip-tiles] [--skip-dem] [--skip-profile-png]
//!            [--with-events] [--content-categories 1,2]
//!            [--settings rando.yaml] [--progress-file progress.jsonl] [-v <0|1|2>]
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::sync::SyncArgs;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "rando",
    version,
    about = "Snapshot a rando application into an offline bundle",
    long_about = None,
)]
struct Cli {
    /// 0 = warnings only, 1 = progress, 2 = every file and archive.
    #[arg(short, long, global = true, default_value_t = 1)]
    verbosity: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render listings, treks, media and tiles into <destination>.
    Sync(SyncArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn init_tracing(verbosity: u8) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbosity);
    match cli.command {
        Commands::Sync(args) => args.run(cli.verbosity),
    }
}
