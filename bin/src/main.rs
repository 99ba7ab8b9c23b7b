//! chronarc CLI - Bundle time-ranged image captures into ZIP archives.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod display;
mod logging;

#[derive(Parser)]
#[command(name = "chronarc")]
#[command(about = "Bundle time-ranged image captures into ZIP archives", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Archive every image captured within a time range
    Archive {
        /// JSON manifest listing the image catalog
        #[arg(short, long)]
        manifest: PathBuf,

        /// Range start (YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS)
        #[arg(short, long)]
        start: String,

        /// Range end, inclusive (YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS)
        #[arg(short, long)]
        end: String,

        /// Directory for finished archives. Defaults to the user data directory.
        #[arg(short, long)]
        archive_dir: Option<PathBuf>,

        /// Maximum concurrent file reads
        #[arg(long, default_value = "8")]
        concurrency: usize,

        /// Deflate level (0 stores entries uncompressed)
        #[arg(long, default_value = "6")]
        level: u8,

        /// Record missing source files as warnings instead of failing the job
        #[arg(long)]
        skip_missing: bool,

        /// Print the final job record as JSON
        #[arg(long)]
        json: bool,
    },

    /// List catalog entries, optionally filtered by time range
    Query {
        /// JSON manifest listing the image catalog
        #[arg(short, long)]
        manifest: PathBuf,

        /// Range start (YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS)
        #[arg(short, long, requires = "end")]
        start: Option<String>,

        /// Range end, inclusive (YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS)
        #[arg(short, long, requires = "start")]
        end: Option<String>,

        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet)?;

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Archive {
            manifest,
            start,
            end,
            archive_dir,
            concurrency,
            level,
            skip_missing,
            json,
        } => {
            commands::archive::archive(
                &manifest,
                &start,
                &end,
                archive_dir,
                concurrency,
                level,
                skip_missing,
                json,
                cli.quiet,
            )
            .await
        }
        Commands::Query {
            manifest,
            start,
            end,
            json,
        } => commands::query::query(&manifest, start.as_deref(), end.as_deref(), json).await,
    }
}
