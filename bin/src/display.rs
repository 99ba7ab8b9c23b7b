//! Display utilities and argument parsing for the chronarc CLI.

use anyhow::{Context, Result};
use chronarc_lib::prelude::*;
use indicatif::{ProgressBar, ProgressStyle};

/// Parses `--start`/`--end` into an inclusive time range.
pub(crate) fn parse_range(start: &str, end: &str) -> Result<TimeRange> {
    TimeRange::parse(start, end).with_context(|| format!("Invalid time range: {start} .. {end}"))
}

/// Creates the entry progress bar, hidden in quiet mode.
pub(crate) fn entry_progress(quiet: bool) -> Result<ProgressBar> {
    if quiet {
        return Ok(ProgressBar::hidden());
    }

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} entries ({percent}%) {msg}",
            )
            .context("Invalid progress template")?
            .progress_chars("=>-"),
    );
    Ok(pb)
}

/// Prints a human-readable summary of a finished job.
pub(crate) fn print_job(job: &ArchiveJob) {
    println!("Job: {}", job.id());
    println!("Status: {}", job.status());
    println!("Range: {}", job.range());
    println!(
        "Entries: {}/{} archived",
        job.entries_written(),
        job.entries_total()
    );
    if let Some(elapsed) = job.elapsed() {
        println!("Elapsed: {:.2}s", elapsed.num_milliseconds() as f64 / 1000.0);
    }
}

/// Prints one line per entry.
pub(crate) fn print_entries(entries: &[SourceEntry]) {
    for entry in entries {
        println!(
            "{:>8}  {}  {:<24}  {}",
            entry.id,
            entry.date_time.format("%Y-%m-%d %H:%M:%S"),
            entry.name,
            entry.file_path.display()
        );
    }
}
