//! Archive command implementation.
//!
//! Dispatches one archive job, follows its progress, and reports the outcome.

use crate::display::{entry_progress, parse_range, print_job};
use anyhow::{Context, Result, bail};
use chronarc_lib::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Archive every catalog entry within `start..=end`.
#[allow(clippy::too_many_arguments)]
pub(crate) async fn archive(
    manifest: &Path,
    start: &str,
    end: &str,
    archive_dir: Option<PathBuf>,
    concurrency: usize,
    level: u8,
    skip_missing: bool,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let range = parse_range(start, end)?;

    let catalog = ManifestCatalog::load(manifest)
        .with_context(|| format!("Failed to load manifest {}", manifest.display()))?;
    tracing::info!(entries = catalog.len(), manifest = %manifest.display(), "Catalog loaded");

    let policy = if skip_missing {
        MissingSourcePolicy::Skip
    } else {
        MissingSourcePolicy::Fail
    };
    let pack = PackConfig::default()
        .with_concurrency(concurrency)
        .with_compression_level(level)
        .with_missing_source(policy);

    let mut config = ManagerConfig::default().with_pack(pack);
    if let Some(dir) = archive_dir {
        config = config.with_archive_dir(dir);
    }

    let manager = ArchiveManager::new(config, Arc::new(catalog), Arc::new(LocalStore::new()))
        .context("Failed to prepare archive directory")?;

    let id = manager
        .start_archive(range)
        .await
        .context("Failed to start archive job")?;

    let progress = entry_progress(quiet || json)?;
    progress.set_message(range.to_string());
    loop {
        let job = manager.job(id)?;
        progress.set_length(job.entries_total() as u64);
        progress.set_position(job.entries_written() as u64);
        if job.is_finished() {
            break;
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }

    let job = manager.wait(id).await?;
    progress.finish_with_message(job.status().to_string());

    if json {
        println!("{}", serde_json::to_string_pretty(&job)?);
    } else if !quiet {
        print_job(&job);
    }

    for warning in job.warnings() {
        eprintln!("Warning: {warning}");
    }

    match job.status() {
        JobStatus::Completed => {
            let path = manager.artifact_path(id)?;
            if !json {
                println!("Archive written to: {}", path.display());
            }
            Ok(())
        }
        status => {
            for error in job.errors() {
                eprintln!("Error: {error}");
            }
            bail!("Archive job {id} ended {status}")
        }
    }
}
