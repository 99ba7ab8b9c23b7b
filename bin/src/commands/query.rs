//! Query command implementation.

use crate::display::{parse_range, print_entries};
use anyhow::{Context, Result};
use chronarc_lib::prelude::*;
use std::path::Path;

/// List catalog entries, all of them or those within `start..=end`.
pub(crate) async fn query(
    manifest: &Path,
    start: Option<&str>,
    end: Option<&str>,
    json: bool,
) -> Result<()> {
    let catalog = ManifestCatalog::load(manifest)
        .with_context(|| format!("Failed to load manifest {}", manifest.display()))?;

    let entries = match (start, end) {
        (Some(start), Some(end)) => {
            let range = parse_range(start, end)?;
            catalog.query_by_time_range(&range).await?
        }
        _ => {
            let mut all: Vec<SourceEntry> = catalog.all().cloned().collect();
            all.sort_by(|a, b| a.date_time.cmp(&b.date_time).then(a.id.cmp(&b.id)));
            all
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else if entries.is_empty() {
        println!("No entries found.");
    } else {
        print_entries(&entries);
        println!("\n{} entries", entries.len());
    }

    Ok(())
}
