//! Benchmark utilities for chronarc.
//!
//! Generates a directory of synthetic captures and packs it with
//! [`PackEngine`] at different settings.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use chronarc_lib::{LocalStore, PackConfig, PackEngine, SourceEntry};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// A temporary directory of synthetic source files and their catalog entries.
#[derive(Debug)]
pub struct Fixture {
    dir: TempDir,
    entries: Vec<SourceEntry>,
    total_bytes: u64,
}

impl Fixture {
    /// Writes `count` files of `bytes_per_file` bytes, one capture per minute
    /// starting 2024-01-01 00:00.
    ///
    /// File content is pseudo-random so deflate does real work.
    ///
    /// # Errors
    ///
    /// Returns an error if the files cannot be written.
    pub fn generate(count: usize, bytes_per_file: usize) -> io::Result<Self> {
        let dir = TempDir::new()?;
        let source_dir = dir.path().join("src");
        std::fs::create_dir_all(&source_dir)?;

        let mut seed = 0x9E37_79B9_7F4A_7C15_u64;
        let mut entries = Vec::with_capacity(count);
        for i in 0..count {
            let path = source_dir.join(format!("capture-{i:06}.jpg"));
            std::fs::write(&path, noise(&mut seed, bytes_per_file))?;
            let stamp = epoch() + TimeDelta::minutes(i as i64);
            entries.push(SourceEntry::new(i as i64, format!("capture-{i}"), path, stamp));
        }

        Ok(Self {
            dir,
            entries,
            total_bytes: (count * bytes_per_file) as u64,
        })
    }

    /// Returns the catalog entries.
    pub fn entries(&self) -> &[SourceEntry] {
        &self.entries
    }

    /// Returns the total number of source bytes.
    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    /// Returns a path for an archive inside the fixture directory.
    pub fn archive_path(&self, name: &str) -> PathBuf {
        self.dir.path().join(format!("{name}.zip"))
    }
}

/// Result of a single benchmark run.
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    /// Concurrency the engine ran with.
    pub concurrency: usize,
    /// Number of entries written.
    pub entries: usize,
    /// Duration of the run.
    pub duration: Duration,
    /// Uncompressed bytes archived.
    pub bytes_in: u64,
    /// Size of the archive.
    pub archive_bytes: u64,
    /// Whether every entry was written.
    pub success: bool,
    /// Error message if failed.
    pub error: Option<String>,
}

impl BenchmarkResult {
    /// Calculate input throughput in MB/s.
    pub fn throughput_mbps(&self) -> f64 {
        let bytes = self.bytes_in as f64;
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 {
            (bytes / 1_000_000.0) / secs
        } else {
            0.0
        }
    }

    /// Calculate entries per second.
    pub fn entries_per_sec(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 {
            self.entries as f64 / secs
        } else {
            0.0
        }
    }
}

/// Packs every fixture entry into one archive with `config`.
pub async fn run_pack(fixture: &Fixture, config: PackConfig, name: &str) -> BenchmarkResult {
    let concurrency = config.effective_concurrency();
    let engine = PackEngine::new(Arc::new(LocalStore::new()), config);
    let start = Instant::now();

    let result = engine
        .pack(fixture.entries().to_vec(), &fixture.archive_path(name))
        .await;
    let duration = start.elapsed();

    match result {
        Ok(report) => BenchmarkResult {
            concurrency,
            entries: report.written_count(),
            duration,
            bytes_in: report.bytes_in,
            archive_bytes: report.archive_bytes,
            success: report.is_clean(),
            error: report.failures.first().map(ToString::to_string),
        },
        Err(e) => BenchmarkResult {
            concurrency,
            entries: 0,
            duration,
            bytes_in: 0,
            archive_bytes: 0,
            success: false,
            error: Some(e.to_string()),
        },
    }
}

/// Format duration for display.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{secs:.2}s")
    } else {
        format!("{:.1}m", secs / 60.0)
    }
}

/// Format bytes for display.
pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}

fn epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// Xorshift bytes; half of each word is masked so the data stays compressible.
fn noise(state: &mut u64, len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(len);
    while out.len() < len {
        *state ^= *state << 13;
        *state ^= *state >> 7;
        *state ^= *state << 17;
        let word = (*state & 0x0F0F_0F0F_0F0F_0F0F).to_le_bytes();
        let take = (len - out.len()).min(word.len());
        out.extend_from_slice(&word[..take]);
    }
    out
}
