//! Concurrent packaging pipeline.

use chronarc_catalog::SourceStore;
use chronarc_types::SourceEntry;
use futures::FutureExt;
use futures::stream::{self, StreamExt};
use std::panic::AssertUnwindSafe;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crate::{
    EntryFailure, FailureKind, MissingSourcePolicy, PackConfig, PackError, PackReport,
    PlannedEntry, ZipSink, panic_message, plan_entries,
};

/// Receives per-entry notifications while a batch is being packed.
///
/// Callbacks run on the packing tasks and must be cheap.
pub trait PackProgress: Send + Sync {
    /// Called after an entry has been written into the archive.
    fn entry_written(&self, _archive_name: &str) {}

    /// Called after an entry was skipped because its source is missing.
    fn entry_skipped(&self, _skipped: &EntryFailure) {}

    /// Called after an entry failed.
    fn entry_failed(&self, _failure: &EntryFailure) {}
}

impl PackProgress for () {}

enum EntryOutcome {
    Written(String),
    Skipped(EntryFailure),
    Failed(EntryFailure),
}

/// Packs source entries into a ZIP archive.
///
/// Existence checks and reads run concurrently, bounded by
/// [`PackConfig::concurrency`]; writes are serialized by the [`ZipSink`].
/// A failing entry never aborts the batch.
#[derive(Clone)]
pub struct PackEngine {
    store: Arc<dyn SourceStore>,
    config: PackConfig,
}

impl std::fmt::Debug for PackEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl PackEngine {
    /// Creates a new engine reading from `store`.
    #[must_use]
    pub fn new(store: Arc<dyn SourceStore>, config: PackConfig) -> Self {
        Self { store, config }
    }

    /// Returns the engine configuration.
    #[must_use]
    pub const fn config(&self) -> &PackConfig {
        &self.config
    }

    /// Packs `entries` into a fresh archive at `sink_path`.
    ///
    /// # Errors
    ///
    /// Returns an error only if the archive itself cannot be created or
    /// finalized. Per-entry failures are reported in the [`PackReport`].
    pub async fn pack(
        &self,
        entries: Vec<SourceEntry>,
        sink_path: &Path,
    ) -> Result<PackReport, PackError> {
        self.pack_with_progress(entries, sink_path, &()).await
    }

    /// Packs `entries` into a fresh archive at `sink_path`, reporting each
    /// entry's outcome to `progress`.
    ///
    /// # Errors
    ///
    /// Returns an error only if the archive itself cannot be created or
    /// finalized. Per-entry failures are reported in the [`PackReport`].
    pub async fn pack_with_progress<P: PackProgress + ?Sized>(
        &self,
        entries: Vec<SourceEntry>,
        sink_path: &Path,
        progress: &P,
    ) -> Result<PackReport, PackError> {
        let started = Instant::now();
        let candidates = entries.len();
        let plan = plan_entries(entries);

        let path = sink_path.to_path_buf();
        let level = self.config.compression_level;
        let sink =
            Arc::new(tokio::task::spawn_blocking(move || ZipSink::create(path, level)).await??);

        tracing::debug!(
            archive = %sink_path.display(),
            candidates,
            concurrency = self.config.effective_concurrency(),
            "Packing entries"
        );

        let outcomes: Vec<EntryOutcome> = stream::iter(plan)
            .map(|planned| self.guarded_entry(planned, Arc::clone(&sink), progress))
            .buffer_unordered(self.config.effective_concurrency())
            .collect()
            .await;

        let summary = tokio::task::spawn_blocking(move || sink.finish()).await??;

        let mut written = Vec::with_capacity(outcomes.len());
        let mut skipped = Vec::new();
        let mut failures = Vec::new();
        for outcome in outcomes {
            match outcome {
                EntryOutcome::Written(name) => written.push(name),
                EntryOutcome::Skipped(entry) => skipped.push(entry),
                EntryOutcome::Failed(failure) => failures.push(failure),
            }
        }
        written.sort();
        skipped.sort_by_key(|s: &EntryFailure| s.entry_id);
        failures.sort_by_key(|f: &EntryFailure| f.entry_id);

        let report = PackReport {
            archive_path: sink_path.to_path_buf(),
            candidates,
            written,
            skipped,
            failures,
            bytes_in: summary.bytes_in,
            archive_bytes: summary.archive_bytes,
            elapsed: started.elapsed(),
        };

        tracing::debug!(
            archive = %report.archive_path.display(),
            written = report.written.len(),
            skipped = report.skipped.len(),
            failed = report.failures.len(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "Packing finished"
        );

        Ok(report)
    }

    /// Runs [`pack_entry`](Self::pack_entry), turning a panic into a failure
    /// of that entry alone.
    async fn guarded_entry<P: PackProgress + ?Sized>(
        &self,
        planned: PlannedEntry,
        sink: Arc<ZipSink>,
        progress: &P,
    ) -> EntryOutcome {
        let entry = planned.entry.clone();
        let archive_name = planned.archive_name.clone();

        match AssertUnwindSafe(self.pack_entry(planned, sink, progress))
            .catch_unwind()
            .await
        {
            Ok(outcome) => outcome,
            Err(panic) => {
                let detail = format!("entry processing panicked: {}", panic_message(&*panic));
                failed(
                    progress,
                    failure(&entry, &archive_name, FailureKind::Panic, detail),
                )
            }
        }
    }

    /// Checks, reads, and writes a single entry. Never fails the batch.
    async fn pack_entry<P: PackProgress + ?Sized>(
        &self,
        planned: PlannedEntry,
        sink: Arc<ZipSink>,
        progress: &P,
    ) -> EntryOutcome {
        let PlannedEntry {
            entry,
            archive_name,
        } = planned;

        if !self.store.exists(entry.path()).await {
            let missing = failure(
                &entry,
                &archive_name,
                FailureKind::Missing,
                "source file does not exist",
            );
            return match self.config.missing_source {
                MissingSourcePolicy::Fail => failed(progress, missing),
                MissingSourcePolicy::Skip => {
                    tracing::debug!(
                        entry_id = entry.id,
                        path = %entry.file_path.display(),
                        "Skipping entry with missing source"
                    );
                    progress.entry_skipped(&missing);
                    EntryOutcome::Skipped(missing)
                }
            };
        }

        let data = match self.store.read(entry.path()).await {
            Ok(data) => data,
            Err(e) => {
                let detail = format!("failed to read source file: {e}");
                return failed(
                    progress,
                    failure(&entry, &archive_name, FailureKind::Read, detail),
                );
            }
        };

        let name = archive_name.clone();
        let written = tokio::task::spawn_blocking(move || sink.add_entry(&name, &data)).await;

        match written {
            Ok(Ok(())) => {
                progress.entry_written(&archive_name);
                EntryOutcome::Written(archive_name)
            }
            Ok(Err(e)) => failed(
                progress,
                failure(&entry, &archive_name, FailureKind::Write, e.to_string()),
            ),
            Err(e) => {
                let detail = format!("archive write task failed: {e}");
                failed(
                    progress,
                    failure(&entry, &archive_name, FailureKind::Write, detail),
                )
            }
        }
    }
}

fn failure(
    entry: &SourceEntry,
    archive_name: &str,
    kind: FailureKind,
    detail: impl Into<String>,
) -> EntryFailure {
    EntryFailure::new(
        entry.id,
        entry.file_path.clone(),
        archive_name.to_string(),
        kind,
        detail,
    )
}

fn failed<P: PackProgress + ?Sized>(progress: &P, failure: EntryFailure) -> EntryOutcome {
    tracing::warn!(
        entry_id = failure.entry_id,
        path = %failure.file_path.display(),
        kind = failure.kind.as_str(),
        "{}",
        failure.detail
    );
    progress.entry_failed(&failure);
    EntryOutcome::Failed(failure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use chrono::{NaiveDate, NaiveDateTime};
    use chronarc_catalog::LocalStore;
    use std::collections::BTreeSet;
    use std::fs::File;
    use std::io;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 4, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    /// Writes `count` source files and returns matching entries.
    fn seed(dir: &Path, count: usize) -> Vec<SourceEntry> {
        (0..count)
            .map(|i| {
                let path = dir.join(format!("img-{i}.jpg"));
                std::fs::write(&path, format!("image body {i}")).unwrap();
                let stamp = at(1 + (i as u32 % 28), 10, i as u32 % 60);
                SourceEntry::new(i as i64, format!("img-{i}"), path, stamp)
            })
            .collect()
    }

    fn archive_names(path: &Path) -> BTreeSet<String> {
        let archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
        archive.file_names().map(str::to_string).collect()
    }

    fn engine(config: PackConfig) -> PackEngine {
        PackEngine::new(Arc::new(LocalStore::new()), config)
    }

    /// Store whose reads fail for every path containing "corrupt".
    struct CorruptingStore;

    #[async_trait]
    impl SourceStore for CorruptingStore {
        async fn exists(&self, path: &Path) -> bool {
            LocalStore::new().exists(path).await
        }

        async fn read(&self, path: &Path) -> io::Result<Bytes> {
            if path.to_string_lossy().contains("corrupt") {
                return Err(io::Error::new(io::ErrorKind::InvalidData, "bad sector"));
            }
            LocalStore::new().read(path).await
        }
    }

    /// Store whose reads panic for every path containing "poison".
    struct PanickingStore;

    #[async_trait]
    impl SourceStore for PanickingStore {
        async fn exists(&self, path: &Path) -> bool {
            LocalStore::new().exists(path).await
        }

        async fn read(&self, path: &Path) -> io::Result<Bytes> {
            if path.to_string_lossy().contains("poison") {
                panic!("decoder blew up");
            }
            LocalStore::new().read(path).await
        }
    }

    #[derive(Default)]
    struct Counter {
        written: AtomicUsize,
        skipped: AtomicUsize,
        failed: AtomicUsize,
    }

    impl PackProgress for Counter {
        fn entry_written(&self, _archive_name: &str) {
            self.written.fetch_add(1, Ordering::SeqCst);
        }

        fn entry_skipped(&self, _skipped: &EntryFailure) {
            self.skipped.fetch_add(1, Ordering::SeqCst);
        }

        fn entry_failed(&self, _failure: &EntryFailure) {
            self.failed.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_no_entries_yields_empty_archive() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("job.zip");

        let report = engine(PackConfig::default())
            .pack(Vec::new(), &archive)
            .await
            .unwrap();

        assert!(report.is_clean());
        assert!(!report.archived_nothing());
        assert_eq!(report.candidates, 0);
        assert!(archive_names(&archive).is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_all_entries_written() {
        let temp_dir = TempDir::new().unwrap();
        let entries = seed(temp_dir.path(), 40);
        let archive = temp_dir.path().join("job.zip");

        let report = engine(PackConfig::default().with_concurrency(6))
            .pack(entries, &archive)
            .await
            .unwrap();

        assert!(report.is_clean());
        assert_eq!(report.written_count(), 40);
        assert_eq!(archive_names(&archive).len(), 40);
        assert!(report.bytes_in > 0);
    }

    #[tokio::test]
    async fn test_missing_source_fails_only_that_entry() {
        let temp_dir = TempDir::new().unwrap();
        let mut entries = seed(temp_dir.path(), 5);
        entries[2].file_path = temp_dir.path().join("vanished.jpg");
        let archive = temp_dir.path().join("job.zip");

        let report = engine(PackConfig::default())
            .pack(entries, &archive)
            .await
            .unwrap();

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].entry_id, 2);
        assert_eq!(report.failures[0].kind, FailureKind::Missing);
        assert!(report.failures[0].message().contains("vanished.jpg"));
        assert_eq!(archive_names(&archive).len(), 4);
    }

    #[tokio::test]
    async fn test_skip_policy_records_warning_instead() {
        let temp_dir = TempDir::new().unwrap();
        let mut entries = seed(temp_dir.path(), 3);
        entries[0].file_path = temp_dir.path().join("vanished.jpg");
        let archive = temp_dir.path().join("job.zip");
        let counter = Counter::default();

        let report = engine(PackConfig::default().with_missing_source(MissingSourcePolicy::Skip))
            .pack_with_progress(entries, &archive, &counter)
            .await
            .unwrap();

        assert!(report.is_clean());
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.written_count(), 2);
        assert_eq!(counter.skipped.load(Ordering::SeqCst), 1);
        assert_eq!(counter.written.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_partial_failures_are_isolated() {
        let temp_dir = TempDir::new().unwrap();
        let mut entries = seed(temp_dir.path(), 12);
        for idx in [1, 5, 9] {
            let corrupt = temp_dir.path().join(format!("corrupt-{idx}.jpg"));
            std::fs::write(&corrupt, b"unreadable").unwrap();
            entries[idx].file_path = corrupt;
        }
        let expected: BTreeSet<String> = plan_entries(entries.clone())
            .into_iter()
            .filter(|p| !p.entry.file_path.to_string_lossy().contains("corrupt"))
            .map(|p| p.archive_name)
            .collect();
        let archive = temp_dir.path().join("job.zip");
        let counter = Counter::default();

        let report = PackEngine::new(Arc::new(CorruptingStore), PackConfig::default())
            .pack_with_progress(entries, &archive, &counter)
            .await
            .unwrap();

        let failed_ids: Vec<i64> = report.failures.iter().map(|f| f.entry_id).collect();
        assert_eq!(failed_ids, vec![1, 5, 9]);
        assert!(report.failures.iter().all(|f| f.kind == FailureKind::Read));
        assert_eq!(archive_names(&archive), expected);
        assert_eq!(counter.failed.load(Ordering::SeqCst), 3);
        assert_eq!(counter.written.load(Ordering::SeqCst), 9);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_panicking_read_fails_only_that_entry() {
        let temp_dir = TempDir::new().unwrap();
        let mut entries = seed(temp_dir.path(), 5);
        let poisoned = temp_dir.path().join("poison-2.jpg");
        std::fs::write(&poisoned, b"x").unwrap();
        entries[2].file_path = poisoned;
        let archive = temp_dir.path().join("job.zip");
        let counter = Counter::default();

        let report = PackEngine::new(Arc::new(PanickingStore), PackConfig::default())
            .pack_with_progress(entries, &archive, &counter)
            .await
            .unwrap();

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].entry_id, 2);
        assert_eq!(report.failures[0].kind, FailureKind::Panic);
        assert!(report.failures[0].message().contains("decoder blew up"));
        assert_eq!(report.written_count(), 4);
        assert_eq!(archive_names(&archive).len(), 4);
        assert_eq!(counter.failed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_every_entry_missing_archives_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let entries = vec![
            SourceEntry::new(1, "a", temp_dir.path().join("a.jpg"), at(1, 8, 0)),
            SourceEntry::new(2, "b", temp_dir.path().join("b.jpg"), at(1, 9, 0)),
        ];
        let archive = temp_dir.path().join("job.zip");

        let report = engine(PackConfig::default().with_missing_source(MissingSourcePolicy::Skip))
            .pack(entries, &archive)
            .await
            .unwrap();

        assert!(report.is_clean());
        assert!(report.archived_nothing());
        assert!(archive.exists());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_naming_is_independent_of_concurrency() {
        let temp_dir = TempDir::new().unwrap();
        let mut entries = seed(temp_dir.path(), 20);
        for entry in &mut entries {
            entry.date_time = at(2, 14, 30);
        }

        let serial = temp_dir.path().join("serial.zip");
        let parallel = temp_dir.path().join("parallel.zip");
        engine(PackConfig::default().with_concurrency(1))
            .pack(entries.clone(), &serial)
            .await
            .unwrap();
        entries.reverse();
        engine(PackConfig::default().with_concurrency(16))
            .pack(entries, &parallel)
            .await
            .unwrap();

        let names = archive_names(&serial);
        assert_eq!(names.len(), 20);
        assert_eq!(names, archive_names(&parallel));
    }

    #[tokio::test]
    async fn test_unwritable_archive_path_is_job_level_error() {
        let temp_dir = TempDir::new().unwrap();
        let archive: PathBuf = temp_dir.path().join("no-such-dir").join("job.zip");

        let result = engine(PackConfig::default()).pack(Vec::new(), &archive).await;
        assert!(matches!(result, Err(PackError::CreateSink { .. })));
    }
}
