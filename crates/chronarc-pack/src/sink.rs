//! Single-writer ZIP container.

use parking_lot::Mutex;
use std::fs::File;
use std::io::{Seek, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::PackError;

/// Totals of a finalized archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkSummary {
    /// Number of entries written.
    pub entries: usize,
    /// Number of uncompressed bytes written across all entries.
    pub bytes_in: u64,
    /// Size of the finalized archive file.
    pub archive_bytes: u64,
}

struct SinkState<W: Write + Seek> {
    /// `None` once the archive has been finalized.
    writer: Option<ZipWriter<W>>,
    entries: usize,
    bytes_in: u64,
}

/// A ZIP archive that accepts entries from many tasks, one at a time.
///
/// The container format has no support for concurrent entry writes, so the
/// writer lives behind a single mutex: each [`add_entry`](Self::add_entry)
/// call starts the entry and copies all of its bytes while holding the lock.
/// All methods block and are meant to run on a blocking thread.
pub struct ZipSink<W: Write + Seek = File> {
    path: PathBuf,
    options: SimpleFileOptions,
    state: Mutex<SinkState<W>>,
}

impl<W: Write + Seek> std::fmt::Debug for ZipSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZipSink")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl ZipSink<File> {
    /// Creates a new, empty archive at `path`, truncating any existing file.
    ///
    /// `compression_level` 0 stores entries uncompressed; 1-9 deflates them.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created.
    pub fn create(path: impl AsRef<Path>, compression_level: u8) -> Result<Self, PackError> {
        let path = path.as_ref().to_path_buf();

        let file = File::create(&path).map_err(|e| PackError::CreateSink {
            path: path.clone(),
            source: e,
        })?;

        Ok(Self::new(path, file, compression_level))
    }
}

impl<W: Write + Seek> ZipSink<W> {
    fn new(path: PathBuf, writer: W, compression_level: u8) -> Self {
        let options = if compression_level == 0 {
            SimpleFileOptions::default().compression_method(CompressionMethod::Stored)
        } else {
            SimpleFileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .compression_level(Some(i64::from(compression_level.min(9))))
        };

        Self {
            path,
            options,
            state: Mutex::new(SinkState {
                writer: Some(ZipWriter::new(writer)),
                entries: 0,
                bytes_in: 0,
            }),
        }
    }

    /// Returns the archive path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Adds one entry named `name` containing `data`.
    ///
    /// An entry whose bytes cannot be written is dropped from the archive,
    /// which stays open for further entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive is closed or the entry cannot be written.
    pub fn add_entry(&self, name: &str, data: &[u8]) -> Result<(), PackError> {
        let mut state = self.state.lock();

        let writer = state
            .writer
            .as_mut()
            .ok_or_else(|| PackError::SinkClosed(self.path.clone()))?;

        writer
            .start_file(name, self.options)
            .map_err(|e| PackError::WriteEntry {
                name: name.to_string(),
                source: e,
            })?;

        if let Err(e) = writer.write_all(data) {
            // The writer may already have discarded the entry itself.
            if writer.is_writing_file()
                && let Err(abort) = writer.abort_file()
            {
                tracing::warn!(entry = name, error = %abort, "Could not discard partial entry");
            }
            return Err(PackError::WriteEntry {
                name: name.to_string(),
                source: e.into(),
            });
        }

        state.entries += 1;
        state.bytes_in += data.len() as u64;
        Ok(())
    }

    /// Returns the number of entries written so far.
    #[must_use]
    pub fn entries(&self) -> usize {
        self.state.lock().entries
    }

    /// Writes the central directory and closes the archive.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive was already closed or cannot be finalized.
    pub fn finish(&self) -> Result<SinkSummary, PackError> {
        let mut state = self.state.lock();

        let writer = state
            .writer
            .take()
            .ok_or_else(|| PackError::SinkClosed(self.path.clone()))?;

        let mut inner = writer.finish().map_err(|e| PackError::Finish {
            path: self.path.clone(),
            source: e,
        })?;

        let archive_bytes = inner.stream_position().unwrap_or(0);

        Ok(SinkSummary {
            entries: state.entries,
            bytes_in: state.bytes_in,
            archive_bytes,
        })
    }
}
