// src/output/storage_file.rs

//! Output into a file on an abstract [`Storage`] backend.
//!
//! Backends cannot be appended to incrementally, so the content is kept in
//! an anonymous temporary file and the whole buffer is streamed to the
//! backend on every flush.

use std::fs::File;
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::errors::{AdditionsError, Result};
use crate::output::file::{FileOutput, FileSink};
use crate::storage::Storage;
use crate::types::WriteMode;

#[derive(Debug)]
pub struct StorageFile {
    storage: Arc<dyn Storage>,
    path: PathBuf,
    buffer: File,
}

impl StorageFile {
    /// In `Append` mode the existing content of `path` seeds the buffer.
    /// In `Reset` mode an existing file is emptied right away.
    pub fn open(storage: Arc<dyn Storage>, path: impl AsRef<Path>, mode: WriteMode) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let open_error = |reason: String| AdditionsError::FileOpen {
            path: path.display().to_string(),
            reason,
        };

        let mut buffer = tempfile::tempfile().map_err(|e| open_error(e.to_string()))?;

        if storage.exists(&path) {
            match mode {
                WriteMode::Append => {
                    let existing = storage.read(&path).map_err(|e| open_error(format!("{e:#}")))?;
                    buffer.write_all(&existing)?;
                    debug!(path = %path.display(), bytes = existing.len(), "seeded storage buffer");
                }
                WriteMode::Reset => {
                    storage.write(&path, &[]).map_err(|e| open_error(format!("{e:#}")))?;
                }
            }
        }

        Ok(Self {
            storage,
            path,
            buffer,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }
}

impl FileSink for StorageFile {
    fn target(&self) -> String {
        self.path.display().to_string()
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.buffer.write_all(bytes)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.buffer.flush()?;
        self.buffer.seek(SeekFrom::Start(0))?;
        let pushed = self.storage.write_stream(&self.path, &mut self.buffer);
        // Later writes must append even when the push failed.
        self.buffer.seek(SeekFrom::End(0))?;
        pushed.map_err(|e| AdditionsError::FileOpen {
            path: self.path.display().to_string(),
            reason: format!("{e:#}"),
        })
    }
}

/// Output writing to a file on a [`Storage`] backend.
pub type StorageFileOutput = FileOutput<StorageFile>;

impl FileOutput<StorageFile> {
    pub fn new(storage: Arc<dyn Storage>, path: impl AsRef<Path>, mode: WriteMode) -> Result<Self> {
        Ok(Self::from_sink(StorageFile::open(storage, path, mode)?, mode))
    }

    pub fn path(&self) -> &Path {
        self.sink().path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::output::Output;
    use crate::storage::memory::MemoryStorage;
    use crate::types::Verbosity;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Delegates to a memory storage but fails the `fail_on`-th stream
    /// write before consuming anything.
    #[derive(Debug)]
    struct FlakyStorage {
        inner: MemoryStorage,
        fail_on: usize,
        streams: AtomicUsize,
    }

    impl Storage for FlakyStorage {
        fn read(&self, path: &Path) -> anyhow::Result<Vec<u8>> {
            self.inner.read(path)
        }

        fn write(&self, path: &Path, contents: &[u8]) -> anyhow::Result<()> {
            self.inner.write(path, contents)
        }

        fn write_stream(&self, path: &Path, contents: &mut dyn std::io::Read) -> anyhow::Result<()> {
            if self.streams.fetch_add(1, Ordering::SeqCst) + 1 == self.fail_on {
                anyhow::bail!("backend unavailable");
            }
            self.inner.write_stream(path, contents)
        }

        fn exists(&self, path: &Path) -> bool {
            self.inner.exists(path)
        }
    }

    fn storage() -> (MemoryStorage, Arc<dyn Storage>) {
        let mem = MemoryStorage::new();
        let shared: Arc<dyn Storage> = Arc::new(mem.clone());
        (mem, shared)
    }

    #[test]
    fn writes_reach_the_backend() {
        let (mem, shared) = storage();
        let mut out = StorageFileOutput::new(shared, "testfile.log", WriteMode::Append).unwrap();
        out.write("message", false, Verbosity::Normal).unwrap();
        assert_eq!(mem.contents("testfile.log").as_deref(), Some("message"));
        assert_eq!(out.path(), Path::new("testfile.log"));
    }

    #[test]
    fn append_keeps_existing_content() {
        let (mem, shared) = storage();
        mem.add_file("testfile.log", "message1");

        let mut out = StorageFileOutput::new(shared, "testfile.log", WriteMode::Append).unwrap();
        out.write("message2", false, Verbosity::Normal).unwrap();
        assert_eq!(mem.contents("testfile.log").as_deref(), Some("message1message2"));
    }

    #[test]
    fn reset_discards_existing_content() {
        let (mem, shared) = storage();
        mem.add_file("testfile.log", "message1");

        let mut out = StorageFileOutput::new(shared, "testfile.log", WriteMode::Reset).unwrap();
        assert_eq!(mem.contents("testfile.log").as_deref(), Some(""));
        out.write("message2", false, Verbosity::Normal).unwrap();
        assert_eq!(mem.contents("testfile.log").as_deref(), Some("message2"));
    }

    #[test]
    fn debounce_limits_backend_writes() {
        let (mem, shared) = storage();
        let mut out = StorageFileOutput::new(shared, "debounced.log", WriteMode::Append).unwrap();
        out.set_debounce_millis(60_000);

        for i in 0..5 {
            out.writeln(&format!("line {i}"), Verbosity::Normal).unwrap();
        }
        assert_eq!(mem.write_count(), 0);

        drop(out);
        assert_eq!(mem.write_count(), 1);
        assert_eq!(
            mem.contents("debounced.log").as_deref(),
            Some("line 0\nline 1\nline 2\nline 3\nline 4\n")
        );
    }

    #[test]
    fn failed_push_does_not_rewind_the_buffer() {
        let mem = MemoryStorage::new();
        let flaky: Arc<dyn Storage> = Arc::new(FlakyStorage {
            inner: mem.clone(),
            fail_on: 2,
            streams: AtomicUsize::new(0),
        });
        let mut out = StorageFileOutput::new(flaky, "flaky.log", WriteMode::Append).unwrap();

        out.write("message1", false, Verbosity::Normal).unwrap();
        let err = out.write("message2", false, Verbosity::Normal).unwrap_err();
        assert!(matches!(err, AdditionsError::FileOpen { .. }));
        assert_eq!(mem.contents("flaky.log").as_deref(), Some("message1"));

        out.write("XY", false, Verbosity::Normal).unwrap();
        assert_eq!(mem.contents("flaky.log").as_deref(), Some("message1message2XY"));
    }
}
