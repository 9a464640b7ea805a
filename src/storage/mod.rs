// src/storage/mod.rs

//! Pluggable storage backends for file outputs.
//!
//! A [`Storage`] stores whole files by path. `LocalStorage` maps paths into
//! a root directory on disk; [`memory::MemoryStorage`] keeps everything in
//! memory and is handy in tests.

use std::fmt::Debug;
use std::fs;
use std::io::Read;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result, bail};

pub mod memory;

pub use memory::MemoryStorage;

/// Abstract file store.
pub trait Storage: Send + Sync + Debug {
    fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// Create or replace the file at `path`.
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;

    /// Create or replace the file at `path` with everything `contents` yields.
    fn write_stream(&self, path: &Path, contents: &mut dyn Read) -> Result<()> {
        let mut buf = Vec::new();
        contents
            .read_to_end(&mut buf)
            .with_context(|| format!("reading stream for {:?}", path))?;
        self.write(path, &buf)
    }

    fn exists(&self, path: &Path) -> bool;
}

/// Storage rooted in a local directory.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `path` inside the root, refusing to escape it.
    fn resolve(&self, path: &Path) -> Result<PathBuf> {
        let mut resolved = self.root.clone();
        for component in path.components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir | Component::RootDir => {}
                Component::ParentDir | Component::Prefix(_) => {
                    bail!("path {:?} escapes the storage root", path)
                }
            }
        }
        Ok(resolved)
    }
}

impl Storage for LocalStorage {
    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        let full = self.resolve(path)?;
        fs::read(&full).with_context(|| format!("reading file {:?}", full))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        let full = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).with_context(|| format!("creating dir {:?}", parent))?;
        }
        fs::write(&full, contents).with_context(|| format!("writing to file {:?}", full))
    }

    fn write_stream(&self, path: &Path, contents: &mut dyn Read) -> Result<()> {
        let full = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).with_context(|| format!("creating dir {:?}", parent))?;
        }
        let mut file = fs::File::create(&full).with_context(|| format!("creating file {:?}", full))?;
        std::io::copy(contents, &mut file).with_context(|| format!("writing to file {:?}", full))?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).is_ok_and(|full| full.exists())
    }
}
