// src/output/mod.rs

//! Output sinks beyond the console: local files, files on a storage
//! backend, and a multiplexer writing to several outputs at once.

pub mod file;
pub mod multiplexed;
pub mod native;
pub mod storage_file;

pub use file::{FileOutput, FileSink};
pub use multiplexed::MultiplexedOutput;
pub use native::{NativeFile, NativeFileOutput};
pub use storage_file::{StorageFile, StorageFileOutput};
