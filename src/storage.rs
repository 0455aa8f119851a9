//! Durable blob storage abstraction.
//!
//! Suggesters persist through a small [`Storage`] trait so the same save/load
//! path works against an in-memory map (tests) or a directory on disk.
//! Outputs are committed with [`StorageOutput::flush_and_sync`]; inputs are
//! plain readers that know their size.

pub mod file;
pub mod memory;
pub mod structured;

use std::fmt::Debug;
use std::io::{Read, Write};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::storage::file::{FileStorage, FileStorageConfig};
use crate::storage::memory::{MemoryStorage, MemoryStorageConfig};

/// A writable blob being created in a storage backend.
pub trait StorageOutput: Write + Send {
    /// Flush buffered bytes and make the blob durable.
    fn flush_and_sync(&mut self) -> Result<()>;
}

/// A readable blob opened from a storage backend.
pub trait StorageInput: Read + Send {
    /// Total size of the blob in bytes.
    fn size(&self) -> Result<u64>;
}

/// A named-blob storage backend.
pub trait Storage: Debug + Send + Sync {
    /// Create (or overwrite) a blob for writing.
    fn create_output(&self, name: &str) -> Result<Box<dyn StorageOutput>>;

    /// Open an existing blob for reading.
    fn open_input(&self, name: &str) -> Result<Box<dyn StorageInput>>;

    /// True if a blob with this name exists.
    fn file_exists(&self, name: &str) -> bool;

    /// Delete a blob; deleting a missing blob is not an error.
    fn delete_file(&self, name: &str) -> Result<()>;

    /// Rename a blob, replacing `to` if it exists. Backends make this the
    /// atomic commit point for rewritten blobs.
    fn rename_file(&self, from: &str, to: &str) -> Result<()>;

    /// List all blob names in this backend.
    fn list_files(&self) -> Result<Vec<String>>;
}

/// Declarative storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "options", rename_all = "snake_case")]
pub enum StorageConfig {
    /// In-memory storage; contents vanish with the process.
    Memory(MemoryStorageConfig),
    /// One file per blob under a root directory.
    File(FileStorageConfig),
}

/// Creates storage backends from their configuration.
pub struct StorageFactory;

impl StorageFactory {
    /// Create a storage backend.
    pub fn create(config: StorageConfig) -> Result<Arc<dyn Storage>> {
        match config {
            StorageConfig::Memory(c) => Ok(Arc::new(MemoryStorage::new(c))),
            StorageConfig::File(c) => Ok(Arc::new(FileStorage::new(c)?)),
        }
    }
}
