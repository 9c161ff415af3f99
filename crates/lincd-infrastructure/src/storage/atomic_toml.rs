//! Atomic TOML snapshot files.
//!
//! A snapshot is read whole and written whole. Every write lands in a fresh
//! temporary file in the target's directory and is renamed over the target,
//! so readers see either the old or the new contents. Writers go through
//! [`AtomicTomlFile::update`], which holds an exclusive lock on a sidecar
//! `<name>.lock` file across the read-modify-write.

use lincd_core::LincdError;
use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File, Metadata, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tempfile::NamedTempFile;

/// Errors that can occur during atomic TOML operations.
#[derive(Debug)]
pub enum AtomicTomlError {
    /// File I/O error.
    IoError(std::io::Error),
    /// TOML deserialization error.
    TomlError(toml::de::Error),
    /// TOML serialization error.
    TomlSerError(toml::ser::Error),
    /// File locking error.
    LockError(String),
}

impl std::fmt::Display for AtomicTomlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AtomicTomlError::IoError(e) => write!(f, "I/O error: {}", e),
            AtomicTomlError::TomlError(e) => write!(f, "TOML parse error: {}", e),
            AtomicTomlError::TomlSerError(e) => write!(f, "TOML serialization error: {}", e),
            AtomicTomlError::LockError(e) => write!(f, "Lock error: {}", e),
        }
    }
}

impl std::error::Error for AtomicTomlError {}

impl From<std::io::Error> for AtomicTomlError {
    fn from(e: std::io::Error) -> Self {
        AtomicTomlError::IoError(e)
    }
}

impl From<toml::de::Error> for AtomicTomlError {
    fn from(e: toml::de::Error) -> Self {
        AtomicTomlError::TomlError(e)
    }
}

impl From<toml::ser::Error> for AtomicTomlError {
    fn from(e: toml::ser::Error) -> Self {
        AtomicTomlError::TomlSerError(e)
    }
}

/// A file the store cannot read is unavailable; anything else failed mid-query.
impl From<AtomicTomlError> for LincdError {
    fn from(e: AtomicTomlError) -> Self {
        match e {
            AtomicTomlError::IoError(_) | AtomicTomlError::LockError(_) => {
                LincdError::store_unavailable(e.to_string())
            }
            AtomicTomlError::TomlError(_) | AtomicTomlError::TomlSerError(_) => {
                LincdError::store_query(e.to_string())
            }
        }
    }
}

/// Identifies one committed version of a snapshot file.
///
/// Every commit renames a new file into place, so on unix the inode alone
/// changes per write; modification time and length cover other platforms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStamp {
    modified: Option<SystemTime>,
    len: u64,
    #[cfg(unix)]
    inode: u64,
}

impl FileStamp {
    fn of(meta: &Metadata) -> Self {
        #[cfg(unix)]
        use std::os::unix::fs::MetadataExt;

        Self {
            modified: meta.modified().ok(),
            len: meta.len(),
            #[cfg(unix)]
            inode: meta.ino(),
        }
    }
}

/// A handle to a TOML snapshot file.
///
/// Provides:
/// - **Atomicity**: each write goes to its own temp file, renamed over the target
/// - **Isolation**: `update` holds an exclusive `fs2` lock for its duration
/// - **Durability**: explicit fsync before rename
pub struct AtomicTomlFile<T> {
    path: PathBuf,
    _phantom: PhantomData<T>,
}

impl<T> Clone for AtomicTomlFile<T> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<T> AtomicTomlFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stamp of the file as it is now, or `None` if it does not exist.
    pub fn stamp(&self) -> Result<Option<FileStamp>, AtomicTomlError> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(Some(FileStamp::of(&meta))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Loads and deserializes the file.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: Successfully loaded and deserialized
    /// - `Ok(None)`: File doesn't exist or is blank
    /// - `Err`: Failed to read or parse the file
    pub fn load(&self) -> Result<Option<T>, AtomicTomlError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(toml::from_str(&content)?))
    }

    /// Loads the file together with the stamp it had before reading.
    ///
    /// A commit landing between the two makes the stamp older than the
    /// contents, never newer, so comparing stamps later can only cause an
    /// extra reload.
    pub fn load_stamped(&self) -> Result<(Option<T>, Option<FileStamp>), AtomicTomlError> {
        let stamp = self.stamp()?;
        let data = self.load()?;
        Ok((data, stamp))
    }

    /// Read-modify-write under an exclusive lock.
    ///
    /// `f` sees the current on-disk contents (or `default_value` when the
    /// file is missing). If it returns `Err`, nothing is written. On success
    /// the new contents are committed and returned alongside `f`'s result
    /// and the stamp of the committed file.
    pub fn update<F, R, E>(&self, default_value: T, f: F) -> Result<(R, T, FileStamp), E>
    where
        F: FnOnce(&mut T) -> Result<R, E>,
        E: From<AtomicTomlError>,
    {
        let _lock = FileLock::acquire(&self.path)?;

        let mut data = self.load()?.unwrap_or(default_value);
        let result = f(&mut data)?;
        let stamp = self.commit(&data)?;

        Ok((result, data, stamp))
    }

    /// Writes `data` to a fresh temp file, fsyncs it and renames it into place.
    fn commit(&self, data: &T) -> Result<FileStamp, AtomicTomlError> {
        let toml_string = toml::to_string_pretty(data)?;

        let dir = self.parent_dir();
        fs::create_dir_all(&dir)?;

        let mut tmp_file = NamedTempFile::new_in(&dir)?;
        tmp_file.write_all(toml_string.as_bytes())?;
        tmp_file.as_file().sync_all()?;
        let committed = tmp_file.persist(&self.path).map_err(|e| e.error)?;

        Ok(FileStamp::of(&committed.metadata()?))
    }

    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

/// Exclusive lock on `<file>.lock`, released on drop.
///
/// The lock file is never removed: a writer blocked on it must end up
/// holding the same file the next writer will try to lock.
struct FileLock {
    file: File,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self, AtomicTomlError> {
        use fs2::FileExt;

        let lock_path = path.with_extension("lock");
        if let Some(parent) = lock_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        file.lock_exclusive()
            .map_err(|e| AtomicTomlError::LockError(format!("Failed to acquire lock: {}", e)))?;

        Ok(FileLock { file })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        use fs2::FileExt;
        let _ = self.file.unlock();
    }
}
