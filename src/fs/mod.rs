// src/fs/mod.rs

use std::fmt::Debug;
use std::fs;
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};

pub mod mock;

/// Abstract filesystem interface used by the config serializer and the log
/// watcher.
pub trait FileSystem: Send + Sync + Debug {
    /// Create or truncate `path` and write `contents`.
    ///
    /// The parent directory must already exist; it is never created here.
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;

    fn is_dir(&self, path: &Path) -> bool;

    /// Read everything from byte `offset` to the current end of the file.
    ///
    /// Returns `Ok(None)` when the file does not exist (yet).
    fn read_from(&self, path: &Path, offset: u64) -> Result<Option<Vec<u8>>>;

    /// Current length of the file, or `None` if it does not exist.
    fn file_len(&self, path: &Path) -> Result<Option<u64>>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !self.is_dir(parent) {
                bail!("directory {:?} does not exist", parent);
            }
        }
        let mut file =
            fs::File::create(path).with_context(|| format!("creating file {:?}", path))?;
        file.write_all(contents)
            .with_context(|| format!("writing to file {:?}", path))?;
        file.sync_all()
            .with_context(|| format!("flushing file {:?}", path))?;
        Ok(())
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_from(&self, path: &Path, offset: u64) -> Result<Option<Vec<u8>>> {
        // Plain read-only open: shares the file with the writing process.
        let mut file = match fs::File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).with_context(|| format!("opening file {:?}", path)),
        };
        file.seek(SeekFrom::Start(offset))
            .with_context(|| format!("seeking to {offset} in {:?}", path))?;
        let mut buf = Vec::new();
        file.read_to_end(&mut buf)
            .with_context(|| format!("reading file {:?}", path))?;
        Ok(Some(buf))
    }

    fn file_len(&self, path: &Path) -> Result<Option<u64>> {
        match fs::metadata(path) {
            Ok(meta) => Ok(Some(meta.len())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("reading metadata of {:?}", path)),
        }
    }
}
