// src/fs/mock.rs

use super::FileSystem;
use anyhow::{Result, anyhow, bail};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File(Vec<u8>),
    Dir,
}

/// In-memory filesystem for tests.
///
/// Directories must be registered with [`MockFileSystem::add_dir`] before a
/// file can be written into them, mirroring the real implementation.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    files: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
    read_only_dirs: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut files = self.files.lock().unwrap();
        files.insert(path.as_ref().to_path_buf(), MockEntry::Dir);
    }

    /// Register a directory that exists but rejects writes.
    pub fn add_read_only_dir(&self, path: impl AsRef<Path>) {
        self.add_dir(&path);
        self.read_only_dirs
            .lock()
            .unwrap()
            .push(path.as_ref().to_path_buf());
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let mut files = self.files.lock().unwrap();
        files.insert(path.as_ref().to_path_buf(), MockEntry::File(content.into()));
    }

    /// Append to a file, creating it when missing.
    pub fn append(&self, path: impl AsRef<Path>, content: impl AsRef<[u8]>) {
        let mut files = self.files.lock().unwrap();
        let entry = files
            .entry(path.as_ref().to_path_buf())
            .or_insert_with(|| MockEntry::File(Vec::new()));
        if let MockEntry::File(bytes) = entry {
            bytes.extend_from_slice(content.as_ref());
        }
    }

    pub fn remove(&self, path: impl AsRef<Path>) {
        self.files.lock().unwrap().remove(path.as_ref());
    }

    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        self.files.lock().unwrap().contains_key(path.as_ref())
    }

    pub fn read_to_string(&self, path: impl AsRef<Path>) -> Result<String> {
        let path = path.as_ref();
        let files = self.files.lock().unwrap();
        match files.get(path) {
            Some(MockEntry::File(content)) => {
                String::from_utf8(content.clone()).map_err(|e| anyhow!("Invalid UTF-8: {}", e))
            }
            Some(MockEntry::Dir) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }
}

impl FileSystem for MockFileSystem {
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        let parent = path.parent().unwrap_or(Path::new(""));
        if !parent.as_os_str().is_empty() && !self.is_dir(parent) {
            bail!("directory {:?} does not exist", parent);
        }
        if self.read_only_dirs.lock().unwrap().iter().any(|d| d == parent) {
            bail!("permission denied writing {:?}", path);
        }
        self.add_file(path, contents);
        Ok(())
    }

    fn is_dir(&self, path: &Path) -> bool {
        let files = self.files.lock().unwrap();
        matches!(files.get(path), Some(MockEntry::Dir))
    }

    fn read_from(&self, path: &Path, offset: u64) -> Result<Option<Vec<u8>>> {
        let files = self.files.lock().unwrap();
        match files.get(path) {
            Some(MockEntry::File(content)) => {
                let start = (offset as usize).min(content.len());
                Ok(Some(content[start..].to_vec()))
            }
            Some(MockEntry::Dir) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Ok(None),
        }
    }

    fn file_len(&self, path: &Path) -> Result<Option<u64>> {
        let files = self.files.lock().unwrap();
        match files.get(path) {
            Some(MockEntry::File(content)) => Ok(Some(content.len() as u64)),
            Some(MockEntry::Dir) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Ok(None),
        }
    }
}
