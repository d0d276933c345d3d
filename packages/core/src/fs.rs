//! Filesystem facade used by the durable store.
//!
//! The store only needs a handful of operations, so they sit behind a trait
//! and the store takes the implementation at construction time. Tests can
//! swap in [`MemoryFileSystem`] and never touch a disk.

#[cfg(any(test, feature = "test-utils"))]
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;
#[cfg(any(test, feature = "test-utils"))]
use std::path::PathBuf;
#[cfg(any(test, feature = "test-utils"))]
use std::sync::Mutex;

/// The file operations the durable store relies on.
pub trait FileSystem: Send + Sync {
    fn create_dir_if_missing(&self, dir: &Path) -> io::Result<()>;

    /// Names (not full paths) of the regular files directly inside `dir`.
    fn list_files(&self, dir: &Path) -> io::Result<Vec<String>>;

    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Create or overwrite the file at `path` with `contents`.
    fn write_string(&self, path: &Path, contents: &str) -> io::Result<()>;

    /// Remove the file at `path`; a missing file is not an error.
    fn remove_file_if_exists(&self, path: &Path) -> io::Result<()>;
}

/// [`FileSystem`] implementation over `std::fs`.
pub struct StdFileSystem;

impl FileSystem for StdFileSystem {
    fn create_dir_if_missing(&self, dir: &Path) -> io::Result<()> {
        fs::create_dir_all(dir)
    }

    fn list_files(&self, dir: &Path) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }
        Ok(names)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn write_string(&self, path: &Path, contents: &str) -> io::Result<()> {
        fs::write(path, contents)
    }

    fn remove_file_if_exists(&self, path: &Path) -> io::Result<()> {
        match fs::remove_file(path) {
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

/// In-memory [`FileSystem`] for tests.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Default)]
pub struct MemoryFileSystem {
    files: Mutex<BTreeMap<PathBuf, String>>,
}

#[cfg(any(test, feature = "test-utils"))]
impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every (path, contents) pair currently "on disk".
    pub fn snapshot(&self) -> BTreeMap<PathBuf, String> {
        self.files.lock().expect("filesystem lock poisoned").clone()
    }

    /// Seed a file before handing the filesystem to a store.
    pub fn seed(&self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        self.files
            .lock()
            .expect("filesystem lock poisoned")
            .insert(path.into(), contents.into());
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl FileSystem for MemoryFileSystem {
    fn create_dir_if_missing(&self, _dir: &Path) -> io::Result<()> {
        Ok(())
    }

    fn list_files(&self, dir: &Path) -> io::Result<Vec<String>> {
        let files = self.files.lock().expect("filesystem lock poisoned");
        Ok(files
            .keys()
            .filter(|path| path.parent() == Some(dir))
            .filter_map(|path| path.file_name())
            .filter_map(|name| name.to_str())
            .map(|name| name.to_string())
            .collect())
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let files = self.files.lock().expect("filesystem lock poisoned");
        files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{:?}", path)))
    }

    fn write_string(&self, path: &Path, contents: &str) -> io::Result<()> {
        let mut files = self.files.lock().expect("filesystem lock poisoned");
        files.insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn remove_file_if_exists(&self, path: &Path) -> io::Result<()> {
        let mut files = self.files.lock().expect("filesystem lock poisoned");
        files.remove(path);
        Ok(())
    }
}
