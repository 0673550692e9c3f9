//! In-memory filesystem.
//!
//! Clones share the same storage, so a test can keep one clone to inspect
//! what a handle wrote through another.

use super::FileSystem;
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct MemoryFile {
    data: Vec<u8>,
    read_only: bool,
}

type Files = HashMap<PathBuf, MemoryFile>;

/// Filesystem kept in a shared in-process map.
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    files: Arc<Mutex<Files>>,
}

impl MemoryFs {
    /// Creates an empty filesystem.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates or replaces a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage lock is poisoned.
    pub fn insert(&self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> io::Result<()> {
        let mut files = lock(&self.files)?;
        let file = files.entry(path.into()).or_default();
        file.data = contents.into();
        Ok(())
    }

    /// Marks an existing file read-only (or writable again).
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the path does not exist.
    pub fn set_read_only(&self, path: &Path, read_only: bool) -> io::Result<()> {
        let mut files = lock(&self.files)?;
        let file = files.get_mut(path).ok_or_else(|| not_found(path))?;
        file.read_only = read_only;
        Ok(())
    }

    /// Returns the raw bytes of a file.
    #[must_use]
    pub fn bytes(&self, path: &Path) -> Option<Vec<u8>> {
        lock(&self.files)
            .ok()
            .and_then(|files| files.get(path).map(|f| f.data.clone()))
    }
}

impl FileSystem for MemoryFs {
    type Descriptor = MemoryDescriptor;

    fn open_for_read(&self, path: &Path) -> io::Result<MemoryDescriptor> {
        let files = lock(&self.files)?;
        if !files.contains_key(path) {
            return Err(not_found(path));
        }
        Ok(MemoryDescriptor::new(self, path, Access::Read))
    }

    fn open_for_write(&self, path: &Path) -> io::Result<MemoryDescriptor> {
        let mut files = lock(&self.files)?;
        let file = files.entry(path.to_path_buf()).or_default();
        if file.read_only {
            return Err(permission_denied(path));
        }
        file.data.clear();
        Ok(MemoryDescriptor::new(self, path, Access::Write { pos: 0 }))
    }

    fn open_for_append(&self, path: &Path) -> io::Result<MemoryDescriptor> {
        let mut files = lock(&self.files)?;
        let file = files.entry(path.to_path_buf()).or_default();
        if file.read_only {
            return Err(permission_denied(path));
        }
        Ok(MemoryDescriptor::new(self, path, Access::Append))
    }

    fn read_all(&self, path: &Path) -> io::Result<String> {
        let files = lock(&self.files)?;
        let file = files.get(path).ok_or_else(|| not_found(path))?;
        String::from_utf8(file.data.clone())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    fn exists(&self, path: &Path) -> bool {
        lock(&self.files).is_ok_and(|files| files.contains_key(path))
    }

    fn size(&self, path: &Path) -> io::Result<u64> {
        let files = lock(&self.files)?;
        let file = files.get(path).ok_or_else(|| not_found(path))?;
        Ok(file.data.len() as u64)
    }

    fn is_writable(&self, path: &Path) -> bool {
        lock(&self.files).is_ok_and(|files| files.get(path).is_some_and(|f| !f.read_only))
    }
}

#[derive(Debug, Clone, Copy)]
enum Access {
    Read,
    Write { pos: usize },
    Append,
}

/// Descriptor handed out by [`MemoryFs`].
#[derive(Debug)]
pub struct MemoryDescriptor {
    files: Arc<Mutex<Files>>,
    path: PathBuf,
    access: Access,
}

impl MemoryDescriptor {
    fn new(fs: &MemoryFs, path: &Path, access: Access) -> Self {
        Self {
            files: Arc::clone(&fs.files),
            path: path.to_path_buf(),
            access,
        }
    }
}

impl Write for MemoryDescriptor {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut files = lock(&self.files)?;
        let file = files
            .get_mut(&self.path)
            .ok_or_else(|| not_found(&self.path))?;

        match &mut self.access {
            Access::Read => {
                return Err(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    "descriptor opened for reading",
                ));
            },
            Access::Append => file.data.extend_from_slice(buf),
            Access::Write { pos } => {
                let end = *pos + buf.len();
                if file.data.len() < end {
                    file.data.resize(end, 0);
                }
                file.data[*pos..end].copy_from_slice(buf);
                *pos = end;
            },
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn lock(files: &Mutex<Files>) -> io::Result<MutexGuard<'_, Files>> {
    files.lock().map_err(|e| io::Error::other(e.to_string()))
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("{}: no such file", path.display()),
    )
}

fn permission_denied(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::PermissionDenied,
        format!("{}: read-only file", path.display()),
    )
}
