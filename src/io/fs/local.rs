//! `std::fs` backed filesystem.

use super::FileSystem;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

/// The local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    /// Creates a new local filesystem handle.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl FileSystem for LocalFs {
    type Descriptor = File;

    fn open_for_read(&self, path: &Path) -> io::Result<File> {
        File::open(path)
    }

    fn open_for_write(&self, path: &Path) -> io::Result<File> {
        File::create(path)
    }

    fn open_for_append(&self, path: &Path) -> io::Result<File> {
        OpenOptions::new().create(true).append(true).open(path)
    }

    fn read_all(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn size(&self, path: &Path) -> io::Result<u64> {
        fs::metadata(path).map(|m| m.len())
    }

    fn is_writable(&self, path: &Path) -> bool {
        fs::metadata(path).is_ok_and(|m| m.is_file()) && access_write(path)
    }
}

/// Asks the OS whether the calling process may write to `path`.
#[cfg(unix)]
fn access_write(path: &Path) -> bool {
    nix::unistd::access(path, nix::unistd::AccessFlags::W_OK).is_ok()
}

#[cfg(not(unix))]
fn access_write(path: &Path) -> bool {
    fs::metadata(path).is_ok_and(|m| !m.permissions().readonly())
}
