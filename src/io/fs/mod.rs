//! Filesystem access consumed by [`FileHandle`](super::FileHandle).
//!
//! A [`FileSystem`] hands out descriptors and answers path queries. Two
//! implementations are provided:
//!
//! | Backend | Storage | Use |
//! |---------|---------|-----|
//! | [`LocalFs`] | `std::fs` | Default for real files |
//! | [`MemoryFs`] | Shared in-process map | Tests and embedded callers |

mod local;
mod memory;

pub use local::LocalFs;
pub use memory::{MemoryDescriptor, MemoryFs};

use std::io::{self, Write};
use std::path::Path;

/// Operating-system file primitives.
///
/// Descriptors are released by handing them back to
/// [`close_descriptor`](Self::close_descriptor) or by dropping them.
pub trait FileSystem {
    /// Live handle to an open file.
    type Descriptor: Write;

    /// Opens an existing file for reading.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or cannot be opened.
    fn open_for_read(&self, path: &Path) -> io::Result<Self::Descriptor>;

    /// Creates or truncates a file for writing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or opened.
    fn open_for_write(&self, path: &Path) -> io::Result<Self::Descriptor>;

    /// Creates a file if needed and opens it for writing at its end.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or opened.
    fn open_for_append(&self, path: &Path) -> io::Result<Self::Descriptor>;

    /// Releases a descriptor.
    fn close_descriptor(&self, descriptor: Self::Descriptor) {
        drop(descriptor);
    }

    /// Reads the whole file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or not valid UTF-8.
    fn read_all(&self, path: &Path) -> io::Result<String>;

    /// Returns true if the path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Returns the file size in bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the path does not exist.
    fn size(&self, path: &Path) -> io::Result<u64>;

    /// Returns true if the path is an existing file that may be written.
    fn is_writable(&self, path: &Path) -> bool;
}
