//! File access subsystem.
//!
//! # Architecture
//!
//! - [`FileHandle`] owns a path, a [`Mode`], a content type and, while open,
//!   one descriptor from a [`FileSystem`]
//! - The content type picks a [`RecordEncoder`] from an [`EncoderRegistry`]
//! - [`RowWriter`] buffers a header and body and flushes them through a handle
//!
//! # Example
//!
//! ```rust
//! use fileio::{FileHandle, MemoryFs, Mode};
//!
//! # fn main() -> fileio::Result<()> {
//! let fs = MemoryFs::new();
//! let mut file = FileHandle::with_fs(fs.clone(), "notes.txt", Mode::Write, "text");
//! file.open()?.write("first")?;
//! file.append(" second")?;
//!
//! assert_eq!(file.contents()?, "first second");
//! assert_eq!(file.mode(), Mode::Append);
//! # Ok(())
//! # }
//! ```

pub mod file;
pub mod formats;
pub mod fs;
pub mod mode;
pub mod record;
pub mod row_writer;

pub use file::FileHandle;
pub use formats::{
    CSV_CONTENT_TYPE, EncoderRegistry, ROW_CONTENT_TYPE, RecordEncoder, RowEncoder,
    TEXT_CONTENT_TYPE, TextEncoder,
};
pub use fs::{FileSystem, LocalFs, MemoryDescriptor, MemoryFs};
pub use mode::Mode;
pub use record::Record;
pub use row_writer::RowWriter;
