//! # fileio
//!
//! Mode-aware file handles with pluggable record encoders, plus a row writer
//! that flushes a header and a body of CSV rows through a handle.
//!
//! ## Features
//!
//! - [`FileHandle`] bound to a path, an access [`Mode`] and a content type
//! - Content type selects a [`RecordEncoder`] from an extensible [`EncoderRegistry`]
//! - [`RowWriter`] for header-then-body CSV output
//! - Filesystem access through the [`FileSystem`] trait ([`LocalFs`], [`MemoryFs`])
//!
//! ## Example
//!
//! ```rust,no_run
//! use fileio::{FileHandle, Mode, RowWriter};
//!
//! # fn main() -> fileio::Result<()> {
//! let mut file = FileHandle::new("report.csv", Mode::Write, "csv");
//! file.open()?;
//!
//! RowWriter::new(&mut file)
//!     .set_header(["col1", "col2"])
//!     .set_body([["a", "b"], ["c, d", "e"]])
//!     .save()?;
//!
//! assert!(file.is_valid());
//! # Ok(())
//! # }
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

use thiserror::Error as ThisError;

pub mod config;
pub mod io;
pub mod observability;

pub use config::{FileIoConfig, LineTerminator, RowFormat};
pub use io::{
    EncoderRegistry, FileHandle, FileSystem, LocalFs, MemoryFs, Mode, ROW_CONTENT_TYPE, Record,
    RecordEncoder, RowEncoder, RowWriter, TextEncoder,
};

/// Error type for fileio operations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `ReadOnly` | Writing through a handle whose mode or path forbids it |
/// | `OpenFailed` | The filesystem cannot hand out a descriptor |
/// | `ReadFailed` | Whole-file reads fail (missing path, permissions) |
/// | `NotOpen` | Writing through a writable handle that was never opened |
/// | `WriteFailed` | The encoder rejects a record shape, or the descriptor fails |
/// | `PartialWrite` | A record inside a multi-record write fails |
/// | `InvalidInput` | A config value is malformed (e.g. a multi-byte delimiter) |
/// | `OperationFailed` | Config loading or logging setup fails |
#[derive(Debug, ThisError)]
pub enum Error {
    /// The handle is not writable.
    ///
    /// No I/O is performed when this is raised.
    #[error("attempted to write to a read only file: {path}")]
    ReadOnly {
        /// Path of the handle.
        path: String,
    },

    /// A descriptor could not be acquired.
    #[error("failed to open '{path}': {cause}")]
    OpenFailed {
        /// Path that was being opened.
        path: String,
        /// The underlying cause.
        cause: String,
    },

    /// The file contents could not be read.
    #[error("failed to read '{path}': {cause}")]
    ReadFailed {
        /// Path that was being read.
        path: String,
        /// The underlying cause.
        cause: String,
    },

    /// Write attempted without an open descriptor.
    #[error("file is not open: {path}")]
    NotOpen {
        /// Path of the handle.
        path: String,
    },

    /// A single record write failed.
    #[error("failed to write to '{path}': {cause}")]
    WriteFailed {
        /// Path of the handle.
        path: String,
        /// The underlying cause.
        cause: String,
    },

    /// A multi-record write stopped at the first failing record.
    ///
    /// Records before the failing one were written and are not rolled back.
    #[error("write stopped after {written} record(s): {source}")]
    PartialWrite {
        /// Number of records fully written before the failure.
        written: usize,
        /// The error raised by the failing record.
        #[source]
        source: Box<Self>,
    },

    /// A config value was malformed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

/// Result type alias for fileio operations.
pub type Result<T> = std::result::Result<T, Error>;
