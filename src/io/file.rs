//! Mode-aware file handle.
//!
//! # Lifecycle
//!
//! | State | Entered by | Left by |
//! |-------|------------|---------|
//! | Closed | construction, [`close`](FileHandle::close) | [`open`](FileHandle::open) |
//! | Open | [`open`](FileHandle::open), [`append`](FileHandle::append) | [`close`](FileHandle::close), drop |
//!
//! At most one descriptor is alive per handle. Opening an open handle
//! releases the old descriptor first, and dropping a handle closes it.
//!
//! Errors are returned to the caller as-is; nothing here retries or logs them.

use crate::config::FileIoConfig;
use crate::io::formats::{EncoderRegistry, RecordEncoder, TEXT_CONTENT_TYPE};
use crate::io::fs::{FileSystem, LocalFs};
use crate::io::{Mode, Record};
use crate::{Error, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// A file bound to a path, an access mode and a content type.
pub struct FileHandle<F: FileSystem = LocalFs> {
    fs: F,
    path: PathBuf,
    mode: Mode,
    content_type: String,
    encoders: EncoderRegistry,
    descriptor: Option<F::Descriptor>,
}

impl FileHandle<LocalFs> {
    /// Creates a handle on the local filesystem. Nothing is opened yet.
    ///
    /// `mode` is a [`Mode`] or a mode name parsed with [`Mode::parse`].
    #[must_use]
    pub fn new(
        path: impl Into<PathBuf>,
        mode: impl Into<Mode>,
        content_type: impl Into<String>,
    ) -> Self {
        Self::with_fs(LocalFs, path, mode, content_type)
    }

    /// Creates a read-mode `"text"` handle on the local filesystem.
    #[must_use]
    pub fn for_path(path: impl Into<PathBuf>) -> Self {
        Self::new(path, Mode::Read, TEXT_CONTENT_TYPE)
    }

    /// Creates a local handle using the config's default mode, content type
    /// and row format.
    #[must_use]
    pub fn from_config(path: impl Into<PathBuf>, config: &FileIoConfig) -> Self {
        Self::new(
            path,
            config.default_mode,
            config.default_content_type.clone(),
        )
        .with_encoders(EncoderRegistry::with_row_format(config.row))
    }
}

impl<F: FileSystem> FileHandle<F> {
    /// Creates a handle on the given filesystem. Nothing is opened yet.
    #[must_use]
    pub fn with_fs(
        fs: F,
        path: impl Into<PathBuf>,
        mode: impl Into<Mode>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            fs,
            path: path.into(),
            mode: mode.into(),
            content_type: content_type.into(),
            encoders: EncoderRegistry::new(),
            descriptor: None,
        }
    }

    /// Replaces the encoder registry.
    #[must_use]
    pub fn with_encoders(mut self, encoders: EncoderRegistry) -> Self {
        self.encoders = encoders;
        self
    }

    /// Returns the path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rebinds the handle to another path, closing any open descriptor.
    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.close();
        self.path = path.into();
    }

    /// Returns the access mode.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Changes the access mode. Accepts a [`Mode`] or a mode name, so
    /// `set_mode("APPEND")` and `set_mode(Mode::Append)` are equivalent.
    ///
    /// An open descriptor keeps the mode it was opened with until the next
    /// [`open`](Self::open).
    pub fn set_mode(&mut self, mode: impl Into<Mode>) {
        self.mode = mode.into();
    }

    /// Returns the content type.
    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Changes the content type used by subsequent writes.
    pub fn set_content_type(&mut self, content_type: impl Into<String>) {
        self.content_type = content_type.into();
    }

    /// Returns the encoder selected by the current content type.
    #[must_use]
    pub fn encoder(&self) -> &dyn RecordEncoder {
        self.encoders.get(&self.content_type)
    }

    /// Returns the encoder registry.
    #[must_use]
    pub const fn encoders(&self) -> &EncoderRegistry {
        &self.encoders
    }

    /// Acquires a descriptor for the path according to the mode.
    ///
    /// Any descriptor from an earlier `open` is released first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OpenFailed`] if the filesystem refuses the path,
    /// e.g. a missing file in read mode.
    pub fn open(&mut self) -> Result<&mut Self> {
        self.close();

        let opened = match self.mode {
            Mode::Read => self.fs.open_for_read(&self.path),
            Mode::Write => self.fs.open_for_write(&self.path),
            Mode::Append => self.fs.open_for_append(&self.path),
        };
        let descriptor = opened.map_err(|e| Error::OpenFailed {
            path: self.path.display().to_string(),
            cause: e.to_string(),
        })?;

        debug!(path = %self.path.display(), mode = %self.mode, "opened file");
        self.descriptor = Some(descriptor);
        Ok(self)
    }

    /// Releases the descriptor. Does nothing if the handle is not open.
    pub fn close(&mut self) {
        if let Some(descriptor) = self.descriptor.take() {
            self.fs.close_descriptor(descriptor);
            debug!(path = %self.path.display(), "closed file");
        }
    }

    /// Reads the whole file, independent of whether this handle is open.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReadFailed`] if the path cannot be read.
    pub fn contents(&self) -> Result<String> {
        self.fs
            .read_all(&self.path)
            .map_err(|e| Error::ReadFailed {
                path: self.path.display().to_string(),
                cause: e.to_string(),
            })
    }

    /// Writes one record using the encoder for the content type.
    ///
    /// # Errors
    ///
    /// - [`Error::ReadOnly`] if the handle is not writable; nothing is written
    /// - [`Error::NotOpen`] if no descriptor is held
    /// - [`Error::WriteFailed`] if encoding or the descriptor fails
    pub fn write(&mut self, record: impl Into<Record>) -> Result<&mut Self> {
        self.ensure_writable()?;
        self.write_record(&record.into())?;
        Ok(self)
    }

    /// Writes records in order.
    ///
    /// Writability and the open descriptor are checked once up front, so a
    /// read-only or unopened handle writes nothing. After that the first
    /// failing record stops the call; records before it stay written.
    ///
    /// # Errors
    ///
    /// - [`Error::ReadOnly`] if the handle is not writable
    /// - [`Error::NotOpen`] if no descriptor is held
    /// - [`Error::PartialWrite`] wrapping the first record failure, with the
    ///   number of records written before it
    pub fn write_many<I, R>(&mut self, records: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = R>,
        R: Into<Record>,
    {
        self.ensure_writable()?;
        self.ensure_open()?;

        let mut written = 0;
        for record in records {
            self.write_record(&record.into())
                .map_err(|source| Error::PartialWrite {
                    written,
                    source: Box::new(source),
                })?;
            written += 1;
        }

        trace!(path = %self.path.display(), records = written, "wrote records");
        Ok(self)
    }

    /// Writes one record at the end of the file.
    ///
    /// A handle not already in append mode is closed, switched to
    /// [`Mode::Append`] and reopened first, so earlier content is kept.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OpenFailed`] if reopening fails, or any error of
    /// [`write`](Self::write).
    pub fn append(&mut self, record: impl Into<Record>) -> Result<&mut Self> {
        if self.mode != Mode::Append {
            debug!(path = %self.path.display(), from = %self.mode, "switching to append mode");
            self.close();
            self.mode = Mode::Append;
            self.open()?;
        }
        self.write(record)
    }

    /// Returns true if the file exists and is not empty.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.exists() && self.size() > 0
    }

    /// Returns true if the path exists.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.fs.exists(&self.path)
    }

    /// Returns the file size in bytes, or 0 if the path does not exist.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.fs.size(&self.path).unwrap_or(0)
    }

    /// Returns true if the mode permits writing and the path is writable.
    #[must_use]
    pub fn is_writable(&self) -> bool {
        self.mode.permits_write() && self.fs.is_writable(&self.path)
    }

    /// Returns true while a descriptor is held.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.descriptor.is_some()
    }

    fn ensure_writable(&self) -> Result<()> {
        if self.is_writable() {
            Ok(())
        } else {
            Err(Error::ReadOnly {
                path: self.path.display().to_string(),
            })
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(self.not_open())
        }
    }

    fn not_open(&self) -> Error {
        Error::NotOpen {
            path: self.path.display().to_string(),
        }
    }

    fn write_record(&mut self, record: &Record) -> Result<()> {
        let Some(descriptor) = self.descriptor.as_mut() else {
            return Err(self.not_open());
        };

        self.encoders
            .get(&self.content_type)
            .encode(record, descriptor)
            .map_err(|e| Error::WriteFailed {
                path: self.path.display().to_string(),
                cause: e.to_string(),
            })
    }
}

impl<F: FileSystem> Drop for FileHandle<F> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<F: FileSystem> fmt::Debug for FileHandle<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileHandle")
            .field("path", &self.path)
            .field("mode", &self.mode)
            .field("content_type", &self.content_type)
            .field("open", &self.is_open())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemoryFs;

    const START_TEXT: &str = "this is the contents of the file";

    fn setup() -> (MemoryFs, PathBuf) {
        let fs = MemoryFs::new();
        let path = PathBuf::from("fs/test.txt");
        fs.insert(&path, START_TEXT).unwrap();
        (fs, path)
    }

    #[test]
    fn test_new_does_not_open() {
        let (fs, path) = setup();
        let file = FileHandle::with_fs(fs, &path, Mode::Write, "text");

        assert!(!file.is_open());
        assert_eq!(file.path(), path.as_path());
        assert_eq!(file.mode(), Mode::Write);
        assert_eq!(file.content_type(), "text");
    }

    #[test]
    fn test_mode_names() {
        let (fs, path) = setup();
        let mut file = FileHandle::with_fs(fs, path, "Write", "text");
        assert_eq!(file.mode(), Mode::Write);

        file.set_mode("append");
        assert_eq!(file.mode(), Mode::Append);
        file.set_mode("unknown");
        assert_eq!(file.mode(), Mode::Read);
        file.set_mode(Mode::Write);
        assert_eq!(file.mode(), Mode::Write);
    }

    #[test]
    fn test_set_mode_applies_on_next_open() {
        let (fs, path) = setup();
        let mut file = FileHandle::with_fs(fs, path, Mode::Read, "text");
        file.open().unwrap();

        file.set_mode("write");
        assert!(file.is_open());
        file.open().unwrap().write("new").unwrap();
        assert_eq!(file.contents().unwrap(), "new");
    }

    #[test]
    fn test_open_existing_for_read() {
        let (fs, path) = setup();
        let mut file = FileHandle::with_fs(fs, path, Mode::Read, "text");

        file.open().unwrap();
        assert!(file.is_open());
        assert!(!file.is_writable());
    }

    #[test]
    fn test_open_creates_file_in_write_mode() {
        let fs = MemoryFs::new();
        let mut file = FileHandle::with_fs(fs, "fs/newfile.txt", Mode::Write, "text");

        file.open().unwrap();
        assert!(file.is_open());
        assert!(file.exists());
        assert!(file.is_writable());
        assert!(!file.is_valid());
    }

    #[test]
    fn test_open_missing_for_read_fails() {
        let fs = MemoryFs::new();
        let mut file = FileHandle::with_fs(fs, "fs/missing.txt", Mode::Read, "text");

        let err = file.open().unwrap_err();
        assert!(matches!(err, Error::OpenFailed { .. }));
        assert!(!file.is_open());
    }

    #[test]
    fn test_close_is_idempotent() {
        let (fs, path) = setup();
        let mut file = FileHandle::with_fs(fs, path, Mode::Read, "text");

        file.close();
        assert!(!file.is_open());

        file.open().unwrap();
        file.close();
        file.close();
        assert!(!file.is_open());
    }

    #[test]
    fn test_reopen_replaces_descriptor() {
        let (fs, path) = setup();
        let mut file = FileHandle::with_fs(fs, path, Mode::Append, "text");

        file.open().unwrap().open().unwrap().write("!").unwrap();
        assert_eq!(file.contents().unwrap(), format!("{START_TEXT}!"));
    }

    #[test]
    fn test_write_to_read_only_handle() {
        let (fs, path) = setup();
        let mut file = FileHandle::with_fs(fs.clone(), &path, Mode::Read, "text");
        file.open().unwrap();

        let err = file.write("hello").unwrap_err();
        assert!(matches!(err, Error::ReadOnly { .. }));
        assert_eq!(fs.read_all(&path).unwrap(), START_TEXT);
    }

    #[test]
    fn test_write_many_to_read_only_handle() {
        let (fs, path) = setup();
        let mut file = FileHandle::with_fs(fs.clone(), &path, Mode::Read, "text");
        file.open().unwrap();

        let err = file.write_many(["hello", "foo"]).unwrap_err();
        assert!(matches!(err, Error::ReadOnly { .. }));
        assert_eq!(fs.read_all(&path).unwrap(), START_TEXT);
    }

    #[test]
    fn test_write_to_read_only_path() {
        let (fs, path) = setup();
        let mut file = FileHandle::with_fs(fs.clone(), &path, Mode::Append, "text");
        file.open().unwrap();
        fs.set_read_only(&path, true).unwrap();

        assert!(!file.is_writable());
        assert!(matches!(
            file.write("x").unwrap_err(),
            Error::ReadOnly { .. }
        ));
    }

    #[test]
    fn test_write_without_open() {
        let (fs, path) = setup();
        let mut file = FileHandle::with_fs(fs, path, Mode::Append, "text");

        assert!(matches!(file.write("x").unwrap_err(), Error::NotOpen { .. }));
        assert_eq!(file.contents().unwrap(), START_TEXT);
    }

    #[test]
    fn test_write_many_without_open() {
        let (fs, path) = setup();
        let mut file = FileHandle::with_fs(fs, path, Mode::Write, "csv");
        assert!(file.is_writable());

        let err = file.write_many([["a", "b"], ["c", "d"]]).unwrap_err();
        assert!(matches!(err, Error::NotOpen { .. }), "got {err:?}");
        assert_eq!(file.contents().unwrap(), START_TEXT);
    }

    #[test]
    fn test_text_write_truncates() {
        let (fs, path) = setup();
        let mut file = FileHandle::with_fs(fs, path, Mode::Write, "text");

        file.open().unwrap().write("one two three").unwrap();
        assert_eq!(file.contents().unwrap(), "one two three");
    }

    #[test]
    fn test_fields_through_text_is_write_failed() {
        let (fs, path) = setup();
        let mut file = FileHandle::with_fs(fs, path, Mode::Append, "text");
        file.open().unwrap();

        let err = file.write(["a", "b"]).unwrap_err();
        assert!(matches!(err, Error::WriteFailed { .. }), "got {err:?}");
        assert_eq!(file.contents().unwrap(), START_TEXT);
    }

    #[test]
    fn test_unregistered_content_type_writes_verbatim() {
        let (fs, path) = setup();
        let mut file = FileHandle::with_fs(fs, path, Mode::Write, "txt");

        file.open().unwrap().write("a,b").unwrap();
        assert_eq!(file.contents().unwrap(), "a,b");
    }

    #[test]
    fn test_csv_write() {
        let fs = MemoryFs::new();
        let mut file = FileHandle::with_fs(fs, "fs/test.csv", Mode::Write, "csv");
        file.open().unwrap();
        assert!(file.is_writable());

        file.write(["one", "two", "three"]).unwrap();
        assert_eq!(file.contents().unwrap(), "one,two,three\n");
    }

    #[test]
    fn test_csv_write_many() {
        let fs = MemoryFs::new();
        let mut file = FileHandle::with_fs(fs, "fs/test2.csv", Mode::Write, "csv");
        file.open().unwrap();

        file.write_many([["one", "two", "three"], ["four", "five", "six"]])
            .unwrap();
        assert_eq!(
            file.contents().unwrap(),
            "one,two,three\nfour,five,six\n"
        );
    }

    #[test]
    fn test_write_many_stops_at_first_failure() {
        let fs = MemoryFs::new();
        let mut file = FileHandle::with_fs(fs, "fs/mixed.txt", Mode::Write, "text");
        file.open().unwrap();

        let records = vec![
            Record::from("a"),
            Record::from("b"),
            Record::from(["not", "scalar"]),
            Record::from("c"),
        ];
        let err = file.write_many(records).unwrap_err();

        match err {
            Error::PartialWrite { written, source } => {
                assert_eq!(written, 2);
                assert!(matches!(*source, Error::WriteFailed { .. }));
            },
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(file.contents().unwrap(), "ab");
    }

    #[test]
    fn test_append_to_append_handle() {
        let (fs, path) = setup();
        let mut file = FileHandle::with_fs(fs, path, Mode::Append, "text");

        file.open().unwrap().append("\nHello World\n").unwrap();
        assert_eq!(
            file.contents().unwrap(),
            format!("{START_TEXT}\nHello World\n")
        );
    }

    #[test]
    fn test_append_switches_mode_and_keeps_content() {
        let fs = MemoryFs::new();
        let mut file = FileHandle::with_fs(fs, "fs/log.txt", Mode::Write, "text");
        file.open().unwrap().write("start;").unwrap();

        file.append("x").unwrap();
        assert_eq!(file.mode(), Mode::Append);
        file.append("y").unwrap();

        assert!(file.is_open());
        assert_eq!(file.contents().unwrap(), "start;xy");
    }

    #[test]
    fn test_append_from_read_mode() {
        let (fs, path) = setup();
        let mut file = FileHandle::with_fs(fs, path, Mode::Read, "text");
        file.open().unwrap();

        file.append("!").unwrap();
        assert_eq!(file.mode(), Mode::Append);
        assert_eq!(file.contents().unwrap(), format!("{START_TEXT}!"));
    }

    #[test]
    fn test_is_valid() {
        let (fs, path) = setup();
        let file = FileHandle::with_fs(fs.clone(), &path, Mode::Read, "text");
        assert!(file.is_valid());
        assert_eq!(file.size(), START_TEXT.len() as u64);

        fs.insert(&path, "").unwrap();
        assert!(file.exists());
        assert!(!file.is_valid());

        let missing = FileHandle::with_fs(fs, "fs/none.txt", Mode::Read, "text");
        assert!(!missing.exists());
        assert_eq!(missing.size(), 0);
        assert!(!missing.is_valid());
    }

    #[test]
    fn test_contents_of_missing_file() {
        let fs = MemoryFs::new();
        let file = FileHandle::with_fs(fs, "fs/none.txt", Mode::Read, "text");
        assert!(matches!(
            file.contents().unwrap_err(),
            Error::ReadFailed { .. }
        ));
    }

    #[test]
    fn test_set_path_closes() {
        let (fs, path) = setup();
        let mut file = FileHandle::with_fs(fs, path, Mode::Read, "text");
        file.open().unwrap();

        file.set_path("fs/other.txt");
        assert!(!file.is_open());
        assert_eq!(file.path(), Path::new("fs/other.txt"));
    }

    #[test]
    fn test_set_content_type_changes_encoder() {
        let fs = MemoryFs::new();
        let mut file = FileHandle::with_fs(fs, "fs/switch.txt", Mode::Write, "text");
        file.open().unwrap().write("plain ").unwrap();

        file.set_content_type("csv");
        file.write(["a", "b"]).unwrap();
        assert_eq!(file.contents().unwrap(), "plain a,b\n");
    }

    #[test]
    fn test_drop_releases_descriptor() {
        let fs = MemoryFs::new();
        {
            let mut file = FileHandle::with_fs(fs.clone(), "fs/scoped.txt", Mode::Write, "text");
            file.open().unwrap().write("kept").unwrap();
        }
        assert_eq!(fs.read_all(Path::new("fs/scoped.txt")).unwrap(), "kept");
    }

    #[test]
    fn test_debug_output() {
        let file = FileHandle::with_fs(MemoryFs::new(), "a.csv", Mode::Append, "csv");
        let debug = format!("{file:?}");
        assert!(debug.contains("a.csv"));
        assert!(debug.contains("Append"));
        assert!(debug.contains("open: false"));
    }
}
