//! Header-then-body row output through a [`FileHandle`].

use crate::Result;
use crate::io::formats::ROW_CONTENT_TYPE;
use crate::io::FileHandle;
use crate::io::fs::{FileSystem, LocalFs};

/// Accumulates a header row and body rows and flushes them through a handle.
///
/// Constructing a writer forces the handle's content type to
/// [`ROW_CONTENT_TYPE`]. The writer never opens or closes the handle; what
/// [`save`](Self::save) does to existing content depends on the handle's mode.
#[derive(Debug)]
pub struct RowWriter<'a, F: FileSystem = LocalFs> {
    handle: &'a mut FileHandle<F>,
    header: Vec<String>,
    body: Vec<Vec<String>>,
}

impl<'a, F: FileSystem> RowWriter<'a, F> {
    /// Wraps a handle, switching it to row encoding.
    pub fn new(handle: &'a mut FileHandle<F>) -> Self {
        handle.set_content_type(ROW_CONTENT_TYPE);
        Self {
            handle,
            header: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Returns the wrapped handle.
    #[must_use]
    pub fn handle(&self) -> &FileHandle<F> {
        &*self.handle
    }

    /// Sets the header row.
    pub fn set_header<I, S>(&mut self, header: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.header = header.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the header row.
    #[must_use]
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Sets the body rows. Rows may differ in length.
    pub fn set_body<I, R, S>(&mut self, rows: I) -> &mut Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.body = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        self
    }

    /// Returns the body rows.
    #[must_use]
    pub fn body(&self) -> &[Vec<String>] {
        &self.body
    }

    /// Writes the header as one row. Does nothing if the header is empty.
    ///
    /// # Errors
    ///
    /// Returns any error of [`FileHandle::write`].
    pub fn write_header(&mut self) -> Result<&mut Self> {
        if !self.header.is_empty() {
            self.handle.write(self.header.as_slice())?;
        }
        Ok(self)
    }

    /// Writes all body rows. Does nothing if the body is empty.
    ///
    /// # Errors
    ///
    /// Returns any error of [`FileHandle::write_many`].
    pub fn write_body(&mut self) -> Result<&mut Self> {
        if !self.body.is_empty() {
            self.handle.write_many(self.body.iter().map(Vec::as_slice))?;
        }
        Ok(self)
    }

    /// Writes the header, then the body.
    ///
    /// # Errors
    ///
    /// Returns the first error from [`write_header`](Self::write_header) or
    /// [`write_body`](Self::write_body); the body is not written if the
    /// header fails.
    pub fn save(&mut self) -> Result<&mut Self> {
        self.write_header()?;
        self.write_body()?;
        Ok(self)
    }
}
