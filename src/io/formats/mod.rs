//! Record encoders keyed by content type.
//!
//! A handle's content type selects one [`RecordEncoder`] from an
//! [`EncoderRegistry`]. Unregistered content types use the registry's
//! fallback encoder.
//!
//! | Tag | Encoder | Output per record |
//! |-----|---------|-------------------|
//! | `text` | [`TextEncoder`] | Scalar verbatim, no terminator |
//! | `row`, `csv` | [`RowEncoder`] | Delimited fields, quoted on demand, one terminator |

pub mod row;
pub mod text;

pub use row::RowEncoder;
pub use text::TextEncoder;

use crate::config::RowFormat;
use crate::io::Record;
use std::collections::HashMap;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

/// Content type used by [`RowWriter`](crate::io::RowWriter).
pub const ROW_CONTENT_TYPE: &str = "row";
/// Alias of [`ROW_CONTENT_TYPE`].
pub const CSV_CONTENT_TYPE: &str = "csv";
/// Default content type.
pub const TEXT_CONTENT_TYPE: &str = "text";

/// Writes one record to a descriptor.
///
/// Implementations must not add anything beyond the encoding of the record
/// itself, so that N calls produce exactly N encoded records.
pub trait RecordEncoder: Send + Sync {
    /// Encodes `record` into `out`.
    ///
    /// # Errors
    ///
    /// Returns an error if the record shape is unsupported or `out` fails.
    fn encode(&self, record: &Record, out: &mut dyn Write) -> io::Result<()>;
}

/// Content type to encoder mapping.
///
/// Cheap to clone; encoders are shared.
#[derive(Clone)]
pub struct EncoderRegistry {
    encoders: HashMap<String, Arc<dyn RecordEncoder>>,
    fallback: Arc<dyn RecordEncoder>,
}

impl EncoderRegistry {
    /// Creates a registry with the built-in encoders.
    #[must_use]
    pub fn new() -> Self {
        Self::with_row_format(RowFormat::default())
    }

    /// Creates a registry with the built-in encoders, using `format` for rows.
    #[must_use]
    pub fn with_row_format(format: RowFormat) -> Self {
        let row: Arc<dyn RecordEncoder> = Arc::new(RowEncoder::new(format));
        let text: Arc<dyn RecordEncoder> = Arc::new(TextEncoder);

        let mut registry = Self::empty(Arc::clone(&text));
        registry.register_shared(TEXT_CONTENT_TYPE, text);
        registry.register_shared(ROW_CONTENT_TYPE, Arc::clone(&row));
        registry.register_shared(CSV_CONTENT_TYPE, row);
        registry
    }

    /// Creates a registry with no tags, resolving everything to `fallback`.
    #[must_use]
    pub fn empty(fallback: Arc<dyn RecordEncoder>) -> Self {
        Self {
            encoders: HashMap::new(),
            fallback,
        }
    }

    /// Registers (or replaces) the encoder for a content type.
    pub fn register<E>(&mut self, content_type: impl Into<String>, encoder: E) -> &mut Self
    where
        E: RecordEncoder + 'static,
    {
        self.register_shared(content_type, Arc::new(encoder))
    }

    /// Registers an already shared encoder.
    pub fn register_shared(
        &mut self,
        content_type: impl Into<String>,
        encoder: Arc<dyn RecordEncoder>,
    ) -> &mut Self {
        self.encoders.insert(content_type.into(), encoder);
        self
    }

    /// Returns the encoder for a content type, or the fallback.
    #[must_use]
    pub fn get(&self, content_type: &str) -> &dyn RecordEncoder {
        match self.encoders.get(content_type) {
            Some(encoder) => encoder.as_ref(),
            None => self.fallback.as_ref(),
        }
    }

    /// Returns true if the content type has its own encoder.
    #[must_use]
    pub fn contains(&self, content_type: &str) -> bool {
        self.encoders.contains_key(content_type)
    }

    /// Returns the registered content types, sorted.
    #[must_use]
    pub fn content_types(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.encoders.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }
}

impl Default for EncoderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EncoderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncoderRegistry")
            .field("content_types", &self.content_types())
            .finish_non_exhaustive()
    }
}
