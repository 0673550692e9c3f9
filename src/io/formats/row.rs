//! Delimited row encoder.
//!
//! Fields are joined with the delimiter and quoted only when they contain the
//! delimiter, the quote character, or a line break. Embedded quotes are
//! doubled. Every record ends with exactly one terminator; an empty field
//! list is just the terminator.

use super::RecordEncoder;
use crate::config::{LineTerminator, RowFormat};
use crate::io::Record;
use std::io::{self, Write};

/// Encodes records as CSV-style rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowEncoder {
    format: RowFormat,
}

impl RowEncoder {
    /// Creates a row encoder.
    #[must_use]
    pub const fn new(format: RowFormat) -> Self {
        Self { format }
    }

    /// Returns the row format.
    #[must_use]
    pub const fn format(&self) -> RowFormat {
        self.format
    }

    fn builder(&self) -> csv::WriterBuilder {
        let terminator = match self.format.terminator {
            LineTerminator::Lf => csv::Terminator::Any(b'\n'),
            LineTerminator::Crlf => csv::Terminator::CRLF,
        };

        let mut builder = csv::WriterBuilder::new();
        builder
            .has_headers(false)
            .flexible(true)
            .delimiter(self.format.delimiter)
            .quote(self.format.quote)
            .quote_style(csv::QuoteStyle::Necessary)
            .terminator(terminator);
        builder
    }
}

impl RecordEncoder for RowEncoder {
    fn encode(&self, record: &Record, out: &mut dyn Write) -> io::Result<()> {
        if let Record::Fields(fields) = record
            && fields.is_empty()
        {
            return out.write_all(self.format.terminator.as_str().as_bytes());
        }

        let mut writer = self.builder().from_writer(out);
        match record {
            Record::Scalar(value) => writer.write_record([value])?,
            Record::Fields(fields) => writer.write_record(fields)?,
        }

        writer.flush()
    }
}
