//! Verbatim text encoder.

use super::RecordEncoder;
use crate::io::Record;
use std::io::{self, Write};

/// Writes a scalar record exactly as given, without a terminator.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextEncoder;

impl RecordEncoder for TextEncoder {
    fn encode(&self, record: &Record, out: &mut dyn Write) -> io::Result<()> {
        match record {
            Record::Scalar(value) => out.write_all(value.as_bytes()),
            Record::Fields(_) => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "text content expects a scalar record, got a field list",
            )),
        }
    }
}
