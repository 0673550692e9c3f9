//! Records passed to a single write call.

/// One unit handed to a single write.
///
/// The encoder selected by a handle's content type decides how a record is
/// laid out on disk: the text encoder writes a scalar verbatim, the row
/// encoder writes fields as one delimited line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    /// An opaque value.
    Scalar(String),
    /// An ordered sequence of fields.
    Fields(Vec<String>),
}

impl Record {
    /// Builds a field record from any iterable of string-like values.
    pub fn fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Fields(fields.into_iter().map(Into::into).collect())
    }

    /// Returns true for an empty scalar or a record with no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Scalar(value) => value.is_empty(),
            Self::Fields(fields) => fields.is_empty(),
        }
    }
}

impl From<String> for Record {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl From<&str> for Record {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<&String> for Record {
    fn from(value: &String) -> Self {
        Self::Scalar(value.clone())
    }
}

impl<S: Into<String>> From<Vec<S>> for Record {
    fn from(fields: Vec<S>) -> Self {
        Self::fields(fields)
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for Record {
    fn from(fields: [S; N]) -> Self {
        Self::fields(fields)
    }
}

impl<S: Clone + Into<String>> From<&[S]> for Record {
    fn from(fields: &[S]) -> Self {
        Self::fields(fields.iter().cloned())
    }
}
