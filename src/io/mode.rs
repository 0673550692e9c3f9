//! File access modes.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// How a [`FileHandle`](super::FileHandle) opens its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Open an existing file for reading. Never writable.
    #[default]
    Read,
    /// Create or truncate the file for writing.
    Write,
    /// Create the file if needed and write at its end.
    Append,
}

impl Mode {
    /// Returns all modes.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Read, Self::Write, Self::Append]
    }

    /// Parses a mode name case-insensitively.
    ///
    /// Anything other than `"write"` or `"append"` is `Read`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "write" => Self::Write,
            "append" => Self::Append,
            _ => Self::Read,
        }
    }

    /// Returns the mode name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Append => "append",
        }
    }

    /// Returns true if handles in this mode may write.
    #[must_use]
    pub const fn permits_write(&self) -> bool {
        !matches!(self, Self::Read)
    }
}

impl FromStr for Mode {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for Mode {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("read", Mode::Read ; "read")]
    #[test_case("write", Mode::Write ; "write")]
    #[test_case("append", Mode::Append ; "append")]
    #[test_case("APPEND", Mode::Append ; "uppercase")]
    #[test_case(" write ", Mode::Write ; "padded")]
    #[test_case("w", Mode::Read ; "short name")]
    #[test_case("", Mode::Read ; "empty")]
    #[test_case("readwrite", Mode::Read ; "unknown")]
    fn test_parse(input: &str, expected: Mode) {
        assert_eq!(Mode::parse(input), expected);
    }

    #[test]
    fn test_as_str_roundtrips() {
        for mode in Mode::all() {
            assert_eq!(Mode::parse(mode.as_str()), *mode);
            assert_eq!(mode.to_string(), mode.as_str());
        }
    }

    #[test]
    fn test_permits_write() {
        assert!(!Mode::Read.permits_write());
        assert!(Mode::Write.permits_write());
        assert!(Mode::Append.permits_write());
    }

    #[test]
    fn test_from_str() {
        let mode: Mode = "append".parse().unwrap_or_default();
        assert_eq!(mode, Mode::Append);
        assert_eq!(Mode::default(), Mode::Read);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Mode::from("Write"), Mode::Write);
        assert_eq!(Mode::from("bogus"), Mode::Read);
    }
}
