use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LineNumber {
    One,
    Two,
}

impl fmt::Display for LineNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineNumber::One => f.write_str("line 1"),
            LineNumber::Two => f.write_str("line 2"),
        }
    }
}

/// A TLE that failed structural or integrity checks
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("Checksum mismatch on {line}: computed {computed}, found {found:?}")]
    Checksum {
        line: LineNumber,
        computed: u8,
        found: Option<char>,
    },
    #[error("Expected {expected} characters on {line}, found {found}")]
    Length {
        line: LineNumber,
        expected: usize,
        found: usize,
    },
    #[error("Malformed {line}: {reason}")]
    Structure { line: LineNumber, reason: String },
    #[error("Catalog number mismatch, line 1 has {line1} and line 2 has {line2}")]
    CatalogMismatch { line1: u32, line2: u32 },
}

impl FormatError {
    /// The offending line, when the error is confined to one
    pub fn line(&self) -> Option<LineNumber> {
        match self {
            FormatError::Checksum { line, .. }
            | FormatError::Length { line, .. }
            | FormatError::Structure { line, .. } => Some(*line),
            FormatError::CatalogMismatch { .. } => None,
        }
    }
}
