use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Symbol has no entry in the code table.
    MissingCode { symbol: char, position: usize },
    /// Decode cursor has no child for the digit at `position`.
    NoChild { position: usize },
    /// Input ended part-way down a code path.
    IncompleteCode { trailing: usize },
    /// Character other than `0`/`1` in a digit string.
    InvalidDigit { digit: char, position: usize },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::MissingCode { symbol, position } =>
                write!(f, "no code for symbol {:?} at position {}", symbol, position),
            CodecError::NoChild { position } =>
                write!(f, "malformed input: no tree branch for digit at position {}", position),
            CodecError::IncompleteCode { trailing } =>
                write!(f, "malformed input: {} trailing digits do not complete a code", trailing),
            CodecError::InvalidDigit { digit, position } =>
                write!(f, "invalid digit {:?} at position {}", digit, position),
        }
    }
}

impl std::error::Error for CodecError {}
