use std::{error::Error, fmt::Display};

/// Error taxonomy of the toolkit. Every operation returns either a value or
/// exactly one of these kinds; there are no partial results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaError {
    /// The record decoded, but `states` or `alphabet` is empty, or the JSON
    /// itself was malformed.
    InvalidAutomaton(String),
    /// An operation requires identical alphabets and the inputs disagree in
    /// length, order, or symbols.
    AlphabetMismatch(String),
    /// Too few inputs for an n-ary operation.
    Arity(String),
    /// A regular expression failed to parse.
    Parse(String),
    /// A referenced state or record does not exist.
    NotFound(String),
    /// A subordinate external tool exited non-zero or timed out.
    OperationFailed(String),
}

impl FaError {
    /// True for violations the caller is responsible for, as opposed to
    /// internal failures. Hosts map these to 400 vs 500.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, FaError::OperationFailed(_))
    }
}

impl Display for FaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FaError::InvalidAutomaton(msg) => write!(f, "invalid automaton: {}", msg),
            FaError::AlphabetMismatch(msg) => write!(f, "alphabet mismatch: {}", msg),
            FaError::Arity(msg) => write!(f, "arity error: {}", msg),
            FaError::Parse(msg) => write!(f, "parse error: {}", msg),
            FaError::NotFound(msg) => write!(f, "not found: {}", msg),
            FaError::OperationFailed(msg) => write!(f, "operation failed: {}", msg),
        }
    }
}

impl Error for FaError {}
