use std::fmt;

/// Result type for turnscope-types and turnscope-engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types raised by the analysis core
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A configuration value is out of its domain (non-positive gap threshold,
    /// zero bin width, empty fraction-threshold set, ...)
    Configuration(String),

    /// A record cannot be placed on the time axis
    InvalidRecord { index: usize, reason: String },
}

impl Error {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Error::Configuration(msg.into())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            Error::InvalidRecord { index, reason } => {
                write!(f, "Invalid record at index {}: {}", index, reason)
            }
        }
    }
}

impl std::error::Error for Error {}
