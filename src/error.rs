use thiserror::Error;

/// Errors produced while opening or reading an ar archive.
#[derive(Error, Debug)]
pub enum ArError {
    /// IO error from the underlying byte source
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote server refused or answered unexpectedly
    #[error("Remote error: {0}")]
    Remote(String),

    /// Bad signature, malformed header field or bad end marker
    #[error("Invalid archive format: {0}")]
    Format(String),

    /// The source ran out before a chunk could be filled
    #[error("Unexpected end of stream: wanted {wanted} bytes, {available} available")]
    EndOfStream { wanted: u64, available: u64 },

    /// A member's header or payload is cut short
    #[error("Truncated member {name:?}: expected {expected} bytes, got {actual}")]
    TruncatedMember {
        name: String,
        expected: u64,
        actual: u64,
    },

    /// Open mode string is neither read nor write
    #[error("Invalid open mode {0:?} (use \"r\" or \"w\")")]
    InvalidMode(String),

    /// Recognised but not implemented
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// Operation on a closed reader
    #[error("Invalid state: {0}")]
    InvalidState(&'static str),
}

impl ArError {
    pub(crate) fn format(msg: impl Into<String>) -> Self {
        ArError::Format(msg.into())
    }
}

/// Result type alias for archive operations
pub type Result<T> = std::result::Result<T, ArError>;
