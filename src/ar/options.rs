use std::fmt;
use std::str::FromStr;

use crate::error::ArError;

/// Default read-ahead window size in bytes.
pub const DEFAULT_BUFFER_SIZE: usize = 10240;

/// How an archive is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenMode {
    #[default]
    Read,
    /// Accepted for parity with `open(path, "w")`; opening fails with
    /// [`ArError::Unsupported`].
    Write,
}

impl FromStr for OpenMode {
    type Err = ArError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "r" => Ok(OpenMode::Read),
            "w" => Ok(OpenMode::Write),
            other => Err(ArError::InvalidMode(other.to_string())),
        }
    }
}

impl fmt::Display for OpenMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpenMode::Read => write!(f, "r"),
            OpenMode::Write => write!(f, "w"),
        }
    }
}

/// Member layout policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compatibility {
    /// Standard ar layout: odd payloads are followed by one `\n` pad byte,
    /// header end markers are checked, and a partial trailing header is an
    /// error.
    #[default]
    Strict,
    /// Members are packed back to back with no padding, end markers are
    /// ignored, and any short header read ends the archive.
    Legacy,
}

impl Compatibility {
    /// Whether a pad byte follows each odd-sized payload.
    pub fn pads_odd_members(self) -> bool {
        self == Compatibility::Strict
    }

    /// Whether a header with a bad end marker is rejected.
    pub fn checks_terminator(self) -> bool {
        self == Compatibility::Strict
    }
}

/// Per-reader configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveOptions {
    pub mode: OpenMode,
    pub buffer_size: usize,
    pub compatibility: Compatibility,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self {
            mode: OpenMode::Read,
            buffer_size: DEFAULT_BUFFER_SIZE,
            compatibility: Compatibility::Strict,
        }
    }
}

impl ArchiveOptions {
    /// Set the open mode. [`OpenMode::Write`] makes every open fail.
    pub fn with_mode(mut self, mode: OpenMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the read-ahead window size in bytes. `0` reads straight from the
    /// source every time.
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// Set the member layout policy.
    pub fn with_compatibility(mut self, compatibility: Compatibility) -> Self {
        self.compatibility = compatibility;
        self
    }
}
