//! ar archive parsing.
//!
//! This module reads the common ar container used by Debian packages.
//!
//! ## Architecture
//!
//! - [`header`]: the signature and the fixed 60-byte member header
//! - [`chunk`]: exact-size sequential reads over a [`ReadAt`] source
//! - [`index`]: member decoding loop and the lazily built name index
//! - [`reader`]: [`ArchiveReader`], which owns the source and ties the rest together
//!
//! ## ar Format Overview
//!
//! An archive is the 8-byte signature `!<arch>\n` followed by members. Each
//! member is a 60-byte text header and `size` bytes of payload, padded with
//! a `\n` to an even length. Members are read front to back; there is no
//! central directory.
//!
//! ## Limitations
//!
//! - No BSD (`#1/len`) or GNU (`/offset`) long names; such members are rejected
//! - No write support
//! - Every payload is buffered in memory
//!
//! [`ReadAt`]: crate::io::ReadAt

pub mod chunk;
pub mod header;
pub mod index;
mod member;
mod options;
mod reader;

use std::path::Path;

pub use header::MemberHeader;
pub use index::{MemberIndex, Members};
pub use member::{Compression, Member};
pub use options::{ArchiveOptions, Compatibility, DEFAULT_BUFFER_SIZE, OpenMode};
pub use reader::{ArchiveReader, DEBIAN_BINARY};

use crate::error::Result;
use crate::io::LocalFileReader;

/// Open an archive on disk with a textual mode (`"r"` or `"w"`).
pub fn open(path: &Path, mode: &str, buffer_size: usize) -> Result<ArchiveReader<LocalFileReader>> {
    let options = ArchiveOptions::default()
        .with_mode(mode.parse()?)
        .with_buffer_size(buffer_size);
    ArchiveReader::open(path, options)
}
