//! # runar
//!
//! A Rust reader for ar archives, the container format of Debian packages,
//! with HTTP URL support using Range requests.
//!
//! An archive is opened from a local file, a remote URL or any other
//! [`ReadAt`] source. The signature is validated up front and members are
//! decoded on first access into a name index that stays cached until it is
//! explicitly refreshed.
//!
//! ## Features
//!
//! - Read `.deb` packages and other common/GNU-style ar archives
//! - Read remote archives from HTTP/HTTPS URLs using Range requests
//! - Strict (padded, standard) and legacy (unpadded) member layouts
//! - Member payloads exposed as bytes or as a seekable reader
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use runar::{ArchiveOptions, ArchiveReader};
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut archive = ArchiveReader::open(Path::new("hello_1.0_all.deb"), ArchiveOptions::default())?;
//!
//!     for name in archive.list()? {
//!         println!("{}", name);
//!     }
//!
//!     if let Some(member) = archive.get("debian-binary")? {
//!         print!("{}", String::from_utf8_lossy(member.data()));
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod ar;
pub mod cli;
pub mod display;
pub mod error;
pub mod extract;
pub mod io;
pub mod select;

pub use ar::{
    ArchiveOptions, ArchiveReader, Compatibility, Compression, Member, MemberHeader, OpenMode,
};
pub use cli::Cli;
pub use error::{ArError, Result};
pub use io::{HttpRangeReader, LocalFileReader, MemoryReader, ReadAt};
