use std::io::Cursor;
use std::time::SystemTime;

use super::header::MemberHeader;

/// Compression suggested by a member's file name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
    Xz,
    Zstd,
    Bzip2,
}

impl Compression {
    /// Guess from the file extension: `gz`, `xz`, `zst` or `bz2`.
    pub fn from_name(name: &str) -> Self {
        match name.rsplit_once('.').map(|(_, ext)| ext) {
            Some("gz") => Compression::Gzip,
            Some("xz") => Compression::Xz,
            Some("zst") => Compression::Zstd,
            Some("bz2") => Compression::Bzip2,
            _ => Compression::None,
        }
    }
}

/// One archive member: its header and an owned copy of its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    header: MemberHeader,
    data: Vec<u8>,
}

impl Member {
    /// Pair a decoded header with its payload.
    pub fn new(header: MemberHeader, data: Vec<u8>) -> Self {
        Self { header, data }
    }

    pub fn header(&self) -> &MemberHeader {
        &self.header
    }

    /// Member name with padding and any GNU `/` terminator removed.
    pub fn name(&self) -> &str {
        &self.header.name
    }

    /// Mode field as the decimal value of its digits.
    pub fn mode(&self) -> u32 {
        self.header.mode
    }

    /// Mode field read as octal, if every digit is octal.
    pub fn permissions(&self) -> Option<u32> {
        self.header.permissions()
    }

    pub fn uid(&self) -> u32 {
        self.header.uid
    }

    pub fn gid(&self) -> u32 {
        self.header.gid
    }

    /// Declared payload size, equal to `data().len()` for a decoded member.
    pub fn size(&self) -> u64 {
        self.header.size
    }

    /// Modification time (UTC).
    pub fn mtime(&self) -> SystemTime {
        self.header.mtime
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Take the payload, dropping the header.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Seekable view over the payload, for handing to tar or gzip readers.
    pub fn reader(&self) -> Cursor<&[u8]> {
        Cursor::new(&self.data)
    }

    /// Compression suggested by the member name.
    pub fn compression(&self) -> Compression {
        Compression::from_name(self.name())
    }

    pub fn is_compressed(&self) -> bool {
        self.compression() != Compression::None
    }
}
