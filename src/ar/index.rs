//! Lazily built name-to-member index.

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use super::chunk::ChunkReader;
use super::header::{HEADER_SIZE, MemberHeader, PADDING};
use super::member::Member;
use super::options::Compatibility;
use crate::error::{ArError, Result};
use crate::io::ReadAt;

/// Members keyed by name, in first-seen order.
pub type Members = IndexMap<String, Member>;

enum CacheState {
    Absent,
    Populated(Members),
}

/// Cache of decoded members.
///
/// The index is built on first use and kept until [`invalidate`] is
/// called. A failed build leaves it absent.
///
/// [`invalidate`]: MemberIndex::invalidate
pub struct MemberIndex {
    state: CacheState,
    compatibility: Compatibility,
}

impl MemberIndex {
    pub fn new(compatibility: Compatibility) -> Self {
        Self {
            state: CacheState::Absent,
            compatibility,
        }
    }

    pub fn is_built(&self) -> bool {
        matches!(self.state, CacheState::Populated(_))
    }

    pub fn invalidate(&mut self) {
        self.state = CacheState::Absent;
    }

    /// Scan from the chunk reader's current position unless already built.
    pub fn ensure_built<R: ReadAt>(&mut self, chunks: &mut ChunkReader<R>) -> Result<&Members> {
        if !self.is_built() {
            let members = scan(chunks, self.compatibility)?;
            self.state = CacheState::Populated(members);
        }
        match &self.state {
            CacheState::Populated(members) => Ok(members),
            CacheState::Absent => Err(ArError::InvalidState("member index is not built")),
        }
    }

    /// Drop the cache and scan again from the current position.
    pub fn refresh<R: ReadAt>(&mut self, chunks: &mut ChunkReader<R>) -> Result<&Members> {
        self.invalidate();
        self.ensure_built(chunks)
    }
}

/// Decode every member from the current position to the end of the source.
pub fn scan<R: ReadAt>(chunks: &mut ChunkReader<R>, compatibility: Compatibility) -> Result<Members> {
    let mut members = Members::new();

    loop {
        let offset = chunks.position();
        let raw = match chunks.read_chunk(HEADER_SIZE as u64) {
            Ok(raw) => raw,
            Err(ArError::EndOfStream { available: 0, .. }) => break,
            Err(ArError::EndOfStream { available, .. }) => {
                if compatibility == Compatibility::Legacy {
                    debug!(offset, available, "ignoring trailing partial header");
                    break;
                }
                return Err(ArError::TruncatedMember {
                    name: format!("header at offset {}", offset),
                    expected: HEADER_SIZE as u64,
                    actual: available,
                });
            }
            Err(e) => return Err(e),
        };

        let header = MemberHeader::from_bytes(&raw)?;
        if compatibility.checks_terminator() && !header.has_valid_terminator() {
            return Err(ArError::format(format!(
                "bad end marker {:?} in header of {:?} at offset {}",
                String::from_utf8_lossy(&header.terminator),
                header.name,
                offset
            )));
        }

        let data = match chunks.read_chunk(header.size) {
            Ok(data) => data,
            Err(ArError::EndOfStream { available, .. }) => {
                return Err(ArError::TruncatedMember {
                    name: header.name,
                    expected: header.size,
                    actual: available,
                });
            }
            Err(e) => return Err(e),
        };

        if compatibility.pads_odd_members() && header.size % 2 == 1 {
            match chunks.read_chunk(1) {
                Ok(pad) if pad[0] == PADDING => {}
                Ok(pad) => {
                    return Err(ArError::format(format!(
                        "expected padding after {:?}, found byte {:#04x}",
                        header.name, pad[0]
                    )));
                }
                Err(ArError::EndOfStream { .. }) => {
                    warn!(name = %header.name, "final member is missing its padding byte");
                }
                Err(e) => return Err(e),
            }
        }

        debug!(name = %header.name, size = header.size, offset, "decoded member");
        let name = header.name.clone();
        if members.insert(name, Member::new(header, data)).is_some() {
            debug!("duplicate member name, keeping the later one");
        }
    }

    info!(members = members.len(), "built member index");
    Ok(members)
}
