use std::path::Path;

use tracing::debug;

use super::chunk::ChunkReader;
use super::header::{SIGNATURE, validate_signature};
use super::index::{MemberIndex, Members};
use super::member::Member;
use super::options::{ArchiveOptions, OpenMode};
use crate::error::{ArError, Result};
use crate::io::{HttpRangeReader, LocalFileReader, ReadAt};

/// Name of the format version member in a Debian package.
pub const DEBIAN_BINARY: &str = "debian-binary";

struct OpenArchive<R: ReadAt> {
    chunks: ChunkReader<R>,
    index: MemberIndex,
}

/// Reader over an ar archive.
///
/// The signature is checked when the reader is created; members are decoded
/// on the first call that needs them and cached afterwards. The byte source
/// is released by [`close`](ArchiveReader::close) or when the reader is
/// dropped, whichever comes first.
pub struct ArchiveReader<R: ReadAt> {
    inner: Option<OpenArchive<R>>,
    options: ArchiveOptions,
}

impl ArchiveReader<LocalFileReader> {
    /// Open an archive on disk.
    pub fn open(path: &Path, options: ArchiveOptions) -> Result<Self> {
        check_mode(options.mode)?;
        let source = LocalFileReader::new(path)?;
        debug!(path = %path.display(), size = source.size(), "opened archive");
        Self::from_source(source, options)
    }
}

impl ArchiveReader<HttpRangeReader> {
    /// Open a remote archive served with HTTP Range support.
    pub fn open_url(url: &str, options: ArchiveOptions) -> Result<Self> {
        check_mode(options.mode)?;
        let source = HttpRangeReader::new(url.to_string())?;
        Self::from_source(source, options)
    }
}

impl<R: ReadAt> ArchiveReader<R> {
    /// Wrap an already opened source and validate its signature.
    ///
    /// On failure the source is dropped.
    pub fn from_source(source: R, options: ArchiveOptions) -> Result<Self> {
        check_mode(options.mode)?;

        let mut chunks = ChunkReader::new(source, options.buffer_size);
        let signature = chunks
            .read_chunk(SIGNATURE.len() as u64)
            .map_err(|e| match e {
                ArError::EndOfStream { .. } => ArError::format("not an ar archive"),
                other => other,
            })?;
        validate_signature(&signature)?;

        Ok(Self {
            inner: Some(OpenArchive {
                chunks,
                index: MemberIndex::new(options.compatibility),
            }),
            options,
        })
    }

    pub fn options(&self) -> &ArchiveOptions {
        &self.options
    }

    pub fn is_open(&self) -> bool {
        self.inner.is_some()
    }

    /// Borrow the underlying source.
    pub fn source(&self) -> Result<&R> {
        Ok(self.open_archive()?.chunks.source())
    }

    /// Current offset of the member cursor.
    pub fn position(&self) -> Result<u64> {
        Ok(self.open_archive()?.chunks.position())
    }

    /// Move the member cursor. A later [`refresh`](Self::refresh) scans from
    /// here.
    pub fn seek(&mut self, position: u64) -> Result<()> {
        self.open_archive_mut()?.chunks.seek(position);
        Ok(())
    }

    /// Move the member cursor back to the first member header.
    pub fn rewind(&mut self) -> Result<()> {
        self.seek(SIGNATURE.len() as u64)
    }

    /// All members, decoding them on first use.
    pub fn members(&mut self) -> Result<&Members> {
        let archive = self.open_archive_mut()?;
        archive.index.ensure_built(&mut archive.chunks)
    }

    /// Member names in archive order.
    pub fn list(&mut self) -> Result<Vec<&str>> {
        Ok(self.members()?.keys().map(String::as_str).collect())
    }

    /// Look up a member by name. A missing name is `Ok(None)`.
    pub fn get(&mut self, name: &str) -> Result<Option<&Member>> {
        Ok(self.members()?.get(name))
    }

    /// Discard the cache and decode again from the current cursor position.
    ///
    /// Call [`rewind`](Self::rewind) first for a full rescan.
    pub fn refresh(&mut self) -> Result<&Members> {
        let archive = self.open_archive_mut()?;
        archive.index.refresh(&mut archive.chunks)
    }

    /// Discard the cache; the next lookup decodes again.
    pub fn invalidate(&mut self) -> Result<()> {
        self.open_archive_mut()?.index.invalidate();
        Ok(())
    }

    /// Contents of `debian-binary`, trimmed, if the archive has one.
    pub fn debian_version(&mut self) -> Result<Option<String>> {
        Ok(self
            .get(DEBIAN_BINARY)?
            .map(|m| String::from_utf8_lossy(m.data()).trim().to_string()))
    }

    /// Release the source. Later calls fail with [`ArError::InvalidState`].
    pub fn close(&mut self) -> Result<()> {
        match self.inner.take() {
            Some(_) => Ok(()),
            None => Err(ArError::InvalidState("archive is already closed")),
        }
    }

    /// Close the reader and hand back its source.
    pub fn into_source(mut self) -> Result<R> {
        let archive = self
            .inner
            .take()
            .ok_or(ArError::InvalidState("archive is closed"))?;
        Ok(archive.chunks.into_inner())
    }

    fn open_archive(&self) -> Result<&OpenArchive<R>> {
        self.inner
            .as_ref()
            .ok_or(ArError::InvalidState("archive is closed"))
    }

    fn open_archive_mut(&mut self) -> Result<&mut OpenArchive<R>> {
        self.inner
            .as_mut()
            .ok_or(ArError::InvalidState("archive is closed"))
    }
}

fn check_mode(mode: OpenMode) -> Result<()> {
    match mode {
        OpenMode::Read => Ok(()),
        OpenMode::Write => Err(ArError::Unsupported(
            "writing ar archives is not implemented".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ar::header::encode_header;
    use crate::ar::options::Compatibility;
    use crate::io::MemoryReader;

    fn archive(members: &[(&str, &str)]) -> Vec<u8> {
        let mut out = SIGNATURE.to_vec();
        for (name, data) in members {
            let data = data.as_bytes();
            out.extend(encode_header(name, 0, 0, 0, 0, data.len() as u64));
            out.extend_from_slice(data);
            if data.len() % 2 == 1 {
                out.push(b'\n');
            }
        }
        out
    }

    fn reader(bytes: Vec<u8>) -> ArchiveReader<MemoryReader> {
        ArchiveReader::from_source(MemoryReader::new(bytes), ArchiveOptions::default()).unwrap()
    }

    #[test]
    fn lookup() {
        let mut ar = reader(archive(&[("x", "DATA")]));
        assert_eq!(ar.list().unwrap(), ["x"]);
        assert_eq!(ar.get("x").unwrap().unwrap().data(), b"DATA");
        assert!(ar.get("y").unwrap().is_none());
    }

    #[test]
    fn rejects_bad_signature() {
        for bytes in [b"!<thin>\n".to_vec(), b"PK\x03\x04".to_vec(), Vec::new()] {
            let err = ArchiveReader::from_source(MemoryReader::new(bytes), ArchiveOptions::default())
                .err()
                .unwrap();
            assert!(matches!(err, ArError::Format(_)));
        }
    }

    #[test]
    fn write_mode_is_unsupported() {
        let opts = ArchiveOptions::default().with_mode(OpenMode::Write);
        let err = ArchiveReader::from_source(MemoryReader::new(archive(&[])), opts)
            .err()
            .unwrap();
        assert!(matches!(err, ArError::Unsupported(_)));
    }

    #[test]
    fn closed_reader() {
        let mut ar = reader(archive(&[("x", "DATA")]));
        ar.close().unwrap();
        assert!(!ar.is_open());
        assert!(matches!(ar.list(), Err(ArError::InvalidState(_))));
        assert!(matches!(ar.get("x"), Err(ArError::InvalidState(_))));
        assert!(matches!(ar.refresh(), Err(ArError::InvalidState(_))));
        assert!(matches!(ar.close(), Err(ArError::InvalidState(_))));
    }

    #[test]
    fn rewind_and_refresh() {
        let mut ar = reader(archive(&[("a", "1"), ("b", "22")]));
        assert_eq!(ar.list().unwrap().len(), 2);
        assert!(ar.refresh().unwrap().is_empty());

        ar.rewind().unwrap();
        assert_eq!(ar.position().unwrap(), 8);
        assert_eq!(ar.refresh().unwrap().len(), 2);
    }

    #[test]
    fn options_are_per_reader() {
        let bytes = {
            let mut out = SIGNATURE.to_vec();
            out.extend(encode_header("a", 0, 0, 0, 0, 1));
            out.extend_from_slice(b"1");
            out.extend(encode_header("b", 0, 0, 0, 0, 2));
            out.extend_from_slice(b"22");
            out
        };
        let legacy = ArchiveOptions::default().with_compatibility(Compatibility::Legacy);
        let mut packed = ArchiveReader::from_source(MemoryReader::new(bytes.clone()), legacy).unwrap();
        let mut standard = reader(bytes);

        assert_eq!(packed.list().unwrap(), ["a", "b"]);
        assert!(standard.list().is_err());
    }

    #[test]
    fn debian_version() {
        let mut ar = reader(archive(&[("debian-binary", "2.0\n")]));
        assert_eq!(ar.debian_version().unwrap().as_deref(), Some("2.0"));

        let mut ar = reader(archive(&[]));
        assert_eq!(ar.debian_version().unwrap(), None);
    }
}
