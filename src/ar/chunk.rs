//! Cursor over a [`ReadAt`] source that hands out exact-sized chunks.

use crate::error::{ArError, Result};
use crate::io::ReadAt;

/// Sequential reader over a random access source.
///
/// Reads smaller than `buffer_size` are served from a read-ahead window so
/// that walking 60-byte headers does not cost one source read each. Larger
/// reads go straight to the source.
pub struct ChunkReader<R: ReadAt> {
    source: R,
    position: u64,
    buffer_size: usize,
    window: Vec<u8>,
    window_start: u64,
}

impl<R: ReadAt> ChunkReader<R> {
    pub fn new(source: R, buffer_size: usize) -> Self {
        Self {
            source,
            position: 0,
            buffer_size,
            window: Vec::new(),
            window_start: 0,
        }
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn seek(&mut self, position: u64) {
        self.position = position;
    }

    /// Bytes between the cursor and the end of the source.
    pub fn remaining(&self) -> u64 {
        self.source.size().saturating_sub(self.position)
    }

    pub fn source(&self) -> &R {
        &self.source
    }

    pub fn into_inner(self) -> R {
        self.source
    }

    /// Read exactly `len` bytes and advance the cursor past them.
    ///
    /// Fails with [`ArError::EndOfStream`] when fewer bytes are left. On any
    /// error the cursor is left where it was.
    pub fn read_chunk(&mut self, len: u64) -> Result<Vec<u8>> {
        let available = self.remaining();
        if len > available {
            return Err(ArError::EndOfStream {
                wanted: len,
                available,
            });
        }
        let wanted = usize::try_from(len)
            .map_err(|_| ArError::format(format!("chunk of {} bytes is too large", len)))?;

        let start = self.position;
        let mut out = vec![0u8; wanted];
        match self.fill(&mut out) {
            Ok(()) => Ok(out),
            Err(e) => {
                self.position = start;
                Err(e)
            }
        }
    }

    fn fill(&mut self, out: &mut [u8]) -> Result<()> {
        let mut filled = 0;
        while filled < out.len() {
            let n = self.read_some(&mut out[filled..])?;
            if n == 0 {
                // The source shrank under us.
                return Err(ArError::EndOfStream {
                    wanted: out.len() as u64,
                    available: filled as u64,
                });
            }
            filled += n;
        }
        Ok(())
    }

    fn read_some(&mut self, buf: &mut [u8]) -> Result<usize> {
        let n = self.copy_from_window(buf);
        if n > 0 {
            return Ok(n);
        }

        if buf.len() >= self.buffer_size {
            let n = self.source.read_at(self.position, buf)?;
            self.position += n as u64;
            return Ok(n);
        }

        self.fill_window()?;
        Ok(self.copy_from_window(buf))
    }

    fn copy_from_window(&mut self, buf: &mut [u8]) -> usize {
        let window_end = self.window_start + self.window.len() as u64;
        if self.position < self.window_start || self.position >= window_end {
            return 0;
        }
        let offset = (self.position - self.window_start) as usize;
        let n = buf.len().min(self.window.len() - offset);
        buf[..n].copy_from_slice(&self.window[offset..offset + n]);
        self.position += n as u64;
        n
    }

    fn fill_window(&mut self) -> Result<()> {
        self.window.resize(self.buffer_size, 0);
        let mut got = 0;
        while got < self.window.len() {
            let n = self
                .source
                .read_at(self.position + got as u64, &mut self.window[got..])?;
            if n == 0 {
                break;
            }
            got += n;
        }
        self.window.truncate(got);
        self.window_start = self.position;
        Ok(())
    }
}
