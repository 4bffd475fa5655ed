//! Caller-owned input buffer with absolute offsets.
//!
//! Offsets never move: byte `n` of the input is at offset `n` no matter how
//! much has been released in front of it. The engine keeps its cursor as an
//! absolute offset, so releasing consumed bytes never invalidates it.

/// An append-only window over an input byte stream.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ByteStream {
    /// Absolute offset of `buf[0]`.
    base: u64,
    buf: Vec<u8>,
    finished: bool,
}

impl ByteStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// A finished stream over one complete document.
    pub fn complete(bytes: impl Into<Vec<u8>>) -> Self {
        ByteStream {
            base: 0,
            buf: bytes.into(),
            finished: true,
        }
    }

    /// Append more input.
    pub fn extend(&mut self, bytes: &[u8]) {
        if self.finished {
            tracing::debug!(len = bytes.len(), "extending a finished stream");
        }
        self.buf.extend_from_slice(bytes);
    }

    /// Mark the end of input. Reads past the end are then errors instead
    /// of suspensions.
    pub fn finish(&mut self) {
        self.finished = true;
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Lowest offset still buffered.
    #[inline]
    pub fn start(&self) -> u64 {
        self.base
    }

    /// One past the highest offset received.
    #[inline]
    pub fn end(&self) -> u64 {
        self.base + self.buf.len() as u64
    }

    /// Buffered bytes from `pos` to the end, `None` if `pos` was released
    /// or lies beyond the end.
    pub fn available_from(&self, pos: u64) -> Option<usize> {
        let rel = self.relative(pos)?;
        Some(self.buf.len() - rel)
    }

    /// `len` bytes starting at `pos`, if all of them are buffered.
    pub fn slice(&self, pos: u64, len: usize) -> Option<&[u8]> {
        let rel = self.relative(pos)?;
        self.buf.get(rel..rel.checked_add(len)?)
    }

    fn relative(&self, pos: u64) -> Option<usize> {
        let rel = usize::try_from(pos.checked_sub(self.base)?).ok()?;
        (rel <= self.buf.len()).then_some(rel)
    }

    /// Drop buffered bytes below `upto`. Offsets of the remaining bytes are
    /// unchanged.
    pub fn release(&mut self, upto: u64) {
        let upto = upto.min(self.end());
        if let Some(count) = self.relative(upto) {
            self.buf.drain(..count);
            self.base = upto;
        }
    }
}
