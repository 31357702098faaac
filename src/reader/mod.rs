#![doc = r#"
Byte scanning and chunk reading over a project buffer.

[`Reader`] borrows the buffer and never mutates it. Every scan takes its start
(and optional end) address explicitly, so no cursor is shared between calls.
Addresses are relative to the reader; errors report them as absolute buffer
addresses.
"#]

mod chunk;
pub use chunk::*;

mod error;
pub use error::*;

/// A read-only view over a project buffer (or a window of one).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reader<'a> {
    buf: &'a [u8],
    base: usize,
}

impl<'a> Reader<'a> {
    /// Create a reader over an entire buffer
    pub const fn from_byte_slice(buf: &'a [u8]) -> Self {
        Self { buf, base: 0 }
    }

    /// Create a reader over `start..end` of this reader.
    ///
    /// Addresses in the returned reader are relative to `start`.
    pub fn window(&self, start: usize, end: usize) -> DecodeResult<Reader<'a>> {
        if start > end || end > self.buf.len() {
            return Err(DecodeError::oob(
                self.address(start),
                end.saturating_sub(start),
                self.buf.len().saturating_sub(start),
            ));
        }
        Ok(Self {
            buf: &self.buf[start..end],
            base: self.base + start,
        })
    }

    /// The bytes of this reader
    pub const fn bytes(&self) -> &'a [u8] {
        self.buf
    }

    /// Number of bytes in this reader
    pub const fn len(&self) -> usize {
        self.buf.len()
    }

    /// True if the reader holds no bytes
    pub const fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Converts a relative address into an absolute buffer address
    pub const fn address(&self, offset: usize) -> usize {
        self.base + offset
    }

    /// First occurrence of `tag` at or after `from`.
    pub fn find(&self, tag: &[u8], from: usize) -> Option<usize> {
        self.find_within(tag, from, self.buf.len())
    }

    /// First occurrence of `tag` lying entirely inside `from..to`.
    pub fn find_within(&self, tag: &[u8], from: usize, to: usize) -> Option<usize> {
        let to = to.min(self.buf.len());
        if from > to {
            return None;
        }
        position(&self.buf[from..to], tag).map(|p| p + from)
    }

    /// Last occurrence of `tag` lying entirely before `to`.
    pub fn rfind(&self, tag: &[u8], to: usize) -> Option<usize> {
        self.rfind_within(tag, 0, to)
    }

    /// Last occurrence of `tag` lying entirely inside `from..to`.
    pub fn rfind_within(&self, tag: &[u8], from: usize, to: usize) -> Option<usize> {
        let to = to.min(self.buf.len());
        if from > to {
            return None;
        }
        rposition(&self.buf[from..to], tag).map(|p| p + from)
    }

    /// First occurrence of `tag` immediately followed by `suffix`.
    ///
    /// The two are matched as one literal, e.g. a record tag and an event id.
    pub fn find_tagged(&self, tag: &[u8], suffix: &[u8], from: usize) -> Option<usize> {
        let mut needle = Vec::with_capacity(tag.len() + suffix.len());
        needle.extend_from_slice(tag);
        needle.extend_from_slice(suffix);
        self.find(&needle, from)
    }

    /// Like [`Reader::find`], but absence is a [`DecodeErrorKind::TagNotFound`].
    pub fn require(&self, tag: &[u8], name: &'static str, from: usize) -> DecodeResult<usize> {
        self.find(tag, from)
            .ok_or_else(|| DecodeError::tag_not_found(self.address(from), name))
    }

    /// True if `tag` matches at exactly `at`
    pub fn matches_at(&self, tag: &[u8], at: usize) -> bool {
        self.buf
            .get(at..)
            .is_some_and(|rest| rest.starts_with(tag))
    }

    /// Returns `len` bytes starting at `at`
    pub fn slice(&self, at: usize, len: usize) -> DecodeResult<&'a [u8]> {
        let available = self.buf.len().saturating_sub(at);
        at.checked_add(len)
            .and_then(|end| self.buf.get(at..end))
            .ok_or_else(|| DecodeError::oob(self.address(at), len, available))
    }

    /// Reads `N` bytes starting at `at`
    pub fn array_at<const N: usize>(&self, at: usize) -> DecodeResult<[u8; N]> {
        let bytes = self.slice(at, N)?;
        let mut out = [0; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    /// Reads a byte
    pub fn u8_at(&self, at: usize) -> DecodeResult<u8> {
        self.array_at::<1>(at).map(|[b]| b)
    }

    /// Reads a little-endian u16
    pub fn u16_at(&self, at: usize) -> DecodeResult<u16> {
        self.array_at(at).map(u16::from_le_bytes)
    }

    /// Reads a little-endian u32
    pub fn u32_at(&self, at: usize) -> DecodeResult<u32> {
        self.array_at(at).map(u32::from_le_bytes)
    }

    /// Reads a little-endian u64
    pub fn u64_at(&self, at: usize) -> DecodeResult<u64> {
        self.array_at(at).map(u64::from_le_bytes)
    }

    /// Reads a little-endian f32
    pub fn f32_at(&self, at: usize) -> DecodeResult<f32> {
        self.array_at(at).map(f32::from_le_bytes)
    }

    /// Reads a 7-byte little-endian integer, zero-extended to 8 bytes
    pub fn u56_at(&self, at: usize) -> DecodeResult<u64> {
        let bytes = self.slice(at, 7)?;
        let mut out = [0; 8];
        out[..7].copy_from_slice(bytes);
        Ok(u64::from_le_bytes(out))
    }

    /// Reads the chunk whose tag matches at `tag_address`.
    ///
    /// Fails with [`DecodeErrorKind::MalformedChunk`] if the declared payload
    /// would extend past the buffer.
    pub fn read_chunk_with(
        &self,
        tag_address: usize,
        length_offset: usize,
        length_width: LengthWidth,
        payload_offset: usize,
    ) -> DecodeResult<Chunk<'a>> {
        let length_at = tag_address + length_offset;
        let declared = match length_width {
            LengthWidth::U16 => self.u16_at(length_at)? as u64,
            LengthWidth::U32 => self.u32_at(length_at)? as u64,
            LengthWidth::U64 => self.u64_at(length_at)?,
        };
        let payload_start = tag_address + payload_offset;
        let available = self.buf.len().saturating_sub(payload_start);
        let payload = usize::try_from(declared)
            .ok()
            .and_then(|len| self.buf.get(payload_start..payload_start.checked_add(len)?))
            .ok_or_else(|| {
                DecodeError::oob(
                    self.address(tag_address),
                    usize::try_from(declared).unwrap_or(usize::MAX),
                    available,
                )
            })?;

        Ok(Chunk {
            start: self.address(tag_address),
            payload_start: self.address(payload_start),
            payload,
        })
    }

    /// Reads a chunk using the constants of `family`
    pub fn read_chunk(&self, tag_address: usize, family: ChunkFamily) -> DecodeResult<Chunk<'a>> {
        #[cfg(feature = "tracing")]
        tracing::trace!(
            "reading {} chunk at {:#x}",
            family.name,
            self.address(tag_address)
        );
        self.read_chunk_with(
            tag_address,
            family.length_offset,
            family.length_width,
            family.payload_offset,
        )
    }

    /// Reader over a chunk's payload, keeping absolute addresses
    pub fn payload_reader(chunk: &Chunk<'a>) -> Reader<'a> {
        Reader {
            buf: chunk.payload,
            base: chunk.payload_start,
        }
    }
}

fn position(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn rposition(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(haystack.len());
    }
    haystack.windows(needle.len()).rposition(|w| w == needle)
}

/// Decodes NUL-padded text the way the container stores names.
pub(crate) fn trimmed_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_matches('\0')
        .to_string()
}
