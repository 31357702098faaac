#![doc = r#"
Contains types for length-prefixed chunks

# Overview

A chunk starts where its tag matches. Its length lives at a fixed offset from
that address and its payload begins at another fixed offset:

```text
tag address
|
v
[tag .....][.. length ..][ .. ][payload ........................]
           ^ length_offset      ^ payload_offset
```

The offsets and the width of the length field depend on the chunk family, see
[`ChunkFamily`]. They are never guessed per call.
"#]

/// Width of a chunk's little-endian length field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthWidth {
    /// 2 bytes
    U16,
    /// 4 bytes
    U32,
    /// 8 bytes
    U64,
}

impl LengthWidth {
    /// Returns the number of bytes the field occupies
    pub const fn bytes(self) -> usize {
        match self {
            Self::U16 => 2,
            Self::U32 => 4,
            Self::U64 => 8,
        }
    }
}

/// Layout constants shared by every chunk of one family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkFamily {
    /// Used in diagnostics
    pub name: &'static str,
    /// Offset of the length field from the tag address
    pub length_offset: usize,
    /// Width of the length field
    pub length_width: LengthWidth,
    /// Offset of the payload from the tag address
    pub payload_offset: usize,
}

impl ChunkFamily {
    /// Arrangement, region body, transposition and section marker chunks.
    pub const EVENT: Self = Self {
        name: "event",
        length_offset: 0x1C,
        length_width: LengthWidth::U64,
        payload_offset: 0x24,
    };

    /// Channel-strip sub-chunks and section text chunks.
    pub const CHANNEL_STRIP: Self = Self {
        name: "channel strip",
        length_offset: 0x1C,
        length_width: LengthWidth::U32,
        payload_offset: 0x24,
    };

    /// Track label chunks.
    pub const LABEL: Self = Self {
        name: "label",
        length_offset: 0x0C,
        length_width: LengthWidth::U16,
        payload_offset: 0x0E,
    };
}

/// A decoded chunk: where it starts and the payload it declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    pub(crate) start: usize,
    pub(crate) payload_start: usize,
    pub(crate) payload: &'a [u8],
}

impl<'a> Chunk<'a> {
    /// Absolute address of the tag match
    pub const fn start_address(&self) -> usize {
        self.start
    }
    /// Absolute address of the first payload byte
    pub const fn payload_address(&self) -> usize {
        self.payload_start
    }
    /// Absolute address one past the last payload byte
    pub const fn end_address(&self) -> usize {
        self.payload_start + self.payload.len()
    }
    /// The payload. Its length always equals the declared length.
    pub const fn payload(&self) -> &'a [u8] {
        self.payload
    }
    /// Returns true if the chunk declares no payload
    pub const fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}
