#![doc = r#"
Region body records

A flat body is a run of 16-byte aligned records, each starting with a
two-byte opcode (`op 00`). Only note records are decoded:

```text
0x00  u8   0x90
0x01  u8   0x00
0x04  u56  time (ticks + 0x9600 + start offset)
0x0B  u8   velocity
0x0C  u8   pitch
0x1C  u32  duration (ticks)
```

A note record spans 32 bytes. Everything else, recognized or not, is skipped
16 bytes at a time, so decoding always terminates. The body ends at the
end-of-list sentinel or when its declared length runs out.
"#]

use num_enum::TryFromPrimitive;

use crate::{
    format::{BODY_RECORD_STRIDE, END_OF_LIST_SENTINEL, NOTE_RECORD_SIZE, NOTE_START_TIME_OFFSET},
    note::Note,
    reader::{DecodeError, DecodeErrorKind, DecodeResult, Reader},
};

/// Leading byte of a body record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum BodyOpcode {
    /// A note
    Note = 0x90,
    /// Controller change (modulation, sustain, ...)
    ControlChange = 0xB0,
    /// Marks the start of the recorded events
    RegionStart = 0xC0,
    /// Pitch bend
    PitchBend = 0xE0,
}

impl BodyOpcode {
    /// Classifies the record starting at `block`.
    ///
    /// Returns `None` for opcodes this decoder does not know.
    pub fn classify(block: &[u8]) -> Option<Self> {
        match block {
            [op, 0x00, ..] => Self::try_from(*op).ok(),
            _ => None,
        }
    }
}

/// Decodes the notes of a flat body.
///
/// Note times are made relative to the region start using `start_offset`.
pub fn decode_notes(body: &Reader<'_>, start_offset: u32) -> DecodeResult<Vec<Note>> {
    let mut notes = Vec::new();
    let mut offset = 0;
    while offset < body.len() {
        if body.matches_at(&END_OF_LIST_SENTINEL, offset) {
            break;
        }
        match BodyOpcode::classify(&body.bytes()[offset..]) {
            Some(BodyOpcode::Note) => {
                if offset + NOTE_RECORD_SIZE > body.len() {
                    return Err(DecodeError::new(
                        body.address(offset),
                        DecodeErrorKind::TruncatedBody,
                    ));
                }
                let time = body.u56_at(offset + 0x04)? as i64
                    - NOTE_START_TIME_OFFSET
                    - start_offset as i64;
                notes.push(Note {
                    time,
                    velocity: body.u8_at(offset + 0x0B)?,
                    pitch: body.u8_at(offset + 0x0C)?,
                    duration: body.u32_at(offset + 0x1C)?,
                });
                offset += NOTE_RECORD_SIZE;
            }
            _other => {
                #[cfg(feature = "tracing")]
                tracing::trace!(
                    "skipping body record {:?} at {:#x}",
                    _other,
                    body.address(offset)
                );
                offset += BODY_RECORD_STRIDE;
            }
        }
    }
    Ok(notes)
}
