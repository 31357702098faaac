#![doc = r#"
Track events of the arrangement

# Layout

The arrangement chunk (an [event family](crate::reader::ChunkFamily::EVENT)
chunk) holds fixed `0x50`-byte records terminated by the 8-byte
[end-of-list sentinel](crate::format::END_OF_LIST_SENTINEL):

```text
0x00  u32  kind
0x04  u32  start time (ticks + 0x8700)
0x08  ..   12 bytes, unused
0x14  u8   track id
0x15  ..   7 bytes, unused
0x1C  u32  loop time (0x3FFFFFFF = not looped)
0x20  [4]  event id
0x24  ..   remainder of the record, unused
```

The same record layout reappears inside the body of a take folder, see
[`region`](crate::region).
"#]

use core::fmt;

use crate::{
    format::{
        ARRANGEMENT_CHUNK_TAG, ARRANGEMENT_RECORD_SIZE, END_OF_LIST_SENTINEL,
        EVENT_START_TIME_OFFSET, INSTRUMENT_EVENT_KIND, NO_LOOP_VALUE,
    },
    reader::{ChunkFamily, DecodeError, DecodeErrorKind, DecodeResult, Reader},
};

/// Four opaque bytes linking an arrangement event to its region chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventId(pub [u8; 4]);

impl EventId {
    /// The raw bytes, as they follow a region tag
    pub const fn bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "{a:02x}{b:02x}{c:02x}{d:02x}")
    }
}

/// The placement of one region on one track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArrangementEvent {
    /// Raw event kind. `32` is a software-instrument region.
    pub kind: u32,
    /// Start in ticks, zero-based
    pub start_time: i64,
    /// Track the region sits on
    pub track_id: u8,
    /// Loop end in ticks relative to the region start, if looped
    pub loop_time: Option<u32>,
    /// Id of the region's header and body
    pub event_id: EventId,
}

impl ArrangementEvent {
    /// Decodes one `0x50`-byte record.
    pub fn parse(record: &Reader<'_>) -> DecodeResult<Self> {
        let kind = record.u32_at(0x00)?;
        let start = record.u32_at(0x04)?;
        let track_id = record.u8_at(0x14)?;
        let loop_time = record.u32_at(0x1C)?;
        let event_id = EventId(record.array_at(0x20)?);

        Ok(Self {
            kind,
            start_time: start as i64 - EVENT_START_TIME_OFFSET,
            track_id,
            loop_time: (loop_time != NO_LOOP_VALUE).then_some(loop_time),
            event_id,
        })
    }

    /// True for software-instrument (note) regions
    pub const fn is_instrument(&self) -> bool {
        self.kind == INSTRUMENT_EVENT_KIND
    }
}

/// Splits `records` into events up to the end-of-list sentinel.
///
/// Fails with [`DecodeErrorKind::TruncatedArrangement`] if the sentinel is
/// not found on a record boundary before the end.
pub fn decode_records(records: &Reader<'_>) -> DecodeResult<Vec<ArrangementEvent>> {
    let mut events = Vec::new();
    let mut offset = 0;
    loop {
        if records.len() < offset + END_OF_LIST_SENTINEL.len() {
            return Err(DecodeError::new(
                records.address(offset),
                DecodeErrorKind::TruncatedArrangement,
            ));
        }
        if records.matches_at(&END_OF_LIST_SENTINEL, offset) {
            break;
        }
        if records.len() < offset + ARRANGEMENT_RECORD_SIZE {
            return Err(DecodeError::new(
                records.address(offset),
                DecodeErrorKind::TruncatedArrangement,
            ));
        }
        let record = records.window(offset, offset + ARRANGEMENT_RECORD_SIZE)?;
        events.push(ArrangementEvent::parse(&record)?);
        offset += ARRANGEMENT_RECORD_SIZE;
    }
    Ok(events)
}

/// Locates the arrangement chunk and decodes its events.
pub fn decode(reader: &Reader<'_>) -> DecodeResult<Vec<ArrangementEvent>> {
    let address = reader.require(ARRANGEMENT_CHUNK_TAG, "arrangement", 0)?;
    let chunk = reader.read_chunk(address, ChunkFamily::EVENT)?;
    #[cfg(feature = "tracing")]
    tracing::debug!(
        "arrangement chunk at {:#x}, {} bytes",
        chunk.start_address(),
        chunk.payload().len()
    );
    decode_records(&Reader::payload_reader(&chunk))
}
