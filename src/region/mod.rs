#![doc = r#"
Region decoding

Every arrangement event references a region through its
[`EventId`]. The region is stored as two records:

```text
[header tag][id] .. header fields, take selectors .. [body tag][id][.. event chunk ..]
```

The header is found first and the body search starts from the header's
address. The header covers every byte between the two.

# Take folders

A region recorded in several takes is a *take folder*. Its body holds a list
of arrangement-layout records of instrument kind, one per take, ending in the
end-of-list sentinel (so the body begins with [`TAKE_FOLDER_LEAD_BYTE`]). The
take selectors in the folder's header mark which take is playing; its
record's id is resolved like any other region.

A body that begins with the lead byte but does not hold a complete take list
is decoded as a flat body, where the leading record is skipped like any other
unknown opcode.

If no take is marked the region is dropped and reported as
[`RegionOutcome::Dropped`].
"#]

mod body;
pub use body::*;

mod header;
pub use header::*;

use crate::{
    arrangement::{self, ArrangementEvent, EventId},
    format::{
        EVENT_BODY_TAG, EVENT_HEADER_TAG, INSTRUMENT_EVENT_KIND, TAKE_FOLDER_LEAD_BYTE,
        TAKE_SELECTED_FLAG_OFFSET, TRACK_ENTRY_TAG,
    },
    note::{self, Note},
    reader::{Chunk, ChunkFamily, DecodeError, DecodeResult, Reader},
};

/// A decoded region with its notes cropped and, if looped, replicated.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Region {
    /// Id of the region that supplied the notes (the selected take for a take folder)
    pub event_id: EventId,
    /// Header metadata
    pub header: RegionHeader,
    /// Notes relative to the region start
    pub notes: Vec<Note>,
    /// Effective length: the loop time if looped, the region length otherwise
    pub length: u32,
}

impl Region {
    /// Region name
    pub fn name(&self) -> &str {
        &self.header.name
    }
}

/// The result of decoding one region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionOutcome {
    /// The region decoded
    Decoded(Region),
    /// A take folder without a selected take. Carries the folder's id.
    Dropped(EventId),
}

enum RegionState<'a> {
    Locate(EventId),
    TakeFolder {
        folder: EventId,
        header: Reader<'a>,
        takes: Vec<ArrangementEvent>,
    },
    Flat {
        id: EventId,
        header: Reader<'a>,
        body: Chunk<'a>,
    },
}

/// Finds the header and body records of `id`.
pub fn locate<'a>(reader: &Reader<'a>, id: EventId) -> DecodeResult<(Reader<'a>, Chunk<'a>)> {
    let header_at = reader
        .find_tagged(EVENT_HEADER_TAG, id.bytes(), 0)
        .ok_or_else(|| DecodeError::tag_not_found(reader.address(0), "region header"))?;
    let body_at = reader
        .find_tagged(EVENT_BODY_TAG, id.bytes(), header_at)
        .ok_or_else(|| DecodeError::tag_not_found(reader.address(header_at), "region body"))?;

    let header = reader.window(header_at, body_at)?;
    let body = reader.read_chunk(body_at, ChunkFamily::EVENT)?;
    Ok((header, body))
}

/// The take list of a take-folder body, or `None` for a flat body.
pub fn take_list(body: &Chunk<'_>) -> Option<Vec<ArrangementEvent>> {
    if body.payload().first() != Some(&TAKE_FOLDER_LEAD_BYTE) {
        return None;
    }
    let payload = Reader::payload_reader(body);
    if payload.u32_at(0).ok()? != INSTRUMENT_EVENT_KIND {
        return None;
    }
    match arrangement::decode_records(&payload) {
        Ok(takes) if takes.iter().all(ArrangementEvent::is_instrument) => Some(takes),
        _ => {
            #[cfg(feature = "tracing")]
            tracing::trace!(
                "body at {:#x} is not a take list, decoding it as notes",
                body.start_address()
            );
            None
        }
    }
}

/// Ordinal of the first take selector in `header` flagged as selected.
pub fn selected_take(header: &Reader<'_>) -> Option<usize> {
    let mut from = 0;
    let mut ordinal = 0;
    while let Some(at) = header.find(TRACK_ENTRY_TAG, from) {
        if header
            .u8_at(at + TAKE_SELECTED_FLAG_OFFSET)
            .is_ok_and(|flag| flag != 0)
        {
            return Some(ordinal);
        }
        ordinal += 1;
        from = at + TRACK_ENTRY_TAG.len();
    }
    None
}

/// Decodes the region placed by `event`.
///
/// Take folders are followed to their selected take. Notes are cropped to the
/// region length and, if the event loops, replicated up to its loop time.
pub fn decode(reader: &Reader<'_>, event: &ArrangementEvent) -> DecodeResult<RegionOutcome> {
    let mut visited = Vec::new();
    let mut state = RegionState::Locate(event.event_id);
    loop {
        state = match state {
            RegionState::Locate(id) => {
                let (header, body) = locate(reader, id)?;
                match take_list(&body) {
                    Some(takes) => RegionState::TakeFolder {
                        folder: id,
                        header,
                        takes,
                    },
                    None => RegionState::Flat { id, header, body },
                }
            }
            RegionState::TakeFolder {
                folder,
                header,
                takes,
            } => {
                visited.push(folder);
                let take = selected_take(&header)
                    .and_then(|ordinal| takes.get(ordinal))
                    .filter(|take| !visited.contains(&take.event_id));
                match take {
                    Some(take) => RegionState::Locate(take.event_id),
                    None => {
                        #[cfg(feature = "tracing")]
                        tracing::warn!(
                            "take folder {} on track {} has no selected take",
                            event.event_id,
                            event.track_id
                        );
                        return Ok(RegionOutcome::Dropped(event.event_id));
                    }
                }
            }
            RegionState::Flat { id, header, body } => {
                return decode_flat(event, id, &header, &body).map(RegionOutcome::Decoded);
            }
        };
    }
}

fn decode_flat(
    event: &ArrangementEvent,
    id: EventId,
    header: &Reader<'_>,
    body: &Chunk<'_>,
) -> DecodeResult<Region> {
    let header = RegionHeader::parse(header)?;
    let raw = decode_notes(&Reader::payload_reader(body), header.start_offset)?;
    let cropped = note::crop(&raw, header.region_length);

    let (notes, length) = match event.loop_time {
        Some(loop_time) => (
            note::replicate(&cropped, header.region_length, loop_time),
            loop_time,
        ),
        None => (cropped, header.region_length),
    };

    #[cfg(feature = "tracing")]
    tracing::debug!(
        "region {} \"{}\": {} notes over {} ticks",
        id,
        header.name,
        notes.len(),
        length
    );

    Ok(Region {
        event_id: id,
        header,
        notes,
        length,
    })
}
