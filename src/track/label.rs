use crate::{
    format::{
        LABEL_CHUNK_TAG, NO_OUTPUT_LABEL, TRACK_ENTRY_LABEL_TAG_OFFSET, TRACK_ENTRY_SIZE,
        TRACK_ENTRY_TAG, TRACK_LAYOUT_TAG,
    },
    reader::{ChunkFamily, DecodeResult, Reader, trimmed_text},
};

#[doc = r#"
One physical track slot from the track layout.

# Layout

Track entries are `0x5C`-byte records following the layout header back to
back, each starting with the track entry tag. The u16 at `+0x10` is a label
tag; the label chunk carrying that tag stores the display name:

```text
[label tag][u16 label tag] .. [u16 name length at +0x0C][name at +0x0E]
```
"#]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackSlot {
    /// Absolute address of the track entry
    pub address: usize,
    /// Label tag of the entry
    pub tag: u16,
    /// Display name, if a label chunk exists for the tag
    pub label: Option<String>,
}

impl TrackSlot {
    /// Deactivated and duplicate slots are labelled "No Output" and do not
    /// get a track number.
    pub fn is_deactivated(&self) -> bool {
        self.label.as_deref() == Some(NO_OUTPUT_LABEL)
    }
}

/// Reads the display name stored for `tag`, if any.
pub fn label_for(reader: &Reader<'_>, tag: u16) -> DecodeResult<Option<String>> {
    let Some(at) = reader.find_tagged(LABEL_CHUNK_TAG, &tag.to_le_bytes(), 0) else {
        return Ok(None);
    };
    let chunk = reader.read_chunk(at, ChunkFamily::LABEL)?;
    Ok(Some(trimmed_text(chunk.payload())))
}

/// Reads every track entry in layout order.
pub fn slots(reader: &Reader<'_>) -> DecodeResult<Vec<TrackSlot>> {
    let layout = reader.require(TRACK_LAYOUT_TAG, "track layout", 0)?;
    let Some(mut at) = reader.find(TRACK_ENTRY_TAG, layout) else {
        return Ok(Vec::new());
    };

    let mut slots = Vec::new();
    while reader.matches_at(TRACK_ENTRY_TAG, at) && at + TRACK_ENTRY_SIZE <= reader.len() {
        let tag = reader.u16_at(at + TRACK_ENTRY_LABEL_TAG_OFFSET)?;
        let slot = TrackSlot {
            address: reader.address(at),
            tag,
            label: label_for(reader, tag)?,
        };
        #[cfg(feature = "tracing")]
        if slot.is_deactivated() {
            tracing::debug!("track slot at {:#x} is deactivated", slot.address);
        }
        slots.push(slot);
        at += TRACK_ENTRY_SIZE;
    }
    Ok(slots)
}
