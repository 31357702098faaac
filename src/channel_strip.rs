#![doc = r#"
Channel-strip gain and send levels

An instrument's channel strip starts at its name marker (e.g. `Inst 1`) and
ends at the next `OCuA` tag. In between sit
[channel-strip family](crate::reader::ChunkFamily::CHANNEL_STRIP) sub-chunks:

- the first two carry the send levels (u32 at payload `+0x18`)
- the one whose payload contains `Gain` is the gain plugin (f32 at payload `+0xD8`)

A strip without a gain plugin is valid and yields `gain: None`.
"#]

use crate::{
    format::{
        CHANNEL_STRIP_END_TAG, CHANNEL_STRIP_TAG, GAIN_KEYWORD, GAIN_VALUE_OFFSET,
        SEND_LEVEL_OFFSET,
    },
    reader::{Chunk, ChunkFamily, DecodeError, DecodeResult, Reader},
};

/// Marker of the first instrument channel strip
pub const DEFAULT_INSTRUMENT: &str = "Inst 1";

/// Gain and send levels of one instrument.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelStrip {
    /// Gain plugin setting, if the strip has a gain plugin
    pub gain: Option<f32>,
    /// First send level
    pub send1: u32,
    /// Second send level
    pub send2: u32,
}

/// Every sub-chunk between `instrument`'s marker and the strip end.
pub fn sub_chunks<'a>(reader: &Reader<'a>, instrument: &str) -> DecodeResult<Vec<Chunk<'a>>> {
    let start = reader.require(instrument.as_bytes(), "instrument marker", 0)?;
    sub_chunks_at(reader, start)
}

fn sub_chunks_at<'a>(reader: &Reader<'a>, start: usize) -> DecodeResult<Vec<Chunk<'a>>> {
    let end = reader.require(CHANNEL_STRIP_END_TAG, "channel strip end", start)?;

    let mut chunks = Vec::new();
    let mut from = start;
    while let Some(at) = reader.find_within(CHANNEL_STRIP_TAG, from, end) {
        let chunk = reader.read_chunk(at, ChunkFamily::CHANNEL_STRIP)?;
        from = chunk.payload_address();
        chunks.push(chunk);
    }
    Ok(chunks)
}

/// Gain of the first gain plugin among `chunks`
pub fn gain(chunks: &[Chunk<'_>]) -> DecodeResult<Option<f32>> {
    let Some(plugin) = chunks
        .iter()
        .find(|c| contains(c.payload(), GAIN_KEYWORD))
    else {
        return Ok(None);
    };
    Reader::payload_reader(plugin)
        .f32_at(GAIN_VALUE_OFFSET)
        .map(Some)
}

/// Decodes gain and the first two sends of `instrument`.
pub fn decode(reader: &Reader<'_>, instrument: &str) -> DecodeResult<ChannelStrip> {
    let start = reader.require(instrument.as_bytes(), "instrument marker", 0)?;
    let chunks = sub_chunks_at(reader, start)?;
    let send = |index: usize| -> DecodeResult<u32> {
        let chunk = chunks.get(index).ok_or_else(|| {
            DecodeError::tag_not_found(reader.address(start), "channel strip send")
        })?;
        Reader::payload_reader(chunk).u32_at(SEND_LEVEL_OFFSET)
    };

    Ok(ChannelStrip {
        gain: gain(&chunks)?,
        send1: send(0)?,
        send2: send(1)?,
    })
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}
