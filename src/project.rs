#![doc = r#"
Whole-project decoding

[`Project::decode`] runs every decoder over one project buffer. Tracks are
required: if the arrangement or track layout cannot be decoded the whole decode
fails. Every other part is optional and a missing tag leaves it empty (or
`None`), while a present but malformed chunk still fails the decode.
"#]

use crate::{
    archive,
    channel_strip::{self, ChannelStrip, DEFAULT_INSTRUMENT},
    diagnostic::Decoded,
    format::{
        AUDIO_LOOP_END_TAG, AUDIO_LOOP_NAME_OFFSET, AUDIO_LOOP_TAG, CHANNEL_STRIP_PREFIX,
        DEFAULT_PRESET_MARKER, MASTER_OUTPUT_MARKER, METRONOME_FLAG_OFFSET,
    },
    reader::{DecodeResult, Reader, trimmed_text},
    sections::{self, Section},
    track::{self, Tracks},
    transposition::{self, TranspositionPoint},
};

/// Everything decoded from one project buffer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Project {
    sections: Option<Vec<Section>>,
    tracks: Tracks,
    drummers: Vec<String>,
    transposition: Vec<TranspositionPoint>,
    instrument: Option<ChannelStrip>,
    metronome: bool,
    audio_loops: Vec<String>,
    default_master_track: Option<bool>,
}

impl Project {
    /// Decodes a project buffer, reading the channel strip of [`DEFAULT_INSTRUMENT`].
    pub fn decode(bytes: &[u8]) -> DecodeResult<Decoded<Self>> {
        Self::decode_with_instrument(bytes, DEFAULT_INSTRUMENT)
    }

    /// Decodes a project buffer, reading the channel strip of `instrument`.
    pub fn decode_with_instrument(bytes: &[u8], instrument: &str) -> DecodeResult<Decoded<Self>> {
        let reader = Reader::from_byte_slice(bytes);

        let tracks = track::decode(&reader)?;
        let sections = optional(sections::decode(&reader))?;
        let drummers = optional(archive::decode(&reader))?.unwrap_or_default();
        let transposition = optional(transposition::decode(&reader))?.unwrap_or_default();
        let instrument = optional(channel_strip::decode(&reader, instrument))?;
        let metronome = metronome(&reader)?;
        let audio_loops = optional(audio_loops(&reader))?.unwrap_or_default();
        let default_master_track = optional(default_master_track(&reader))?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "decoded project: {} tracks, {} drummers, {} diagnostics",
            tracks.value.len(),
            drummers.len(),
            tracks.diagnostics.len()
        );

        Ok(tracks.map(|tracks| Self {
            sections,
            tracks,
            drummers,
            transposition,
            instrument,
            metronome,
            audio_loops,
            default_master_track,
        }))
    }

    /// Arrangement-track sections, if the project has an arrangement track
    pub fn sections(&self) -> Option<&[Section]> {
        self.sections.as_deref()
    }
    /// Tracks keyed by track id
    pub fn tracks(&self) -> &Tracks {
        &self.tracks
    }
    /// Selected drummer character of each drummer track
    pub fn drummers(&self) -> &[String] {
        &self.drummers
    }
    /// Transposition points in time order
    pub fn transposition(&self) -> &[TranspositionPoint] {
        &self.transposition
    }
    /// Gain and sends of the requested instrument, if its strip was found
    pub const fn instrument(&self) -> Option<&ChannelStrip> {
        self.instrument.as_ref()
    }
    /// True if the metronome is on
    pub const fn metronome(&self) -> bool {
        self.metronome
    }
    /// File names of referenced audio loops
    pub fn audio_loops(&self) -> &[String] {
        &self.audio_loops
    }
    /// True if the master channel strip still uses its default preset
    pub const fn default_master_track(&self) -> Option<bool> {
        self.default_master_track
    }
}

/// Treats a missing tag as an absent value.
fn optional<T>(result: DecodeResult<T>) -> DecodeResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_tag_not_found() => {
            #[cfg(feature = "tracing")]
            tracing::debug!("skipping optional part: {e}");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Reads the metronome flag from the project header.
pub fn metronome(reader: &Reader<'_>) -> DecodeResult<bool> {
    Ok(reader.u8_at(METRONOME_FLAG_OFFSET)? & 1 != 0)
}

/// File names of every audio-loop reference in the buffer.
///
/// A reference without a following end tag is skipped.
pub fn audio_loops(reader: &Reader<'_>) -> DecodeResult<Vec<String>> {
    let mut loops = Vec::new();
    let mut from = 0;
    while let Some(at) = reader.find(AUDIO_LOOP_TAG, from) {
        let Some(end) = reader.find(AUDIO_LOOP_END_TAG, at) else {
            #[cfg(feature = "tracing")]
            tracing::warn!("unterminated audio loop reference at {:#x}", reader.address(at));
            break;
        };
        let name_at = (at + AUDIO_LOOP_NAME_OFFSET).min(end);
        loops.push(trimmed_text(reader.window(name_at, end)?.bytes()));
        from = at + AUDIO_LOOP_TAG.len();
    }
    Ok(loops)
}

/// True if `Default` appears in the first channel-strip sub-chunk after the master output.
pub fn default_master_track(reader: &Reader<'_>) -> DecodeResult<bool> {
    let master = reader.require(MASTER_OUTPUT_MARKER, "master output", 0)?;
    let start = reader.require(CHANNEL_STRIP_PREFIX, "master channel strip", master)?;
    let end = reader
        .find(CHANNEL_STRIP_PREFIX, start + CHANNEL_STRIP_PREFIX.len())
        .unwrap_or(reader.len());
    Ok(reader
        .find_within(DEFAULT_PRESET_MARKER, start, end)
        .is_some())
}
