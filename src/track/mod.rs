#![doc = r#"
Track assembly

Tracks are keyed by the track id found in arrangement events. A track's
[`notes`](Track::notes) are the union of its regions' notes moved to absolute
time, in arrangement order.

Labels come from the track layout: the `n`th active
[`TrackSlot`] labels track id `n` (starting at 1).
"#]

mod builder;
pub use builder::*;

mod label;
pub use label::*;

use std::collections::BTreeMap;

use crate::{
    arrangement,
    diagnostic::Decoded,
    note::Note,
    reader::{DecodeResult, Reader},
    region::Region,
};

/// Tracks keyed by track id
pub type Tracks = BTreeMap<u8, Track>;

/// What a track holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrackKind {
    /// Software instrument regions with notes
    Instrument,
    /// Audio regions. Their content is not decoded.
    Audio,
    /// Labelled, but no regions
    Empty,
}

/// A decoded track.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Track {
    pub(crate) id: u8,
    pub(crate) kind: TrackKind,
    pub(crate) label: Option<String>,
    pub(crate) tag: Option<u16>,
    pub(crate) regions: Vec<Region>,
    pub(crate) notes: Vec<Note>,
}

impl Track {
    /// Create an empty track of the given kind
    pub const fn new(id: u8, kind: TrackKind) -> Self {
        Self {
            id,
            kind,
            label: None,
            tag: None,
            regions: Vec::new(),
            notes: Vec::new(),
        }
    }
    /// Track id
    pub const fn id(&self) -> u8 {
        self.id
    }
    /// Track kind
    pub const fn kind(&self) -> TrackKind {
        self.kind
    }
    /// Display name from the track layout
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
    /// Label tag from the track layout
    pub const fn tag(&self) -> Option<u16> {
        self.tag
    }
    /// Regions in arrangement order
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }
    /// Notes in absolute ticks
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }
}

/// Decodes the arrangement, every region and the track layout into tracks.
pub fn decode(reader: &Reader<'_>) -> DecodeResult<Decoded<Tracks>> {
    let events = arrangement::decode(reader)?;
    let slots = slots(reader)?;

    let mut builder = TracksBuilder::default();
    for event in &events {
        builder.handle_event(reader, event)?;
    }
    builder.apply_labels(&slots);
    Ok(builder.build())
}
