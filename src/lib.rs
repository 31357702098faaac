#![doc = r#"
Read-only decoder for the binary `ProjectData` container written by a consumer
music-production application.

The container is an opaque buffer of tagged chunks. This crate scans it for
fixed byte-pattern tags, reads the length-prefixed chunks found at those
addresses and decodes the records inside them into typed values:

- [`ArrangementEvent`](crate::arrangement::ArrangementEvent)s placing regions on tracks
- [`Region`](crate::region::Region)s with cropped, loop-replicated [`Note`](crate::note::Note)s
- [`Track`](crate::track::Track)s keyed by track id
- section markers, transposition points, channel-strip gain and sends
- drummer selections stored in an embedded keyed-archive property list

Every decoder is a pure function over a borrowed `&[u8]`.

# Example
```rust,no_run
use bandfile::prelude::*;

let bytes = std::fs::read("Project.band/Alternatives/000/ProjectData").unwrap();
let decoded = Project::decode(&bytes).unwrap();

for (id, track) in decoded.value.tracks() {
    println!("{id}: {:?} ({} notes)", track.label(), track.notes().len());
}
for diagnostic in &decoded.diagnostics {
    eprintln!("{diagnostic}");
}
```
"#]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod archive;
pub mod arrangement;
pub mod channel_strip;
pub mod diagnostic;
pub mod format;
pub mod metadata;
pub mod midi;
pub mod note;
pub mod project;
pub mod reader;
pub mod region;
pub mod sections;
pub mod timing;
pub mod track;
pub mod transposition;

#[doc = r#"
Common re-exports when working with decoded projects
"#]
pub mod prelude {
    pub use crate::archive::{ArchiveError, KeyedMap, ObjectArchive, decode_drummers};
    pub use crate::arrangement::{ArrangementEvent, EventId};
    pub use crate::channel_strip::ChannelStrip;
    pub use crate::diagnostic::{Decoded, Diagnostic};
    pub use crate::midi::{DeltaEvent, MidiTrack, NoteMessage, materialize};
    pub use crate::note::Note;
    pub use crate::project::Project;
    pub use crate::reader::{
        Chunk, ChunkFamily, DecodeError, DecodeErrorKind, DecodeResult, LengthWidth, Reader,
    };
    pub use crate::region::{Region, RegionHeader, RegionOutcome};
    pub use crate::sections::Section;
    pub use crate::timing::TimeSignature;
    pub use crate::track::{Track, TrackKind, TrackSlot, Tracks};
    pub use crate::transposition::TranspositionPoint;
}
