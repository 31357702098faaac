#![doc = r#"
Materializing note streams as on/off event streams

Notes are walked in start order. Pending releases sit in a min-heap keyed by
`(off_time, pitch)`; before each note-on every release due at or before the
note's start is emitted. Times are written as deltas from the previous event.

```rust
# use bandfile::prelude::*;
let track = materialize(&[Note::new(0, 100, 60, 480), Note::new(240, 90, 64, 480)]);

let kinds: Vec<_> = track.absolute_events().map(|(t, m)| (t, m.pitch())).collect();
assert_eq!(kinds, [(0, 60), (240, 64), (480, 60), (720, 64)]);
```
"#]

use core::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::note::Note;

/// A note message without a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NoteMessage {
    /// A key was pressed
    NoteOn {
        /// MIDI pitch
        pitch: u8,
        /// Velocity
        velocity: u8,
    },
    /// A key was released
    NoteOff {
        /// MIDI pitch
        pitch: u8,
    },
}

impl NoteMessage {
    /// Pitch of the message
    pub const fn pitch(&self) -> u8 {
        match self {
            Self::NoteOn { pitch, .. } | Self::NoteOff { pitch } => *pitch,
        }
    }
    /// True for [`NoteMessage::NoteOn`]
    pub const fn is_note_on(&self) -> bool {
        matches!(self, Self::NoteOn { .. })
    }
}

/// A message and the ticks elapsed since the previous event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeltaEvent {
    /// Ticks since the previous event (or since the track origin)
    pub delta: u64,
    /// The message
    pub message: NoteMessage,
}

/// A delta-encoded on/off stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MidiTrack {
    /// Absolute tick the first delta counts from.
    ///
    /// Zero unless a note starts before zero.
    pub origin: i64,
    /// Events in playback order
    pub events: Vec<DeltaEvent>,
}

impl MidiTrack {
    /// Events paired with their absolute tick
    pub fn absolute_events(&self) -> impl Iterator<Item = (i64, NoteMessage)> + '_ {
        self.events.iter().scan(self.origin, |time, event| {
            *time += event.delta as i64;
            Some((*time, event.message))
        })
    }

    /// Number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if the track holds no events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

struct Emitter {
    last: i64,
    events: Vec<DeltaEvent>,
}

impl Emitter {
    fn emit(&mut self, time: i64, message: NoteMessage) {
        self.events.push(DeltaEvent {
            delta: (time - self.last) as u64,
            message,
        });
        self.last = time;
    }
}

/// Converts an absolute-time note list into a delta-encoded on/off stream.
pub fn materialize(notes: &[Note]) -> MidiTrack {
    let mut sorted = notes.to_vec();
    sorted.sort_by_key(|n| n.time);

    let origin = sorted.first().map_or(0, |n| n.time.min(0));
    let mut out = Emitter {
        last: origin,
        events: Vec::with_capacity(sorted.len() * 2),
    };
    let mut pending: BinaryHeap<Reverse<(i64, u8)>> = BinaryHeap::new();

    for note in &sorted {
        while let Some(&Reverse((off, pitch))) = pending.peek() {
            if off > note.time {
                break;
            }
            pending.pop();
            out.emit(off, NoteMessage::NoteOff { pitch });
        }
        out.emit(
            note.time,
            NoteMessage::NoteOn {
                pitch: note.pitch,
                velocity: note.velocity,
            },
        );
        pending.push(Reverse((note.end(), note.pitch)));
    }
    while let Some(Reverse((off, pitch))) = pending.pop() {
        out.emit(off, NoteMessage::NoteOff { pitch });
    }

    MidiTrack {
        origin,
        events: out.events,
    }
}
