use core::fmt;

#[doc = r#"
A single note decoded from a region body.

`time` is in ticks. Inside a [`Region`](crate::region::Region) it is relative
to the region start; inside a [`Track`](crate::track::Track) it is absolute.

# Example
```rust
# use bandfile::prelude::*;
let notes = [Note::new(-10, 100, 60, 20), Note::new(0, 100, 62, 480)];

let cropped = bandfile::note::crop(&notes, 240);

assert_eq!(cropped, [Note::new(0, 100, 62, 240)]);
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Note {
    /// Start, in ticks
    pub time: i64,
    /// Velocity, 0-127
    pub velocity: u8,
    /// MIDI pitch, 0-127
    pub pitch: u8,
    /// Length, in ticks
    pub duration: u32,
}

impl Note {
    /// Create a new note
    pub const fn new(time: i64, velocity: u8, pitch: u8, duration: u32) -> Self {
        Self {
            time,
            velocity,
            pitch,
            duration,
        }
    }

    /// Tick at which the note is released
    pub const fn end(&self) -> i64 {
        self.time + self.duration as i64
    }

    /// Returns the same note moved by `ticks`
    pub const fn shifted(self, ticks: i64) -> Self {
        Self {
            time: self.time + ticks,
            ..self
        }
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}+{} v{}",
            self.pitch, self.time, self.duration, self.velocity
        )
    }
}

/// Keeps the notes sounding inside `[0, length)`.
///
/// Notes starting before zero or at/after `length` are dropped, and every kept
/// note is shortened so it ends no later than `length`. Order is preserved.
/// Cropping twice with the same length changes nothing.
pub fn crop(notes: &[Note], length: u32) -> Vec<Note> {
    let length = length as i64;
    notes
        .iter()
        .filter(|n| n.time >= 0 && n.time < length)
        .map(|n| {
            let mut n = *n;
            if n.end() > length {
                n.duration = (length - n.time) as u32;
            }
            n
        })
        .collect()
}

/// Repeats a cropped pattern of `length` ticks until `loop_time`.
///
/// Copies start at `length`, `2 * length`, ... and any note reaching past
/// `loop_time` is shortened. The first `length` ticks of the result are the
/// pattern itself.
pub fn replicate(pattern: &[Note], length: u32, loop_time: u32) -> Vec<Note> {
    let base = crop(pattern, length.min(loop_time));
    if length == 0 || base.is_empty() {
        return base;
    }

    let loop_end = loop_time as i64;
    let mut out = base.clone();
    let mut start = length as i64;
    while start < loop_end {
        for note in &base {
            let copy = note.shifted(start);
            if copy.time >= loop_end {
                continue;
            }
            let mut copy = copy;
            if copy.end() > loop_end {
                copy.duration = (loop_end - copy.time) as u32;
            }
            out.push(copy);
        }
        start += length as i64;
    }
    out
}

#[test]
fn crop_drops_outside_and_clamps() {
    use pretty_assertions::assert_eq;
    let notes = [
        Note::new(-5, 90, 60, 10),
        Note::new(0, 90, 62, 100),
        Note::new(400, 90, 64, 200),
        Note::new(480, 90, 65, 10),
    ];
    let cropped = crop(&notes, 480);
    assert_eq!(
        cropped,
        [Note::new(0, 90, 62, 100), Note::new(400, 90, 64, 80)]
    );
}

#[test]
fn crop_is_idempotent() {
    use pretty_assertions::assert_eq;
    let notes = [
        Note::new(-1, 1, 1, 5),
        Note::new(10, 1, 2, 1000),
        Note::new(300, 1, 3, 1),
        Note::new(900, 1, 4, 1),
    ];
    let once = crop(&notes, 500);
    assert_eq!(crop(&once, 500), once);
}

#[test]
fn crop_to_nothing_is_empty() {
    assert!(crop(&[Note::new(600, 1, 1, 1)], 480).is_empty());
    assert!(crop(&[], 480).is_empty());
}

#[test]
fn replicate_single_note_four_times() {
    use pretty_assertions::assert_eq;
    let looped = replicate(&[Note::new(0, 100, 60, 480)], 480, 1920);
    let times: Vec<i64> = looped.iter().map(|n| n.time).collect();
    assert_eq!(times, [0, 480, 960, 1440]);
    assert!(looped.iter().all(|n| n.duration == 480));
}

#[test]
fn replicate_clamps_final_repetition() {
    use pretty_assertions::assert_eq;
    let pattern = [Note::new(0, 100, 60, 300), Note::new(300, 100, 62, 180)];
    let looped = replicate(&pattern, 480, 1200);
    assert_eq!(&looped[..2], &pattern);
    assert!(looped.iter().all(|n| n.end() <= 1200));
    assert_eq!(looped.last(), Some(&Note::new(960, 100, 60, 240)));
}

#[test]
fn replicate_shorter_loop_crops_pattern() {
    use pretty_assertions::assert_eq;
    let looped = replicate(&[Note::new(0, 1, 60, 480), Note::new(300, 1, 62, 100)], 480, 200);
    assert_eq!(looped, [Note::new(0, 1, 60, 200)]);
}
