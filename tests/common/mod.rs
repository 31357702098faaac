//! Builds synthetic project buffers byte for byte.
//!
//! Event ids must not start with `0x04`: the arrangement and track layout tags
//! are the region body and header tags followed by `0x04`.
#![allow(dead_code)]

use bandfile::format::*;

pub const HEADER_AREA: usize = 0x200;

/// Stored start of an event placed at `ticks`
pub const fn event_start(ticks: u32) -> u32 {
    ticks + EVENT_START_TIME_OFFSET as u32
}

/// Stored time of a note at `ticks`
pub const fn note_time(ticks: u64) -> u64 {
    ticks + NOTE_START_TIME_OFFSET as u64
}

fn put_u16(buf: &mut [u8], at: usize, v: u16) {
    buf[at..at + 2].copy_from_slice(&v.to_le_bytes());
}

fn put_u32(buf: &mut [u8], at: usize, v: u32) {
    buf[at..at + 4].copy_from_slice(&v.to_le_bytes());
}

/// An event-family chunk: tag, u64 length at `0x1C`, payload at `0x24`.
pub fn event_chunk(tag: &[u8], payload: &[u8]) -> Vec<u8> {
    let mut c = tag.to_vec();
    c.resize(0x24, 0);
    c[0x1C..0x24].copy_from_slice(&(payload.len() as u64).to_le_bytes());
    c.extend_from_slice(payload);
    c
}

/// One `0x50`-byte arrangement record.
pub fn event_record(kind: u32, start: u32, track: u8, loop_time: Option<u32>, id: [u8; 4]) -> Vec<u8> {
    let mut r = vec![0u8; ARRANGEMENT_RECORD_SIZE];
    put_u32(&mut r, 0x00, kind);
    put_u32(&mut r, 0x04, start);
    r[0x14] = track;
    put_u32(&mut r, 0x1C, loop_time.unwrap_or(NO_LOOP_VALUE));
    r[0x20..0x24].copy_from_slice(&id);
    r
}

/// Records followed by the end-of-list sentinel
pub fn record_list(records: &[Vec<u8>]) -> Vec<u8> {
    let mut payload: Vec<u8> = records.concat();
    payload.extend_from_slice(&END_OF_LIST_SENTINEL);
    payload
}

/// One 32-byte note record with a stored (offset) time.
pub fn note_record(stored_time: u64, velocity: u8, pitch: u8, duration: u32) -> Vec<u8> {
    let mut r = vec![0u8; NOTE_RECORD_SIZE];
    r[0] = 0x90;
    r[0x04..0x0B].copy_from_slice(&stored_time.to_le_bytes()[..7]);
    r[0x0B] = velocity;
    r[0x0C] = pitch;
    put_u32(&mut r, 0x1C, duration);
    r
}

/// A 16-byte record the body decoder skips.
pub fn skipped_record(opcode: u8) -> Vec<u8> {
    let mut r = vec![0u8; BODY_RECORD_STRIDE];
    r[0] = opcode;
    r[4..16].fill(0x5A);
    r
}

/// A region header with optional take selectors (one flag byte each).
pub fn region_header(id: [u8; 4], name: &str, start_offset: u32, length: u32, takes: &[bool]) -> Vec<u8> {
    let padded = name.len() + name.len() % 2;
    let mut h = vec![0u8; HEADER_LENGTH_BASE + padded + 4];
    h[..EVENT_HEADER_TAG.len()].copy_from_slice(EVENT_HEADER_TAG);
    h[EVENT_HEADER_TAG.len()..EVENT_HEADER_TAG.len() + 4].copy_from_slice(&id);
    put_u16(&mut h, HEADER_NAME_LENGTH_OFFSET, name.len() as u16);
    h[HEADER_NAME_OFFSET..HEADER_NAME_OFFSET + name.len()].copy_from_slice(name.as_bytes());
    put_u32(&mut h, HEADER_START_OFFSET_BASE + padded, start_offset);
    put_u32(&mut h, HEADER_LENGTH_BASE + padded, length);
    for &selected in takes {
        let mut entry = vec![0u8; TRACK_ENTRY_SIZE];
        entry[..TRACK_ENTRY_TAG.len()].copy_from_slice(TRACK_ENTRY_TAG);
        entry[TAKE_SELECTED_FLAG_OFFSET] = selected as u8;
        h.extend(entry);
    }
    h
}

/// A region body chunk
pub fn region_body(id: [u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut tag = EVENT_BODY_TAG.to_vec();
    tag.extend_from_slice(&id);
    event_chunk(&tag, payload)
}

/// A label chunk for `tag`
pub fn label_chunk(tag: u16, name: &str) -> Vec<u8> {
    let mut c = LABEL_CHUNK_TAG.to_vec();
    c.extend_from_slice(&tag.to_le_bytes());
    c.resize(0x0C, 0);
    c.extend_from_slice(&(name.len() as u16).to_le_bytes());
    c.extend_from_slice(name.as_bytes());
    c
}

/// The layout header and its contiguous track entries
pub fn track_layout(tags: &[u16]) -> Vec<u8> {
    let mut l = TRACK_LAYOUT_TAG.to_vec();
    l.resize(0x20, 0);
    for &tag in tags {
        let mut entry = vec![0u8; TRACK_ENTRY_SIZE];
        entry[..TRACK_ENTRY_TAG.len()].copy_from_slice(TRACK_ENTRY_TAG);
        put_u16(&mut entry, TRACK_ENTRY_LABEL_TAG_OFFSET, tag);
        l.extend(entry);
    }
    l.extend_from_slice(&[0xEE; 8]);
    l
}

/// Section marker chunk for `(key, duration)` pairs plus its terminator
pub fn section_chunk(markers: &[(u32, u32)]) -> Vec<u8> {
    let mut payload = vec![0u8; SECTION_RECORD_SIZE * (markers.len() + 1)];
    for (i, &(key, duration)) in markers.iter().enumerate() {
        let at = i * SECTION_RECORD_SIZE;
        put_u32(&mut payload, at + SECTION_KEY_OFFSET, key);
        put_u32(&mut payload, at + SECTION_DURATION_OFFSET, duration);
    }
    event_chunk(SECTION_CHUNK_TAG, &payload)
}

/// Section text chunk
pub fn text_chunk(key: u32, kind: u8, text: &str) -> Vec<u8> {
    let mut c = TEXT_CHUNK_TAG.to_vec();
    c.resize(TEXT_OFFSET, 0);
    put_u32(&mut c, TEXT_KEY_OFFSET, key);
    put_u32(&mut c, 0x1C, (TEXT_OFFSET - 0x24 + text.len() + 1) as u32);
    c[TEXT_KIND_OFFSET] = kind;
    c.extend_from_slice(text.as_bytes());
    c.push(0);
    c
}

/// Transposition chunk of `(ticks, semitones)` points
pub fn transposition_chunk(points: &[(u32, i16)]) -> Vec<u8> {
    let mut payload = Vec::new();
    for &(time, semitones) in points {
        let mut r = vec![0u8; TRANSPOSITION_RECORD_SIZE];
        r[0] = TRANSPOSITION_LEAD_BYTE;
        put_u32(&mut r, TRANSPOSITION_TIME_OFFSET, time + NOTE_START_TIME_OFFSET as u32);
        let value = (TRANSPOSITION_VALUE_BASE + semitones as i32 * 256) as u16;
        put_u16(&mut r, TRANSPOSITION_VALUE_OFFSET, value);
        payload.extend(r);
    }
    payload.extend(vec![0u8; TRANSPOSITION_RECORD_SIZE]);
    event_chunk(TRANSPOSITION_CHUNK_TAG, &payload)
}

fn strip_sub_chunk(payload: &[u8]) -> Vec<u8> {
    let mut c = CHANNEL_STRIP_TAG.to_vec();
    c.resize(0x24, 0);
    put_u32(&mut c, 0x1C, payload.len() as u32);
    c.extend_from_slice(payload);
    c
}

/// An instrument channel strip with two sends and an optional gain plugin
pub fn channel_strip(marker: &str, sends: [u32; 2], gain: Option<f32>) -> Vec<u8> {
    let mut s = marker.as_bytes().to_vec();
    s.extend_from_slice(&[0; 6]);
    for level in sends {
        let mut p = vec![0u8; 0x20];
        put_u32(&mut p, SEND_LEVEL_OFFSET, level);
        s.extend(strip_sub_chunk(&p));
    }
    if let Some(gain) = gain {
        let mut p = vec![0u8; GAIN_VALUE_OFFSET + 4];
        p[0x10..0x14].copy_from_slice(GAIN_KEYWORD);
        p[GAIN_VALUE_OFFSET..GAIN_VALUE_OFFSET + 4].copy_from_slice(&gain.to_le_bytes());
        s.extend(strip_sub_chunk(&p));
    }
    s.extend_from_slice(CHANNEL_STRIP_END_TAG);
    s.extend_from_slice(&[0; 4]);
    s
}

/// A master strip, with or without the default preset
pub fn master_strip(default: bool) -> Vec<u8> {
    let mut s = MASTER_OUTPUT_MARKER.to_vec();
    s.extend_from_slice(&[0; 2]);
    s.extend_from_slice(CHANNEL_STRIP_PREFIX);
    s.extend_from_slice(if default { b"..Default.." } else { b"..Custom..." });
    s.extend_from_slice(CHANNEL_STRIP_PREFIX);
    s.extend_from_slice(&[0; 4]);
    s
}

/// The drummer chunk wrapping a binary property list
pub fn drummer_chunk(archive: &plist::Value) -> Vec<u8> {
    let mut c = DRUMMER_CHUNK_TAG.to_vec();
    c.extend_from_slice(&[0; 3]);
    archive
        .to_writer_binary(&mut c)
        .expect("archive serializes");
    c.extend_from_slice(&[0; 6]);
    c
}

/// An audio loop reference
pub fn audio_loop(name: &str) -> Vec<u8> {
    let mut c = AUDIO_LOOP_TAG.to_vec();
    c.resize(AUDIO_LOOP_NAME_OFFSET, 0);
    c.extend_from_slice(name.as_bytes());
    c.extend_from_slice(&[0; 2]);
    c.extend_from_slice(AUDIO_LOOP_END_TAG);
    c
}

/// Concatenates parts behind a zeroed project header.
#[derive(Debug, Clone)]
pub struct ProjectBuilder {
    buf: Vec<u8>,
}

impl Default for ProjectBuilder {
    fn default() -> Self {
        Self {
            buf: vec![0; HEADER_AREA],
        }
    }
}

impl ProjectBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metronome(mut self, on: bool) -> Self {
        self.buf[METRONOME_FLAG_OFFSET] = on as u8;
        self
    }

    pub fn part(mut self, bytes: impl AsRef<[u8]>) -> Self {
        self.buf.extend_from_slice(bytes.as_ref());
        self.buf.extend_from_slice(&[0; 4]);
        self
    }

    pub fn arrangement(self, records: &[Vec<u8>]) -> Self {
        self.part(event_chunk(ARRANGEMENT_CHUNK_TAG, &record_list(records)))
    }

    /// A flat region whose body holds `body` followed by the sentinel
    pub fn region(self, id: [u8; 4], name: &str, start_offset: u32, length: u32, body: &[Vec<u8>]) -> Self {
        self.part(region_header(id, name, start_offset, length, &[]))
            .part(region_body(id, &record_list(body)))
    }

    /// A take folder listing `takes`; `selected` flags one of its selectors
    pub fn take_folder(self, id: [u8; 4], takes: &[[u8; 4]], selected: Option<usize>) -> Self {
        let flags: Vec<bool> = (0..takes.len()).map(|i| Some(i) == selected).collect();
        let records: Vec<Vec<u8>> = takes
            .iter()
            .map(|&take| event_record(INSTRUMENT_EVENT_KIND, event_start(0), 0, None, take))
            .collect();
        self.part(region_header(id, "Takes", 0, 3840, &flags))
            .part(region_body(id, &record_list(&records)))
    }

    pub fn build(self) -> Vec<u8> {
        self.buf
    }
}
