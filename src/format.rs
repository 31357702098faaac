#![doc = r#"
Byte-exact constants of the container format.

The container is not documented. Every tag, offset and sentinel here is a fixed
part of the wire layout and must be reproduced exactly; none of them are
tunable.

# Chunk families

Chunks are introduced by a tag. Their length is stored at a fixed offset from
the tag match and the payload begins at a fixed offset after that. The offsets
differ between families, see [`ChunkFamily`](crate::reader::ChunkFamily):

| Family        | Length field   | Payload |
|---------------|----------------|---------|
| event         | `+0x1C`, u64   | `+0x24` |
| channel strip | `+0x1C`, u32   | `+0x24` |
| label         | `+0x0C`, u16   | `+0x0E` |

All integers are little-endian.
"#]

/// Terminates arrangement record lists and region bodies.
pub const END_OF_LIST_SENTINEL: [u8; 8] = [0xF1, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0x3F];

/* Arrangement (track events) */

/// Tag of the chunk holding every track event in the arrangement.
pub const ARRANGEMENT_CHUNK_TAG: &[u8] = b"\x71\x53\x76\x45\x01\x00\x17\x00\x00\x00\x04";
/// Size of one arrangement event record.
pub const ARRANGEMENT_RECORD_SIZE: usize = 0x50;
/// A loop field holding this value means the region is not looped.
pub const NO_LOOP_VALUE: u32 = 0x3FFF_FFFF;
/// Subtracted from stored event start times to make them zero-based.
pub const EVENT_START_TIME_OFFSET: i64 = 0x8700;
/// Event kind of a software-instrument (note) region.
pub const INSTRUMENT_EVENT_KIND: u32 = 32;

/* Regions */

/// Region header tag. Followed by the 4-byte event id.
pub const EVENT_HEADER_TAG: &[u8] = b"\x71\x65\x53\x4d\x02\x00\x17\x00\x00\x00";
/// Region body tag. Followed by the 4-byte event id.
pub const EVENT_BODY_TAG: &[u8] = b"\x71\x53\x76\x45\x01\x00\x17\x00\x00\x00";
/// Offset of the u16 region name length inside a header.
pub const HEADER_NAME_LENGTH_OFFSET: usize = 0x34;
/// Offset of the region name bytes inside a header.
pub const HEADER_NAME_OFFSET: usize = 0x36;
/// Offset of the playback start offset, before adding the padded name length.
pub const HEADER_START_OFFSET_BASE: usize = 0x3A;
/// Offset of the region length, before adding the padded name length.
pub const HEADER_LENGTH_BASE: usize = 0x72;
/// Subtracted from stored note (and transposition) times.
pub const NOTE_START_TIME_OFFSET: i64 = 0x9600;
/// Unrecognized body records are skipped with this stride.
pub const BODY_RECORD_STRIDE: usize = 16;
/// A note record spans two strides.
pub const NOTE_RECORD_SIZE: usize = 32;
/// Leading byte of a body holding a nested take list instead of notes.
pub const TAKE_FOLDER_LEAD_BYTE: u8 = 0x20;

/* Track layout */

/// Header preceding the contiguous run of track entries.
pub const TRACK_LAYOUT_TAG: &[u8] = b"\x71\x65\x53\x4d\x02\x00\x17\x00\x00\x00\x04";
/// Tag of a track entry. Take selectors inside a region header share it.
pub const TRACK_ENTRY_TAG: &[u8] = b"\x6b\x61\x72\x54\x04\x00\x17";
/// Size of one track entry.
pub const TRACK_ENTRY_SIZE: usize = 0x5C;
/// Offset of the u16 label tag inside a track entry.
pub const TRACK_ENTRY_LABEL_TAG_OFFSET: usize = 0x10;
/// Offset of the "currently selected" flag inside a take selector.
pub const TAKE_SELECTED_FLAG_OFFSET: usize = 0x14;
/// Label chunk tag. Followed by the u16 label tag.
pub const LABEL_CHUNK_TAG: &[u8] = b"\x65\x6d\x61\x4e\x01\x00";
/// Label of a deactivated or duplicate track slot.
pub const NO_OUTPUT_LABEL: &str = "No Output";

/* Channel strip */

/// Channel-strip sub-chunk tag.
pub const CHANNEL_STRIP_TAG: &[u8] = b"\x55\x43\x75\x41\x01\x00\x0e\x00\x00\x00\x24";
/// First seven bytes of [`CHANNEL_STRIP_TAG`].
pub const CHANNEL_STRIP_PREFIX: &[u8] = b"\x55\x43\x75\x41\x01\x00\x0e";
/// Closes the sub-chunks of one channel strip.
pub const CHANNEL_STRIP_END_TAG: &[u8] = b"OCuA";
/// Identifies the gain plugin sub-chunk.
pub const GAIN_KEYWORD: &[u8] = b"Gain";
/// Offset of the f32 gain inside the gain plugin payload.
pub const GAIN_VALUE_OFFSET: usize = 0xD8;
/// Offset of the u32 send level inside a sub-chunk payload.
pub const SEND_LEVEL_OFFSET: usize = 0x18;
/// Channel-strip name of the master output.
pub const MASTER_OUTPUT_MARKER: &[u8] = b"Output 1-2";
/// Present in the master strip while it uses the default preset.
pub const DEFAULT_PRESET_MARKER: &[u8] = b"Default";

/* Transposition */

/// Transposition chunk tag.
pub const TRANSPOSITION_CHUNK_TAG: &[u8] = b"\x71\x53\x76\x45\x01\x00\x19";
/// Size of one transposition record.
pub const TRANSPOSITION_RECORD_SIZE: usize = 0x30;
/// Every transposition record begins with this byte.
pub const TRANSPOSITION_LEAD_BYTE: u8 = 0x70;
/// Offset of the u32 time inside a transposition record.
pub const TRANSPOSITION_TIME_OFFSET: usize = 0x04;
/// Offset of the u16 value inside a transposition record.
pub const TRANSPOSITION_VALUE_OFFSET: usize = 0x15;
/// Stored value of "no transposition".
pub const TRANSPOSITION_VALUE_BASE: i32 = 0x3C00;
/// Stored units per semitone.
pub const TRANSPOSITION_VALUE_SCALE: f32 = 256.0;

/* Sections */

/// Section marker chunk tag.
pub const SECTION_CHUNK_TAG: &[u8] = b"\x71\x53\x76\x45\x01\x00\x05";
/// Size of one section marker record.
pub const SECTION_RECORD_SIZE: usize = 0x30;
/// Offset of the u32 text key inside a section marker.
pub const SECTION_KEY_OFFSET: usize = 0x10;
/// Offset of the u32 duration inside a section marker.
pub const SECTION_DURATION_OFFSET: usize = 0x1C;
/// Section text chunk tag.
pub const TEXT_CHUNK_TAG: &[u8] = b"\x71\x53\x78\x54\x01\x00\x20\x00\x00\x00";
/// Offset of the u32 key inside a text chunk.
pub const TEXT_KEY_OFFSET: usize = 0x0A;
/// Offset of the text kind byte inside a text chunk.
pub const TEXT_KIND_OFFSET: usize = 0x3C;
/// Offset of the text inside a text chunk.
pub const TEXT_OFFSET: usize = 0x48;
/// Text kind of rich text.
pub const TEXT_KIND_RTF: u8 = 0x13;

/* Drummer */

/// Precedes the drummer archive.
pub const DRUMMER_CHUNK_TAG: &[u8] = b"\x4f\x67\x6e\x53\x01";
/// Magic of a binary property list.
pub const BPLIST_MAGIC: &[u8] = b"bplist00";
/// Follows the drummer archive.
pub const DRUMMER_END_TAG: &[u8] = b"\x71\x65\x53\x4d\x02";

/* Project flags */

/// Absolute address of the metronome flag byte.
pub const METRONOME_FLAG_OFFSET: usize = 0x11C;
/// Audio loop reference tag.
pub const AUDIO_LOOP_TAG: &[u8] = b"\x4c\x46\x55\x41\x01\x11";
/// Terminates an audio loop reference.
pub const AUDIO_LOOP_END_TAG: &[u8] = b"\x50\x4d\x4f\x43";
/// Offset of the loop file name inside an audio loop reference.
pub const AUDIO_LOOP_NAME_OFFSET: usize = 0x0A;
