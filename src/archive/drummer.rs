use std::io::Cursor;

use plist::Value;

use super::{ArchiveError, ObjectArchive};
use crate::{
    format::{BPLIST_MAGIC, DRUMMER_CHUNK_TAG, DRUMMER_END_TAG},
    reader::{DecodeError, DecodeErrorKind, DecodeResult, Reader},
};

const BASE_MODEL_KEY: &str = "genInstDrummerBaseModel.state";
const TRACK_STATES_KEY: &str = "drummerModelTrackStates";
const CHARACTER_KEY: &str = "selectedCharacterIdentifier";

/// The binary property list embedded after the drummer chunk tag.
///
/// Runs from the `bplist00` magic to the next region-header tag prefix with
/// trailing NULs removed. Returns the absolute address of the magic too.
pub fn archive_bytes<'a>(reader: &Reader<'a>) -> DecodeResult<(usize, &'a [u8])> {
    let chunk_at = reader.require(DRUMMER_CHUNK_TAG, "drummer chunk", 0)?;
    let start = reader.require(BPLIST_MAGIC, "drummer archive", chunk_at)?;
    let end = reader.require(DRUMMER_END_TAG, "drummer archive end", start)?;

    let bytes = reader.window(start, end)?.bytes();
    let len = bytes.iter().rposition(|&b| b != 0).map_or(0, |last| last + 1);
    Ok((reader.address(start), &bytes[..len]))
}

#[doc = r#"
Selected drummer character for every drummer track, in the archive's track-state order.

Walks `$top.root` → `genInstDrummerBaseModel.state` →
`drummerModelTrackStates`, resolves each track state and reads its
`selectedCharacterIdentifier`.
"#]
pub fn decode_drummers(plist: &Value) -> Result<Vec<String>, ArchiveError> {
    let archive = ObjectArchive::from_plist(plist)?;
    let root = archive.resolve_root()?;
    let base_model = archive.resolve_node(root.require(BASE_MODEL_KEY)?)?;
    let track_states = archive.resolve_node(base_model.require(TRACK_STATES_KEY)?)?;

    track_states
        .iter()
        .map(|(_, state)| {
            let state = archive.resolve_node(state)?;
            state
                .require(CHARACTER_KEY)?
                .as_string()
                .map(str::to_string)
                .ok_or(ArchiveError::NotAString(CHARACTER_KEY))
        })
        .collect()
}

/// Locates, parses and walks the drummer archive of a project buffer.
pub fn decode(reader: &Reader<'_>) -> DecodeResult<Vec<String>> {
    let (at, bytes) = archive_bytes(reader)?;
    let malformed = |err: ArchiveError| DecodeError::new(at, DecodeErrorKind::MalformedArchive(err));

    let plist = Value::from_reader(Cursor::new(bytes)).map_err(|e| malformed(e.into()))?;
    #[cfg(feature = "tracing")]
    tracing::debug!("drummer archive at {:#x}, {} bytes", at, bytes.len());

    decode_drummers(&plist).map_err(malformed)
}
