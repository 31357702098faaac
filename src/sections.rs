#![doc = r#"
Arrangement-track sections

The section-marker chunk is an [event](crate::reader::ChunkFamily::EVENT)
chunk of `0x30`-byte records, the last of which terminates the list:

```text
0x10  u32  text key
0x1C  u32  duration in ticks
```

Section names live in separate text chunks following the marker chunk:

```text
0x0A  u32  text key
0x1C  u32  text end - 0x24
0x3C  u8   text kind (0x13 = rich text)
0x48  ..   text
```

Rich text is reduced to its plain content by dropping line breaks, groups
and control words.
"#]

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::{
    format::{
        SECTION_CHUNK_TAG, SECTION_DURATION_OFFSET, SECTION_KEY_OFFSET, SECTION_RECORD_SIZE,
        TEXT_CHUNK_TAG, TEXT_KEY_OFFSET, TEXT_KIND_OFFSET, TEXT_KIND_RTF, TEXT_OFFSET,
    },
    reader::{ChunkFamily, DecodeError, DecodeResult, Reader},
};

/// A named section of the arrangement track
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Section {
    /// Displayed section name
    pub label: String,
    /// Length in ticks
    pub duration: u32,
}

/// A section marker before its text is looked up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionMarker {
    /// Key of the text chunk holding the name
    pub key: u32,
    /// Length in ticks
    pub duration: u32,
}

/// Decodes the markers of a section chunk payload. The terminating record is not returned.
pub fn decode_markers(payload: &Reader<'_>) -> DecodeResult<Vec<SectionMarker>> {
    let records_end = payload.len().saturating_sub(SECTION_RECORD_SIZE);
    (0..records_end)
        .step_by(SECTION_RECORD_SIZE)
        .map(|at| {
            Ok(SectionMarker {
                key: payload.u32_at(at + SECTION_KEY_OFFSET)?,
                duration: payload.u32_at(at + SECTION_DURATION_OFFSET)?,
            })
        })
        .collect()
}

/// Reads the text chunk at `at` into its key and plain text.
pub fn decode_text(reader: &Reader<'_>, at: usize) -> DecodeResult<(u32, String)> {
    let key = reader.u32_at(at + TEXT_KEY_OFFSET)?;
    let kind = reader.u8_at(at + TEXT_KIND_OFFSET)?;
    let chunk = reader.read_chunk(at, ChunkFamily::CHANNEL_STRIP)?;
    let skip = TEXT_OFFSET - ChunkFamily::CHANNEL_STRIP.payload_offset;
    let raw = chunk.payload().get(skip..).unwrap_or_default();

    let text = String::from_utf8_lossy(raw);
    let text = text.trim_matches(['\0', '}']);
    let text = if kind == TEXT_KIND_RTF {
        strip_rtf(text)
    } else {
        text.to_string()
    };
    Ok((key, text.trim_matches('\0').to_string()))
}

fn rtf_patterns() -> &'static [Regex; 3] {
    static PATTERNS: OnceLock<[Regex; 3]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [r"\n", r"\{.*\}", r"\\\S*\s"].map(|p| Regex::new(p).expect("invalid regex pattern"))
    })
}

/// Crudely reduces rich text to plain text.
pub fn strip_rtf(text: &str) -> String {
    rtf_patterns()
        .iter()
        .fold(text.to_string(), |text, re| re.replace_all(&text, "").into_owned())
}

/// Locates the section markers and names them from the text chunks after them.
pub fn decode(reader: &Reader<'_>) -> DecodeResult<Vec<Section>> {
    let at = reader.require(SECTION_CHUNK_TAG, "section markers", 0)?;
    let chunk = reader.read_chunk(at, ChunkFamily::EVENT)?;
    let markers = decode_markers(&Reader::payload_reader(&chunk))?;

    let mut texts = BTreeMap::new();
    let mut from = at + TEXT_CHUNK_TAG.len();
    while let Some(text_at) = reader.find(TEXT_CHUNK_TAG, from) {
        let (key, text) = decode_text(reader, text_at)?;
        texts.insert(key, text);
        from = text_at + TEXT_CHUNK_TAG.len();
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        "{} section markers at {:#x}, {} texts",
        markers.len(),
        chunk.start_address(),
        texts.len()
    );

    markers
        .into_iter()
        .map(|marker| {
            let label = texts
                .get(&marker.key)
                .cloned()
                .ok_or_else(|| DecodeError::tag_not_found(chunk.start_address(), "section text"))?;
            Ok(Section {
                label,
                duration: marker.duration,
            })
        })
        .collect()
}
