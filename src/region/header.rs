use crate::{
    format::{
        HEADER_LENGTH_BASE, HEADER_NAME_LENGTH_OFFSET, HEADER_NAME_OFFSET,
        HEADER_START_OFFSET_BASE,
    },
    reader::{DecodeResult, Reader, trimmed_text},
};

#[doc = r#"
Metadata stored ahead of a region body.

# Layout

```text
0x34        u16  name length
0x36        ..   name, padded to an even length
0x3A + pad  u32  start offset (ticks trimmed from the region start)
0x72 + pad  u32  region length (ticks)
```

`pad` is the name length rounded up to the next even number.
"#]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegionHeader {
    /// Display name of the region
    pub name: String,
    /// Length of the region in ticks
    pub region_length: u32,
    /// Ticks trimmed from the start of the recorded material
    pub start_offset: u32,
}

impl RegionHeader {
    /// Decodes the header bytes found between a header tag and its body tag.
    pub fn parse(header: &Reader<'_>) -> DecodeResult<Self> {
        let name_length = header.u16_at(HEADER_NAME_LENGTH_OFFSET)? as usize;
        let padded = name_length + name_length % 2;
        let name = trimmed_text(header.slice(HEADER_NAME_OFFSET, name_length)?);
        let start_offset = header.u32_at(HEADER_START_OFFSET_BASE + padded)?;
        let region_length = header.u32_at(HEADER_LENGTH_BASE + padded)?;

        Ok(Self {
            name,
            region_length,
            start_offset,
        })
    }
}
