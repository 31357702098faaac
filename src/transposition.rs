#![doc = r#"
Transposition track

The transposition chunk holds `0x30`-byte records, each starting with `0x70`:

```text
0x00  u8   0x70
0x04  u32  time (ticks + 0x9600)
0x15  u16  value (semitones * 256 + 0x3C00)
```

Records are read until one no longer starts with the lead byte.
"#]

use crate::{
    format::{
        NOTE_START_TIME_OFFSET, TRANSPOSITION_CHUNK_TAG, TRANSPOSITION_LEAD_BYTE,
        TRANSPOSITION_RECORD_SIZE, TRANSPOSITION_TIME_OFFSET, TRANSPOSITION_VALUE_BASE,
        TRANSPOSITION_VALUE_OFFSET, TRANSPOSITION_VALUE_SCALE,
    },
    reader::{ChunkFamily, DecodeResult, Reader},
};

/// A point on the transposition track.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TranspositionPoint {
    /// Ticks from the project start
    pub time: i64,
    /// Transposition in semitones
    pub value: f32,
}

/// Decodes the records of a transposition chunk payload.
pub fn decode_points(payload: &Reader<'_>) -> DecodeResult<Vec<TranspositionPoint>> {
    let mut points = Vec::new();
    let mut offset = 0;
    while payload.u8_at(offset).ok() == Some(TRANSPOSITION_LEAD_BYTE) {
        let time = payload.u32_at(offset + TRANSPOSITION_TIME_OFFSET)? as i64;
        let value = payload.u16_at(offset + TRANSPOSITION_VALUE_OFFSET)? as i32;
        points.push(TranspositionPoint {
            time: time - NOTE_START_TIME_OFFSET,
            value: (value - TRANSPOSITION_VALUE_BASE) as f32 / TRANSPOSITION_VALUE_SCALE,
        });
        offset += TRANSPOSITION_RECORD_SIZE;
    }
    Ok(points)
}

/// Locates the transposition chunk and decodes its points.
pub fn decode(reader: &Reader<'_>) -> DecodeResult<Vec<TranspositionPoint>> {
    let at = reader.require(TRANSPOSITION_CHUNK_TAG, "transposition", 0)?;
    let chunk = reader.read_chunk(at, ChunkFamily::EVENT)?;
    decode_points(&Reader::payload_reader(&chunk))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(time: u32, value: u16) -> Vec<u8> {
        let mut r = vec![0u8; TRANSPOSITION_RECORD_SIZE];
        r[0] = TRANSPOSITION_LEAD_BYTE;
        r[0x04..0x08].copy_from_slice(&time.to_le_bytes());
        r[0x15..0x17].copy_from_slice(&value.to_le_bytes());
        r
    }

    #[test]
    fn points_until_lead_byte_changes() {
        let mut payload = record(0x9600, 0x3C00);
        payload.extend(record(0x9600 + 3840 * 20, 0x3C00 + 2 * 256));
        payload.extend(record(0x9600 + 3840 * 28, 0x3C00 - 3 * 256));
        payload.extend([0x00; TRANSPOSITION_RECORD_SIZE]);
        payload.extend(record(0x9600, 0x3C00));

        let points = decode_points(&Reader::from_byte_slice(&payload)).unwrap();
        assert_eq!(
            points,
            [
                TranspositionPoint { time: 0, value: 0.0 },
                TranspositionPoint {
                    time: 76800,
                    value: 2.0
                },
                TranspositionPoint {
                    time: 107520,
                    value: -3.0
                },
            ]
        );
    }

    #[test]
    fn half_steps_are_fractional() {
        let payload = record(0x9600, 0x3C00 + 128);
        let points = decode_points(&Reader::from_byte_slice(&payload)).unwrap();
        assert_eq!(points[0].value, 0.5);
    }

    #[test]
    fn cut_record_is_malformed() {
        let payload = record(0x9600, 0x3C00);
        assert!(decode_points(&Reader::from_byte_slice(&payload[..0x10])).is_err());
    }
}
