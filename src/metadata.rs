#![doc = r#"
Readers for the property lists stored next to the project buffer

The metadata plist is a plain dictionary holding the song key and its gender.
The display-state plist records, among window state, whether the arrangement
track is shown:

```text
screensetDictArray[0].layoutDictArray[0].docwWindowState.udataArrange[0x28]
    0x41  shown
    0x23  hidden
```

Parsing the files is left to [`plist`]; these functions only walk the parsed
values.
"#]

use plist::{Dictionary, Value};

use crate::archive::ArchiveError;

const SONG_KEY: &str = "SongKey";
const SONG_GENDER_KEY: &str = "SongGenderKey";

const ARRANGE_VISIBILITY_OFFSET: usize = 0x28;
const ARRANGE_SHOWN: u8 = 0x41;

fn dictionary<'a>(value: &'a Value, at: &'static str) -> Result<&'a Dictionary, ArchiveError> {
    value.as_dictionary().ok_or(ArchiveError::NotADictionary(at))
}

fn string_entry<'a>(value: &'a Value, key: &'static str) -> Result<&'a str, ArchiveError> {
    dictionary(value, "metadata")?
        .get(key)
        .ok_or_else(|| ArchiveError::MissingKey(key.to_string()))?
        .as_string()
        .ok_or(ArchiveError::NotAString(key))
}

fn first_of<'a>(dict: &'a Dictionary, key: &'static str) -> Result<&'a Value, ArchiveError> {
    dict.get(key)
        .and_then(Value::as_array)
        .and_then(|array| array.first())
        .ok_or_else(|| ArchiveError::MissingKey(format!("{key}[0]")))
}

/// The song key, e.g. `"G"`
pub fn song_key(metadata: &Value) -> Result<&str, ArchiveError> {
    string_entry(metadata, SONG_KEY)
}

/// The song key's gender, `"major"` or `"minor"`
pub fn key_gender(metadata: &Value) -> Result<&str, ArchiveError> {
    string_entry(metadata, SONG_GENDER_KEY)
}

/// True if the arrangement track is shown in the first screenset's layout.
pub fn arrangement_visible(display_state: &Value) -> Result<bool, ArchiveError> {
    let root = dictionary(display_state, "display state")?;
    let screenset = dictionary(first_of(root, "screensetDictArray")?, "screenset")?;
    let layout = dictionary(first_of(screenset, "layoutDictArray")?, "layout")?;
    let window = layout
        .get("docwWindowState")
        .ok_or_else(|| ArchiveError::MissingKey("docwWindowState".to_string()))?;
    let arrange = dictionary(window, "docwWindowState")?
        .get("udataArrange")
        .and_then(Value::as_data)
        .ok_or_else(|| ArchiveError::MissingKey("udataArrange".to_string()))?;

    arrange
        .get(ARRANGE_VISIBILITY_OFFSET)
        .map(|&flag| flag == ARRANGE_SHOWN)
        .ok_or_else(|| ArchiveError::MissingKey(format!("udataArrange[{ARRANGE_VISIBILITY_OFFSET:#x}]")))
}
