#![doc = r#"
Keyed-archive object graphs

A keyed archive is a property list with a flat `$objects` table and a
`$top.root` UID. Containers inside the table do not hold their members
directly: they hold parallel `NS.keys` / `NS.objects` arrays of UIDs into the
table.

```text
$top:     { root: UID(1) }
$objects: [ "$null",
            { NS.keys: [UID(2)], NS.objects: [UID(3)] },   <- 1
            "someKey",                                     <- 2
            { NS.keys: [..], NS.objects: [..] },           <- 3
          ]
```

[`ObjectArchive::resolve`] turns one container into a [`KeyedMap`] of
dereferenced keys and values, kept in `NS.keys` order. Values are not resolved any further: callers
resolve nested containers explicitly with [`ObjectArchive::resolve_node`].
The table is never modified, so cycles in the graph are harmless.
"#]

mod drummer;
pub use drummer::*;

use plist::Value;
use thiserror::Error;

/// Errors raised while walking a keyed archive
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The embedded property list could not be parsed
    #[error("Property list: {0}")]
    Plist(#[from] plist::Error),
    /// An expected key is absent
    #[error("Missing key `{0}`")]
    MissingKey(String),
    /// A UID points outside `$objects`
    #[error("UID {uid} out of range ({len} objects)")]
    UidOutOfRange {
        /// The UID
        uid: u64,
        /// Length of `$objects`
        len: usize,
    },
    /// A UID was expected
    #[error("Expected a UID at `{0}`")]
    NotAUid(&'static str),
    /// A dictionary was expected
    #[error("Expected a dictionary at `{0}`")]
    NotADictionary(&'static str),
    /// A string was expected
    #[error("Expected a string at `{0}`")]
    NotAString(&'static str),
    /// `NS.keys` and `NS.objects` differ in length
    #[error("NS.keys has {keys} entries, NS.objects has {objects}")]
    MismatchedPairs {
        /// Number of keys
        keys: usize,
        /// Number of values
        objects: usize,
    },
}

/// A resolved container: dereferenced string keys to dereferenced values.
///
/// Entries keep the archive's `NS.keys` order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KeyedMap<'a>(Vec<(String, &'a Value)>);

impl<'a> KeyedMap<'a> {
    /// Value under `key`, if present
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }
    /// Value under `key`, or [`ArchiveError::MissingKey`]
    pub fn require(&self, key: &str) -> Result<&'a Value, ArchiveError> {
        self.get(key)
            .ok_or_else(|| ArchiveError::MissingKey(key.to_string()))
    }
    /// Entries in archive order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &'a Value)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
    /// Number of entries
    pub fn len(&self) -> usize {
        self.0.len()
    }
    /// True if there are no entries
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A borrowed view of a keyed archive's object table.
#[derive(Debug, Clone, Copy)]
pub struct ObjectArchive<'a> {
    objects: &'a [Value],
    root: u64,
}

impl<'a> ObjectArchive<'a> {
    /// Reads `$objects` and `$top.root` from a parsed archive.
    pub fn from_plist(plist: &'a Value) -> Result<Self, ArchiveError> {
        let archive = plist
            .as_dictionary()
            .ok_or(ArchiveError::NotADictionary("archive"))?;
        let objects = archive
            .get("$objects")
            .ok_or_else(|| ArchiveError::MissingKey("$objects".to_string()))?
            .as_array()
            .ok_or_else(|| ArchiveError::MissingKey("$objects".to_string()))?;
        let top = archive
            .get("$top")
            .and_then(Value::as_dictionary)
            .ok_or_else(|| ArchiveError::MissingKey("$top".to_string()))?;
        let root = top
            .get("root")
            .ok_or_else(|| ArchiveError::MissingKey("$top.root".to_string()))
            .and_then(|root| uid_of(root).ok_or(ArchiveError::NotAUid("$top.root")))?;

        Ok(Self::new(objects, root))
    }

    /// Create a view over an object table
    pub const fn new(objects: &'a [Value], root: u64) -> Self {
        Self { objects, root }
    }

    /// UID of the root object
    pub const fn root(&self) -> u64 {
        self.root
    }

    /// The object with the given UID
    pub fn object(&self, uid: u64) -> Result<&'a Value, ArchiveError> {
        usize::try_from(uid)
            .ok()
            .and_then(|index| self.objects.get(index))
            .ok_or(ArchiveError::UidOutOfRange {
                uid,
                len: self.objects.len(),
            })
    }

    /// Follows a UID reference
    pub fn deref(&self, reference: &Value, at: &'static str) -> Result<&'a Value, ArchiveError> {
        let uid = uid_of(reference).ok_or(ArchiveError::NotAUid(at))?;
        self.object(uid)
    }

    /// Resolves the container with the given UID
    pub fn resolve(&self, uid: u64) -> Result<KeyedMap<'a>, ArchiveError> {
        self.resolve_node(self.object(uid)?)
    }

    /// Resolves the root container
    pub fn resolve_root(&self) -> Result<KeyedMap<'a>, ArchiveError> {
        self.resolve(self.root)
    }

    /// Resolves a container already taken from the table.
    pub fn resolve_node(&self, node: &'a Value) -> Result<KeyedMap<'a>, ArchiveError> {
        let node = node
            .as_dictionary()
            .ok_or(ArchiveError::NotADictionary("container"))?;
        let keys = node
            .get("NS.keys")
            .and_then(Value::as_array)
            .ok_or_else(|| ArchiveError::MissingKey("NS.keys".to_string()))?;
        let values = node
            .get("NS.objects")
            .and_then(Value::as_array)
            .ok_or_else(|| ArchiveError::MissingKey("NS.objects".to_string()))?;
        if keys.len() != values.len() {
            return Err(ArchiveError::MismatchedPairs {
                keys: keys.len(),
                objects: values.len(),
            });
        }

        keys.iter()
            .zip(values)
            .map(|(key, value)| -> Result<_, ArchiveError> {
                let key = self
                    .deref(key, "NS.keys")?
                    .as_string()
                    .ok_or(ArchiveError::NotAString("NS.keys"))?;
                Ok((key.to_string(), self.deref(value, "NS.objects")?))
            })
            .collect::<Result<_, _>>()
            .map(KeyedMap)
    }
}

fn uid_of(value: &Value) -> Option<u64> {
    match value {
        Value::Uid(uid) => Some(uid.get()),
        _ => None,
    }
}

/// Resolves `uid` in a bare object table.
pub fn resolve(objects: &[Value], uid: u64) -> Result<KeyedMap<'_>, ArchiveError> {
    ObjectArchive::new(objects, uid).resolve(uid)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use plist::{Dictionary, Uid};
    use pretty_assertions::assert_eq;

    pub(crate) fn uid(n: u64) -> Value {
        Value::Uid(Uid::new(n))
    }

    pub(crate) fn container(keys: &[u64], values: &[u64]) -> Value {
        let mut d = Dictionary::new();
        d.insert(
            "NS.keys".to_string(),
            Value::Array(keys.iter().map(|&k| uid(k)).collect()),
        );
        d.insert(
            "NS.objects".to_string(),
            Value::Array(values.iter().map(|&v| uid(v)).collect()),
        );
        Value::Dictionary(d)
    }

    pub(crate) fn archive(root: u64, objects: Vec<Value>) -> Value {
        let mut top = Dictionary::new();
        top.insert("root".to_string(), uid(root));
        let mut d = Dictionary::new();
        d.insert("$top".to_string(), Value::Dictionary(top));
        d.insert("$objects".to_string(), Value::Array(objects));
        Value::Dictionary(d)
    }

    fn objects() -> Vec<Value> {
        vec![
            Value::String("$null".into()),
            container(&[2, 3], &[4, 5]),
            Value::String("name".into()),
            Value::String("child".into()),
            Value::String("Kyle".into()),
            container(&[2], &[1]),
        ]
    }

    #[test]
    fn resolves_one_level() {
        let objects = objects();
        let map = resolve(&objects, 1).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("name"), Some(&Value::String("Kyle".into())));
        let child = map.require("child").unwrap();
        assert!(child.as_dictionary().is_some());
    }

    #[test]
    fn cycles_do_not_recurse() {
        let objects = objects();
        let archive = ObjectArchive::new(&objects, 1);
        let root = archive.resolve_root().unwrap();
        let child = archive.resolve_node(root.require("child").unwrap()).unwrap();
        let back = child.require("name").unwrap();
        assert!(back.as_dictionary().is_some());
        assert_eq!(archive.resolve_root().unwrap(), root);
    }

    #[test]
    fn uid_out_of_range() {
        let objects = vec![Value::String("$null".into()), container(&[9], &[0])];
        let err = resolve(&objects, 1).unwrap_err();
        assert!(matches!(err, ArchiveError::UidOutOfRange { uid: 9, len: 2 }));
        assert!(matches!(
            resolve(&objects, 7),
            Err(ArchiveError::UidOutOfRange { uid: 7, .. })
        ));
    }

    #[test]
    fn mismatched_pairs() {
        let objects = vec![container(&[0, 0], &[0])];
        assert!(matches!(
            resolve(&objects, 0),
            Err(ArchiveError::MismatchedPairs {
                keys: 2,
                objects: 1
            })
        ));
    }

    #[test]
    fn missing_root() {
        let value = Value::Dictionary(Dictionary::new());
        assert!(matches!(
            ObjectArchive::from_plist(&value),
            Err(ArchiveError::MissingKey(_))
        ));
        let value = archive(1, objects());
        assert_eq!(ObjectArchive::from_plist(&value).unwrap().root(), 1);
    }
}
