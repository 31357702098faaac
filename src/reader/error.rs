use crate::archive::ArchiveError;
use thiserror::Error;

#[doc = r#"
A set of errors that can occur while decoding a project buffer.

Structural failures abort the enclosing decode. The `position` is the address
of the chunk (or field) being decoded when the failure happened.
"#]
#[derive(Debug, Error)]
#[error("Decoding at Position {position:#x}, {kind}")]
pub struct DecodeError {
    position: usize,
    pub(crate) kind: DecodeErrorKind,
}

/// A kind of error that a decoder can produce
#[derive(Debug, Error)]
pub enum DecodeErrorKind {
    /// A required tag is absent from the buffer.
    #[error("Tag not found: {0}")]
    TagNotFound(&'static str),
    /// A declared length or a fixed field reads past the end of the buffer.
    #[error("Malformed chunk: needs {declared} bytes, {available} available")]
    MalformedChunk {
        /// Bytes the chunk or field requires
        declared: usize,
        /// Bytes actually left in the buffer
        available: usize,
    },
    /// The arrangement chunk ended before its end-of-list sentinel.
    #[error("Arrangement record list is not terminated")]
    TruncatedArrangement,
    /// A region body ended in the middle of a note record.
    #[error("Region body ends inside a note record")]
    TruncatedBody,
    /// The embedded keyed archive is missing an expected key or object.
    #[error("Malformed archive: {0}")]
    MalformedArchive(#[from] ArchiveError),
}

impl DecodeErrorKind {
    pub(crate) const fn malformed(declared: usize, available: usize) -> Self {
        Self::MalformedChunk {
            declared,
            available,
        }
    }
}

impl DecodeError {
    /// Create a decode error from a position and kind
    pub const fn new(position: usize, kind: DecodeErrorKind) -> Self {
        Self { position, kind }
    }
    /// True if a required tag could not be found
    pub const fn is_tag_not_found(&self) -> bool {
        matches!(self.kind, DecodeErrorKind::TagNotFound(_))
    }
    /// Returns the error kind of the decoder.
    pub fn error_kind(&self) -> &DecodeErrorKind {
        &self.kind
    }
    /// Returns the position where the decode error occurred.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Create a new tag-not-found error
    pub const fn tag_not_found(position: usize, tag: &'static str) -> Self {
        Self {
            position,
            kind: DecodeErrorKind::TagNotFound(tag),
        }
    }

    /// Create a new out of bounds error
    pub const fn oob(position: usize, declared: usize, available: usize) -> Self {
        Self {
            position,
            kind: DecodeErrorKind::malformed(declared, available),
        }
    }
}

impl From<ArchiveError> for DecodeError {
    fn from(value: ArchiveError) -> Self {
        Self::new(0, DecodeErrorKind::MalformedArchive(value))
    }
}

/// The Decode Result type (see [`DecodeError`])
pub type DecodeResult<T> = Result<T, DecodeError>;

#[test]
fn error_display_carries_position() {
    use pretty_assertions::assert_eq;
    let err = DecodeError::oob(0x40, 0x100, 0x20);
    assert_eq!(
        err.to_string(),
        "Decoding at Position 0x40, Malformed chunk: needs 256 bytes, 32 available"
    );
    assert!(!err.is_tag_not_found());

    let err = DecodeError::tag_not_found(0, "arrangement");
    assert!(err.is_tag_not_found());
    assert_eq!(err.to_string(), "Decoding at Position 0x0, Tag not found: arrangement");
}
