//! Non-fatal findings reported next to a successful decode.

use core::fmt;

use crate::arrangement::EventId;

/// Data that was dropped while decoding continued.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Diagnostic {
    /// A multi-take region had no selected take and was skipped.
    DroppedMultiTakeRegion {
        /// Id of the take folder's arrangement event
        event_id: EventId,
        /// Track the region was placed on
        track_id: u8,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DroppedMultiTakeRegion { event_id, track_id } => write!(
                f,
                "dropped multi-take region {event_id} on track {track_id}: no take selected"
            ),
        }
    }
}

/// A decoded value with the diagnostics collected while producing it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Decoded<T> {
    /// The (possibly partial) result
    pub value: T,
    /// Everything dropped on the way
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Decoded<T> {
    /// A result without diagnostics
    pub const fn clean(value: T) -> Self {
        Self {
            value,
            diagnostics: Vec::new(),
        }
    }

    /// True if nothing was dropped
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Maps the value, keeping the diagnostics
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Decoded<U> {
        Decoded {
            value: f(self.value),
            diagnostics: self.diagnostics,
        }
    }
}
