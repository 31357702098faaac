use super::{Track, TrackKind, TrackSlot, Tracks};
use crate::{
    arrangement::ArrangementEvent,
    diagnostic::{Decoded, Diagnostic},
    reader::{DecodeResult, Reader},
    region::{self, RegionOutcome},
};

/// Collects arrangement events and track labels into [`Tracks`].
#[derive(Default)]
pub struct TracksBuilder {
    tracks: Tracks,
    diagnostics: Vec<Diagnostic>,
}

impl TracksBuilder {
    /// Handles one arrangement event.
    ///
    /// Instrument events have their region decoded and their notes appended
    /// at the event's start time. Any other event only marks its track as
    /// audio.
    pub fn handle_event(
        &mut self,
        reader: &Reader<'_>,
        event: &ArrangementEvent,
    ) -> DecodeResult<()> {
        if !event.is_instrument() {
            self.tracks
                .entry(event.track_id)
                .or_insert_with(|| Track::new(event.track_id, TrackKind::Audio));
            return Ok(());
        }

        let outcome = region::decode(reader, event)?;
        let track = self
            .tracks
            .entry(event.track_id)
            .or_insert_with(|| Track::new(event.track_id, TrackKind::Instrument));
        track.kind = TrackKind::Instrument;

        match outcome {
            RegionOutcome::Decoded(region) => {
                track.notes.extend(
                    region
                        .notes
                        .iter()
                        .map(|note| note.shifted(event.start_time)),
                );
                track.regions.push(region);
            }
            RegionOutcome::Dropped(event_id) => {
                self.diagnostics.push(Diagnostic::DroppedMultiTakeRegion {
                    event_id,
                    track_id: event.track_id,
                });
            }
        }
        Ok(())
    }

    /// Overlays labels on track ids `1..=N`, skipping deactivated slots.
    ///
    /// A labelled id without events becomes an [`TrackKind::Empty`] track.
    pub fn apply_labels(&mut self, slots: &[TrackSlot]) {
        let active = slots.iter().filter(|slot| {
            let active = !slot.is_deactivated();
            #[cfg(feature = "tracing")]
            if !active {
                tracing::warn!("skipping deactivated track slot at {:#x}", slot.address);
            }
            active
        });
        for (slot, id) in active.zip(1..=u8::MAX) {
            let track = self
                .tracks
                .entry(id)
                .or_insert_with(|| Track::new(id, TrackKind::Empty));
            track.label = slot.label.clone();
            track.tag = Some(slot.tag);
        }
    }

    /// Finishes the tracks
    pub fn build(self) -> Decoded<Tracks> {
        Decoded {
            value: self.tracks,
            diagnostics: self.diagnostics,
        }
    }
}
