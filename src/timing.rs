/// Tick rate of every time value in a project buffer
pub const TICKS_PER_QUARTER_NOTE: u32 = 960;

/// The time signature used to turn ticks into beats and measures.
///
/// Project buffers only carry ticks; the signature is supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSignature {
    beats_per_measure: u8,
    beat_unit: u8,
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self::COMMON
    }
}

impl TimeSignature {
    /// 4/4
    pub const COMMON: Self = Self {
        beats_per_measure: 4,
        beat_unit: 4,
    };

    /// Create a signature of `beats_per_measure` beats of `1 / beat_unit` notes.
    ///
    /// Returns `None` unless `beat_unit` is a power of two no larger than 64
    /// and `beats_per_measure` is non-zero.
    pub const fn new(beats_per_measure: u8, beat_unit: u8) -> Option<Self> {
        if beats_per_measure == 0 || !beat_unit.is_power_of_two() || beat_unit > 64 {
            return None;
        }
        Some(Self {
            beats_per_measure,
            beat_unit,
        })
    }

    /// Beats in one measure
    pub const fn beats_per_measure(&self) -> u8 {
        self.beats_per_measure
    }

    /// The note value of one beat, e.g. 8 for eighth notes
    pub const fn beat_unit(&self) -> u8 {
        self.beat_unit
    }

    /// Ticks in one beat
    pub const fn ticks_per_beat(&self) -> u32 {
        TICKS_PER_QUARTER_NOTE * 4 / self.beat_unit as u32
    }

    /// Ticks in one measure
    pub const fn ticks_per_measure(&self) -> u32 {
        self.ticks_per_beat() * self.beats_per_measure as u32
    }

    /// `ticks` expressed in (fractional) measures
    pub fn measures(&self, ticks: i64) -> f64 {
        ticks as f64 / self.ticks_per_measure() as f64
    }

    /// `ticks` expressed in (fractional) beats
    pub fn beats(&self, ticks: i64) -> f64 {
        ticks as f64 / self.ticks_per_beat() as f64
    }
}

#[test]
fn common_time_measure_is_3840_ticks() {
    let sig = TimeSignature::default();
    assert_eq!(sig.ticks_per_measure(), 3840);
    assert_eq!(sig.measures(7680), 2.0);
    assert_eq!(sig.beats(480), 0.5);
}

#[test]
fn compound_time() {
    let sig = TimeSignature::new(6, 8).unwrap();
    assert_eq!(sig.ticks_per_beat(), 480);
    assert_eq!(sig.ticks_per_measure(), 2880);
    assert!(TimeSignature::new(3, 3).is_none());
    assert!(TimeSignature::new(0, 4).is_none());
}
