//! # Gesture resolver
//!
//! Turns the pattern of tripped pads into something musical.
//!
//! In piano mode a finger can sit squarely on one pad or straddle the gap between two neighbouring pads, so four pads
//! give seven notes. The pads are checked as adjacent pairs from the right (sensor 0) to the left (sensor 3) and the
//! first pair that matches wins.
//!
//! In metronome mode each pad is a control: beats per measure, tempo up, tempo down, and start/stop.

use crate::hardware::Tone;
use crate::lookup_tables::NOTE_TONE_TABLE;
use crate::sensor::SensorId;
use crate::touch::TouchState;

/// The tripped/untripped state of all four pads packed into the low 4 bits of a byte is represented here.
///
/// Bit `n` is set iff sensor `n` is tripped.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchPattern(u8);

impl TouchPattern {
    /// `TouchPattern::from_bits(b)` is the pattern with bits `b`, anything above the low 4 bits is dropped
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 0b1111)
    }

    /// `p.bits()` is the raw 4-bit pattern
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// `p.is_tripped(id)` is true iff sensor `id` is set in the pattern
    pub const fn is_tripped(self, id: SensorId) -> bool {
        self.0 & id.mask() != 0
    }

    /// `p.is_empty()` is true iff no sensor is set
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl From<&TouchState> for TouchPattern {
    fn from(ts: &TouchState) -> Self {
        ts.active_sensors()
            .iter()
            .fold(TouchPattern(0), |p, id| TouchPattern(p.0 | id.mask()))
    }
}

/// A piano note index is represented here.
///
/// Zero means no note, `1..=7` are the notes reachable from the pads in ascending pitch. Index 8 (A5, an octave above
/// note 1) exists in the tone table but no pad pattern produces it.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NoteIndex(u8);

impl NoteIndex {
    /// No note is playing
    pub const NONE: NoteIndex = NoteIndex(0);

    /// The highest valid note index
    pub const MAX: u8 = 8;

    /// `NoteIndex::new(n)` is note `n`, or `None` if `n` is greater than `NoteIndex::MAX`
    pub const fn new(n: u8) -> Option<Self> {
        if n <= Self::MAX {
            Some(Self(n))
        } else {
            None
        }
    }

    /// `ni.get()` is the raw note index
    pub const fn get(self) -> u8 {
        self.0
    }

    /// `ni.is_none()` is true iff this is the "no note" index
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    /// `ni.tone()` is the beeper tone for this note, or `None` for "no note"
    pub fn tone(self) -> Option<Tone> {
        if self.is_none() {
            None
        } else {
            Some(NOTE_TONE_TABLE[self.0 as usize])
        }
    }
}

/// Metronome control actions are represented here
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlAction {
    /// Add one beat per measure, wrapping from 8 back to 1
    AdjustBeatsPerMeasure,
    /// Speed up by one tempo step
    IncreaseTempo,
    /// Slow down by one tempo step
    DecreaseTempo,
    /// Start or stop the beats
    ToggleRunning,
}

/// One row of the piano precedence table: the pads in `care` must read exactly `want`
struct NoteRule {
    care: u8,
    want: u8,
    note: NoteIndex,
}

const S0: u8 = SensorId::S0.mask();
const S1: u8 = SensorId::S1.mask();
const S2: u8 = SensorId::S2.mask();
const S3: u8 = SensorId::S3.mask();

/// Piano note precedence, checked top-down, first match wins
///
/// Not every pattern is covered, e.g. an empty pattern matches nothing and means no note.
const PIANO_RULES: [NoteRule; 7] = [
    NoteRule { care: S0 | S1, want: S0, note: NoteIndex(7) },
    NoteRule { care: S0 | S1, want: S0 | S1, note: NoteIndex(6) },
    NoteRule { care: S1 | S2, want: S1, note: NoteIndex(5) },
    NoteRule { care: S1 | S2, want: S1 | S2, note: NoteIndex(4) },
    NoteRule { care: S2 | S3, want: S2, note: NoteIndex(3) },
    NoteRule { care: S2 | S3, want: S2 | S3, note: NoteIndex(2) },
    NoteRule { care: S3, want: S3, note: NoteIndex(1) },
];

/// `resolve_piano_note(p)` is the note played by touch pattern `p`
///
/// # Examples
///
/// ```
/// use touch_piano::gesture::{resolve_piano_note, NoteIndex, TouchPattern};
///
/// // a finger straddling the two right-most pads
/// assert_eq!(resolve_piano_note(TouchPattern::from_bits(0b0011)), NoteIndex::new(6).unwrap());
///
/// // nothing touched
/// assert_eq!(resolve_piano_note(TouchPattern::from_bits(0)), NoteIndex::NONE);
/// ```
pub fn resolve_piano_note(pattern: TouchPattern) -> NoteIndex {
    match PIANO_RULES
        .iter()
        .find(|rule| pattern.bits() & rule.care == rule.want)
    {
        Some(rule) => rule.note,
        None => NoteIndex::NONE,
    }
}

/// `resolve_metronome_action(p, latched)` is the metronome action requested by touch pattern `p`
///
/// Only one action is produced per cycle, pads are checked from sensor 0 to sensor 3. The beats-per-measure and
/// start/stop pads are one-shot and are ignored while `latched` is set, tempo pads repeat for as long as they are held.
pub fn resolve_metronome_action(pattern: TouchPattern, latched: bool) -> Option<ControlAction> {
    if pattern.is_tripped(SensorId::S0) && !latched {
        Some(ControlAction::AdjustBeatsPerMeasure)
    } else if pattern.is_tripped(SensorId::S1) {
        Some(ControlAction::IncreaseTempo)
    } else if pattern.is_tripped(SensorId::S2) {
        Some(ControlAction::DecreaseTempo)
    } else if pattern.is_tripped(SensorId::S3) && !latched {
        Some(ControlAction::ToggleRunning)
    } else {
        None
    }
}

/// The one-shot latch for metronome setting changes is represented here.
///
/// Set by an edge-triggered action, cleared once every pad has been released.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct SettingLatch {
    latched: bool,
}

impl SettingLatch {
    /// `SettingLatch::new()` is a new, released latch
    pub fn new() -> Self {
        Self::default()
    }

    /// `sl.is_latched()` is true iff a one-shot action has fired and the pads have not all been released since
    pub fn is_latched(&self) -> bool {
        self.latched
    }

    /// `sl.resolve(p)` is the metronome action for pattern `p`, updating the latch
    pub fn resolve(&mut self, pattern: TouchPattern) -> Option<ControlAction> {
        if pattern.is_empty() {
            self.latched = false;
            return None;
        }

        let action = resolve_metronome_action(pattern, self.latched);

        if let Some(ControlAction::AdjustBeatsPerMeasure | ControlAction::ToggleRunning) = action {
            self.latched = true;
        }

        action
    }
}
