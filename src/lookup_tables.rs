//! Fixed tables for the four pad piano layout

use crate::hardware::Tone;

/// Inter-beat delay in ticks for tempos from 40 to 240 BPM in steps of 5
///
/// Index with `(bpm - 40) / 5`. One tick is close to one millisecond, so each entry is roughly `60_000 / bpm`.
pub const BEAT_DELAY_TABLE: [u16; 41] = [
    1500, 1333, 1200, 1091, 1000, 923, 857, 800, //
    750, 706, 667, 632, 600, 571, 545, 522, //
    500, 480, 462, 444, 429, 414, 400, 387, //
    375, 364, 353, 343, 333, 324, 316, 308, //
    300, 293, 286, 279, 273, 267, 261, 255, //
    250,
];

/// Beeper tones for each note index, an A major scale from A4 up to A5
///
/// Index 0 is "no note" and is never played.
pub const NOTE_TONE_TABLE: [Tone; 9] = [
    Tone { period: 0, duty: 0 }, // none
    Tone { period: 136, duty: 68 }, // A4
    Tone { period: 121, duty: 61 }, // B4
    Tone { period: 108, duty: 54 }, // C#5
    Tone { period: 102, duty: 51 }, // D5
    Tone { period: 91, duty: 45 }, // E5
    Tone { period: 81, duty: 40 }, // F#5
    Tone { period: 72, duty: 36 }, // G#5
    Tone { period: 68, duty: 34 }, // A5
];

/// The metronome's accented first beat of each measure, same pitch as A5
pub const ACCENT_BEAT_TONE: Tone = NOTE_TONE_TABLE[8];

/// The metronome's unaccented beats, same pitch as A4
pub const PLAIN_BEAT_TONE: Tone = NOTE_TONE_TABLE[1];
