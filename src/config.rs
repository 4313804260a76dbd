//! Board timing and power-on settings
//!
//! The numeric thresholds of the touch algorithm are fixed to the pad layout and live next to the code that uses them
//! (`baseline::CALIBRATION_SAMPLES`, `touch::TRIP_SHIFT`, and friends). The knobs here depend on the board's clock and
//! on taste, so they can be overridden when building a `PianoMetronome`.

use crate::metronome::DEFAULT_TEMPO_BPM;

/// Timing and power-on settings are represented here
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// How long each metronome click sounds, in milliseconds. Also subtracted from the beat period.
    pub beat_tone_ms: u32,

    /// The length of one beat delay tick in microseconds
    ///
    /// The beat delay table counts in ticks. Each tick busy-waits slightly under a millisecond to
    /// make up for loop overhead.
    pub tick_us: u32,

    /// Metronome tempo at power-on, in beats per minute
    pub initial_tempo_bpm: u8,

    /// Metronome beats per measure at power-on
    pub initial_beats_per_measure: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            beat_tone_ms: DEFAULT_BEAT_TONE_MS,
            tick_us: DEFAULT_TICK_US,
            initial_tempo_bpm: DEFAULT_TEMPO_BPM,
            initial_beats_per_measure: 1,
        }
    }
}

/// Default metronome click length
pub const DEFAULT_BEAT_TONE_MS: u32 = 20;

/// Default beat delay tick length
pub const DEFAULT_TICK_US: u32 = 990;
