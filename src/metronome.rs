//! # Metronome
//!
//! A simple click-track metronome. The first beat of each measure is a high accented click and the remaining beats are
//! lower clicks. Tempo runs from 40 to 240 beats per minute in steps of 5 and is turned into a delay with a lookup
//! table, so no division or floating point is needed at run time.
//!
//! Beats are timed with blocking delays: play the click, wait out the rest of the beat period, move to the next beat.

use embedded_hal::delay::DelayNs;

use crate::config::Config;
use crate::gesture::ControlAction;
use crate::hardware::{Tone, ToneOutput};
use crate::lookup_tables::{ACCENT_BEAT_TONE, BEAT_DELAY_TABLE, PLAIN_BEAT_TONE};

/// Metronome settings and beat position are represented here.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Metronome {
    // in `[1..8]`
    beats_per_measure: u8,

    // in `[40..240]`, always a multiple of 5
    tempo_bpm: u8,

    // in `[0..beats_per_measure - 1]`
    beat_index: u8,

    running: bool,
}

impl Default for Metronome {
    /// `Metronome::default()` is a running metronome at 60 BPM with one beat per measure
    fn default() -> Self {
        Self::new(1, DEFAULT_TEMPO_BPM)
    }
}

impl Metronome {
    /// `Metronome::new(b, t)` is a new running metronome with `b` beats per measure at tempo `t`
    ///
    /// Beats per measure are clamped to `[1..8]`. The tempo is clamped to `[40..240]` and rounded down to a step of 5.
    pub fn new(beats_per_measure: u8, tempo_bpm: u8) -> Self {
        let tempo_bpm = tempo_bpm.clamp(MIN_TEMPO_BPM, MAX_TEMPO_BPM);
        Self {
            beats_per_measure: beats_per_measure.clamp(1, MAX_BEATS_PER_MEASURE),
            tempo_bpm: tempo_bpm - (tempo_bpm - MIN_TEMPO_BPM) % TEMPO_STEP_BPM,
            beat_index: 0,
            running: true,
        }
    }

    /// `m.beats_per_measure()` is the number of beats per measure in `[1..8]`
    pub fn beats_per_measure(&self) -> u8 {
        self.beats_per_measure
    }

    /// `m.tempo_bpm()` is the tempo in beats per minute
    pub fn tempo_bpm(&self) -> u8 {
        self.tempo_bpm
    }

    /// `m.beat_index()` is the position of the next beat within the measure, zero is the accented beat
    pub fn beat_index(&self) -> u8 {
        self.beat_index
    }

    /// `m.is_running()` is true iff the metronome is producing beats
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// `m.set_running(r)` starts or stops the beats without touching any other setting
    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    /// `m.apply(a)` changes the settings according to control action `a`
    ///
    /// * Beats per measure count up and wrap from 8 back to 1, wrapping also restarts the measure
    ///
    /// * Tempo steps by 5 BPM, it won't go above 240 and won't be stepped down below 60
    ///
    /// * Toggling flips between running and stopped
    pub fn apply(&mut self, action: ControlAction) {
        match action {
            ControlAction::AdjustBeatsPerMeasure => {
                self.beats_per_measure += 1;
                if MAX_BEATS_PER_MEASURE < self.beats_per_measure {
                    self.beats_per_measure = 1;
                    self.beat_index = 0;
                }
            }
            ControlAction::IncreaseTempo => {
                if self.tempo_bpm < MAX_TEMPO_BPM {
                    self.tempo_bpm += TEMPO_STEP_BPM;
                }
            }
            ControlAction::DecreaseTempo => {
                if MIN_ADJUSTABLE_TEMPO_BPM < self.tempo_bpm {
                    self.tempo_bpm -= TEMPO_STEP_BPM;
                }
            }
            ControlAction::ToggleRunning => self.running = !self.running,
        }
        debug!(
            "metronome {} beats, {} bpm, running {}",
            self.beats_per_measure,
            self.tempo_bpm,
            self.running
        );
    }

    /// `m.beat_tone()` is the click for the next beat, accented on the first beat of the measure
    pub fn beat_tone(&self) -> Tone {
        if self.beat_index == 0 {
            ACCENT_BEAT_TONE
        } else {
            PLAIN_BEAT_TONE
        }
    }

    /// `m.beat_delay()` is the full beat period in ticks for the current tempo
    pub fn beat_delay(&self) -> u16 {
        beat_delay(self.tempo_bpm)
    }

    /// `m.advance_beat()` moves to the next beat, wrapping back to the start of the measure
    pub fn advance_beat(&mut self) {
        self.beat_index += 1;
        if self.beats_per_measure <= self.beat_index {
            self.beat_index = 0;
        }
    }

    /// `m.play_beat(out, delay, cfg)` plays one full beat, blocking for the whole beat period
    ///
    /// The click sounds for `cfg.beat_tone_ms`, then the rest of the beat period is waited out in ticks of
    /// `cfg.tick_us` before moving on to the next beat.
    pub fn play_beat<T: ToneOutput, D: DelayNs>(&mut self, out: &mut T, delay: &mut D, cfg: &Config) {
        out.play(self.beat_tone());
        delay.delay_ms(cfg.beat_tone_ms);
        out.silence();

        let remaining_ticks = u32::from(self.beat_delay()).saturating_sub(cfg.beat_tone_ms);
        for _ in 0..remaining_ticks {
            delay.delay_us(cfg.tick_us);
        }

        self.advance_beat();
    }
}

/// `tempo_index(bpm)` is the index into the beat delay table for tempo `bpm`, clamped to the table
pub fn tempo_index(tempo_bpm: u8) -> usize {
    ((tempo_bpm.clamp(MIN_TEMPO_BPM, MAX_TEMPO_BPM) - MIN_TEMPO_BPM) / TEMPO_STEP_BPM) as usize
}

/// `beat_delay(bpm)` is the beat period in ticks for tempo `bpm`
///
/// # Examples
///
/// ```
/// use touch_piano::metronome::beat_delay;
///
/// assert_eq!(beat_delay(40), 1500);
/// assert_eq!(beat_delay(120), 500);
/// assert_eq!(beat_delay(240), 250);
/// ```
pub fn beat_delay(tempo_bpm: u8) -> u16 {
    BEAT_DELAY_TABLE[tempo_index(tempo_bpm)]
}

/// The slowest tempo in the delay table
pub const MIN_TEMPO_BPM: u8 = 40;

/// The fastest tempo
pub const MAX_TEMPO_BPM: u8 = 240;

/// The slowest tempo reachable by stepping the tempo down
pub const MIN_ADJUSTABLE_TEMPO_BPM: u8 = 60;

/// The power-on tempo
pub const DEFAULT_TEMPO_BPM: u8 = 60;

/// Tempo changes by this much per step
pub const TEMPO_STEP_BPM: u8 = 5;

/// Beats per measure wrap back to 1 after this
pub const MAX_BEATS_PER_MEASURE: u8 = 8;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockDelay, MockTone};

    #[test]
    fn tempo_index_has_no_off_by_one() {
        assert_eq!(tempo_index(40), 0);
        assert_eq!(tempo_index(45), 1);
        assert_eq!(tempo_index(60), 4);
        assert_eq!(tempo_index(240), 40);
    }

    #[test]
    fn delay_table_endpoints() {
        assert_eq!(beat_delay(40), 1500);
        assert_eq!(beat_delay(60), 1000);
        assert_eq!(beat_delay(65), 923);
        assert_eq!(beat_delay(240), 250);
    }

    #[test]
    fn out_of_range_tempo_is_clamped_to_the_table() {
        assert_eq!(tempo_index(0), 0);
        assert_eq!(tempo_index(255), 40);
    }

    #[test]
    fn delay_table_entries_match_tempo() {
        // every entry is 60_000 / bpm, rounded
        for (i, delay) in BEAT_DELAY_TABLE.iter().enumerate() {
            let bpm = 40 + 5 * i as u32;
            let exact = (60_000 + bpm / 2) / bpm;
            assert_eq!(*delay as u32, exact, "bpm {}", bpm);
        }
    }

    #[test]
    fn defaults_match_power_on_state() {
        let m = Metronome::default();
        assert_eq!(m.beats_per_measure(), 1);
        assert_eq!(m.tempo_bpm(), 60);
        assert_eq!(m.beat_index(), 0);
        assert!(m.is_running());
    }

    #[test]
    fn new_clamps_and_snaps_settings() {
        let m = Metronome::new(0, 250);
        assert_eq!(m.beats_per_measure(), 1);
        assert_eq!(m.tempo_bpm(), 240);

        let m = Metronome::new(12, 93);
        assert_eq!(m.beats_per_measure(), 8);
        assert_eq!(m.tempo_bpm(), 90);

        assert_eq!(Metronome::new(1, 10).tempo_bpm(), 40);
    }

    #[test]
    fn beats_per_measure_wraps_past_eight() {
        let mut m = Metronome::new(8, 60);
        m.advance_beat();
        m.advance_beat();
        assert_eq!(m.beat_index(), 2);

        m.apply(ControlAction::AdjustBeatsPerMeasure);
        assert_eq!(m.beats_per_measure(), 1);
        assert_eq!(m.beat_index(), 0);
    }

    #[test]
    fn beats_per_measure_counts_up() {
        let mut m = Metronome::default();
        for expected in 2..=8 {
            m.apply(ControlAction::AdjustBeatsPerMeasure);
            assert_eq!(m.beats_per_measure(), expected);
        }
    }

    #[test]
    fn tempo_never_exceeds_max() {
        let mut m = Metronome::default();
        for _ in 0..100 {
            m.apply(ControlAction::IncreaseTempo);
            assert!(m.tempo_bpm() <= MAX_TEMPO_BPM);
        }
        assert_eq!(m.tempo_bpm(), 240);
    }

    #[test]
    fn tempo_never_steps_below_sixty() {
        let mut m = Metronome::new(1, 200);
        for _ in 0..100 {
            m.apply(ControlAction::DecreaseTempo);
            assert!(MIN_ADJUSTABLE_TEMPO_BPM <= m.tempo_bpm());
        }
        assert_eq!(m.tempo_bpm(), 60);
    }

    #[test]
    fn toggle_flips_running() {
        let mut m = Metronome::default();
        m.apply(ControlAction::ToggleRunning);
        assert!(!m.is_running());
        m.apply(ControlAction::ToggleRunning);
        assert!(m.is_running());
    }

    #[test]
    fn first_beat_of_measure_is_accented() {
        let mut m = Metronome::new(3, 60);
        assert_eq!(m.beat_tone(), ACCENT_BEAT_TONE);
        m.advance_beat();
        assert_eq!(m.beat_tone(), PLAIN_BEAT_TONE);
        m.advance_beat();
        assert_eq!(m.beat_tone(), PLAIN_BEAT_TONE);
        m.advance_beat();
        assert_eq!(m.beat_index(), 0);
        assert_eq!(m.beat_tone(), ACCENT_BEAT_TONE);
    }

    #[test]
    fn single_beat_measure_is_always_accented() {
        let mut m = Metronome::default();
        for _ in 0..4 {
            assert_eq!(m.beat_tone(), ACCENT_BEAT_TONE);
            m.advance_beat();
        }
    }

    #[test]
    fn play_beat_clicks_then_waits_out_the_period() {
        let mut m = Metronome::new(2, 60);
        let mut out = MockTone::default();
        let mut delay = MockDelay::default();
        let cfg = Config::default();

        m.play_beat(&mut out, &mut delay, &cfg);

        assert_eq!(out.played.as_slice(), &[ACCENT_BEAT_TONE]);
        assert!(!out.is_playing());

        // 20ms click, then (1000 - 20) ticks of 990us
        assert_eq!(delay.total_us, 20_000 + 980 * 990);
        assert_eq!(m.beat_index(), 1);

        m.play_beat(&mut out, &mut delay, &cfg);
        assert_eq!(out.played.as_slice(), &[ACCENT_BEAT_TONE, PLAIN_BEAT_TONE]);
        assert_eq!(m.beat_index(), 0);
    }

    #[test]
    fn click_longer_than_the_beat_leaves_no_wait() {
        let mut m = Metronome::new(1, 60);
        let mut out = MockTone::default();
        let mut delay = MockDelay::default();
        let cfg = Config {
            beat_tone_ms: 65_556,
            ..Config::default()
        };

        m.play_beat(&mut out, &mut delay, &cfg);

        // just the click, no ticks after it
        assert_eq!(delay.total_us, 65_556_000);
    }
}
