//! Hardware doubles for unit tests

use core::convert::Infallible;

use embedded_hal::{delay::DelayNs, digital};
use heapless::Vec;

use crate::hardware::{CapSense, PowerDown, Tone, ToneOutput};
use crate::sensor::{SensorId, SensorSample, NUM_SENSORS};

/// Every pad reads a settable count, reads can be made to fail
#[derive(Debug)]
pub struct MockSense {
    pub counts: [SensorSample; NUM_SENSORS],
    pub enabled: bool,
    pub reads: usize,
    pub fail: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MockSenseError;

impl MockSense {
    pub fn new(count: SensorSample) -> Self {
        Self {
            counts: [count; NUM_SENSORS],
            enabled: true,
            reads: 0,
            fail: false,
        }
    }

    /// `ms.touch(id, c)` makes pad `id` read `c`
    pub fn touch(&mut self, id: SensorId, count: SensorSample) {
        self.counts[id.index()] = count;
    }
}

impl CapSense for MockSense {
    type Error = MockSenseError;

    fn read_count(&mut self, id: SensorId) -> Result<SensorSample, Self::Error> {
        if self.fail {
            return Err(MockSenseError);
        }
        self.reads += 1;
        Ok(self.counts[id.index()])
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

/// Active-low push button
#[derive(Debug, Default)]
pub struct MockButton {
    pub pressed: bool,
}

impl digital::ErrorType for MockButton {
    type Error = Infallible;
}

impl digital::InputPin for MockButton {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.pressed)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.pressed)
    }
}

/// Records every tone played
#[derive(Debug, Default)]
pub struct MockTone {
    pub played: Vec<Tone, 128>,
    pub playing: Option<Tone>,
    pub silences: usize,
}

impl MockTone {
    pub fn is_playing(&self) -> bool {
        self.playing.is_some()
    }
}

impl ToneOutput for MockTone {
    fn play(&mut self, tone: Tone) {
        self.played.push(tone).ok();
        self.playing = Some(tone);
    }

    fn silence(&mut self) {
        self.playing = None;
        self.silences += 1;
    }
}

/// Counts sleeps
#[derive(Debug, Default)]
pub struct MockPower {
    pub sleeps: usize,
}

impl PowerDown for MockPower {
    fn sleep_until_button_press(&mut self) {
        self.sleeps += 1;
    }
}

/// Adds up requested delays instead of waiting
#[derive(Debug, Default)]
pub struct MockDelay {
    pub total_us: u64,
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_us += u64::from(ns / 1_000);
    }

    fn delay_us(&mut self, us: u32) {
        self.total_us += u64::from(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.total_us += u64::from(ms) * 1_000;
    }
}
