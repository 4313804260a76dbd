//! # Hardware collaborators
//!
//! The core never touches registers. Everything it needs from the board goes through the traits in this module, plus
//! two `embedded-hal` traits:
//!
//! * `embedded_hal::digital::InputPin` for the mode button, active-low
//!
//! * `embedded_hal::delay::DelayNs` for the fixed busy-waits used to time metronome beats
//!
//! Keeping the hardware behind traits means the same control loop runs on the board and in host-side unit tests.

use crate::sensor::{SensorId, SensorSample};

/// A tone request for the PWM beeper is represented here.
///
/// The numbers are the raw timer period and duty values, the board is responsible for turning them into a square wave.
/// Duty is normally half the period for a 50% square wave.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tone {
    /// PWM period register value, larger is lower in pitch
    pub period: u8,
    /// PWM duty register value
    pub duty: u8,
}

/// A capacitive sensing front end with four relaxation-oscillator channels
pub trait CapSense {
    /// The error type for failed reads
    type Error;

    /// `cs.read_count(id)` selects sensor `id`, waits one fixed sensing window, and is the number of oscillator cycles
    /// counted during that window.
    fn read_count(&mut self, id: SensorId) -> Result<SensorSample, Self::Error>;

    /// `cs.set_enabled(e)` powers the sensing module up or down. Called when entering and leaving the off mode.
    ///
    /// The default does nothing, for front ends with no separate power control.
    fn set_enabled(&mut self, _enabled: bool) {}
}

/// A beeper which can play one square-wave tone at a time
pub trait ToneOutput {
    /// `to.play(t)` starts playing tone `t`, replacing whatever was playing
    fn play(&mut self, tone: Tone);

    /// `to.silence()` stops any tone
    fn silence(&mut self);
}

/// Low power sleep
pub trait PowerDown {
    /// `pd.sleep_until_button_press()` puts the device into a low power state.
    ///
    /// Returns when the board wakes up, either because the button was pressed or because of a periodic wake-up timer.
    /// The caller re-reads the button after waking, so spurious wake-ups are harmless.
    fn sleep_until_button_press(&mut self);
}
