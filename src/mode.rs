//! # Operating modes
//!
//! The board has a single mode button which steps through three modes in a fixed rotation:
//!
//! `Off -> Piano -> Metronome -> Off -> ...`
//!
//! The button is edge-triggered. A press switches mode exactly once, and it has to be released before another press
//! is recognised, no matter how many poll cycles it is held for.

/// Operating modes are represented here
///
/// The board is in exactly one of these modes at any given time
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Low power, touch sensing suspended
    Off,
    /// The pads play notes
    Piano,
    /// The pads control the metronome
    Metronome,
}

impl Default for Mode {
    /// The board powers up in piano mode
    fn default() -> Self {
        Mode::Piano
    }
}

impl Mode {
    /// `mode.next()` is the mode a button press moves to from `mode`
    pub const fn next(self) -> Self {
        match self {
            Mode::Off => Mode::Piano,
            Mode::Piano => Mode::Metronome,
            Mode::Metronome => Mode::Off,
        }
    }
}

/// An edge-detecting mode selector is represented here.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct ModeSwitch {
    mode: Mode,

    // set when a press switches mode, cleared once the button is seen released
    switch_in_progress: bool,
}

impl ModeSwitch {
    /// `ModeSwitch::new(m)` is a new mode switch starting in mode `m` with the button released
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            switch_in_progress: false,
        }
    }

    /// `ms.mode()` is the current mode
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// `ms.switch_in_progress()` is true iff the button press that caused the last switch is still held down
    pub fn switch_in_progress(&self) -> bool {
        self.switch_in_progress
    }

    /// `ms.update(pressed)` samples the button once and is the new mode iff this sample switched modes
    ///
    /// # Examples
    ///
    /// ```
    /// use touch_piano::mode::{Mode, ModeSwitch};
    ///
    /// let mut ms = ModeSwitch::new(Mode::Off);
    ///
    /// assert_eq!(ms.update(true), Some(Mode::Piano));
    /// // still held, no more switching
    /// assert_eq!(ms.update(true), None);
    /// assert_eq!(ms.update(false), None);
    /// assert_eq!(ms.update(true), Some(Mode::Metronome));
    /// ```
    pub fn update(&mut self, pressed: bool) -> Option<Mode> {
        if !pressed {
            self.switch_in_progress = false;
            return None;
        }

        if self.switch_in_progress {
            return None;
        }

        self.switch_in_progress = true;
        self.mode = self.mode.next();
        info!("mode switched to {}", self.mode);

        Some(self.mode)
    }
}
