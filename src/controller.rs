//! # Piano / metronome control loop
//!
//! Ties the touch classifier, gesture resolvers, mode switch and metronome together with the board hardware.
//!
//! Everything runs from one cooperative loop. Each call to `poll_cycle` is one pass of that loop and does what the
//! current mode needs:
//!
//! * `Off`: power the sensing module down, sleep until woken, check the button
//!
//! * `Piano`: read the pads, resolve a note, check the button, play or silence the note
//!
//! * `Metronome`: play one beat if running (blocking for the whole beat), check the button, read the pads, apply any
//! setting change
//!
//! All state lives in the `PianoMetronome` struct, nothing is global.

use embedded_hal::{delay::DelayNs, digital::InputPin};

use crate::config::Config;
use crate::error::Error;
use crate::gesture::{resolve_piano_note, ControlAction, NoteIndex, SettingLatch, TouchPattern};
use crate::hardware::{CapSense, PowerDown, ToneOutput};
use crate::metronome::Metronome;
use crate::mode::{Mode, ModeSwitch};
use crate::sensor::{SensorId, NUM_SENSORS};
use crate::touch::{TouchClassifier, TouchState};

/// The board hardware the control loop drives is represented here.
pub struct Board<C, B, T, P, D> {
    /// Capacitive sensing front end
    pub sense: C,
    /// Mode button, active-low
    pub button: B,
    /// PWM beeper
    pub tone: T,
    /// Low power sleep
    pub power: P,
    /// Busy-wait delays
    pub delay: D,
}

/// What happened during one poll cycle is represented here.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleReport {
    /// The mode at the end of the cycle
    pub mode: Mode,

    /// The note being played, piano mode only. `None` in the cycle that switches away from piano.
    pub note: Option<NoteIndex>,

    /// The metronome setting change applied, metronome mode only
    pub action: Option<ControlAction>,

    /// The classified pads, `None` when the pads weren't read this cycle
    pub touch: Option<TouchState>,

    /// True iff the button switched modes this cycle
    pub mode_switched: bool,
}

/// The touch piano and metronome is represented here.
pub struct PianoMetronome<C, B, T, P, D> {
    board: Board<C, B, T, P, D>,
    config: Config,
    classifier: TouchClassifier,
    mode_switch: ModeSwitch,
    latch: SettingLatch,
    metronome: Metronome,
    note: NoteIndex,
}

impl<C, B, T, P, D> PianoMetronome<C, B, T, P, D>
where
    C: CapSense,
    B: InputPin,
    T: ToneOutput,
    P: PowerDown,
    D: DelayNs,
{
    /// `PianoMetronome::new(board, cfg)` is a new piano in piano mode with uncalibrated pads
    ///
    /// Call `calibrate` with nobody touching the pads before polling.
    pub fn new(board: Board<C, B, T, P, D>, config: Config) -> Self {
        Self {
            board,
            config,
            classifier: TouchClassifier::default(),
            mode_switch: ModeSwitch::default(),
            latch: SettingLatch::new(),
            metronome: Metronome::new(config.initial_beats_per_measure, config.initial_tempo_bpm),
            note: NoteIndex::NONE,
        }
    }

    /// `pm.calibrate()` measures the untouched count of every pad and uses it as that pad's baseline
    pub fn calibrate(&mut self) -> Result<(), Error<C::Error, B::Error>> {
        let sense = &mut self.board.sense;
        self.classifier
            .baselines_mut()
            .calibrate(|id| sense.read_count(id))
            .map_err(Error::Sense)?;

        info!("calibrated baselines {}", self.classifier.baselines().baselines());
        Ok(())
    }

    /// `pm.poll_cycle()` runs one pass of the control loop for the current mode
    ///
    /// Blocks for as long as the mode needs: one sleep in `Off`, one full beat period in a running `Metronome`.
    pub fn poll_cycle(&mut self) -> Result<CycleReport, Error<C::Error, B::Error>> {
        match self.mode_switch.mode() {
            Mode::Off => self.off_cycle(),
            Mode::Piano => self.piano_cycle(),
            Mode::Metronome => self.metronome_cycle(),
        }
    }

    /// `pm.run()` calibrates and then polls forever
    ///
    /// Hardware errors are logged and the loop carries on with the next cycle, which re-reads everything anyway.
    pub fn run(&mut self) -> ! {
        while self.calibrate().is_err() {
            warn!("calibration failed, retrying");
        }

        loop {
            if self.poll_cycle().is_err() {
                warn!("poll cycle failed");
            }
        }
    }

    fn off_cycle(&mut self) -> Result<CycleReport, Error<C::Error, B::Error>> {
        self.board.sense.set_enabled(false);
        self.board.power.sleep_until_button_press();

        let mode_switched = self.update_mode()?;

        Ok(self.report(None, None, None, mode_switched))
    }

    fn piano_cycle(&mut self) -> Result<CycleReport, Error<C::Error, B::Error>> {
        let touch = self.read_touch()?;
        self.note = resolve_piano_note(TouchPattern::from(&touch));

        let mode_switched = self.update_mode()?;

        if !mode_switched {
            match self.note.tone() {
                Some(tone) => self.board.tone.play(tone),
                None => self.board.tone.silence(),
            }
        }

        let note = if mode_switched || self.note.is_none() {
            None
        } else {
            Some(self.note)
        };

        Ok(self.report(note, None, Some(touch), mode_switched))
    }

    fn metronome_cycle(&mut self) -> Result<CycleReport, Error<C::Error, B::Error>> {
        if self.metronome.is_running() {
            self.metronome
                .play_beat(&mut self.board.tone, &mut self.board.delay, &self.config);
        }

        let mode_switched = self.update_mode()?;

        let touch = self.read_touch()?;
        let action = self.latch.resolve(TouchPattern::from(&touch));
        if let Some(action) = action {
            self.metronome.apply(action);
        }

        Ok(self.report(None, action, Some(touch), mode_switched))
    }

    /// `pm.update_mode()` samples the button and handles any mode entry, true iff the mode changed
    fn update_mode(&mut self) -> Result<bool, Error<C::Error, B::Error>> {
        let pressed = self.board.button.is_low().map_err(Error::Button)?;

        match self.mode_switch.update(pressed) {
            Some(Mode::Off) => {
                self.board.tone.silence();
            }
            Some(Mode::Piano) => {
                self.board.sense.set_enabled(true);
            }
            Some(Mode::Metronome) => {
                self.board.tone.silence();
                self.metronome.set_running(true);
            }
            None => return Ok(false),
        }

        Ok(true)
    }

    fn read_touch(&mut self) -> Result<TouchState, Error<C::Error, B::Error>> {
        let mut samples = [0; NUM_SENSORS];
        for id in SensorId::ALL {
            samples[id.index()] = self.board.sense.read_count(id).map_err(Error::Sense)?;
        }
        Ok(self.classifier.poll(samples))
    }

    fn report(
        &self,
        note: Option<NoteIndex>,
        action: Option<ControlAction>,
        touch: Option<TouchState>,
        mode_switched: bool,
    ) -> CycleReport {
        CycleReport {
            mode: self.mode_switch.mode(),
            note,
            action,
            touch,
            mode_switched,
        }
    }
}

impl<C, B, T, P, D> PianoMetronome<C, B, T, P, D> {
    /// `pm.mode()` is the current operating mode
    pub fn mode(&self) -> Mode {
        self.mode_switch.mode()
    }

    /// `pm.note()` is the most recently resolved piano note, kept across mode changes
    pub fn note(&self) -> NoteIndex {
        self.note
    }

    /// `pm.metronome()` is the metronome settings, kept across mode changes
    pub fn metronome(&self) -> &Metronome {
        &self.metronome
    }

    /// `pm.classifier()` is the touch classifier, handy for inspecting baselines
    pub fn classifier(&self) -> &TouchClassifier {
        &self.classifier
    }

    /// `pm.config()` is the timing configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// `pm.board()` is the board hardware
    pub fn board(&self) -> &Board<C, B, T, P, D> {
        &self.board
    }

    /// `pm.board_mut()` is mutable access to the board hardware
    pub fn board_mut(&mut self) -> &mut Board<C, B, T, P, D> {
        &mut self.board
    }

    /// `pm.release()` gives the board hardware back
    pub fn release(self) -> Board<C, B, T, P, D> {
        self.board
    }
}
