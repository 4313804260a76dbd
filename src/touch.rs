//! # Touch classifier
//!
//! Decides which pads are being touched by comparing each fresh oscillator count against that pad's baseline.
//!
//! A pad is *tripped* when its count falls more than `baseline / 8` (12.5%) below its baseline. Untripped pads feed
//! their count back into the baseline tracker, tripped pads leave their baseline frozen until the finger lifts.
//!
//! # Inputs
//!
//! * One raw sample per sensor, once per poll cycle
//!
//! # Outputs
//!
//! * A `TouchState` describing which pads are tripped this cycle and how many

use heapless::Vec;

use crate::baseline::BaselineTracker;
use crate::sensor::{SensorId, SensorSample, NUM_SENSORS};

/// The result of classifying one poll cycle's worth of samples is represented here.
///
/// A touch state is built fresh every cycle, the active count is always derived from the tripped flags.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchState {
    tripped: [bool; NUM_SENSORS],
    samples: [SensorSample; NUM_SENSORS],
    deltas: [SensorSample; NUM_SENSORS],
}

impl TouchState {
    /// `TouchState::from_tripped(t)` is a touch state with tripped flags `t` and no sample data
    ///
    /// Mostly useful for driving the gesture resolvers directly.
    pub fn from_tripped(tripped: [bool; NUM_SENSORS]) -> Self {
        Self {
            tripped,
            ..Self::default()
        }
    }

    /// `ts.is_tripped(id)` is true iff sensor `id` registered a touch this cycle
    pub fn is_tripped(&self, id: SensorId) -> bool {
        self.tripped[id.index()]
    }

    /// `ts.active_count()` is the number of tripped sensors in `[0..4]`
    pub fn active_count(&self) -> usize {
        self.tripped.iter().filter(|t| **t).count()
    }

    /// `ts.active_sensors()` is the tripped sensors in position order
    pub fn active_sensors(&self) -> Vec<SensorId, NUM_SENSORS> {
        SensorId::ALL
            .iter()
            .copied()
            .filter(|id| self.is_tripped(*id))
            .collect()
    }

    /// `ts.sample(id)` is the raw count that sensor `id` produced this cycle
    pub fn sample(&self, id: SensorId) -> SensorSample {
        self.samples[id.index()]
    }

    /// `ts.delta(id)` is how far below its baseline sensor `id` read this cycle, zero if it read at or above it
    ///
    /// Bigger deltas mean more of a finger on the pad.
    pub fn delta(&self, id: SensorId) -> SensorSample {
        self.deltas[id.index()]
    }
}

/// A four pad touch classifier is represented here.
///
/// The classifier owns the baselines it compares against.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct TouchClassifier {
    baselines: BaselineTracker,
}

impl TouchClassifier {
    /// `TouchClassifier::new(bt)` is a new classifier comparing against the baselines in `bt`
    pub fn new(baselines: BaselineTracker) -> Self {
        Self { baselines }
    }

    /// `tc.poll(samples)` classifies one cycle of raw samples, indexed by sensor position
    ///
    /// Baselines of untripped sensors are updated as a side effect.
    ///
    /// # Examples
    ///
    /// ```
    /// use touch_piano::baseline::BaselineTracker;
    /// use touch_piano::sensor::SensorId;
    /// use touch_piano::touch::TouchClassifier;
    ///
    /// let mut tc = TouchClassifier::new(BaselineTracker::with_baselines([160; 4]));
    ///
    /// // 160 - 160/8 = 140, so only the second pad drops far enough
    /// let ts = tc.poll([150, 139, 160, 140]);
    ///
    /// assert!(ts.is_tripped(SensorId::S1));
    /// assert_eq!(ts.active_count(), 1);
    /// ```
    pub fn poll(&mut self, samples: [SensorSample; NUM_SENSORS]) -> TouchState {
        let mut state = TouchState {
            samples,
            ..TouchState::default()
        };

        for id in SensorId::ALL {
            let sample = samples[id.index()];
            let baseline = self.baselines.baseline(id);

            state.deltas[id.index()] = baseline.saturating_sub(sample);

            if sample < trip_threshold(baseline) {
                state.tripped[id.index()] = true;
            } else {
                self.baselines.update(id, sample);
            }
        }

        trace!("touch pattern {}", state.tripped);

        state
    }

    /// `tc.baselines()` is the baseline tracker backing this classifier
    pub fn baselines(&self) -> &BaselineTracker {
        &self.baselines
    }

    /// `tc.baselines_mut()` is mutable access to the baselines, used for (re)calibration
    pub fn baselines_mut(&mut self) -> &mut BaselineTracker {
        &mut self.baselines
    }
}

/// `trip_threshold(b)` is the count a sample must fall strictly below to trip a sensor with baseline `b`
///
/// The trip margin is `b >> TRIP_SHIFT`, clamped so the threshold never wraps below zero.
pub fn trip_threshold(baseline: SensorSample) -> SensorSample {
    baseline.saturating_sub(baseline >> TRIP_SHIFT)
}

/// The trip margin is `1/2^TRIP_SHIFT` of the baseline, i.e. 12.5%
pub const TRIP_SHIFT: u32 = 3;
