//! # Baseline tracker
//!
//! Each capacitive pad is read as the number of relaxation-oscillator cycles counted during a fixed sensing window.
//! The untouched count drifts with temperature, humidity, supply voltage and so on, so every pad keeps its own running
//! baseline which represents "nobody is touching me right now".
//!
//! The tracker adapts asymmetrically:
//!
//! * A count *above* the baseline snaps the baseline straight up to the count
//!
//! * A count at or below the baseline pulls the baseline down slowly with an exponential moving average
//!
//! Touches only ever make the count drop, and the touch classifier stops calling `update` while a pad is tripped, so
//! a real touch can't drag the baseline down and erase its own trip margin.

use crate::sensor::{SensorId, SensorSample, NUM_SENSORS};

/// Per-sensor adaptive baselines are represented here.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BaselineTracker {
    baselines: [SensorSample; NUM_SENSORS],
}

impl Default for BaselineTracker {
    /// `BaselineTracker::default()` is an uncalibrated tracker with every baseline at zero
    fn default() -> Self {
        Self {
            baselines: [0; NUM_SENSORS],
        }
    }
}

impl BaselineTracker {
    /// `BaselineTracker::new()` is a new uncalibrated tracker, call `calibrate` before relying on it
    pub fn new() -> Self {
        Self::default()
    }

    /// `BaselineTracker::with_baselines(b)` is a tracker starting from the known baselines `b`, indexed by sensor
    pub fn with_baselines(baselines: [SensorSample; NUM_SENSORS]) -> Self {
        Self { baselines }
    }

    /// `bt.calibrate(read)` sets every baseline to the mean of `CALIBRATION_SAMPLES` fresh readings
    ///
    /// Nobody should be touching the pads while this runs. The readings are summed in a `u32` and the mean is floored.
    ///
    /// # Arguments
    ///
    /// * `read` - takes one reading of the given sensor, any error aborts calibration and is handed back to the caller.
    /// Sensors that were already calibrated before the error keep their new baseline.
    ///
    /// # Examples
    ///
    /// ```
    /// use touch_piano::baseline::BaselineTracker;
    /// use touch_piano::sensor::SensorId;
    ///
    /// let mut bt = BaselineTracker::new();
    /// bt.calibrate(|_| Ok::<_, ()>(200)).unwrap();
    ///
    /// assert_eq!(bt.baseline(SensorId::S2), 200);
    /// ```
    pub fn calibrate<E, F>(&mut self, mut read: F) -> Result<(), E>
    where
        F: FnMut(SensorId) -> Result<SensorSample, E>,
    {
        for id in SensorId::ALL {
            let mut sum: u32 = 0;
            for _ in 0..CALIBRATION_SAMPLES {
                sum += u32::from(read(id)?);
            }
            // the mean of u16 values always fits back in a u16
            self.baselines[id.index()] = (sum / CALIBRATION_SAMPLES) as SensorSample;
            debug!("calibrated sensor {} to {}", id, self.baselines[id.index()]);
        }
        Ok(())
    }

    /// `bt.update(id, sample)` folds a new untouched reading into the baseline of sensor `id`
    ///
    /// Must only be called for sensors that are not currently tripped.
    ///
    /// Counts above the baseline replace it immediately, otherwise the baseline decays toward the count by
    /// `1/2^EMA_SHIFT` of the difference, using truncating integer math.
    pub fn update(&mut self, id: SensorId, sample: SensorSample) {
        let baseline = &mut self.baselines[id.index()];

        if *baseline < sample {
            *baseline = sample;
        } else {
            // can't overflow, sample <= baseline so the result is <= baseline
            *baseline = *baseline - (*baseline >> EMA_SHIFT) + (sample >> EMA_SHIFT);
        }
    }

    /// `bt.baseline(id)` is the current baseline of sensor `id`
    pub fn baseline(&self, id: SensorId) -> SensorSample {
        self.baselines[id.index()]
    }

    /// `bt.baselines()` is the current baseline of every sensor, indexed by sensor position
    pub fn baselines(&self) -> [SensorSample; NUM_SENSORS] {
        self.baselines
    }
}

/// The number of readings averaged per sensor during calibration
pub const CALIBRATION_SAMPLES: u32 = 16;

/// Downward drift is tracked with a decay weight of `1/2^EMA_SHIFT`, i.e. 1/16
pub const EMA_SHIFT: u32 = 4;
