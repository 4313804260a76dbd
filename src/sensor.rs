//! # Touch sensor identities
//!
//! The board has four capacitive touch pads in a single row. Pad position matters, the gesture resolver looks at
//! neighbouring pads to decide which note is being played, so sensors are identified by their fixed position rather
//! than by any hardware channel number.
//!
//! Sensor 0 is the right-most pad (highest notes), sensor 3 is the left-most pad (lowest notes).

/// The number of touch sensors on the board
pub const NUM_SENSORS: usize = 4;

/// A raw relaxation-oscillator cycle count for one sensor, captured over one fixed sensing window
///
/// A finger on the pad adds capacitance which slows the oscillator down, so touches show up as a *drop* in the count.
pub type SensorSample = u16;

/// One of the four fixed-position touch sensors is represented here
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorId {
    S0,
    S1,
    S2,
    S3,
}

impl SensorId {
    /// All of the sensors, in position order
    pub const ALL: [SensorId; NUM_SENSORS] = [SensorId::S0, SensorId::S1, SensorId::S2, SensorId::S3];

    /// `SensorId::from_index(i)` is the sensor at position `i`, or `None` if `i` is not in `[0..3]`
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(SensorId::S0),
            1 => Some(SensorId::S1),
            2 => Some(SensorId::S2),
            3 => Some(SensorId::S3),
            _ => None,
        }
    }

    /// `id.index()` is the position of the sensor in `[0..3]`, usable as an array index
    pub const fn index(self) -> usize {
        self as usize
    }

    /// `id.mask()` is the single bit representing this sensor in a touch pattern
    pub const fn mask(self) -> u8 {
        1 << (self as u8)
    }
}
