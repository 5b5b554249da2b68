//! Linear sensor calibration
//!
//! Cheap humidity/temperature sensors carry a fixed bias that is corrected
//! with `value' = slope * value + shift`, one line per channel.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Linear correction for a single channel
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinearCalibration {
    /// Multiplier applied to the raw value
    pub slope: f32,
    /// Offset added after scaling
    pub shift: f32,
}

impl LinearCalibration {
    /// Pass-through calibration
    pub const IDENTITY: Self = Self {
        slope: 1.0,
        shift: 0.0,
    };

    /// Create a new calibration line
    pub const fn new(slope: f32, shift: f32) -> Self {
        Self { slope, shift }
    }

    /// Build a calibration line from two reference points
    ///
    /// Each point pairs a raw sensor value with the value a reference
    /// instrument showed at the same moment. Returns `None` if both raw
    /// values are equal.
    pub fn from_two_points(raw1: f32, actual1: f32, raw2: f32, actual2: f32) -> Option<Self> {
        let raw_span = raw2 - raw1;
        if raw_span == 0.0 {
            return None;
        }

        let slope = (actual2 - actual1) / raw_span;
        let shift = actual1 - slope * raw1;

        Some(Self { slope, shift })
    }

    /// Apply the correction to a raw value
    #[inline]
    pub fn apply(&self, raw: f32) -> f32 {
        self.slope * raw + self.shift
    }

    /// Check that both coefficients are usable
    pub fn is_valid(&self) -> bool {
        self.slope.is_finite() && self.shift.is_finite() && self.slope != 0.0
    }
}

impl Default for LinearCalibration {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Calibration for both channels of a temperature/humidity sensor
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Calibration {
    /// Temperature correction (°C)
    pub temperature: LinearCalibration,
    /// Relative humidity correction (%RH)
    pub humidity: LinearCalibration,
}

impl Calibration {
    /// No correction on either channel
    pub const IDENTITY: Self = Self {
        temperature: LinearCalibration::IDENTITY,
        humidity: LinearCalibration::IDENTITY,
    };

    /// Bench calibration measured for a DHT11 against a reference hygrometer
    pub const DHT11_BENCH: Self = Self {
        temperature: LinearCalibration::new(1.005, -1.746),
        humidity: LinearCalibration::new(1.775, -38.07),
    };

    /// Create a calibration from the four coefficients
    pub const fn new(temp_slope: f32, temp_shift: f32, humid_slope: f32, humid_shift: f32) -> Self {
        Self {
            temperature: LinearCalibration::new(temp_slope, temp_shift),
            humidity: LinearCalibration::new(humid_slope, humid_shift),
        }
    }

    /// Correct a raw temperature (°C)
    #[inline]
    pub fn temperature(&self, raw: f32) -> f32 {
        self.temperature.apply(raw)
    }

    /// Correct a raw relative humidity (%RH)
    #[inline]
    pub fn humidity(&self, raw: f32) -> f32 {
        self.humidity.apply(raw)
    }

    /// Check both channels
    pub fn is_valid(&self) -> bool {
        self.temperature.is_valid() && self.humidity.is_valid()
    }
}
