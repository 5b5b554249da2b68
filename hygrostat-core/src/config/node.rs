//! Complete node configuration
//!
//! One struct replaces the compile-time constants scattered over a typical
//! sensor-node sketch. It is built once at startup and handed by value or
//! reference to the components that need it.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::calibration::Calibration;
use super::hardware::{RelayConfig, SensorConfig};
use super::network::{MqttConfig, WifiConfig};
use super::types::SamplerConfig;

/// Current configuration layout version
pub const CONFIG_VERSION: u8 = 1;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Layout version does not match [`CONFIG_VERSION`]
    VersionMismatch,
    /// Tick period is zero
    ZeroTickPeriod,
    /// Averaging window is shorter than one tick
    WindowTooShort,
    /// Read interval is shorter than the sensor can refresh
    ReadIntervalTooShort,
    /// Pin number does not exist on the chip
    InvalidPin,
    /// Sensor and relay share a pin
    PinConflict,
    /// Calibration slope is zero or a coefficient is not finite
    InvalidCalibration,
    /// A required text field is empty
    MissingField,
}

/// Top-level node configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeConfig {
    /// Configuration version for compatibility checks
    #[cfg_attr(feature = "serde", serde(default = "default_version"))]
    pub version: u8,
    /// Sensor wiring and model
    pub sensor: SensorConfig,
    /// Sampler timing
    pub sampler: SamplerConfig,
    /// Sensor calibration
    #[cfg_attr(feature = "serde", serde(default))]
    pub calibration: Calibration,
    /// Relay wiring
    pub relay: RelayConfig,
    /// Wi-Fi station settings
    pub wifi: WifiConfig,
    /// MQTT client settings
    pub mqtt: MqttConfig,
}

#[cfg(feature = "serde")]
fn default_version() -> u8 {
    CONFIG_VERSION
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            sensor: SensorConfig::default(),
            sampler: SamplerConfig::default(),
            calibration: Calibration::IDENTITY,
            relay: RelayConfig::default(),
            wifi: WifiConfig::default(),
            mqtt: MqttConfig::default(),
        }
    }
}

impl NodeConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Check the configuration for values the node cannot run with
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != CONFIG_VERSION {
            return Err(ConfigError::VersionMismatch);
        }

        let sampler = &self.sampler;
        if sampler.tick_period_ms == 0 {
            return Err(ConfigError::ZeroTickPeriod);
        }
        if sampler.averaging_window_ms < sampler.tick_period_ms {
            return Err(ConfigError::WindowTooShort);
        }
        if sampler.min_read_interval_ms < self.sensor.kind.min_refresh_ms() {
            return Err(ConfigError::ReadIntervalTooShort);
        }

        if !self.sensor.pin.is_valid() || !self.relay.pin.is_valid() {
            return Err(ConfigError::InvalidPin);
        }
        if self.sensor.pin.pin == self.relay.pin.pin {
            return Err(ConfigError::PinConflict);
        }

        if !self.calibration.is_valid() {
            return Err(ConfigError::InvalidCalibration);
        }

        if self.wifi.ssid.is_empty()
            || self.mqtt.client_id.is_empty()
            || self.mqtt.broker.is_empty()
        {
            return Err(ConfigError::MissingField);
        }

        Ok(())
    }
}
