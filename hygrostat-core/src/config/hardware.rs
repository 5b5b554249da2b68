//! Hardware configuration types
//!
//! Pins, sensor model and the relay output of the node.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of user GPIO pins on the RP2040
pub const GPIO_COUNT: u8 = 30;

/// Pin configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct PinConfig {
    /// GPIO pin number (0-29 for RP2040)
    pub pin: u8,
    /// Enable internal pull-up
    #[cfg_attr(feature = "serde", serde(default))]
    pub pull_up: bool,
}

impl PinConfig {
    /// Create a new pin config
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            pull_up: false,
        }
    }

    /// Create a pin with pull-up enabled
    pub const fn with_pullup(pin: u8) -> Self {
        Self {
            pin,
            pull_up: true,
        }
    }

    /// Check the pin number exists on the chip
    pub const fn is_valid(&self) -> bool {
        self.pin < GPIO_COUNT
    }
}

/// Temperature/humidity sensor model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SensorKind {
    /// DHT11: 1°C / 1%RH resolution, 1 Hz
    #[default]
    Dht11,
    /// DHT22 / AM2302: 0.1°C / 0.1%RH resolution, 0.5 Hz
    Dht22,
}

impl SensorKind {
    /// Shortest interval between two conversions the sensor supports (ms)
    pub const fn min_refresh_ms(self) -> u32 {
        match self {
            SensorKind::Dht11 => 1000,
            SensorKind::Dht22 => 2000,
        }
    }

    /// Short name for logs
    pub const fn name(self) -> &'static str {
        match self {
            SensorKind::Dht11 => "DHT11",
            SensorKind::Dht22 => "DHT22",
        }
    }
}

/// Sensor wiring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SensorConfig {
    /// Single-wire data pin
    pub pin: PinConfig,
    /// Sensor model
    pub kind: SensorKind,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            pin: PinConfig::with_pullup(2),
            kind: SensorKind::Dht11,
        }
    }
}

/// Relay output wiring
///
/// Only the pin assignment lives here; switching policy belongs to the
/// relay component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RelayConfig {
    /// Relay coil driver pin
    pub pin: PinConfig,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            pin: PinConfig::new(5),
        }
    }
}
