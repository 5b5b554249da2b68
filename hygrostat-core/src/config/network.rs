//! Network configuration types
//!
//! Credentials and endpoints for the Wi-Fi and MQTT collaborators. The node
//! configuration carries them so nothing has to live in a global; the
//! sampling core never reads them.

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum SSID length (802.11 limit)
pub const MAX_SSID_LEN: usize = 32;

/// Maximum passphrase length (WPA2 limit)
pub const MAX_PASSPHRASE_LEN: usize = 64;

/// Maximum broker host / user name length
pub const MAX_HOST_LEN: usize = 64;

/// Maximum MQTT client id length
pub const MAX_CLIENT_ID_LEN: usize = 32;

/// Maximum topic length (prefix + '/' + longest suffix)
pub const MAX_TOPIC_LEN: usize = 96;

/// Default MQTT broker port
pub const DEFAULT_MQTT_PORT: u16 = 1883;

/// Wi-Fi station configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WifiConfig {
    /// Network name
    pub ssid: String<MAX_SSID_LEN>,
    /// WPA passphrase
    pub password: String<MAX_PASSPHRASE_LEN>,
    /// Static address, or `None` for DHCP
    #[cfg_attr(feature = "serde", serde(default))]
    pub static_ip: Option<[u8; 4]>,
    /// Subnet mask used with a static address
    #[cfg_attr(feature = "serde", serde(default = "default_subnet"))]
    pub subnet: [u8; 4],
}

#[cfg(feature = "serde")]
fn default_subnet() -> [u8; 4] {
    [255, 255, 255, 0]
}

impl Default for WifiConfig {
    fn default() -> Self {
        Self {
            ssid: String::new(),
            password: String::new(),
            static_ip: None,
            subnet: [255, 255, 255, 0],
        }
    }
}

impl WifiConfig {
    /// Check whether the address is assigned by DHCP
    ///
    /// An all-zero static address is treated as DHCP as well.
    pub fn uses_dhcp(&self) -> bool {
        match self.static_ip {
            None => true,
            Some(ip) => ip == [0, 0, 0, 0],
        }
    }
}

/// MQTT topics used by the node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Topic {
    /// Last-will message
    Will,
    /// Smoothed sensor reports
    Sensor,
    /// Free-form log lines
    Log,
    /// Relay state requests
    RelayGet,
    /// Relay power command
    RelayPowerSet,
    /// Relay mode command (on/off/auto)
    RelayModeSet,
    /// Relay target temperature command
    RelayTempSet,
}

impl Topic {
    /// Topic path below the node prefix
    pub const fn suffix(self) -> &'static str {
        match self {
            Topic::Will => "will",
            Topic::Sensor => "sensor",
            Topic::Log => "log",
            Topic::RelayGet => "get",
            Topic::RelayPowerSet => "power/set",
            Topic::RelayModeSet => "mode/set",
            Topic::RelayTempSet => "temp/set",
        }
    }
}

/// MQTT client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MqttConfig {
    /// Client identifier
    pub client_id: String<MAX_CLIENT_ID_LEN>,
    /// Broker host name or address
    pub broker: String<MAX_HOST_LEN>,
    /// Broker port
    #[cfg_attr(feature = "serde", serde(default = "default_port"))]
    pub port: u16,
    /// User name
    #[cfg_attr(feature = "serde", serde(default))]
    pub username: String<MAX_HOST_LEN>,
    /// Password
    #[cfg_attr(feature = "serde", serde(default))]
    pub password: String<MAX_PASSPHRASE_LEN>,
    /// Prefix shared by every topic, e.g. `home/attic/relay01`
    pub topic_prefix: String<MAX_HOST_LEN>,
}

#[cfg(feature = "serde")]
fn default_port() -> u16 {
    DEFAULT_MQTT_PORT
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            broker: String::new(),
            port: DEFAULT_MQTT_PORT,
            username: String::new(),
            password: String::new(),
            topic_prefix: String::new(),
        }
    }
}

impl MqttConfig {
    /// Build the full topic name for `topic`
    pub fn topic(&self, topic: Topic) -> String<MAX_TOPIC_LEN> {
        let mut full = String::new();
        let prefix = self.topic_prefix.trim_end_matches('/');

        // Prefix is at most MAX_HOST_LEN and the longest suffix is 9 bytes,
        // so the pushes cannot overflow MAX_TOPIC_LEN.
        let _ = full.push_str(prefix);
        if !prefix.is_empty() {
            let _ = full.push('/');
        }
        let _ = full.push_str(topic.suffix());
        full
    }
}
