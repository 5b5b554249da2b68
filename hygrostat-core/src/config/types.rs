//! Sampler configuration types

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default tick period of the outer control loop (ms)
pub const DEFAULT_TICK_PERIOD_MS: u32 = 500;

/// Default averaging window (ms)
pub const DEFAULT_AVERAGING_WINDOW_MS: u32 = 30_000;

/// Data refresh latency of DHT-class sensors (ms)
///
/// A DHT reports the result of the previous conversion, so reading more
/// often than this returns stale data.
pub const SENSOR_REFRESH_MS: u32 = 2000;

/// Where the window counter restarts after a window closes
///
/// The read counter is zeroed on a read and then advanced in the same tick.
/// The window counter historically restarts at one tick period and is not
/// advanced in the closing tick. Both land on `tick_period_ms` for the next
/// tick, but the very first window (counter starting at zero) is one tick
/// longer than every window after it. `Legacy` keeps that behaviour for
/// compatibility with deployed nodes; `Aligned` restarts at zero so every
/// window spans the same number of ticks as the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum WindowRestart {
    /// Restart at `tick_period_ms`
    #[default]
    Legacy,
    /// Restart at zero
    Aligned,
}

impl WindowRestart {
    /// Counter value right after a window closes
    pub const fn restart_value(self, tick_period_ms: u32) -> u32 {
        match self {
            WindowRestart::Legacy => tick_period_ms,
            WindowRestart::Aligned => 0,
        }
    }
}

/// Timing configuration of the sampler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SamplerConfig {
    /// Time between two `tick()` calls (ms)
    pub tick_period_ms: u32,
    /// Length of one averaging window (ms)
    pub averaging_window_ms: u32,
    /// Minimum time between physical sensor reads (ms)
    #[cfg_attr(feature = "serde", serde(default = "default_min_read_interval"))]
    pub min_read_interval_ms: u32,
    /// Window counter restart policy
    #[cfg_attr(feature = "serde", serde(default))]
    pub window_restart: WindowRestart,
}

#[cfg(feature = "serde")]
fn default_min_read_interval() -> u32 {
    SENSOR_REFRESH_MS
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: DEFAULT_TICK_PERIOD_MS,
            averaging_window_ms: DEFAULT_AVERAGING_WINDOW_MS,
            min_read_interval_ms: SENSOR_REFRESH_MS,
            window_restart: WindowRestart::Legacy,
        }
    }
}

impl SamplerConfig {
    /// Create a config with the default read interval and restart policy
    pub const fn new(tick_period_ms: u32, averaging_window_ms: u32) -> Self {
        Self {
            tick_period_ms,
            averaging_window_ms,
            min_read_interval_ms: SENSOR_REFRESH_MS,
            window_restart: WindowRestart::Legacy,
        }
    }

    /// Builder: set the minimum read interval
    pub const fn with_min_read_interval(mut self, min_read_interval_ms: u32) -> Self {
        self.min_read_interval_ms = min_read_interval_ms;
        self
    }

    /// Builder: set the window restart policy
    pub const fn with_window_restart(mut self, window_restart: WindowRestart) -> Self {
        self.window_restart = window_restart;
        self
    }

    /// Number of ticks between two physical read attempts
    pub const fn ticks_per_read(&self) -> u32 {
        if self.tick_period_ms == 0 {
            return 0;
        }
        self.min_read_interval_ms.div_ceil(self.tick_period_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SamplerConfig::default();
        assert_eq!(config.tick_period_ms, 500);
        assert_eq!(config.min_read_interval_ms, 2000);
        assert_eq!(config.window_restart, WindowRestart::Legacy);
        assert_eq!(config.ticks_per_read(), 4);
    }

    #[test]
    fn test_restart_value() {
        assert_eq!(WindowRestart::Legacy.restart_value(500), 500);
        assert_eq!(WindowRestart::Aligned.restart_value(500), 0);
    }

    #[test]
    fn test_ticks_per_read_rounds_up() {
        let config = SamplerConfig::new(300, 3000);
        assert_eq!(config.ticks_per_read(), 7);
    }
}
