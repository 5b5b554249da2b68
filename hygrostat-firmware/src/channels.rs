//! Inter-task communication channels
//!
//! Defines the static signals used for communication between Embassy tasks.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use hygrostat_core::sampling::SmoothedReading;

/// Snapshot handed to the publisher when an averaging window closes
#[derive(Debug, Clone, Copy, PartialEq, defmt::Format)]
pub struct SensorReport {
    /// Smoothed temperature (°C)
    pub temperature: f32,
    /// Smoothed relative humidity (%RH)
    pub humidity: f32,
    /// Whether the read attempted on the closing tick failed
    pub error: bool,
    /// Failed reads in a row at the time of the report
    pub consecutive_failures: u32,
    /// Windows closed since boot, starting at 1
    pub window: u32,
}

impl SensorReport {
    /// Build a report from the sampler's current state
    pub fn new(reading: SmoothedReading, consecutive_failures: u32, window: u32) -> Self {
        Self {
            temperature: reading.temperature,
            humidity: reading.humidity,
            error: reading.error,
            consecutive_failures,
            window,
        }
    }
}

/// Latest closed-window report (updated by the sampler task)
///
/// Only the newest report matters; an unread one is overwritten.
pub static REPORT: Signal<CriticalSectionRawMutex, SensorReport> = Signal::new();
