//! Sensor sampling task
//!
//! Owns the sampler and drives it from a fixed-period ticker. Each closed
//! averaging window is published on [`REPORT`].

use defmt::*;
use embassy_time::{Delay, Duration, Ticker};

use hygrostat_core::sampling::Sampler;
use hygrostat_drivers::sensor::Dht;
use hygrostat_hal_rp2040::OpenDrainLine;

use crate::channels::{SensorReport, REPORT};

/// Sampler over a DHT sensor on an RP2040 GPIO
pub type NodeSampler = Sampler<Dht<OpenDrainLine<'static>, Delay>>;

/// Consecutive failures after which the sensor is reported as lost
const SENSOR_LOST_THRESHOLD: u32 = 10;

/// Sampling task - calls `tick()` once per tick period
#[embassy_executor::task]
pub async fn sampler_task(mut sampler: NodeSampler) {
    let period_ms = sampler.config().tick_period_ms;
    info!(
        "Sampler task started: tick {} ms, window {} ms, {} ticks per read",
        period_ms,
        sampler.config().averaging_window_ms,
        sampler.config().ticks_per_read()
    );

    let mut ticker = Ticker::every(Duration::from_millis(period_ms as u64));
    let mut windows: u32 = 0;

    loop {
        ticker.next().await;

        let window_closed = sampler.tick();

        if sampler.has_error() {
            let failures = sampler.consecutive_failures();
            if let Some(e) = sampler.sensor().last_error() {
                warn!("Sensor read failed: {} ({} in a row)", e, failures);
            }
            if failures == SENSOR_LOST_THRESHOLD {
                error!(
                    "No valid reading for {} attempts, holding last values",
                    failures
                );
            }
        } else {
            trace!(
                "tick: {} samples, T={} H={}",
                sampler.sample_count(),
                sampler.temperature(),
                sampler.humidity()
            );
        }

        if window_closed {
            windows = windows.wrapping_add(1);
            let report = SensorReport::new(
                sampler.reading(),
                sampler.consecutive_failures(),
                windows,
            );
            debug!("Window {} closed: {}", windows, report);
            REPORT.signal(report);
        }
    }
}
