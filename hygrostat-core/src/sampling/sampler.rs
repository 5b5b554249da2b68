//! Tick-driven sensor sampler
//!
//! Reads a slow temperature/humidity sensor at most once per refresh
//! interval, calibrates each reading and keeps a running average that is
//! restarted every averaging window.

use crate::config::{Calibration, SamplerConfig};
use crate::traits::{Hygrometer, RawReading, SensorError};

/// Snapshot of the smoothed values
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SmoothedReading {
    /// Smoothed temperature (°C, calibrated)
    pub temperature: f32,
    /// Smoothed relative humidity (%RH, calibrated)
    pub humidity: f32,
    /// The read attempted in the latest tick failed
    pub error: bool,
    /// Successful reads behind the current average
    pub sample_count: u32,
}

/// Sensor sampler with windowed averaging
///
/// The outer loop calls [`tick`](Self::tick) every `tick_period_ms` and
/// reads the smoothed values back. `tick` never waits for the sensor to
/// become ready; it only performs the physical read when the refresh
/// interval has elapsed.
///
/// Not reentrant: all calls must come from the same task.
pub struct Sampler<H> {
    sensor: H,
    config: SamplerConfig,
    calibration: Calibration,
    /// Time since the last physical read attempt (ms)
    elapsed_since_read_ms: u32,
    /// Time since the current window opened (ms)
    elapsed_since_window_start_ms: u32,
    /// Sum of calibrated temperatures in the current window
    accumulated_temp: f32,
    /// Sum of calibrated humidities in the current window
    accumulated_humid: f32,
    /// Successful reads in the current window
    sample_count: u32,
    /// Read attempted in the latest tick failed
    last_error: bool,
    /// Failed read attempts since the last success
    consecutive_failures: u32,
    smoothed_temp: f32,
    smoothed_humid: f32,
}

impl<H: Hygrometer> Sampler<H> {
    /// Create a sampler and seed it with one blocking read
    ///
    /// If the seed read fails the smoothed values start at zero, the error
    /// flag is set and the first successful read becomes the average.
    pub fn new(mut sensor: H, config: SamplerConfig, calibration: Calibration) -> Self {
        sensor.begin();

        let mut sampler = Self {
            sensor,
            config,
            calibration,
            elapsed_since_read_ms: 0,
            elapsed_since_window_start_ms: 0,
            accumulated_temp: 0.0,
            accumulated_humid: 0.0,
            sample_count: 0,
            last_error: false,
            consecutive_failures: 0,
            smoothed_temp: 0.0,
            smoothed_humid: 0.0,
        };

        sampler.sample();
        sampler
    }

    /// Advance the sampler by one tick period
    ///
    /// Returns `true` when the averaging window closed during this call,
    /// which is the signal to publish [`temperature`](Self::temperature)
    /// and [`humidity`](Self::humidity).
    pub fn tick(&mut self) -> bool {
        let tick_ms = self.config.tick_period_ms;

        self.last_error = false;

        // Checked before advancing, so the read happens on the tick after
        // the interval has fully elapsed.
        if self.elapsed_since_read_ms >= self.config.min_read_interval_ms {
            self.sample();
            self.elapsed_since_read_ms = 0;
        }
        self.elapsed_since_read_ms = self.elapsed_since_read_ms.saturating_add(tick_ms);

        if self.elapsed_since_window_start_ms > self.config.averaging_window_ms {
            self.accumulated_temp = 0.0;
            self.accumulated_humid = 0.0;
            self.sample_count = 0;
            self.elapsed_since_window_start_ms =
                self.config.window_restart.restart_value(tick_ms);
            true
        } else {
            self.elapsed_since_window_start_ms =
                self.elapsed_since_window_start_ms.saturating_add(tick_ms);
            false
        }
    }

    /// Smoothed temperature (°C)
    pub fn temperature(&self) -> f32 {
        self.smoothed_temp
    }

    /// Smoothed relative humidity (%RH)
    pub fn humidity(&self) -> f32 {
        self.smoothed_humid
    }

    /// Check whether the read attempted in the latest tick failed
    ///
    /// Ticks without a read attempt report `false`.
    pub fn has_error(&self) -> bool {
        self.last_error
    }

    /// Snapshot of the smoothed values and error state
    pub fn reading(&self) -> SmoothedReading {
        SmoothedReading {
            temperature: self.smoothed_temp,
            humidity: self.smoothed_humid,
            error: self.last_error,
            sample_count: self.sample_count,
        }
    }

    /// Successful reads accumulated in the current window
    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    /// Running sums `(temperature, humidity)` of the current window
    pub fn accumulated(&self) -> (f32, f32) {
        (self.accumulated_temp, self.accumulated_humid)
    }

    /// Failed read attempts since the last successful one
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Timing configuration
    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Calibration applied to every reading
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Access the underlying sensor driver
    pub fn sensor(&self) -> &H {
        &self.sensor
    }

    /// Mutable access to the underlying sensor driver
    pub fn sensor_mut(&mut self) -> &mut H {
        &mut self.sensor
    }

    /// Take one physical reading and fold it into the average
    fn sample(&mut self) {
        match self.read_calibrated() {
            Ok(reading) => {
                self.accumulated_temp += reading.temperature;
                self.accumulated_humid += reading.humidity;
                self.sample_count += 1;

                let count = self.sample_count as f32;
                self.smoothed_temp = self.accumulated_temp / count;
                self.smoothed_humid = self.accumulated_humid / count;

                self.last_error = false;
                self.consecutive_failures = 0;
            }
            Err(SensorError::ReadFailure) => {
                self.last_error = true;
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
            }
        }
    }

    fn read_calibrated(&mut self) -> Result<RawReading, SensorError> {
        let raw = RawReading::read_from(&mut self.sensor)?;

        Ok(RawReading {
            temperature: self.calibration.temperature(raw.temperature),
            humidity: self.calibration.humidity(raw.humidity),
        })
    }
}
