//! Temperature/humidity sensor capability

/// Errors that can occur while sampling the sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// The driver returned not-a-number for at least one channel
    ReadFailure,
}

/// Trait for combined temperature/humidity sensors
///
/// Mirrors the contract of the common DHT-family drivers: each channel is
/// read separately and a failed transfer is signalled with `f32::NAN`
/// instead of an error value. A physical read is one call to
/// [`read_temperature`](Self::read_temperature) followed by one call to
/// [`read_humidity`](Self::read_humidity).
pub trait Hygrometer {
    /// Prepare the sensor for reading (pin setup, power-up delay)
    fn begin(&mut self) {}

    /// Read the temperature in degrees Celsius, or NaN on failure
    fn read_temperature(&mut self) -> f32;

    /// Read the relative humidity in percent, or NaN on failure
    fn read_humidity(&mut self) -> f32;
}

/// A raw temperature/humidity pair as delivered by the driver
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawReading {
    /// Temperature (°C)
    pub temperature: f32,
    /// Relative humidity (%RH)
    pub humidity: f32,
}

impl RawReading {
    /// Take one physical reading from the sensor
    ///
    /// Both channels fail together: a NaN on either one is reported as a
    /// single [`SensorError::ReadFailure`].
    pub fn read_from<H: Hygrometer + ?Sized>(sensor: &mut H) -> Result<Self, SensorError> {
        let temperature = sensor.read_temperature();
        let humidity = sensor.read_humidity();

        if temperature.is_nan() || humidity.is_nan() {
            return Err(SensorError::ReadFailure);
        }

        Ok(Self {
            temperature,
            humidity,
        })
    }
}
