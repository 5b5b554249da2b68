//! DHT11 / DHT22 single-wire temperature and humidity sensor
//!
//! The sensor shares one open-drain data line with the host. A read is a
//! single transaction:
//!
//! 1. The host pulls the line low for the start pulse (DHT11 ≥ 18 ms,
//!    DHT22 ≥ 1 ms) and then releases it.
//! 2. The sensor answers with 80 µs low followed by 80 µs high.
//! 3. The sensor sends 40 bits, each a 50 µs low followed by a high pulse
//!    of ~27 µs (`0`) or ~70 µs (`1`).
//!
//! The pin must behave as open drain: `set_low` drives the line,
//! `set_high` releases it to the pull-up so the sensor can drive it.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use hygrostat_core::config::SensorKind;
use hygrostat_core::traits::Hygrometer;

/// Idle time with the line released before each start pulse
const IDLE_BEFORE_START_MS: u32 = 1;

/// Start pulse length for the DHT11
const DHT11_START_US: u32 = 20_000;

/// Start pulse length for the DHT22
const DHT22_START_US: u32 = 1_100;

/// Maximum wait for the sensor to acknowledge the start pulse
const RESPONSE_TIMEOUT_US: u32 = 200;

/// Maximum wait for any edge inside the response or data bits
const EDGE_TIMEOUT_US: u32 = 100;

/// Delay after a rising edge before sampling the bit value
const BIT_SAMPLE_US: u32 = 35;

/// Settling time after power-up before the first transaction
const POWER_UP_MS: u32 = 1_000;

/// Errors from a DHT transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DhtError {
    /// The sensor did not produce an expected edge in time
    Timeout,
    /// The frame checksum did not match its payload
    Checksum,
    /// The underlying GPIO reported an error
    Pin,
}

/// One decoded sensor frame
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DhtReading {
    /// Temperature (°C)
    pub temperature: f32,
    /// Relative humidity (%RH)
    pub humidity: f32,
}

/// Decode a raw 5-byte frame
///
/// Byte 4 must equal the low 8 bits of the sum of bytes 0 to 3.
pub fn decode_frame(kind: SensorKind, frame: [u8; 5]) -> Result<DhtReading, DhtError> {
    let sum = frame[0]
        .wrapping_add(frame[1])
        .wrapping_add(frame[2])
        .wrapping_add(frame[3]);
    if sum != frame[4] {
        return Err(DhtError::Checksum);
    }

    let reading = match kind {
        SensorKind::Dht11 => {
            let humidity = frame[0] as f32 + frame[1] as f32 / 10.0;
            let magnitude = frame[2] as f32 + (frame[3] & 0x0f) as f32 / 10.0;
            let temperature = if frame[3] & 0x80 != 0 {
                -magnitude
            } else {
                magnitude
            };
            DhtReading {
                temperature,
                humidity,
            }
        }
        SensorKind::Dht22 => {
            let humidity = u16::from_be_bytes([frame[0], frame[1]]) as f32 / 10.0;
            let magnitude = u16::from_be_bytes([frame[2] & 0x7f, frame[3]]) as f32 / 10.0;
            let temperature = if frame[2] & 0x80 != 0 {
                -magnitude
            } else {
                magnitude
            };
            DhtReading {
                temperature,
                humidity,
            }
        }
    };

    Ok(reading)
}

/// DHT-family sensor on an open-drain data line
pub struct Dht<P, D> {
    pin: P,
    delay: D,
    kind: SensorKind,
    /// Frame fetched by `read_temperature`, consumed by `read_humidity`
    pending: Option<Result<DhtReading, DhtError>>,
    last_error: Option<DhtError>,
}

impl<P, D> Dht<P, D>
where
    P: InputPin + OutputPin,
    D: DelayNs,
{
    /// Create a new driver
    ///
    /// # Arguments
    /// - `pin`: Open-drain data line (idle high through a pull-up)
    /// - `delay`: Blocking delay with microsecond resolution
    /// - `kind`: Sensor variant, selects start pulse and frame layout
    pub fn new(pin: P, delay: D, kind: SensorKind) -> Self {
        Self {
            pin,
            delay,
            kind,
            pending: None,
            last_error: None,
        }
    }

    /// Sensor variant this driver talks to
    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    /// Error from the most recent transaction, if it failed
    pub fn last_error(&self) -> Option<DhtError> {
        self.last_error
    }

    /// Release the driver's resources
    pub fn release(self) -> (P, D) {
        (self.pin, self.delay)
    }

    /// Run one full transaction and decode the frame
    pub fn measure(&mut self) -> Result<DhtReading, DhtError> {
        let result = self
            .read_frame()
            .and_then(|frame| decode_frame(self.kind, frame));
        self.last_error = result.err();
        result
    }

    fn read_frame(&mut self) -> Result<[u8; 5], DhtError> {
        self.release_line()?;
        self.delay.delay_ms(IDLE_BEFORE_START_MS);

        self.pin.set_low().map_err(|_| DhtError::Pin)?;
        match self.kind {
            SensorKind::Dht11 => self.delay.delay_us(DHT11_START_US),
            SensorKind::Dht22 => self.delay.delay_us(DHT22_START_US),
        }
        self.release_line()?;

        // Response: line goes low, then high, then low again for the first bit
        self.wait_for(false, RESPONSE_TIMEOUT_US)?;
        self.wait_for(true, EDGE_TIMEOUT_US)?;
        self.wait_for(false, EDGE_TIMEOUT_US)?;

        let mut frame = [0u8; 5];
        for bit in 0..40 {
            self.wait_for(true, EDGE_TIMEOUT_US)?;
            self.delay.delay_us(BIT_SAMPLE_US);
            if self.pin.is_high().map_err(|_| DhtError::Pin)? {
                frame[bit / 8] |= 1 << (7 - bit % 8);
                self.wait_for(false, EDGE_TIMEOUT_US)?;
            }
        }

        Ok(frame)
    }

    fn release_line(&mut self) -> Result<(), DhtError> {
        self.pin.set_high().map_err(|_| DhtError::Pin)
    }

    /// Poll until the line reaches `high`, in 1 µs steps
    fn wait_for(&mut self, high: bool, timeout_us: u32) -> Result<(), DhtError> {
        for _ in 0..timeout_us {
            if self.pin.is_high().map_err(|_| DhtError::Pin)? == high {
                return Ok(());
            }
            self.delay.delay_us(1);
        }
        Err(DhtError::Timeout)
    }
}

impl<P, D> Hygrometer for Dht<P, D>
where
    P: InputPin + OutputPin,
    D: DelayNs,
{
    fn begin(&mut self) {
        self.last_error = self.release_line().err();
        self.delay.delay_ms(POWER_UP_MS);
    }

    fn read_temperature(&mut self) -> f32 {
        let result = self.measure();
        self.pending = Some(result);
        match result {
            Ok(reading) => reading.temperature,
            Err(_) => f32::NAN,
        }
    }

    fn read_humidity(&mut self) -> f32 {
        let result = match self.pending.take() {
            Some(result) => result,
            None => self.measure(),
        };
        match result {
            Ok(reading) => reading.humidity,
            Err(_) => f32::NAN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use core::convert::Infallible;
    use embedded_hal::digital::{ErrorKind, ErrorType};

    /// Simulated sensor on a shared line with a shared clock (ns)
    struct SimLine {
        now_ns: Cell<u64>,
        low_since: Cell<Option<u64>>,
        released_at: Cell<Option<u64>>,
        start_pulses: Cell<u32>,
        min_start_us: u64,
        present: bool,
        frame: [u8; 5],
    }

    impl SimLine {
        fn new(kind: SensorKind, frame: [u8; 5]) -> Self {
            Self {
                now_ns: Cell::new(0),
                low_since: Cell::new(None),
                released_at: Cell::new(None),
                start_pulses: Cell::new(0),
                min_start_us: match kind {
                    SensorKind::Dht11 => 18_000,
                    SensorKind::Dht22 => 1_000,
                },
                present: true,
                frame,
            }
        }

        fn absent() -> Self {
            Self {
                present: false,
                ..Self::new(SensorKind::Dht22, [0; 5])
            }
        }

        fn now_us(&self) -> u64 {
            self.now_ns.get() / 1_000
        }

        fn bit(&self, index: usize) -> bool {
            self.frame[index / 8] & (1 << (7 - index % 8)) != 0
        }

        /// Level driven by the sensor `t` µs after the host released the line
        fn response_level(&self, t: u64) -> bool {
            let mut t = t;
            // Pull-up holds the line before the sensor reacts
            if t < 30 {
                return true;
            }
            t -= 30;
            if t < 80 {
                return false;
            }
            t -= 80;
            if t < 80 {
                return true;
            }
            t -= 80;
            for index in 0..40 {
                if t < 50 {
                    return false;
                }
                t -= 50;
                let high = if self.bit(index) { 70 } else { 26 };
                if t < high {
                    return true;
                }
                t -= high;
            }
            t >= 50
        }

        fn level(&self) -> bool {
            if self.low_since.get().is_some() {
                return false;
            }
            match self.released_at.get() {
                Some(at) if self.present => self.response_level(self.now_us() - at),
                _ => true,
            }
        }
    }

    struct SimPin<'a>(&'a SimLine);

    impl ErrorType for SimPin<'_> {
        type Error = Infallible;
    }

    impl OutputPin for SimPin<'_> {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            let line = self.0;
            if line.low_since.get().is_none() {
                line.low_since.set(Some(line.now_us()));
            }
            line.released_at.set(None);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            let line = self.0;
            if let Some(since) = line.low_since.take() {
                if line.now_us() - since >= line.min_start_us {
                    line.start_pulses.set(line.start_pulses.get() + 1);
                    line.released_at.set(Some(line.now_us()));
                }
            }
            Ok(())
        }
    }

    impl InputPin for SimPin<'_> {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(self.0.level())
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.0.level())
        }
    }

    struct SimDelay<'a>(&'a SimLine);

    impl DelayNs for SimDelay<'_> {
        fn delay_ns(&mut self, ns: u32) {
            let clock = &self.0.now_ns;
            clock.set(clock.get() + ns as u64);
        }
    }

    fn close(a: f32, b: f32) -> bool {
        let diff = a - b;
        diff < 0.01 && diff > -0.01
    }

    #[test]
    fn test_decode_dht11() {
        let reading = decode_frame(SensorKind::Dht11, [45, 0, 23, 4, 72]).unwrap();
        assert!(close(reading.humidity, 45.0));
        assert!(close(reading.temperature, 23.4));
    }

    #[test]
    fn test_decode_dht11_negative() {
        // -1.5°C, 80% RH
        let reading = decode_frame(SensorKind::Dht11, [80, 0, 1, 0x85, 0xD6]).unwrap();
        assert!(close(reading.temperature, -1.5));
    }

    #[test]
    fn test_decode_dht22() {
        // 65.2% RH, -10.1°C
        let reading = decode_frame(SensorKind::Dht22, [0x02, 0x8C, 0x80, 0x65, 0x73]).unwrap();
        assert!(close(reading.humidity, 65.2));
        assert!(close(reading.temperature, -10.1));
    }

    #[test]
    fn test_decode_bad_checksum() {
        assert_eq!(
            decode_frame(SensorKind::Dht11, [45, 0, 23, 4, 73]),
            Err(DhtError::Checksum)
        );
    }

    #[test]
    fn test_measure_dht22() {
        let frame = [0x01, 0xB3, 0x00, 0xE1, 0x95];
        let line = SimLine::new(SensorKind::Dht22, frame);
        let mut dht = Dht::new(SimPin(&line), SimDelay(&line), SensorKind::Dht22);

        let reading = dht.measure().unwrap();
        assert!(close(reading.humidity, 43.5));
        assert!(close(reading.temperature, 22.5));
        assert_eq!(dht.last_error(), None);
    }

    #[test]
    fn test_measure_dht11_needs_long_start_pulse() {
        let frame = [55, 0, 19, 0, 74];
        let line = SimLine::new(SensorKind::Dht11, frame);
        let mut dht = Dht::new(SimPin(&line), SimDelay(&line), SensorKind::Dht11);

        let reading = dht.measure().unwrap();
        assert!(close(reading.humidity, 55.0));
        assert!(close(reading.temperature, 19.0));
        assert_eq!(line.start_pulses.get(), 1);
    }

    #[test]
    fn test_hygrometer_reads_one_frame_per_pair() {
        let frame = [0x01, 0xB3, 0x00, 0xE1, 0x95];
        let line = SimLine::new(SensorKind::Dht22, frame);
        let mut dht = Dht::new(SimPin(&line), SimDelay(&line), SensorKind::Dht22);

        dht.begin();
        let temperature = dht.read_temperature();
        let humidity = dht.read_humidity();

        assert!(close(temperature, 22.5));
        assert!(close(humidity, 43.5));
        assert_eq!(line.start_pulses.get(), 1);
    }

    #[test]
    fn test_absent_sensor_times_out() {
        let line = SimLine::absent();
        let mut dht = Dht::new(SimPin(&line), SimDelay(&line), SensorKind::Dht22);

        assert!(dht.read_temperature().is_nan());
        assert!(dht.read_humidity().is_nan());
        assert_eq!(dht.last_error(), Some(DhtError::Timeout));
    }

    /// Pin that cannot release the line
    struct StuckLowPin;

    impl ErrorType for StuckLowPin {
        type Error = ErrorKind;
    }

    impl OutputPin for StuckLowPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            Err(ErrorKind::Other)
        }
    }

    impl InputPin for StuckLowPin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(false)
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(true)
        }
    }

    struct NoopDelay;

    impl DelayNs for NoopDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    #[test]
    fn test_begin_records_pin_error() {
        let mut dht = Dht::new(StuckLowPin, NoopDelay, SensorKind::Dht11);

        dht.begin();
        assert_eq!(dht.last_error(), Some(DhtError::Pin));

        assert!(dht.read_temperature().is_nan());
        assert!(dht.read_humidity().is_nan());
        assert_eq!(dht.last_error(), Some(DhtError::Pin));
    }

    #[test]
    fn test_begin_clears_error_on_healthy_line() {
        let line = SimLine::new(SensorKind::Dht22, [0; 5]);
        let mut dht = Dht::new(SimPin(&line), SimDelay(&line), SensorKind::Dht22);

        dht.begin();
        assert_eq!(dht.last_error(), None);
    }

    #[test]
    fn test_corrupted_frame_reports_checksum() {
        let line = SimLine::new(SensorKind::Dht22, [0x01, 0xB3, 0x00, 0xE1, 0x00]);
        let mut dht = Dht::new(SimPin(&line), SimDelay(&line), SensorKind::Dht22);

        assert_eq!(dht.measure(), Err(DhtError::Checksum));
    }
}
