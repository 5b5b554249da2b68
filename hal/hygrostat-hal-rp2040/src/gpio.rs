//! Open-drain data line built on a bidirectional GPIO
//!
//! Single-wire sensors share the data line with the host. The output latch
//! is held low and only the pin direction changes: output drives the line
//! low, input releases it to the pull-up.

use core::convert::Infallible;

use embassy_rp::gpio::{AnyPin, Flex, Pull};
use embassy_rp::Peri;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use hygrostat_core::config::PinConfig;

use crate::pins::{PinBank, PinError};

/// GPIO emulating an open-drain output with readback
pub struct OpenDrainLine<'d> {
    flex: Flex<'d>,
}

impl<'d> OpenDrainLine<'d> {
    /// Create a released (high) line
    pub fn new(pin: Peri<'d, AnyPin>, pull_up: bool) -> Self {
        let mut flex = Flex::new(pin);
        flex.set_pull(if pull_up { Pull::Up } else { Pull::None });
        flex.set_low();
        flex.set_as_input();
        Self { flex }
    }
}

impl OpenDrainLine<'static> {
    /// Take the configured pin from the bank and wrap it
    pub fn from_config(bank: &mut PinBank, config: &PinConfig) -> Result<Self, PinError> {
        let pin = bank.take(config.pin)?;
        Ok(Self::new(pin, config.pull_up))
    }
}

impl ErrorType for OpenDrainLine<'_> {
    type Error = Infallible;
}

impl OutputPin for OpenDrainLine<'_> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.flex.set_as_output();
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.flex.set_as_input();
        Ok(())
    }
}

impl InputPin for OpenDrainLine<'_> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.flex.is_high())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.flex.is_low())
    }
}
