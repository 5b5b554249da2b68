//! RP2040-specific HAL for the hygrostat sensor node
//!
//! - Dynamic pin allocation for config-driven setup
//! - Open-drain data line for single-wire sensors

#![no_std]

pub mod gpio;
pub mod pins;

pub use gpio::OpenDrainLine;
pub use pins::{PinBank, PinError};
