//! Board-agnostic core logic for the hygrostat sensor node
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Sensor driver trait (temperature/humidity capability)
//! - Tick-driven sampler with calibration and windowed averaging
//! - Node configuration types and validation

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod sampling;
pub mod traits;
