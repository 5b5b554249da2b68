//! Sensor sampling and smoothing

pub mod sampler;

pub use sampler::{Sampler, SmoothedReading};
