//! Hardware abstraction traits
//!
//! These traits define the interface between the sampling logic
//! and hardware-specific sensor drivers.

pub mod hygrometer;

pub use hygrometer::{Hygrometer, RawReading, SensorError};
