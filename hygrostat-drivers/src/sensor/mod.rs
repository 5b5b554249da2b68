//! Temperature/humidity sensor drivers

pub mod dht;

pub use dht::{decode_frame, Dht, DhtError, DhtReading};
