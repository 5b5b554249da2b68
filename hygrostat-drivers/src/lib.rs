//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in hygrostat-core:
//!
//! - Temperature/humidity sensors (DHT11, DHT22 single-wire)

#![no_std]
#![deny(unsafe_code)]

pub mod sensor;
