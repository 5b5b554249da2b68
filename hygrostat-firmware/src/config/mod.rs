//! Configuration loading
//!
//! The node configuration is validated and encoded at build time
//! (see `build.rs`) and decoded once at boot.

mod loader;

pub use loader::{load_embedded, LoadError};
