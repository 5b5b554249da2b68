//! Configuration types
//!
//! Board-agnostic configuration structures. The firmware receives them as
//! postcard binary data produced from `node.toml` at build time.

pub mod calibration;
pub mod hardware;
pub mod network;
pub mod node;
pub mod types;

pub use calibration::*;
pub use hardware::*;
pub use network::*;
pub use node::*;
pub use types::*;
