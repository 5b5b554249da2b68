//! Embassy async tasks
//!
//! Each task runs independently and communicates via signals.

pub mod report;
pub mod sampler;

pub use report::report_task;
pub use sampler::{sampler_task, NodeSampler};
