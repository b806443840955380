//! # Core Module
//!
//! Concurrency primitives shared by the task system and the streaming layer.
//!
//! ## Key Components
//! - `CancellationToken`: Shared flag used to abandon in-flight chunk work

pub mod cancellation;

pub use cancellation::CancellationToken;
