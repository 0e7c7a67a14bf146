//! Shared gutter data models consumed by the core library and host crates.

pub mod annotation;
pub mod baseline;

pub use annotation::*;
pub use baseline::*;
