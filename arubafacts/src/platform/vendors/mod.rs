//! Built-in vendor platforms.

pub mod aruba_instant;
