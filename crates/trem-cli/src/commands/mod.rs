//! CLI command implementations.

pub mod common;
pub mod config;
pub mod params;
pub mod render;
pub mod timings;
