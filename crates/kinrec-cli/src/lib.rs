//! CLI library components for kinetic record matching.

pub mod config;
pub mod logging;
pub mod pipeline;
