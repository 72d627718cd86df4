//! Binary-side glue: configuration, progress bars and terminal output.

pub mod config;
pub mod progress;
pub mod terminal;
