//! CLI library components for the formdef tool.

pub mod logging;
