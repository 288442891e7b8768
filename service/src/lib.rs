//! Process-level infrastructure concerns: configuration and logging.

pub mod config;
pub mod logging;
