pub mod config;
pub mod logging;
pub mod runner;
pub mod stats;
