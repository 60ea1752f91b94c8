pub mod cache;
pub mod config;
pub mod intelligence;
pub mod logging;
pub mod report;
