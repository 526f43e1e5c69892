//! Configuration and logging

pub mod config;
pub mod logging;

// Re-exports for convenience
pub use logging::init_logger;
