//! fwdgate - Telegram bot that admits users only after the owner approves them
//!
//! # Module Structure
//!
//! - `cli`: Command line interface
//! - `core`: Configuration and logging
//! - `telegram`: Update transports, dispatcher and outbound messaging
//!
//! Membership state and the approval state machine live in `fwdcore`.

pub mod cli;
pub mod core;
pub mod telegram;

// Re-export commonly used types for convenience
pub use core::config;
pub use telegram::{Dispatcher, Outgoing, UpdateQueue};
