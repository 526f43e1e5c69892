//! Common test utilities
//!
//! This module is shared across all integration tests

pub mod fixtures;
pub mod recorder;

#[allow(unused_imports)]
pub use fixtures::{callback_update, start_update, text_update, user_json, TestEnvironment, OWNER};
#[allow(unused_imports)]
pub use recorder::{Call, RecordingMessenger};
