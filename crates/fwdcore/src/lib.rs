//! fwdcore - membership gating for the fwdgate bot
//!
//! This crate has no Telegram dependency. It owns the persisted store and the
//! approval state machine; the bot crate turns the resulting effects into
//! Bot API calls.
//!
//! # Module Structure
//!
//! - `store`: the JSON document and its load/save primitives
//! - `approval`: the `Gatekeeper` state machine (unseen → pending → approved/rejected)
//! - `callback`: button payload grammar (`accept:<id>`, `reject:<id>`, menu tokens)
//! - `types`: actor ids and member profiles
//! - `error`: persistence and decode errors

pub mod approval;
pub mod callback;
pub mod error;
pub mod store;
pub mod types;

// Re-export commonly used types for convenience
pub use approval::{Effect, Gatekeeper, Outcome, Transition};
pub use callback::{CallbackAction, Decision, MenuAction};
pub use error::{DecodeError, PersistenceError};
pub use store::{JsonFileStore, MemoryStore, Store, StoreState};
pub use types::{ActorId, Profile};
