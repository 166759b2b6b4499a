//! In-memory data store
//!
//! The resource records the gateway protects. Kept deliberately simple:
//! process-local, no persistence.

pub mod users;

pub use users::{User, UserPatch, UserStore};
