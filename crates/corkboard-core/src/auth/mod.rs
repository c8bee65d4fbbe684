//! Authentication state for the board client.
//!
//! This module provides:
//! - `SessionStore`: the persisted, shareable holder of the token pair and
//!   user identity
//! - `Session` / `Identity`: snapshots read from the store
//!
//! The store is the only authority on whether the user is signed in.

pub mod session;

pub use session::{Identity, Session, SessionStore, SESSION_SLOT};
