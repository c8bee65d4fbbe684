//! Corkboard core - client library for a community bulletin-board service.
//!
//! The heart of the crate is the authenticated API-access layer:
//!
//! - [`auth::SessionStore`] holds the access/refresh token pair and the user's
//!   identity, persisted across restarts.
//! - [`api::Gateway`] sends every request with the current bearer token and,
//!   when the service rejects it, refreshes the token once and retries.
//!
//! [`api::BoardClient`] builds the board operations (sign-in, listing,
//! create/edit/delete with an image attachment) on top of them.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod listing;
pub mod models;
pub mod utils;
pub mod validation;

pub use api::{ApiError, BoardClient, Gateway, SignInRedirect};
pub use auth::{Session, SessionStore};
pub use config::Config;
pub use error::Error;
pub use listing::BoardPage;
