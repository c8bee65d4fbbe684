//! Data models for the board service.
//!
//! - `BoardSummary`, `BoardDetail`, `BoardListResponse`: posts as returned by
//!   the service
//! - `BoardDraft`, `BoardCategory`: what the user writes
//! - Sign-in/sign-up request and response bodies

pub mod auth;
pub mod board;

pub use auth::{SignInRequest, SignInResponse, SignUpForm};
pub use board::{BoardCategory, BoardDetail, BoardDraft, BoardListResponse, BoardSummary};
