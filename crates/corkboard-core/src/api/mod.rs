//! REST API access for the board service.
//!
//! - `Gateway`: sends requests with the session's bearer token and recovers
//!   from expired tokens with a single refresh-and-retry
//! - `BoardClient`: typed sign-in/sign-up and board operations on top of it
//! - `Transport`: the HTTP seam, implemented over reqwest
//!
//! The service authenticates with `Authorization: Bearer <accessToken>`.

pub mod client;
pub mod error;
pub mod gateway;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use client::BoardClient;
pub use error::ApiError;
pub use gateway::{Gateway, LogRedirect, RetryState, SignInRedirect, REFRESH_PATH, SIGN_IN_ROUTE};
pub use transport::{
    ApiRequest, Attachment, HttpResponse, MultipartBody, RequestBody, ReqwestTransport, Transport,
};
