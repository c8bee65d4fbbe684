//! Typed operations of the board service.
//!
//! `BoardClient` wraps a [`Gateway`] and turns responses into models and
//! errors. Board operations need a signed-in session; without one they send
//! the user to sign in and do no network I/O.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::auth::{Session, SessionStore};
use crate::error::Error;
use crate::listing::{self, BoardPage};
use crate::models::{
    BoardCategory, BoardDetail, BoardDraft, BoardListResponse, SignInRequest, SignInResponse,
    SignUpForm,
};
use crate::validation;

use super::gateway::{Gateway, SignInRedirect};
use super::transport::{Attachment, MultipartBody, ReqwestTransport, Transport};
use super::ApiError;

const SIGN_IN_PATH: &str = "/auth/signin";
const SIGN_UP_PATH: &str = "/auth/signup";
const BOARDS_PATH: &str = "/boards";

pub struct BoardClient<T: Transport = ReqwestTransport> {
    gateway: Gateway<T>,
    base_url: String,
}

impl BoardClient<ReqwestTransport> {
    /// Create a client for the service at `base_url`
    pub fn new(
        base_url: &str,
        session: SessionStore,
        redirect: Arc<dyn SignInRedirect>,
    ) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(base_url)?;
        let base_url = transport.base_url().to_string();
        Ok(Self {
            gateway: Gateway::with_redirect(transport, session, redirect),
            base_url,
        })
    }
}

impl<T: Transport> BoardClient<T> {
    pub fn with_gateway(gateway: Gateway<T>, base_url: impl Into<String>) -> Self {
        Self {
            gateway,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn gateway(&self) -> &Gateway<T> {
        &self.gateway
    }

    pub fn session(&self) -> &SessionStore {
        self.gateway.session()
    }

    // ===== Authentication =====

    /// Sign in and store the returned credentials.
    ///
    /// The stored display name is the first available of: the name in the
    /// response, the name already in the session, `name_hint`, the username.
    pub async fn sign_in(
        &self,
        username: &str,
        password: &str,
        name_hint: Option<&str>,
    ) -> Result<Session, Error> {
        validation::validate_sign_in(username, password)?;

        let response = self
            .gateway
            .post_json(SIGN_IN_PATH, &SignInRequest { username, password })
            .await?
            .error_for_status()?;

        let auth: SignInResponse = response.json()?;
        let access_token = auth
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::InvalidResponse("Sign-in response carried no access token".into()))?;
        let refresh_token = auth
            .refresh_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::InvalidResponse("Sign-in response carried no refresh token".into()))?;

        let current = self.session().read();
        let display_name = [
            auth.name.as_deref(),
            current.identity.display_name.as_deref(),
            name_hint,
        ]
        .into_iter()
        .flatten()
        .find(|n| !n.trim().is_empty())
        .unwrap_or(username)
        .to_string();

        self.session().set_auth(
            access_token,
            refresh_token,
            Some(username.to_string()),
            Some(display_name),
        );
        info!(username, "Signed in");
        Ok(self.session().read())
    }

    /// Register a new account. The form is checked before anything is sent.
    pub async fn sign_up(&self, form: &SignUpForm) -> Result<(), Error> {
        validation::validate_sign_up(form)?;

        self.gateway
            .post_json(SIGN_UP_PATH, form)
            .await?
            .error_for_status()?;

        info!(username = %form.username, "Account created");
        Ok(())
    }

    /// Forget the current credentials
    pub fn sign_out(&self) {
        self.session().logout();
        info!("Signed out");
    }

    // ===== Boards =====

    /// Fetch every post and return one page of them, optionally filtered
    /// by category.
    pub async fn list_boards(&self, category: Option<&BoardCategory>, page: usize) -> Result<BoardPage, Error> {
        self.require_session()?;

        let path = format!("{}?{}", BOARDS_PATH, listing::fetch_all_query());
        let response = self.gateway.get(&path).await?.error_for_status()?;
        let all: BoardListResponse = response.json()?;
        debug!(count = all.content.len(), "Board list received");

        Ok(listing::paginate(&all.content, category, page))
    }

    pub async fn get_board(&self, id: i64) -> Result<BoardDetail, Error> {
        self.require_session()?;

        let response = self
            .gateway
            .get(&Self::board_path(id))
            .await?
            .error_for_status()?;

        if response.is_empty() {
            return Err(ApiError::InvalidResponse(format!("Post {} came back empty", id)).into());
        }
        Ok(response.json()?)
    }

    /// Publish a new post, returning the service's description of it
    pub async fn create_board(
        &self,
        draft: &BoardDraft,
        file: Option<Attachment>,
    ) -> Result<serde_json::Value, Error> {
        self.require_session()?;
        validation::validate_draft(draft)?;

        let body = Self::multipart_body(draft, file)?;
        let response = self
            .gateway
            .post_multipart(BOARDS_PATH, body)
            .await?
            .error_for_status()?;

        if response.is_empty() {
            warn!("Post creation returned no body");
            return Err(ApiError::InvalidResponse("Post creation was not confirmed".into()).into());
        }
        let created = response.json()?;
        info!(title = %draft.title, "Post created");
        Ok(created)
    }

    /// Replace a post's fields, and its image when `file` is given
    pub async fn update_board(&self, id: i64, draft: &BoardDraft, file: Option<Attachment>) -> Result<(), Error> {
        self.require_session()?;
        validation::validate_draft(draft)?;

        let body = Self::multipart_body(draft, file)?;
        self.gateway
            .patch_multipart(&Self::board_path(id), body)
            .await?
            .error_for_status()?;

        info!(id, "Post updated");
        Ok(())
    }

    pub async fn delete_board(&self, id: i64) -> Result<(), Error> {
        self.require_session()?;

        let response = self
            .gateway
            .delete(&Self::board_path(id))
            .await?
            .error_for_status()?;

        if response.is_empty() {
            warn!(id, "Post deletion returned no body");
            return Err(ApiError::InvalidResponse("Post deletion was not confirmed".into()).into());
        }
        info!(id, "Post deleted");
        Ok(())
    }

    /// Absolute URL of a post image; relative paths live on the service host
    pub fn image_url(&self, path: &str) -> String {
        if path.starts_with("http") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        }
    }

    fn board_path(id: i64) -> String {
        format!("{}/{}", BOARDS_PATH, id)
    }

    fn multipart_body(draft: &BoardDraft, file: Option<Attachment>) -> Result<MultipartBody, ApiError> {
        let request = serde_json::to_value(draft)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to encode post: {}", e)))?;
        Ok(MultipartBody { request, file })
    }

    fn require_session(&self) -> Result<(), Error> {
        if self.session().is_authenticated() {
            Ok(())
        } else {
            debug!("No session, redirecting to sign-in");
            self.gateway.redirect_to_sign_in();
            Err(Error::NotSignedIn)
        }
    }
}
