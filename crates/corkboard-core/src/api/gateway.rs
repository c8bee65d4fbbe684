//! Authenticated access to the board service.
//!
//! Every call goes through [`Gateway::send`], which attaches the session's
//! access token and, when the service answers 401, runs a single
//! refresh-and-retry cycle before giving up on the session.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::auth::SessionStore;

use super::transport::{ApiRequest, HttpResponse, MultipartBody, Transport};
use super::ApiError;

/// Status the service uses for a missing, invalid or expired credential.
const STATUS_UNAUTHORIZED: u16 = 401;

/// Endpoint exchanging a refresh token for a new access token.
pub const REFRESH_PATH: &str = "/auth/refresh";

/// Where the user is sent when their session cannot be recovered.
pub const SIGN_IN_ROUTE: &str = "/?modal=signin";

/// Hook invoked when the user has to sign in (again).
pub trait SignInRedirect: Send + Sync {
    fn redirect_to_sign_in(&self, route: &str);
}

/// Redirect that only records the event in the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogRedirect;

impl SignInRedirect for LogRedirect {
    fn redirect_to_sign_in(&self, route: &str) {
        info!(route, "Sign-in required");
    }
}

/// How far a request has progressed through the recovery protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    /// Not yet answered with 401.
    Fresh,
    /// Refreshed once and re-sent; another 401 is final.
    Retried,
    /// Authorization could not be recovered.
    Terminal,
}

/// An in-flight request together with its retry state.
#[derive(Debug)]
struct PendingRequest<'a> {
    request: &'a ApiRequest,
    state: RetryState,
}

impl<'a> PendingRequest<'a> {
    fn new(request: &'a ApiRequest) -> Self {
        Self {
            request,
            state: RetryState::Fresh,
        }
    }

    /// Advance after a 401. `refreshed` is the outcome of the refresh
    /// attempt, which only a fresh request is allowed to make.
    fn on_unauthorized(&mut self, refreshed: Option<String>) -> Option<String> {
        match (self.state, refreshed) {
            (RetryState::Fresh, Some(token)) => {
                self.state = RetryState::Retried;
                Some(token)
            }
            _ => {
                self.state = RetryState::Terminal;
                None
            }
        }
    }
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    #[serde(rename = "refreshToken")]
    refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    #[serde(rename = "accessToken")]
    access_token: Option<String>,
}

/// Gateway to the board service.
///
/// Concurrent refreshes are single-flight: a request that needs a refresh
/// while another one is running waits for it and reuses its token.
pub struct Gateway<T: Transport> {
    transport: T,
    session: SessionStore,
    redirect: Arc<dyn SignInRedirect>,
    refresh_lock: Mutex<()>,
}

impl<T: Transport> Gateway<T> {
    pub fn new(transport: T, session: SessionStore) -> Self {
        Self::with_redirect(transport, session, Arc::new(LogRedirect))
    }

    pub fn with_redirect(transport: T, session: SessionStore, redirect: Arc<dyn SignInRedirect>) -> Self {
        Self {
            transport,
            session,
            redirect,
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send the user to the sign-in entry point
    pub fn redirect_to_sign_in(&self) {
        self.redirect.redirect_to_sign_in(SIGN_IN_ROUTE);
    }

    pub async fn get(&self, path: &str) -> Result<HttpResponse, ApiError> {
        self.send(ApiRequest::get(path)).await
    }

    pub async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> Result<HttpResponse, ApiError> {
        self.send(ApiRequest::post(path).json(body)?).await
    }

    pub async fn post_multipart(&self, path: &str, body: MultipartBody) -> Result<HttpResponse, ApiError> {
        self.send(ApiRequest::post(path).multipart(body)).await
    }

    pub async fn patch_multipart(&self, path: &str, body: MultipartBody) -> Result<HttpResponse, ApiError> {
        self.send(ApiRequest::patch(path).multipart(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<HttpResponse, ApiError> {
        self.send(ApiRequest::delete(path)).await
    }

    /// Send `request` with the current credentials.
    ///
    /// Any response other than 401 is returned as-is, error statuses
    /// included. Transport failures are returned unchanged and never retried.
    /// When authorization cannot be recovered the session is cleared, the
    /// sign-in redirect fires and the caller gets `ApiError::Unauthorized`
    /// carrying the body of the last 401.
    pub async fn send(&self, request: ApiRequest) -> Result<HttpResponse, ApiError> {
        let mut pending = PendingRequest::new(&request);
        let mut bearer = self.session.read().access_token;

        loop {
            let response = self.transport.execute(pending.request, bearer.as_deref()).await?;
            if response.status != STATUS_UNAUTHORIZED {
                return Ok(response);
            }

            let refreshed = match pending.state {
                RetryState::Fresh => self.refresh_access_token(bearer.as_deref()).await,
                RetryState::Retried | RetryState::Terminal => None,
            };

            match pending.on_unauthorized(refreshed) {
                Some(token) => {
                    debug!(method = %request.method, path = %request.path, "Retrying with refreshed token");
                    bearer = Some(token);
                }
                None => return Err(self.terminate(&request, &response)),
            }
        }
    }

    /// Obtain a usable access token after `stale` was rejected.
    ///
    /// Returns `None` when there is no refresh token or the refresh call fails.
    async fn refresh_access_token(&self, stale: Option<&str>) -> Option<String> {
        let _guard = self.refresh_lock.lock().await;
        let session = self.session.read();

        if let Some(current) = session.access_token.as_deref() {
            if Some(current) != stale {
                debug!("Access token was refreshed by a concurrent request");
                return Some(current.to_string());
            }
        }

        let Some(refresh_token) = session.refresh_token else {
            debug!("No refresh token available");
            return None;
        };

        let request = match ApiRequest::post(REFRESH_PATH).json(&RefreshRequest {
            refresh_token: &refresh_token,
        }) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "Failed to build refresh request");
                return None;
            }
        };

        let response = match self.transport.execute(&request, None).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Token refresh failed");
                return None;
            }
        };

        if !response.is_success() {
            warn!(status = response.status, "Token refresh rejected");
            return None;
        }

        let access_token = match response.json::<RefreshResponse>() {
            Ok(RefreshResponse {
                access_token: Some(token),
            }) if !token.is_empty() => token,
            Ok(_) => {
                warn!("Token refresh response carried no access token");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "Token refresh response could not be parsed");
                return None;
            }
        };

        self.session.set_auth(
            access_token.clone(),
            refresh_token,
            session.identity.username,
            session.identity.display_name,
        );
        info!("Access token refreshed");
        Some(access_token)
    }

    fn terminate(&self, request: &ApiRequest, response: &HttpResponse) -> ApiError {
        warn!(method = %request.method, path = %request.path, "Authorization could not be recovered, signing out");
        self.session.logout();
        self.redirect_to_sign_in();
        ApiError::from_status(response.status, &response.text())
    }
}
