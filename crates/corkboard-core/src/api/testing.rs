//! In-memory transport and redirect doubles for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::Method;

use super::transport::{ApiRequest, HttpResponse, RequestBody, Transport};
use super::{ApiError, SignInRedirect};

type Responder = dyn Fn(&ApiRequest, Option<&str>) -> Result<HttpResponse, ApiError> + Send + Sync;

/// One request as seen by the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub bearer: Option<String>,
    pub body: RequestBody,
}

/// Transport answering from a closure and recording every call.
pub struct ScriptedTransport {
    responder: Box<Responder>,
    calls: Mutex<Vec<RecordedCall>>,
    yielding: bool,
}

impl ScriptedTransport {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&ApiRequest, Option<&str>) -> Result<HttpResponse, ApiError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
            yielding: false,
        }
    }

    /// Yield to the scheduler before answering, so concurrent requests
    /// interleave the way they would over a real network.
    pub fn yielding(mut self) -> Self {
        self.yielding = true;
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, path: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| c.path == path).count()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: &ApiRequest, bearer: Option<&str>) -> Result<HttpResponse, ApiError> {
        self.calls.lock().unwrap().push(RecordedCall {
            method: request.method.clone(),
            path: request.path.clone(),
            bearer: bearer.map(str::to_string),
            body: request.body.clone(),
        });
        if self.yielding {
            tokio::task::yield_now().await;
        }
        (self.responder)(request, bearer)
    }
}

/// Redirect that remembers every route it was sent to.
#[derive(Debug, Default)]
pub struct RecordingRedirect {
    routes: Mutex<Vec<String>>,
}

impl RecordingRedirect {
    pub fn routes(&self) -> Vec<String> {
        self.routes.lock().unwrap().clone()
    }
}

impl SignInRedirect for RecordingRedirect {
    fn redirect_to_sign_in(&self, route: &str) {
        self.routes.lock().unwrap().push(route.to_string());
    }
}

pub fn json_response(status: u16, body: &str) -> HttpResponse {
    HttpResponse::new(status, body.as_bytes().to_vec())
}
