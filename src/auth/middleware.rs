//! Middleware that binds a workspace API client to every request.
//!
//! Handlers pick the client back up with the [`WorkspaceClient`] extractor
//! implemented here.

use crate::auth::{
    client::WorkspaceClient,
    config::OAuthConfig,
    session::{AccessTokenPair, Session},
};
use axum::{
    extract::{FromRequestParts, Request},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
};
use core::fmt;
use std::sync::Arc;
use tower::{Layer, Service};

/// A middleware layer that attaches a [`WorkspaceClient`] to every request,
/// making it easy to reach the workspace API from handlers.
///
/// If an upstream session layer stored a token pair in the request's
/// [`Session`] extension, the client is bound to it; otherwise the client
/// carries application credentials only. The request always proceeds to the
/// inner service.
///
/// [`WorkspaceClient`]: crate::auth::WorkspaceClient
#[derive(Clone)]
pub struct ClientAttachLayer {
    config: Arc<OAuthConfig>,
}

impl ClientAttachLayer {
    /// Create a new `ClientAttachLayer` with the given application config.
    pub const fn new(config: Arc<OAuthConfig>) -> Self {
        Self { config }
    }
}

impl fmt::Debug for ClientAttachLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientAttachLayer").finish()
    }
}

impl<S> Layer<S> for ClientAttachLayer {
    type Service = ClientAttachService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ClientAttachService {
            inner,
            config: self.config.clone(),
        }
    }
}

/// The service produced by [`ClientAttachLayer`]. Meant to be nestable and
/// cheaply cloneable.
#[derive(Clone)]
pub struct ClientAttachService<S> {
    inner: S,
    config: Arc<OAuthConfig>,
}

impl<S> ClientAttachService<S> {
    /// Create a new `ClientAttachService` wrapping the given inner service.
    pub const fn new(inner: S, config: Arc<OAuthConfig>) -> Self {
        Self { inner, config }
    }
}

impl fmt::Debug for ClientAttachService<()> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientAttachService").finish()
    }
}

impl<S> Service<Request> for ClientAttachService<S>
where
    S: Service<Request>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request) -> Self::Future {
        // Client construction does no I/O, so the wrapped future is the
        // inner service's own.
        let token = AccessTokenPair::from_session(req.extensions().get::<Session>());
        let client = self.config.client(token);
        req.extensions_mut().insert(client);

        self.inner.call(req)
    }
}

/// Rejection returned when a handler extracts a [`WorkspaceClient`] but no
/// [`ClientAttachLayer`] is installed on the route.
#[derive(Debug, Clone, Copy)]
pub struct ClientNotAttached;

impl IntoResponse for ClientNotAttached {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "workspace client not attached to request",
        )
            .into_response()
    }
}

impl<S> FromRequestParts<S> for WorkspaceClient
where
    S: Send + Sync,
{
    type Rejection = ClientNotAttached;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<WorkspaceClient>()
            .cloned()
            .ok_or(ClientNotAttached)
    }
}
