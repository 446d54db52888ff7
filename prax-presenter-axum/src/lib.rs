//! Axum framework integration for Prax presenters.
//!
//! This crate connects [`prax_presenter_core`] to
//! [Axum](https://github.com/tokio-rs/axum) handlers.
//!
//! # Features
//!
//! - **Extractor**: [`PresentParams`] reads `count`, `include` and `policies`
//!   from the query string, honoring the configured parameter names
//! - **State**: [`PresenterState`] shares one [`PresenterRegistry`] between handlers
//! - **Errors**: [`PresenterAxumError`] maps presenter failures to responses
//!
//! # Example
//!
//! ```rust,ignore
//! use axum::{Router, routing::get, extract::State};
//! use prax_presenter_axum::{PresentParams, PresenterAxumError, PresenterState};
//!
//! async fn list_posts(
//!     State(presenters): State<PresenterState<User>>,
//!     CurrentUser(user): CurrentUser,
//!     params: PresentParams,
//! ) -> Result<Json<PostsResponse>, PresenterAxumError> {
//!     let presenter = presenters.present(user, load_posts().await, params)?;
//!     Ok(Json(PostsResponse::from(&presenter)))
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let state = PresenterState::new(registry());
//!
//!     let app = Router::new()
//!         .route("/posts", get(list_posts))
//!         .with_state(state);
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::IntoResponse,
};
use thiserror::Error;
use tracing::{debug, warn};

use prax_presenter_core::ErrorCode;

// Re-export key types
pub use prax_presenter_core::prelude::*;

/// Errors that can occur while presenting from an Axum handler.
#[derive(Error, Debug)]
pub enum PresenterAxumError {
    /// The presenter parameters in the query string are malformed.
    #[error("invalid presenter parameters: {0}")]
    InvalidParams(#[source] PresenterError),

    /// Resolution failed.
    #[error("presentation failed: {0}")]
    Presenter(#[from] PresenterError),
}

impl PresenterAxumError {
    /// Error code of the underlying presenter error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidParams(err) | Self::Presenter(err) => err.code(),
        }
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidParams(_) => StatusCode::BAD_REQUEST,
            Self::Presenter(err) if err.code().is_client_error() => StatusCode::BAD_REQUEST,
            Self::Presenter(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for PresenterAxumError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(code = %self.code(), error = %self, "Presenter error");
        }
        (status, format!("[{}] {}", self.code(), self)).into_response()
    }
}

/// Result type for Prax presenter handlers.
pub type Result<T> = std::result::Result<T, PresenterAxumError>;

/// Extractor for presenter parameters.
///
/// Reads the query string with the process-wide parameter names (see
/// [`prax_presenter_core::config::configure`]).
///
/// # Example
///
/// ```rust,ignore
/// use prax_presenter_axum::PresentParams;
///
/// async fn handler(PresentParams(params): PresentParams) -> String {
///     format!("count only: {}", params.count)
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresentParams(pub PresenterParams);

impl PresentParams {
    /// Unwrap the parameters.
    pub fn into_inner(self) -> PresenterParams {
        self.0
    }
}

impl Deref for PresentParams {
    type Target = PresenterParams;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<PresentParams> for PresenterParams {
    fn from(params: PresentParams) -> Self {
        params.0
    }
}

impl<S> FromRequestParts<S> for PresentParams
where
    S: Send + Sync,
{
    type Rejection = PresenterAxumError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> std::result::Result<Self, Self::Rejection> {
        let query = parts.uri.query().unwrap_or_default();
        let params = PresenterParams::from_configured_query(query).map_err(PresenterAxumError::InvalidParams)?;
        debug!(query = %query, params = ?params, "Extracted presenter parameters");
        Ok(PresentParams(params))
    }
}

/// Shared presenter registry for router state.
///
/// Use it directly as the router state, or expose it from a larger state
/// struct with `axum::extract::FromRef`.
pub struct PresenterState<U>(pub Arc<PresenterRegistry<U>>);

impl<U> PresenterState<U> {
    /// Wrap a registry.
    pub fn new(registry: PresenterRegistry<U>) -> Self {
        Self(Arc::new(registry))
    }

    /// Get the registry.
    pub fn registry(&self) -> &PresenterRegistry<U> {
        &self.0
    }

    /// Present a record set for the current request.
    pub fn present<S>(
        &self,
        current_user: Option<U>,
        records: S,
        params: impl Into<PresenterParams>,
    ) -> Result<Presenter<U>>
    where
        S: RecordSet + 'static,
    {
        Ok(self.0.present(current_user, records, params.into())?)
    }

    /// Present a single record for the current request.
    pub fn present_record(
        &self,
        current_user: Option<U>,
        record: RecordRef,
        params: impl Into<PresenterParams>,
    ) -> Result<Presenter<U>> {
        Ok(self.0.present_record(current_user, record, params.into())?)
    }
}

impl<U> Clone for PresenterState<U> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<U> Deref for PresenterState<U> {
    type Target = PresenterRegistry<U>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<U> From<PresenterRegistry<U>> for PresenterState<U> {
    fn from(registry: PresenterRegistry<U>) -> Self {
        Self::new(registry)
    }
}

impl<U> fmt::Debug for PresenterState<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PresenterState").field(&self.0).finish()
    }
}
