//! Various errors module.

use serde::Deserialize;
use thiserror::Error;

pub use crate::favorites::FavoritesError;
pub use crate::session::provider::IdentityError;
pub use crate::session::AuthError;

/// Error body shape of the Luxora API.
///
/// Every failing endpoint may carry a human-readable `message`; when the
/// body is missing, empty, or unreadable, each operation falls back to its
/// own fixed default string.
#[derive(Deserialize, Debug)]
pub(crate) struct ApiErrorBody {
    /// Human-readable description from the server, if any.
    #[serde(default)]
    pub message: Option<String>,
}

/// Reads the optional server-provided `message` out of an error response.
///
/// Consumes the response body. Returns `None` when the body is absent or
/// not the expected shape, so callers can substitute their per-operation
/// default.
pub(crate) async fn response_message(response: reqwest::Response) -> Option<String> {
    response
        .json::<ApiErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message)
        .filter(|message| !message.is_empty())
}

/// Builds the passthrough [`RequestError::Server`] for a rejected response,
/// substituting `default` when the body carries no message.
pub(crate) async fn server_error(response: reqwest::Response, default: &str) -> RequestError {
    let status = response.status().as_u16();
    let message = response_message(response)
        .await
        .unwrap_or_else(|| default.to_string());

    RequestError::Server { status, message }
}

/// Represents errors of the general (non-authentication) Luxora API
/// operations: subscription management, admin data, and catalog reads.
///
/// Server rejections are passed through unchanged when the API provided a
/// `message`, so callers can surface exactly what the backend said. Requests
/// are never retried automatically.
#[derive(Error, Debug)]
pub enum RequestError {
    /// Communication with the Luxora API was successful, but the request
    /// was rejected with a non-2xx status.
    ///
    /// `message` is the server's own wording when the error body carried
    /// one, and the operation's fixed default string otherwise. Both are
    /// ready to be shown to an end user as-is.
    #[error("{message}")]
    Server {
        /// HTTP status code of the rejection.
        status: u16,
        /// Server-provided description, or the operation's default.
        message: String,
    },
    /// The operation requires a signed-in user and was short-circuited
    /// before any request was sent.
    #[error("Please log in first.")]
    NotAuthenticated,
    /// A locally validated argument was rejected before any request was
    /// sent.
    #[error("{0}")]
    Invalid(String),
    /// An HTTP error occurred while communicating with the Luxora API.
    ///
    /// This variant wraps a [`reqwest::Error`] and indicates that the
    /// request could not be completed at all: network issues, an invalid
    /// URL, a timeout, and similar failures.
    #[error("The Luxora API could not be reached: {0}")]
    HttpError(reqwest::Error),
    /// The response could not be parsed into the expected data structure.
    ///
    /// It usually means a mismatch between this crate's wire types and the
    /// API version answering.
    #[error("Could not parse the response into the expected data structure: {0}")]
    ParseError(String),
}

impl From<reqwest::Error> for RequestError {
    fn from(error: reqwest::Error) -> Self {
        Self::HttpError(error)
    }
}
