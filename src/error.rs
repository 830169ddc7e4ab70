//! Error types for the progress bar service

use std::path::PathBuf;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Result type alias for progress bar operations
pub type Result<T> = std::result::Result<T, Error>;

/// Body returned for every server-side rendering failure.
const RENDER_FAILURE_BODY: &str = "Error generating image";

/// Errors that can occur while turning a request into a PNG
#[derive(Error, Debug)]
pub enum Error {
    /// The required `url` query parameter was absent or empty
    #[error("No URL provided. Use `?url=https://action.earthcharity.org.uk/node/123`")]
    MissingParameter,

    /// The `url` query parameter failed validation. Holds every issue, comma-joined.
    #[error("{0}")]
    InvalidParameter(String),

    /// The polling endpoint could not be reached or did not return JSON
    #[error("Failed to fetch polling data for {url}. Check that the URL is correct")]
    UpstreamFetch { url: String },

    /// The font file for the selected family/style could not be read
    #[error("Failed to load font file {}: {source}", .path.display())]
    FontLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Markup could not be turned into a PNG
    #[error("Rendering failed: {0}")]
    Render(String),

    /// Invalid service configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            Error::MissingParameter | Error::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            Error::UpstreamFetch { .. }
            | Error::FontLoad { .. }
            | Error::Render(_)
            | Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Plain-text body sent to the client. Render-side details stay in the server log.
    pub fn public_message(&self) -> String {
        match self {
            Error::FontLoad { .. } | Error::Render(_) | Error::Config(_) => {
                RENDER_FAILURE_BODY.to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("{}", self);
        } else {
            log::debug!("rejected request: {}", self);
        }
        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.public_message(),
        )
            .into_response()
    }
}
