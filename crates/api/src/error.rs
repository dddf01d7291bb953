use chrono::{DateTime, Utc};
use reqwest::header::{HeaderName, InvalidHeaderValue};

/// Failures of [`Session::require_login`](crate::Session::require_login).
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Not logged in")]
    LoggedOut,
    #[error("Session expired at {expired_at}")]
    Expired { expired_at: DateTime<Utc> },
}

/// Failures to build a request.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("Could not encode params as JSON")]
    Encoding(#[source] serde_json::Error),
    /// The URL could not be parsed, or parsing would have changed its path.
    #[error("Invalid URL {url:?}")]
    InvalidUrl {
        url: String,
        #[source]
        source: Option<url::ParseError>,
    },
    #[error("Invalid value for header {name}")]
    InvalidHeader {
        name: HeaderName,
        #[source]
        source: InvalidHeaderValue,
    },
}
