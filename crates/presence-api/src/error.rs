use thiserror::Error;

/// Top-level error type for the `presence-api` crate.
///
/// The split between [`Error::Api`]/[`Error::Authentication`] and everything
/// else matters to callers: API-class errors are the controller answering
/// "no", while transport and deserialization failures mean the answer never
/// arrived or couldn't be understood. Consumers degrade gracefully on the
/// former and treat the latter as fatal.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected or session expired (wrong credentials, HTTP 401).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── API ─────────────────────────────────────────────────────────
    /// Controller-reported failure: non-success HTTP status on an API
    /// endpoint, or an envelope with `meta.rc != "ok"`.
    #[error("API error: {message}")]
    Api { message: String },

    /// API version this client doesn't speak (only v4/v5 are supported).
    #[error("Unsupported API version: {0}")]
    UnsupportedVersion(String),

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the controller itself reported the failure
    /// (authentication rejection or an API-level error).
    ///
    /// This is the class of errors a presence poller recovers from: the
    /// controller is reachable but said no. Transport and parse failures
    /// are not API errors and should stay visible to the caller.
    pub fn is_api_error(&self) -> bool {
        matches!(self, Self::Authentication { .. } | Self::Api { .. })
    }
}
