use thiserror::Error;

/// Top-level error type for the `sitedeck-api` crate.
///
/// Every variant carrying a `message` holds the text extracted from the
/// service's `detail` field, or the HTTP status text when the body had
/// none. That message is the only error information surfaced to callers.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client could not be built (bad CA file, bad header value).
    #[error("Client setup failed: {0}")]
    ClientSetup(String),

    // ── Service responses ───────────────────────────────────────────
    /// 404 from the service.
    #[error("{message}")]
    NotFound { message: String },

    /// 409 from the service (e.g. duplicate site id).
    #[error("{message}")]
    Conflict { message: String },

    /// The service rejected the payload (400 / 422).
    #[error("{message}")]
    Validation { message: String },

    /// The automation run behind a subscription endpoint failed
    /// (login, captcha, selector or timeout trouble).
    #[error("{message}")]
    RemoteExecution { message: String },

    /// Any other non-success status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// The human-readable message for display at the point of action.
    pub fn message(&self) -> String {
        match self {
            Self::NotFound { message }
            | Self::Conflict { message }
            | Self::Validation { message }
            | Self::RemoteExecution { message }
            | Self::Http { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if this is a duplicate-id conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// HTTP status associated with the error, if the request got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::NotFound { .. } => Some(404),
            Self::Conflict { .. } => Some(409),
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
