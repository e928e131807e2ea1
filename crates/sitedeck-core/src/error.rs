// ── Core error types ──
//
// User-facing errors from sitedeck-core. Consumers never see raw HTTP
// statuses or JSON parse failures: the `From<sitedeck_api::Error>` impl
// translates transport-layer errors into domain variants, and every
// variant carries the message to show at the point of action.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach console API at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    Timeout,

    // ── Remote outcomes ──────────────────────────────────────────────
    #[error("{message}")]
    NotFound { message: String },

    #[error("{message}")]
    Conflict { message: String },

    /// The service rejected the payload.
    #[error("{message}")]
    Rejected { message: String },

    /// The automation run behind a fetch failed.
    #[error("{message}")]
    RemoteExecution { message: String },

    /// Any other non-success response. `message` is the `detail` text.
    #[error("{message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Local errors ─────────────────────────────────────────────────
    /// Local validation failure. Nothing was sent.
    #[error("{message}")]
    Validation { message: String },

    #[error("A fetch for site '{site_id}' is already in progress")]
    FetchInFlight { site_id: String },

    #[error("A save is in progress")]
    EditorBusy,

    /// The schema describes a field the form view cannot render.
    #[error("Unsupported schema field '{name}': {kind}")]
    UnsupportedField { name: String, kind: String },

    #[error("Field '{name}' is read-only")]
    ReadOnlyField { name: String },

    #[error("Unknown field '{name}'")]
    UnknownField { name: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a local validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<sitedeck_api::Error> for CoreError {
    fn from(err: sitedeck_api::Error) -> Self {
        match err {
            sitedeck_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            sitedeck_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            sitedeck_api::Error::ClientSetup(message) => CoreError::Config { message },
            sitedeck_api::Error::NotFound { message } => CoreError::NotFound { message },
            sitedeck_api::Error::Conflict { message } => CoreError::Conflict { message },
            sitedeck_api::Error::Validation { message } => CoreError::Rejected { message },
            sitedeck_api::Error::RemoteExecution { message } => {
                CoreError::RemoteExecution { message }
            }
            sitedeck_api::Error::Http { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            sitedeck_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_messages_pass_through_verbatim() {
        let err: CoreError = sitedeck_api::Error::NotFound {
            message: "Site 'missing' not found".into(),
        }
        .into();
        assert_eq!(err.to_string(), "Site 'missing' not found");

        let err: CoreError = sitedeck_api::Error::RemoteExecution {
            message: "Login failed".into(),
        }
        .into();
        assert!(matches!(err, CoreError::RemoteExecution { .. }));
    }

    #[test]
    fn remote_validation_becomes_rejected() {
        let err: CoreError = sitedeck_api::Error::Validation {
            message: "body.timeout: bad".into(),
        }
        .into();
        assert!(matches!(err, CoreError::Rejected { .. }));
    }

    #[test]
    fn http_status_is_kept() {
        let err: CoreError = sitedeck_api::Error::Http {
            status: 502,
            message: "Bad Gateway".into(),
        }
        .into();
        assert!(matches!(err, CoreError::Api { status: Some(502), .. }));
    }

    #[test]
    fn server_error_detail_is_shown_without_prefix() {
        let err: CoreError = sitedeck_api::Error::Http {
            status: 500,
            message: "Failed to write config file".into(),
        }
        .into();
        assert_eq!(err.to_string(), "Failed to write config file");
    }
}
