//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a distinct exit code per failure class.

use miette::Diagnostic;
use thiserror::Error;

use sitedeck_config::ConfigError;
use sitedeck_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const REMOTE_EXECUTION: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the console API at {url}")]
    #[diagnostic(
        code(sitedeck::connection_failed),
        help(
            "Check that the service is running and the API URL is right.\n\
             Reason: {reason}\n\
             Try: sitedeck --api-url http://localhost:8000/api sites list"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(sitedeck::timeout),
        help("Raise --timeout, or --fetch-timeout for fetch and content commands.")
    )]
    Timeout,

    // ── Remote outcomes ──────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(sitedeck::not_found), help("Run: sitedeck sites list"))]
    NotFound { message: String },

    #[error("{message}")]
    #[diagnostic(code(sitedeck::conflict))]
    Conflict { message: String },

    #[error("{message}")]
    #[diagnostic(code(sitedeck::rejected))]
    Rejected { message: String },

    #[error("{message}")]
    #[diagnostic(
        code(sitedeck::remote_execution),
        help("The automation run failed on the service. Check its logs for details.")
    )]
    RemoteExecution { message: String },

    #[error("{message}")]
    #[diagnostic(code(sitedeck::api_error), help("HTTP status: {status:?}"))]
    ApiError {
        status: Option<u16>,
        message: String,
    },

    #[error("{failed} of {total} fetches failed")]
    #[diagnostic(code(sitedeck::fetch_failed))]
    FetchesFailed { failed: usize, total: usize },

    // ── Local state ──────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(sitedeck::busy))]
    Busy { message: String },

    #[error("{message}")]
    #[diagnostic(
        code(sitedeck::schema),
        help("The service describes a field this console cannot edit. Update sitedeck.")
    )]
    Schema { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(sitedeck::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(sitedeck::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: sitedeck config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No console configured")]
    #[diagnostic(
        code(sitedeck::no_config),
        help(
            "Create a profile with: sitedeck config init\n\
             Or pass --api-url / set SITEDECK_API_URL.\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("{message}")]
    #[diagnostic(code(sitedeck::config))]
    Config { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(sitedeck::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::RemoteExecution { .. } | Self::FetchesFailed { .. } => {
                exit_code::REMOTE_EXECUTION
            }
            Self::Validation { .. }
            | Self::Rejected { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },
            CoreError::Timeout => CliError::Timeout,
            CoreError::NotFound { message } => CliError::NotFound { message },
            CoreError::Conflict { message } => CliError::Conflict { message },
            CoreError::Rejected { message } => CliError::Rejected { message },
            CoreError::RemoteExecution { message } => CliError::RemoteExecution { message },
            CoreError::Api { message, status } => CliError::ApiError { status, message },

            CoreError::Validation { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },
            CoreError::ReadOnlyField { name } => CliError::Validation {
                field: name,
                reason: "field is read-only".into(),
            },
            CoreError::UnknownField { name } => CliError::Validation {
                field: name,
                reason: "no such field (see: sitedeck schema site)".into(),
            },

            err @ (CoreError::FetchInFlight { .. } | CoreError::EditorBusy) => CliError::Busy {
                message: err.to_string(),
            },
            err @ CoreError::UnsupportedField { .. } => CliError::Schema {
                message: err.to_string(),
            },

            CoreError::Config { message } | CoreError::Internal(message) => {
                CliError::Config { message }
            }
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                available: "(see: sitedeck config profiles)".into(),
            },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_distinct_exit_codes() {
        let cases = [
            (
                CoreError::NotFound {
                    message: "Site missing not found".into(),
                },
                exit_code::NOT_FOUND,
            ),
            (
                CoreError::Conflict {
                    message: "Site acme already exists".into(),
                },
                exit_code::CONFLICT,
            ),
            (
                CoreError::RemoteExecution {
                    message: "login failed".into(),
                },
                exit_code::REMOTE_EXECUTION,
            ),
            (CoreError::Timeout, exit_code::TIMEOUT),
            (CoreError::validation("name cannot be empty"), exit_code::USAGE),
            (
                CoreError::ConnectionFailed {
                    url: "http://localhost:8000/api".into(),
                    reason: "refused".into(),
                },
                exit_code::CONNECTION,
            ),
            (
                CoreError::FetchInFlight {
                    site_id: "acme".into(),
                },
                exit_code::GENERAL,
            ),
        ];

        for (core, code) in cases {
            let label = core.to_string();
            assert_eq!(CliError::from(core).exit_code(), code, "{label}");
        }
    }

    #[test]
    fn remote_detail_is_shown_verbatim() {
        let err = CliError::from(CoreError::NotFound {
            message: "Site missing not found".into(),
        });
        assert_eq!(err.to_string(), "Site missing not found");

        let err = CliError::from(CoreError::Api {
            message: "Failed to write config file".into(),
            status: Some(500),
        });
        assert_eq!(err.to_string(), "Failed to write config file");
        assert_eq!(err.exit_code(), exit_code::GENERAL);
    }
}
