// ── Runtime console configuration ──
//
// Describes *how* to reach one console backend. Carries the optional
// proxy token and connection tuning, but never touches disk: the CLI
// builds a `ConsoleConfig` from its profile and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use sitedeck_api::{TlsMode, TransportConfig};
use url::Url;

use crate::error::CoreError;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed certs).
    DangerAcceptInvalid,
}

/// Configuration for one console backend.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// API root, e.g. `http://localhost:8000/api`.
    pub api_url: Url,
    /// Public origin used to build shareable subscription URLs.
    pub public_origin: Url,
    /// Bearer token for deployments behind an authenticating proxy.
    pub token: Option<SecretString>,
    pub tls: TlsVerification,
    /// Timeout for configuration calls.
    pub timeout: Duration,
    /// Timeout for the two subscription endpoints.
    pub fetch_timeout: Duration,
}

impl ConsoleConfig {
    /// Config for `api_url` with the origin derived from it and default tuning.
    pub fn new(api_url: Url) -> Result<Self, CoreError> {
        let public_origin = origin_of(&api_url)?;
        let defaults = TransportConfig::default();
        Ok(Self {
            api_url,
            public_origin,
            token: None,
            tls: TlsVerification::default(),
            timeout: defaults.timeout,
            fetch_timeout: defaults.fetch_timeout,
        })
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: match &self.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            timeout: self.timeout,
            fetch_timeout: self.fetch_timeout,
            token: self.token.clone(),
        }
    }
}

/// Scheme, host and port of `url`, with an empty path.
pub fn origin_of(url: &Url) -> Result<Url, CoreError> {
    let origin = url.origin();
    if !origin.is_tuple() {
        return Err(CoreError::Config {
            message: format!("URL has no usable origin: {url}"),
        });
    }
    Url::parse(&origin.ascii_serialization()).map_err(|e| CoreError::Config {
        message: format!("Invalid origin for {url}: {e}"),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn origin_drops_path_and_keeps_port() {
        let url = Url::parse("http://localhost:8000/api/").unwrap();
        assert_eq!(origin_of(&url).unwrap().as_str(), "http://localhost:8000/");
    }

    #[test]
    fn new_config_derives_origin() {
        let cfg = ConsoleConfig::new(Url::parse("https://deck.example.test/api").unwrap()).unwrap();
        assert_eq!(cfg.public_origin.as_str(), "https://deck.example.test/");
        assert_eq!(cfg.timeout, Duration::from_secs(30));
        assert_eq!(cfg.fetch_timeout, Duration::from_secs(300));
    }

    #[test]
    fn opaque_urls_have_no_origin() {
        let url = Url::parse("data:text/plain,hello").unwrap();
        assert!(origin_of(&url).is_err());
    }
}
