// ── Global configuration ──
//
// Process-wide settings for the automation service. Always persisted as a
// whole: an update replaces every field.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct GlobalConfig {
    /// Captcha-solving credential. Masked unless explicitly revealed.
    #[serde(default)]
    pub openrouter_api_key: String,
    #[serde(default)]
    pub headless: bool,
    #[serde(default = "default_solve_cloudflare")]
    pub solve_cloudflare: bool,
    /// Milliseconds. Must be positive.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    #[serde(default = "default_cache_file")]
    pub cache_file: String,
    #[serde(default = "default_browser_data_dir")]
    pub browser_data_dir: String,
}

fn default_solve_cloudflare() -> bool {
    true
}
fn default_timeout() -> u64 {
    120_000
}
fn default_cache_file() -> String {
    "cache.json".into()
}
fn default_browser_data_dir() -> String {
    ".browser_data".into()
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            openrouter_api_key: String::new(),
            headless: false,
            solve_cloudflare: default_solve_cloudflare(),
            timeout: default_timeout(),
            cache_file: default_cache_file(),
            browser_data_dir: default_browser_data_dir(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_service_defaults() {
        let cfg: GlobalConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, GlobalConfig::default());
        assert!(cfg.solve_cloudflare);
        assert_eq!(cfg.timeout, 120_000);
    }

    #[test]
    fn string_timeout_is_a_type_mismatch() {
        let result = serde_json::from_str::<GlobalConfig>(r#"{"timeout": "fast"}"#);
        assert!(result.is_err());
    }
}
