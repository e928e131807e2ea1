use std::fmt;

use serde::{Deserialize, Serialize};

/// Result of one fetch-and-extract run on the automation service.
///
/// Ephemeral: held in console state only until the next action replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchSummaryResponse {
    pub name: String,
    pub url: String,
    pub content_length: u64,
    #[serde(default)]
    pub cached: bool,
}

impl fmt::Display for FetchSummaryResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fetched {}: {} bytes", self.name, self.content_length)
    }
}
