// ── Raw-text projection ──
//
// The text view is pretty-printed JSON with two-space indentation. Both
// directions are pure: the editor owns the buffer and the value.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::CoreError;

/// Serialize a value into the text shown in the raw view.
pub fn to_text<T: Serialize>(value: &T) -> Result<String, CoreError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| CoreError::Internal(format!("failed to serialize value: {e}")))
}

/// Parse raw-view text back into a value.
///
/// Syntax errors and type mismatches both report as local validation
/// failures with the parser's line/column message.
pub fn from_text<T: DeserializeOwned>(text: &str) -> Result<T, CoreError> {
    serde_json::from_str(text).map_err(|e| CoreError::validation(format!("Invalid JSON: {e}")))
}
