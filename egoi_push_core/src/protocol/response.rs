/**
 * Response interpretation.
 *
 * The backend answers both endpoints with a JSON object carrying a boolean
 * `"success"` key. Everything else (bytes that are not JSON, JSON that is not
 * an object, a missing key, a key that is not a boolean) is `Malformed`.
 */
use serde_json::{Map, Value};

/// The success flag as read from a response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedResponse {
    Success(bool),
    Malformed,
}

impl ParsedResponse {
    /**
     * Parses raw response bytes.
     *
     * Decoding goes through a generic key/value map first, then the
     * `"success"` key is extracted, so extra keys are ignored.
     */
    pub fn from_bytes(bytes: &[u8]) -> Self {
        match deserialize(bytes) {
            Some(map) => Self::from_map(&map),
            None => ParsedResponse::Malformed,
        }
    }

    pub fn from_map(map: &Map<String, Value>) -> Self {
        match map.get("success") {
            Some(Value::Bool(success)) => ParsedResponse::Success(*success),
            _ => ParsedResponse::Malformed,
        }
    }

    /// The boolean handed to the caller: `true` only for `Success(true)`.
    pub fn is_success(&self) -> bool {
        matches!(self, ParsedResponse::Success(true))
    }
}

/// Decodes bytes into a JSON object, or `None` if they are anything else.
pub fn deserialize(bytes: &[u8]) -> Option<Map<String, Value>> {
    serde_json::from_slice(bytes).ok()
}
