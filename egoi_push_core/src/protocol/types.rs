/**
 * Request type definitions for the push backend.
 *
 * Each request splits into routing data (`app_id`, `api_key`) that goes into
 * the URL and headers, and a JSON body serialized with serde:
 *
 * ```json
 * { "token": "...", "os": "ios", "two_steps_data": { "field": "...", "value": "..." } }
 * { "contact": "...", "os": "ios", "message_hash": "...", "mailing_id": 5, "event": "open" }
 * ```
 */
use serde::Serialize;

use crate::error::ValidationError;

// ---------------------------------------------------------------------------
// Platform
// ---------------------------------------------------------------------------

/**
 * Operating system reported in the `os` field of every body.
 *
 * Serialized as lowercase strings: `"ios"`, `"android"`.
 */
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Ios,
    Android,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Ios => "ios",
            Platform::Android => "android",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TwoStepsData
// ---------------------------------------------------------------------------

/// Secondary verification pair sent alongside a token registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TwoStepsData {
    pub field: String,
    pub value: String,
}

impl TwoStepsData {
    /**
     * Builds the pair only when both halves are present.
     *
     * A lone field or a lone value is dropped without a diagnostic, so the
     * body never carries a half-filled `two_steps_data` object.
     */
    pub fn from_pair(field: Option<&str>, value: Option<&str>) -> Option<Self> {
        match (field, value) {
            (Some(field), Some(value)) => Some(Self {
                field: field.to_string(),
                value: value.to_string(),
            }),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// RegistrationRequest
// ---------------------------------------------------------------------------

/**
 * A device token registration.
 *
 * None of the string fields are checked for emptiness; the backend is left
 * to judge them.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRequest {
    pub app_id: String,
    pub api_key: String,
    pub token: String,
    pub two_steps_data: Option<TwoStepsData>,
    pub platform: Platform,
}

#[derive(Serialize)]
struct RegistrationBody<'a> {
    token: &'a str,
    os: Platform,
    #[serde(skip_serializing_if = "Option::is_none")]
    two_steps_data: Option<&'a TwoStepsData>,
}

impl RegistrationRequest {
    /// The JSON body POSTed to the register endpoint.
    pub fn body(&self) -> serde_json::Value {
        serde_json::json!(RegistrationBody {
            token: &self.token,
            os: self.platform,
            two_steps_data: self.two_steps_data.as_ref(),
        })
    }
}

// ---------------------------------------------------------------------------
// EventRequest
// ---------------------------------------------------------------------------

/// An engagement event tied to one message delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRequest {
    pub app_id: String,
    pub api_key: String,
    pub contact_id: String,
    pub message_hash: String,
    pub mailing_id: i64,
    pub event: String,
    pub platform: Platform,
}

#[derive(Serialize)]
struct EventBody<'a> {
    contact: &'a str,
    os: Platform,
    message_hash: &'a str,
    mailing_id: i64,
    event: &'a str,
}

impl EventRequest {
    /**
     * Checks the required identifiers in order: app ID, API key, contact ID.
     *
     * Returns the first violation; later fields are not inspected.
     */
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.app_id.is_empty() {
            return Err(ValidationError::EmptyAppId);
        }
        if self.api_key.is_empty() {
            return Err(ValidationError::EmptyApiKey);
        }
        if self.contact_id.is_empty() {
            return Err(ValidationError::EmptyContactId);
        }
        Ok(())
    }

    /// The JSON body POSTed to the event endpoint.
    pub fn body(&self) -> serde_json::Value {
        serde_json::json!(EventBody {
            contact: &self.contact_id,
            os: self.platform,
            message_hash: &self.message_hash,
            mailing_id: self.mailing_id,
            event: &self.event,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_json_diff::assert_json_eq;
    use serde_json::json;

    fn registration(two_steps_data: Option<TwoStepsData>) -> RegistrationRequest {
        RegistrationRequest {
            app_id: "42".into(),
            api_key: "k".into(),
            token: "tok123".into(),
            two_steps_data,
            platform: Platform::Ios,
        }
    }

    fn event(app_id: &str, api_key: &str, contact_id: &str) -> EventRequest {
        EventRequest {
            app_id: app_id.into(),
            api_key: api_key.into(),
            contact_id: contact_id.into(),
            message_hash: "h".into(),
            mailing_id: 5,
            event: "open".into(),
            platform: Platform::Ios,
        }
    }

    #[test]
    fn test_registration_body_without_two_steps() {
        assert_json_eq!(registration(None).body(), json!({"token": "tok123", "os": "ios"}));
    }

    #[test]
    fn test_registration_body_with_two_steps() {
        let pair = TwoStepsData::from_pair(Some("email"), Some("a@b.c"));
        assert_json_eq!(
            registration(pair).body(),
            json!({
                "token": "tok123",
                "os": "ios",
                "two_steps_data": {"field": "email", "value": "a@b.c"}
            })
        );
    }

    #[test]
    fn test_partial_two_steps_pair_is_dropped() {
        assert_eq!(TwoStepsData::from_pair(Some("email"), None), None);
        assert_eq!(TwoStepsData::from_pair(None, Some("a@b.c")), None);
        assert_eq!(TwoStepsData::from_pair(None, None), None);
    }

    #[test]
    fn test_event_body() {
        assert_json_eq!(
            event("42", "k", "c").body(),
            json!({
                "contact": "c",
                "os": "ios",
                "message_hash": "h",
                "mailing_id": 5,
                "event": "open"
            })
        );
    }

    #[test]
    fn test_android_platform_on_the_wire() {
        let mut request = event("42", "k", "c");
        request.platform = Platform::Android;
        assert_eq!(request.body()["os"], "android");
    }

    #[test]
    fn test_event_validation_order() {
        assert_eq!(event("", "", "").validate(), Err(ValidationError::EmptyAppId));
        assert_eq!(event("42", "", "").validate(), Err(ValidationError::EmptyApiKey));
        assert_eq!(event("42", "k", "").validate(), Err(ValidationError::EmptyContactId));
        assert_eq!(event("42", "k", "c").validate(), Ok(()));
    }
}
