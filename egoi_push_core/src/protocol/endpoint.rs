/**
 * Endpoint configuration and URL building.
 *
 * Both operations target `{base_url}/{app_id}/{path}`, where `path` is either
 * the register path or the event path. Slashes at the seams are normalized so
 * `"https://host/apps/"` and `"https://host/apps"` produce the same URL.
 */
use super::constants::{DEFAULT_BASE_URL, DEFAULT_EVENT_PATH, DEFAULT_REGISTER_PATH};

/// Where requests are sent. Defaults point at the production backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub base_url: String,
    pub register_path: String,
    pub event_path: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            register_path: DEFAULT_REGISTER_PATH.to_string(),
            event_path: DEFAULT_EVENT_PATH.to_string(),
        }
    }
}

impl Endpoints {
    /**
     * Same paths as the defaults, different host. Handy for staging
     * backends and local mock servers.
     */
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// `{base_url}/{app_id}/{register_path}`
    pub fn register_url(&self, app_id: &str) -> String {
        join_url(&self.base_url, app_id, &self.register_path)
    }

    /// `{base_url}/{app_id}/{event_path}`
    pub fn event_url(&self, app_id: &str) -> String {
        join_url(&self.base_url, app_id, &self.event_path)
    }
}

fn join_url(base_url: &str, app_id: &str, path: &str) -> String {
    format!(
        "{}/{}/{}",
        base_url.trim_end_matches('/'),
        app_id,
        path.trim_matches('/')
    )
}
