//! Configuration model loaded from external sources.

use serde::Deserialize;

use crate::pagination::DEFAULT_ITEMS_PER_PAGE;

fn default_per_page() -> u32 {
    DEFAULT_ITEMS_PER_PAGE
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_api_timeout_secs() -> u64 {
    30
}

fn default_session_ttl_secs() -> u64 {
    60 * 60 * 12
}

#[derive(Clone, Debug, Deserialize)]
/// Route-guard settings.
pub struct AccessConfig {
    /// Path prefixes that require a session.
    pub protected_prefixes: Vec<String>,
    /// Routes only meaningful without a session, such as the login page.
    pub auth_routes: Vec<String>,
    pub login_path: String,
    /// Where signed-in users land.
    pub home_path: String,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            protected_prefixes: ["/dashboard", "/lms", "/student", "/hr"]
                .into_iter()
                .map(String::from)
                .collect(),
            auth_routes: vec!["/login".to_string()],
            login_path: "/login".to_string(),
            home_path: "/dashboard".to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    /// Base URL of the remote API, without the `/api/v1` prefix.
    pub api_base_url: String,
    /// Public URL of this site.
    pub site_url: String,
    pub templates_dir: String,
    pub secret: String,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    #[serde(default = "default_debounce_ms")]
    pub filter_debounce_ms: u64,
    #[serde(default = "default_api_timeout_secs")]
    pub api_timeout_secs: u64,
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
    #[serde(default)]
    pub access: AccessConfig,
    /// Development-only login form pre-fill.
    #[serde(default)]
    pub dev_admin_email: Option<String>,
    #[serde(default)]
    pub dev_admin_password: Option<String>,
}
