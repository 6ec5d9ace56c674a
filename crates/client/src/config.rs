//! Client configuration.

/// Environment variable holding the Inventory API base URL.
pub const API_URL_ENV: &str = "MEDSTOCK_API_URL";

/// Base URL used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Where the Inventory API lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    api_url: String,
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        let api_url = api_url.into();
        let api_url = api_url.trim().trim_end_matches('/').to_string();
        Self { api_url }
    }

    /// Read the base URL from the process environment, falling back to
    /// [`DEFAULT_API_URL`].
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Self {
        match std::env::var(API_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::new(url),
            _ => Self::default(),
        }
    }

    /// Browser builds have no process environment; the URL is baked in at
    /// compile time instead.
    pub fn from_build_env() -> Self {
        option_env!("MEDSTOCK_API_URL")
            .map(Self::new)
            .unwrap_or_default()
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Absolute URL for an API path (`/medicines` etc).
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}
