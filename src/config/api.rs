use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Connection settings for the remote admin API.
#[derive(Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Base URL of the identity provider (e.g. "https://idp.example.com").
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API token sent as a bearer token.
    #[serde(default)]
    pub token: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Verify the server's TLS certificate.
    #[serde(default = "default_true")]
    pub verify_tls: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: String::new(),
            timeout_secs: default_timeout_secs(),
            verify_tls: true,
        }
    }
}

// Token stays out of logs.
impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("token", &"****")
            .field("timeout_secs", &self.timeout_secs)
            .field("verify_tls", &self.verify_tls)
            .finish()
    }
}

impl ApiConfig {
    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        let url = url::Url::parse(&self.base_url).map_err(|e| {
            ConfigError::Validation(format!("api.base_url '{}' is invalid: {e}", self.base_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Validation(format!(
                "api.base_url must use http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.token.trim().is_empty() {
            return Err(ConfigError::Validation("api.token must not be empty".into()));
        }
        if !self.token.bytes().all(|b| b == b'\t' || (0x20..0x7f).contains(&b)) {
            return Err(ConfigError::Validation(
                "api.token must contain only visible ASCII characters".into(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "api.timeout_secs must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

fn default_base_url() -> String {
    "http://localhost:9000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}
