//! Runtime configuration: backend base URL and the local state directory.

use std::{env, path::PathBuf};

use tracing::info;

/// Default backend base URL, matching the development server.
const DEFAULT_API_URL: &str = "http://localhost:10000";
/// Default directory for persisted client state.
const DEFAULT_STATE_DIR: &str = ".mindmuse";
/// Environment variable that overrides the backend base URL.
const API_URL_ENV: &str = "MINDMUSE_API_URL";
/// Environment variable that overrides the state directory.
const STATE_DIR_ENV: &str = "MINDMUSE_STATE_DIR";

/// Immutable runtime configuration shared across the client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL the HTTP API and real-time channel are reached at, without
    /// a trailing slash.
    pub api_base_url: String,
    /// Directory persisted client state (session, ledger, practice history)
    /// lives in.
    pub state_dir: PathBuf,
}

impl ClientConfig {
    /// Load the configuration from the environment, falling back to
    /// development defaults.
    pub fn load() -> Self {
        let api_base_url = env::var(API_URL_ENV)
            .ok()
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let state_dir = env::var_os(STATE_DIR_ENV)
            .map(PathBuf::from)
            .filter(|path| !path.as_os_str().is_empty())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR));

        let config = ClientConfig {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            state_dir,
        };
        info!(
            api = %config.api_base_url,
            state_dir = %config.state_dir.display(),
            "client configuration loaded"
        );
        config
    }

    /// Configuration pointed at an explicit base URL, for tests and
    /// embedders that manage their own settings.
    pub fn with_base_url(api_base_url: impl Into<String>, state_dir: impl Into<PathBuf>) -> Self {
        let api_base_url: String = api_base_url.into();
        ClientConfig {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            state_dir: state_dir.into(),
        }
    }

    /// Absolute URL for an API path such as `/api/contest/{id}/questions`.
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_stripped() {
        let config = ClientConfig::with_base_url("https://api.example.com/", "/tmp/state");
        assert_eq!(
            config.api_url("/api/contest/c1/questions"),
            "https://api.example.com/api/contest/c1/questions"
        );
    }
}
