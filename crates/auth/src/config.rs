//! Redirect configuration for the auth callbacks.

use anyhow::Context;
use thiserror::Error;
use url::Url;

pub const SITE_URL_VAR: &str = "PITLANE_SITE_URL";
pub const AUTH_ERROR_PATH_VAR: &str = "PITLANE_AUTH_ERROR_PATH";
pub const ERROR_PATH_VAR: &str = "PITLANE_ERROR_PATH";

const DEFAULT_SITE_URL: &str = "http://localhost:3000";
const DEFAULT_AUTH_ERROR_PATH: &str = "/auth/auth-code-error";
const DEFAULT_ERROR_PATH: &str = "/error";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("site url must be an absolute http(s) url, got '{0}'")]
    InvalidSiteUrl(String),

    #[error("redirect path must start with '/', got '{0}'")]
    InvalidPath(String),
}

/// Where the callbacks send the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    site_url: String,
    auth_error_path: String,
    error_path: String,
}

impl AuthConfig {
    pub fn new(
        site_url: impl Into<String>,
        auth_error_path: impl Into<String>,
        error_path: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let site_url = site_url.into();
        let parsed_ok = Url::parse(&site_url)
            .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
            .unwrap_or(false);
        if !parsed_ok {
            return Err(ConfigError::InvalidSiteUrl(site_url));
        }

        let auth_error_path = auth_error_path.into();
        let error_path = error_path.into();
        for path in [&auth_error_path, &error_path] {
            if !path.starts_with('/') {
                return Err(ConfigError::InvalidPath(path.clone()));
            }
        }

        Ok(Self {
            site_url: site_url.trim_end_matches('/').to_string(),
            auth_error_path,
            error_path,
        })
    }

    /// Load from the process environment.
    ///
    /// Unset variables fall back to local development defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary key lookup (environment, dotenv map, tests).
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let site_url = lookup(SITE_URL_VAR).unwrap_or_else(|| {
            tracing::warn!("{SITE_URL_VAR} not set; using {DEFAULT_SITE_URL}");
            DEFAULT_SITE_URL.to_string()
        });
        let auth_error_path =
            lookup(AUTH_ERROR_PATH_VAR).unwrap_or_else(|| DEFAULT_AUTH_ERROR_PATH.to_string());
        let error_path = lookup(ERROR_PATH_VAR).unwrap_or_else(|| DEFAULT_ERROR_PATH.to_string());

        Self::new(site_url, auth_error_path, error_path)
            .context("invalid auth redirect configuration")
    }

    pub fn site_url(&self) -> &str {
        &self.site_url
    }

    pub fn auth_error_path(&self) -> &str {
        &self.auth_error_path
    }

    pub fn error_path(&self) -> &str {
        &self.error_path
    }

    /// Absolute URL for a same-origin path.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.site_url, path)
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            site_url: DEFAULT_SITE_URL.to_string(),
            auth_error_path: DEFAULT_AUTH_ERROR_PATH.to_string(),
            error_path: DEFAULT_ERROR_PATH.to_string(),
        }
    }
}
