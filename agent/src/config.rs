//! Configuration management for the agent.

use cart_sync_engine::{Identity, SyncPolicy};
use reqwest::Url;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Agent configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Interceptor listen address
    pub host: String,
    /// Interceptor listen port
    pub port: u16,
    /// Storefront origin, always ending in `/`
    pub storefront_url: Url,
    /// Session cookie forwarded on the agent's own storefront calls
    pub storefront_cookie: Option<String>,
    /// Remote cart endpoint (push target, base of the pull URL)
    pub remote_cart_url: Url,
    /// Push timing
    pub policy: SyncPolicy,
    /// Push even when no customer is logged in
    pub anonymous_push: bool,
    /// Where the watermark is persisted
    pub watermark_path: PathBuf,
    /// Customer the agent syncs for
    pub customer: Option<Identity>,
    /// Timeout for outgoing HTTP calls
    pub http_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = var("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let storefront_url = base_url(
            "STOREFRONT_URL",
            var("STOREFRONT_URL").ok_or(ConfigError::Missing("STOREFRONT_URL"))?,
        )?;
        let storefront_cookie = var("STOREFRONT_COOKIE").filter(|c| !c.is_empty());

        let remote_raw = var("REMOTE_CART_URL").ok_or(ConfigError::Missing("REMOTE_CART_URL"))?;
        let remote_cart_url = Url::parse(&remote_raw).map_err(|e| ConfigError::InvalidUrl {
            var: "REMOTE_CART_URL",
            reason: e.to_string(),
        })?;

        let defaults = SyncPolicy::default();
        let policy = SyncPolicy {
            sync_delay: millis(&var, "CART_SYNC_DELAY_MS", defaults.sync_delay)?,
            retry_delay: millis(&var, "CART_SYNC_RETRY_DELAY_MS", defaults.retry_delay)?,
            max_retries: match var("CART_SYNC_MAX_RETRIES") {
                Some(raw) => raw
                    .parse()
                    .map_err(|_| ConfigError::InvalidNumber("CART_SYNC_MAX_RETRIES"))?,
                None => defaults.max_retries,
            },
        };

        let anonymous_push = flag(&var, "CART_SYNC_ANONYMOUS_PUSH", true)?;

        let watermark_path = var("WATERMARK_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".cart-sync/last-sync-date"));

        let customer = match var("CUSTOMER_EMAIL").filter(|e| !e.is_empty()) {
            Some(email) => Some(Identity {
                id: var("CUSTOMER_ID").unwrap_or_default(),
                email,
                is_logged_in: flag(&var, "CUSTOMER_LOGGED_IN", true)?,
            }),
            None => None,
        };

        let http_timeout = millis(&var, "HTTP_TIMEOUT_MS", Duration::from_secs(10))?;

        Ok(Self {
            host,
            port,
            storefront_url,
            storefront_cookie,
            remote_cart_url,
            policy,
            anonymous_push,
            watermark_path,
            customer,
            http_timeout,
        })
    }
}

/// Parse a URL that other paths are joined onto.
fn base_url(var: &'static str, raw: String) -> Result<Url, ConfigError> {
    let mut url = Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl {
        var,
        reason: e.to_string(),
    })?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn millis<F>(var: &F, key: &'static str, default: Duration) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw
            .parse()
            .map(Duration::from_millis)
            .map_err(|_| ConfigError::InvalidNumber(key)),
        None => Ok(default),
    }
}

fn flag<F>(var: &F, key: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match var(key).as_deref().map(str::to_ascii_lowercase).as_deref() {
        None => Ok(default),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some("0" | "false" | "no" | "off") => Ok(false),
        Some(_) => Err(ConfigError::InvalidFlag(key)),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("Invalid PORT value")]
    InvalidPort,

    #[error("Invalid URL in {var}: {reason}")]
    InvalidUrl { var: &'static str, reason: String },

    #[error("{0} must be a non-negative integer")]
    InvalidNumber(&'static str),

    #[error("{0} must be true or false")]
    InvalidFlag(&'static str),
}
