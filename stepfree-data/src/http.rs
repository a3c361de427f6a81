//! Shared HTTP plumbing for the provider adapters.

use std::time::Duration;

use reqwest::Client;
use stepfree_core::ProviderError;
use thiserror::Error;

/// Default user agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = "stepfree-engine/0.1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Error type for provider construction failures.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Connection settings shared by every HTTP provider.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use stepfree_data::HttpProviderConfig;
///
/// let config = HttpProviderConfig::new("http://localhost:5000")
///     .with_timeout(Duration::from_secs(5))
///     .with_user_agent("my-app/1.0");
/// assert_eq!(config.timeout, Duration::from_secs(5));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpProviderConfig {
    /// Base URL of the service (e.g., `"http://localhost:5000"`).
    pub base_url: String,
    /// Connect and request timeout.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for HttpProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl HttpProviderConfig {
    /// Create a configuration for the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Join `path` onto the base URL without doubling slashes.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Build a client honouring the configured timeout and user agent.
pub(crate) fn build_client(config: &HttpProviderConfig) -> Result<Client, ProviderBuildError> {
    Client::builder()
        .user_agent(&config.user_agent)
        .connect_timeout(config.timeout)
        .timeout(config.timeout)
        .build()
        .map_err(ProviderBuildError::HttpClient)
}

/// Map a transport failure onto [`ProviderError`].
pub(crate) fn convert_reqwest_error(
    error: &reqwest::Error,
    url: &str,
    timeout: Duration,
) -> ProviderError {
    if error.is_timeout() {
        return ProviderError::Timeout {
            url: url.to_owned(),
            timeout_secs: timeout.as_secs(),
        };
    }

    if let Some(status) = error.status() {
        return ProviderError::HttpError {
            url: url.to_owned(),
            status: status.as_u16(),
            message: error.to_string(),
        };
    }

    ProviderError::NetworkError {
        url: url.to_owned(),
        message: error.to_string(),
    }
}

/// Map a body decoding failure onto [`ProviderError::ParseError`].
pub(crate) fn parse_error(error: &impl std::fmt::Display) -> ProviderError {
    ProviderError::ParseError {
        message: error.to_string(),
    }
}
