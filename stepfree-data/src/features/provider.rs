//! HTTP-based `FeatureProvider` using the Overpass API.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use stepfree_core::{FeatureElement, FeatureProvider, FeatureQuery, ProviderError};

use super::overpass::OverpassResponseDto;
use crate::http::{
    HttpProviderConfig, ProviderBuildError, build_client, convert_reqwest_error, parse_error,
};

const INTERPRETER_PATH: &str = "api/interpreter";

/// Default timeout for Overpass queries.
///
/// Polygon queries are slower than routing or elevation lookups, so this is
/// longer than [`HttpProviderConfig`]'s default.
pub const DEFAULT_FEATURE_TIMEOUT: Duration = Duration::from_secs(25);

/// Feature provider posting Overpass QL to `{base_url}/api/interpreter`.
///
/// The configured timeout is also written into the query's `[timeout:..]`
/// setting so the server gives up no later than the client.
#[derive(Debug)]
pub struct OverpassFeatureProvider {
    client: Client,
    config: HttpProviderConfig,
}

impl OverpassFeatureProvider {
    /// Create a new provider using [`DEFAULT_FEATURE_TIMEOUT`].
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpProviderConfig::new(base_url).with_timeout(DEFAULT_FEATURE_TIMEOUT))
    }

    /// Create a new provider with explicit connection settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn with_config(config: HttpProviderConfig) -> Result<Self, ProviderBuildError> {
        let client = build_client(&config)?;
        Ok(Self { client, config })
    }

    fn interpreter_url(&self) -> String {
        self.config.endpoint(INTERPRETER_PATH)
    }
}

#[async_trait]
impl FeatureProvider for OverpassFeatureProvider {
    async fn get_features(
        &self,
        query: &FeatureQuery,
    ) -> Result<Vec<FeatureElement>, ProviderError> {
        if query.polygon().is_empty() {
            return Err(ProviderError::EmptyInput);
        }

        let url = self.interpreter_url();
        let timeout = self.config.timeout;
        let ql = query.to_overpass_ql(timeout.as_secs());

        let response = self
            .client
            .post(&url)
            .form(&[("data", ql.as_str())])
            .send()
            .await
            .map_err(|err| convert_reqwest_error(&err, &url, timeout))?
            .error_for_status()
            .map_err(|err| convert_reqwest_error(&err, &url, timeout))?;

        let body: OverpassResponseDto = response.json().await.map_err(|err| parse_error(&err))?;
        let elements = body
            .into_domain_elements()
            .map_err(|message| ProviderError::ParseError { message })?;
        debug!("overpass returned {} elements", elements.len());
        Ok(elements)
    }
}
