//! HTTP-based `ElevationProvider` for Open-Elevation compatible services.

use async_trait::async_trait;
use geo::Coord;
use log::debug;
use reqwest::Client;
use stepfree_core::{ElevationProvider, ProviderError};

use super::dto::{LookupRequestDto, LookupResponseDto};
use crate::http::{
    HttpProviderConfig, ProviderBuildError, build_client, convert_reqwest_error, parse_error,
};

const LOOKUP_PATH: &str = "api/v1/lookup";

/// Elevation provider posting batched lookups to `{base_url}/api/v1/lookup`.
///
/// Callers are expected to downsample geometries first; every point is sent
/// in a single request.
#[derive(Debug)]
pub struct HttpElevationProvider {
    client: Client,
    config: HttpProviderConfig,
}

impl HttpElevationProvider {
    /// Create a new provider with default connection settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpProviderConfig::new(base_url))
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

    fn lookup_url(&self) -> String {
        self.config.endpoint(LOOKUP_PATH)
    }
}

#[async_trait]
impl ElevationProvider for HttpElevationProvider {
    async fn get_elevations(&self, points: &[Coord<f64>]) -> Result<Vec<f64>, ProviderError> {
        if points.is_empty() {
            return Err(ProviderError::EmptyInput);
        }

        let url = self.lookup_url();
        let timeout = self.config.timeout;
        debug!("looking up {} elevations", points.len());

        let response = self
            .client
            .post(&url)
            .json(&LookupRequestDto::from_points(points))
            .send()
            .await
            .map_err(|err| convert_reqwest_error(&err, &url, timeout))?
            .error_for_status()
            .map_err(|err| convert_reqwest_error(&err, &url, timeout))?;

        let body: LookupResponseDto = response.json().await.map_err(|err| parse_error(&err))?;
        Ok(body.into_elevations())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn lookup_url_appends_api_path() {
        let provider = HttpElevationProvider::new("http://elevation.example.com/")
            .expect("provider should build");

        assert_eq!(
            provider.lookup_url(),
            "http://elevation.example.com/api/v1/lookup"
        );
    }

    #[rstest]
    fn empty_input_returns_error() {
        let provider =
            HttpElevationProvider::new("http://localhost:8080").expect("provider should build");
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("build runtime");

        let err = runtime
            .block_on(provider.get_elevations(&[]))
            .expect_err("should fail");

        assert_eq!(err, ProviderError::EmptyInput);
    }
}
