//! Google Maps web service client
//!
//! Provides geocoding and directions using the Maps Platform
//! [Geocoding](https://developers.google.com/maps/documentation/geocoding) and
//! [Directions](https://developers.google.com/maps/documentation/directions) APIs.

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::GoogleMapsConfig;
use crate::error::MapsApiError;
use crate::models::{DirectionsQuery, DirectionsResponse, GeocodeEntry, GeocodeResponse};

const GEOCODE_PATH: &str = "/maps/api/geocode/json";
const DIRECTIONS_PATH: &str = "/maps/api/directions/json";

/// Trait for Maps web service clients
#[async_trait]
pub trait MapsClient: Send + Sync {
    /// Geocode a free-form address
    ///
    /// `ZERO_RESULTS` yields an empty list; other non-OK statuses are errors.
    async fn geocode(&self, address: &str) -> Result<Vec<GeocodeEntry>, MapsApiError>;

    /// Request directions; the response carries the provider status
    async fn directions(&self, query: &DirectionsQuery)
    -> Result<DirectionsResponse, MapsApiError>;
}

/// Google Maps Platform client
#[derive(Debug)]
pub struct GoogleMapsClient {
    client: Client,
    config: GoogleMapsConfig,
    base_url: Url,
    /// Absent when caching is disabled
    geocode_cache: Option<Cache<String, Vec<GeocodeEntry>>>,
}

impl GoogleMapsClient {
    /// Create a new Google Maps client
    ///
    /// # Errors
    ///
    /// Returns an error if no API key is configured, the base URL is invalid,
    /// or the HTTP client cannot be initialized.
    pub fn new(config: &GoogleMapsConfig) -> Result<Self, MapsApiError> {
        if config.api_key().is_none_or(str::is_empty) {
            return Err(MapsApiError::ConfigurationError(
                "Google Maps API key is not configured".to_string(),
            ));
        }

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| MapsApiError::ConfigurationError(format!("Invalid base_url: {e}")))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("Geotrack/1.0")
            .build()
            .map_err(|e| MapsApiError::ConnectionFailed(e.to_string()))?;

        let geocode_cache = config.caching_enabled().then(|| {
            Cache::builder()
                .max_capacity(1000)
                .time_to_live(Duration::from_secs(u64::from(config.cache_ttl_minutes) * 60))
                .build()
        });

        Ok(Self {
            client,
            config: config.clone(),
            base_url,
            geocode_cache,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, MapsApiError> {
        self.base_url
            .join(path)
            .map_err(|e| MapsApiError::ConfigurationError(format!("Invalid endpoint: {e}")))
    }

    /// Query parameters sent with every request
    fn common_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("key", self.config.api_key().unwrap_or_default().to_string()),
            ("language", self.config.language.clone()),
            ("region", self.config.region.clone()),
        ]
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<T, MapsApiError> {
        let url = self.endpoint(path)?;
        debug!(%path, "Calling Google Maps");

        let response = self
            .client
            .get(url)
            .query(&self.common_params())
            .query(params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MapsApiError::Timeout {
                        timeout_secs: self.config.timeout_secs,
                    }
                } else {
                    MapsApiError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(MapsApiError::RequestFailed(format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| MapsApiError::ParseError(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| MapsApiError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl MapsClient for GoogleMapsClient {
    #[instrument(skip(self))]
    async fn geocode(&self, address: &str) -> Result<Vec<GeocodeEntry>, MapsApiError> {
        let address = address.trim();
        let cache_key = address.to_lowercase();
        if let Some(cache) = &self.geocode_cache {
            if let Some(cached) = cache.get(&cache_key).await {
                debug!(%address, "Geocoding cache hit");
                return Ok(cached);
            }
        }

        let response: GeocodeResponse = self
            .get_json(GEOCODE_PATH, &[("address", address.to_string())])
            .await?;

        let results = match response.status.as_str() {
            "OK" => response.results,
            "ZERO_RESULTS" => Vec::new(),
            _ => {
                warn!(status = %response.status, "Geocoding request rejected");
                return Err(MapsApiError::Api {
                    status: response.status,
                    message: response.error_message.unwrap_or_default(),
                });
            },
        };

        debug!(count = results.len(), "Geocoding results");
        if let Some(cache) = &self.geocode_cache {
            cache.insert(cache_key, results.clone()).await;
        }
        Ok(results)
    }

    #[instrument(skip(self), fields(origin = ?query.origin, destination = ?query.destination))]
    async fn directions(
        &self,
        query: &DirectionsQuery,
    ) -> Result<DirectionsResponse, MapsApiError> {
        let mut params = vec![
            ("origin", query.origin.to_query_value()),
            ("destination", query.destination.to_query_value()),
            ("mode", query.mode.clone()),
        ];
        if let Some(waypoints) = query.waypoints_param() {
            params.push(("waypoints", waypoints));
        }

        let response: DirectionsResponse = self.get_json(DIRECTIONS_PATH, &params).await?;

        if response.is_ok() {
            debug!(routes = response.routes.len(), "Directions found");
        } else {
            warn!(status = %response.status, "Directions request returned non-OK status");
        }
        Ok(response)
    }
}
