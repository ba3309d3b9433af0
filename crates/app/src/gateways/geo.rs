//! Map-provider client for geocoding and drive distances.

use std::time::Duration;

use async_trait::async_trait;
use mockall::automock;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

/// A WGS84 point.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

/// Configuration for the map provider.
#[derive(Debug, Clone)]
pub struct GeoConfig {
    /// Provider API root, e.g. `"https://maps.googleapis.com/maps/api"`.
    pub base_url: String,

    pub api_key: String,

    /// Where deliveries leave from. Distances are always measured from
    /// here.
    pub warehouse: Coordinate,

    /// Per-request timeout. Geocoding sits on the checkout path, so a
    /// slow provider fails the request rather than stalling it.
    pub timeout: Duration,
}

/// Geocoding and routing operations used by checkout and order placement.
#[automock]
#[async_trait]
pub trait GeoClient: Send + Sync {
    /// Resolve a postal address to a coordinate.
    async fn geocode(&self, address: &str) -> Result<Coordinate, GeoError>;

    /// Driving distance in metres from the warehouse to `destination`.
    async fn drive_distance(&self, destination: Coordinate) -> Result<i64, GeoError>;
}

/// HTTP client for a Google-style geocoding and distance-matrix API.
#[derive(Debug, Clone)]
pub struct GoogleGeoClient {
    config: GeoConfig,
    http: Client,
}

impl GoogleGeoClient {
    /// Create a new client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be constructed.
    pub fn new(config: GeoConfig) -> Result<Self, GeoError> {
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self { config, http })
    }
}

#[async_trait]
impl GeoClient for GoogleGeoClient {
    async fn geocode(&self, address: &str) -> Result<Coordinate, GeoError> {
        let url = format!("{}/geocode/json", self.config.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[("address", address), ("key", &self.config.api_key)])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(GeoError::UnexpectedResponse(format!(
                "geocode request failed with status {status}: {text}"
            )));
        }

        let parsed: GeocodeResponse = response.json().await?;

        let Some(result) = parsed.results.into_iter().next() else {
            return Err(GeoError::GeocodeFailed);
        };

        Ok(result.geometry.location)
    }

    async fn drive_distance(&self, destination: Coordinate) -> Result<i64, GeoError> {
        let url = format!("{}/distancematrix/json", self.config.base_url);

        let origin = format!(
            "{},{}",
            self.config.warehouse.lat, self.config.warehouse.lng
        );
        let dest = format!("{},{}", destination.lat, destination.lng);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("origins", origin.as_str()),
                ("destinations", dest.as_str()),
                ("key", self.config.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(GeoError::UnexpectedResponse(format!(
                "distance request failed with status {status}: {text}"
            )));
        }

        let parsed: DistanceResponse = response.json().await?;

        let Some(element) = parsed
            .rows
            .into_iter()
            .next()
            .and_then(|row| row.elements.into_iter().next())
        else {
            return Err(GeoError::DistanceUnavailable {
                status: "MISSING_ELEMENT".to_string(),
            });
        };

        if element.status != "OK" {
            return Err(GeoError::DistanceUnavailable {
                status: element.status,
            });
        }

        match element.distance {
            Some(distance) => Ok(distance.value),
            None => Err(GeoError::DistanceUnavailable {
                status: "MISSING_DISTANCE".to_string(),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Coordinate,
}

#[derive(Debug, Deserialize)]
struct DistanceResponse {
    #[serde(default)]
    rows: Vec<DistanceRow>,
}

#[derive(Debug, Deserialize)]
struct DistanceRow {
    #[serde(default)]
    elements: Vec<DistanceElement>,
}

#[derive(Debug, Deserialize)]
struct DistanceElement {
    status: String,
    distance: Option<DistanceValue>,
}

#[derive(Debug, Deserialize)]
struct DistanceValue {
    value: i64,
}

/// Errors from the map provider.
#[derive(Debug, Error)]
pub enum GeoError {
    /// The geocoder returned no candidates for the address.
    #[error("address could not be geocoded")]
    GeocodeFailed,

    /// The distance matrix reported no usable route.
    #[error("drive distance unavailable ({status})")]
    DistanceUnavailable { status: String },

    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// A non-2xx response or a body outside the provider contract.
    #[error("unexpected response from map provider: {0}")]
    UnexpectedResponse(String),
}
