//! Address geocoding for registration.
//!
//! A free-text address becomes a `[longitude, latitude]` pair. Registration
//! never fails because of geocoding: an empty address, no match, or a
//! failed lookup all resolve to [`Coordinates::ORIGIN`].

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use profesionales_types::Coordinates;

use crate::config::GeocodingConfig;

/// Geocoding errors.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed.
    #[error("geocoding request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with something other than coordinates.
    #[error("invalid geocoding answer: {0}")]
    Invalid(String),
}

/// Turns addresses into coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Look `address` up. `Ok(None)` means no match.
    async fn lookup(&self, address: &str) -> Result<Option<Coordinates>, GeocodeError>;

    /// Look `address` up, resolving every failure to `[0, 0]`.
    async fn locate(&self, address: &str) -> Coordinates {
        let address = address.trim();
        if address.is_empty() {
            return Coordinates::ORIGIN;
        }
        match self.lookup(address).await {
            Ok(Some(coordinates)) => coordinates,
            Ok(None) => {
                tracing::warn!(address, "No geocoding match, using [0, 0]");
                Coordinates::ORIGIN
            }
            Err(e) => {
                tracing::warn!(address, error = %e, "Geocoding failed, using [0, 0]");
                Coordinates::ORIGIN
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

/// Geocoder backed by a Nominatim-compatible `/search` endpoint.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    base_url: String,
    http: Client,
}

impl NominatimGeocoder {
    /// Create a geocoder for `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GeocodeError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("profesionales-client/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Build the search URL.
    pub fn search_url(&self) -> String {
        format!("{}/search", self.base_url)
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn lookup(&self, address: &str) -> Result<Option<Coordinates>, GeocodeError> {
        let response = self
            .http
            .get(self.search_url())
            .query(&[("format", "json"), ("limit", "1"), ("q", address)])
            .send()
            .await?
            .error_for_status()?;

        let places: Vec<Place> = response.json().await?;
        let Some(place) = places.into_iter().next() else {
            return Ok(None);
        };

        let longitude: f64 = place
            .lon
            .parse()
            .map_err(|_| GeocodeError::Invalid(format!("longitude {:?}", place.lon)))?;
        let latitude: f64 = place
            .lat
            .parse()
            .map_err(|_| GeocodeError::Invalid(format!("latitude {:?}", place.lat)))?;

        tracing::debug!(address, longitude, latitude, "Geocoded address");
        Ok(Some(Coordinates::new(longitude, latitude)))
    }
}

/// Geocoder that never looks anything up.
///
/// Known addresses resolve to their fixed coordinates; everything else has
/// no match. Used for tests, `--mock`, and when geocoding is disabled.
#[derive(Debug, Clone, Default)]
pub struct FixedGeocoder {
    places: HashMap<String, Coordinates>,
}

impl FixedGeocoder {
    /// A geocoder with no known addresses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a known address.
    pub fn with(mut self, address: &str, coordinates: Coordinates) -> Self {
        self.places.insert(address.to_string(), coordinates);
        self
    }
}

#[async_trait]
impl Geocoder for FixedGeocoder {
    async fn lookup(&self, address: &str) -> Result<Option<Coordinates>, GeocodeError> {
        Ok(self.places.get(address).copied())
    }
}

/// Build the configured geocoder.
pub fn from_config(
    config: &GeocodingConfig,
    timeout: Duration,
) -> Result<Box<dyn Geocoder>, GeocodeError> {
    if config.enabled {
        Ok(Box::new(NominatimGeocoder::new(&config.base_url, timeout)?))
    } else {
        Ok(Box::new(FixedGeocoder::new()))
    }
}
