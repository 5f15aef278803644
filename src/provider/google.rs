//! Google Places provider implementation

use super::traits::*;
use crate::config::ProviderSettings;
use crate::error::ProviderError;
use crate::network::{HttpClient, ProviderRequest, ProviderResponse};
use crate::resolver::{Coordinate, Place};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

/// Google Places web service (text search + nearby search)
pub struct GooglePlaces {
    client: HttpClient,
    api_key: String,
    base_url: String,
    language: Option<String>,
    page_size: usize,
}

impl GooglePlaces {
    pub fn new(client: HttpClient, api_key: impl Into<String>) -> Self {
        Self::with_settings(client, api_key, &ProviderSettings::default())
    }

    pub fn with_settings(
        client: HttpClient,
        api_key: impl Into<String>,
        settings: &ProviderSettings,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            language: settings.language.clone(),
            page_size: settings.page_size,
        }
    }

    fn location(center: Coordinate) -> String {
        format!("{},{}", center.latitude, center.longitude)
    }

    /// Build the text search request
    pub fn text_request(&self, center: Coordinate, radius_m: u32, query: &str) -> ProviderRequest {
        ProviderRequest::get(format!("{}/textsearch/json", self.base_url))
            .param("key", &self.api_key)
            .param("location", Self::location(center))
            .param("radius", radius_m.to_string())
            .param("query", query)
            .param_opt("language", self.language.as_deref())
    }

    /// Build the nearby search request
    pub fn nearby_request(&self, center: Coordinate, radius_m: u32) -> ProviderRequest {
        ProviderRequest::get(format!("{}/nearbysearch/json", self.base_url))
            .param("key", &self.api_key)
            .param("location", Self::location(center))
            .param("radius", radius_m.to_string())
            .param_opt("language", self.language.as_deref())
    }

    /// Parse a places response into ranked places
    pub fn parse(&self, response: ProviderResponse) -> Result<Vec<Place>, ProviderError> {
        if response.is_rate_limited() {
            return Err(ProviderError::RateLimited);
        }
        if !response.is_success() {
            return Err(ProviderError::Status(response.status));
        }

        let body: PlacesResponse = response.json()?;
        match body.status.as_str() {
            "OK" => {}
            "ZERO_RESULTS" => return Ok(Vec::new()),
            "OVER_QUERY_LIMIT" => return Err(ProviderError::RateLimited),
            "REQUEST_DENIED" => {
                return Err(ProviderError::RequestDenied(
                    body.error_message.unwrap_or_default(),
                ))
            }
            "INVALID_REQUEST" => {
                return Err(ProviderError::InvalidRequest(
                    body.error_message.unwrap_or_default(),
                ))
            }
            other => {
                return Err(ProviderError::InvalidResponse(format!(
                    "status {}",
                    other
                )))
            }
        }

        Ok(body
            .results
            .into_iter()
            .take(self.page_size)
            .map(|r| Place {
                name: r.name,
                coordinate: Coordinate::new(r.geometry.location.lat, r.geometry.location.lng),
                place_id: r.place_id,
                address: r.vicinity.or(r.formatted_address),
            })
            .collect())
    }
}

#[async_trait]
impl PlaceSearchProvider for GooglePlaces {
    fn name(&self) -> &str {
        "google_places"
    }

    fn page_limit(&self) -> usize {
        self.page_size
    }

    async fn search_by_text(
        &self,
        center: Coordinate,
        radius_m: u32,
        query: &str,
    ) -> Result<Vec<Place>, ProviderError> {
        let request = self.text_request(center, radius_m, query);
        let places = self.parse(self.client.execute(&request).await?)?;
        debug!("Text search '{}' returned {} places", query, places.len());
        Ok(places)
    }

    async fn search_nearby(
        &self,
        center: Coordinate,
        radius_m: u32,
    ) -> Result<Vec<Place>, ProviderError> {
        let request = self.nearby_request(center, radius_m);
        self.parse(self.client.execute(&request).await?)
    }
}

#[derive(Debug, Deserialize)]
struct PlacesResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<PlaceResult>,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    name: String,
    #[serde(default)]
    place_id: Option<String>,
    #[serde(default)]
    vicinity: Option<String>,
    #[serde(default)]
    formatted_address: Option<String>,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}
