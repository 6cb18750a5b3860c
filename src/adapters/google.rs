use crate::adapters::http::{send, truncate_body};
use crate::config::ApiKey;
use crate::domain::model::{Coordinate, Place};
use crate::domain::ports::{GeoResolver, PlacesLookup};
use crate::utils::error::{LookupService, Result, SiteError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
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

#[derive(Debug, Deserialize)]
struct NearbySearchResponse {
    status: String,
    #[serde(default)]
    results: Vec<NearbyResult>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NearbyResult {
    name: Option<String>,
    #[serde(default)]
    types: Vec<String>,
}

fn describe_status(status: &str, error_message: Option<String>) -> String {
    match error_message {
        Some(message) => format!("{} ({})", status, message),
        None => status.to_string(),
    }
}

/// Google Geocoding API
pub struct GoogleGeocoder {
    client: Client,
    endpoint: String,
    api_key: ApiKey,
}

impl GoogleGeocoder {
    pub fn new(client: Client, endpoint: impl Into<String>, api_key: ApiKey) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        }
    }
}

#[async_trait]
impl GeoResolver for GoogleGeocoder {
    async fn resolve(&self, address: &str) -> Result<Coordinate> {
        tracing::debug!("Geocoding address: {}", address);

        let request = self
            .client
            .get(&self.endpoint)
            .query(&[("address", address), ("key", self.api_key.expose())]);
        let response = send(request).await.map_err(SiteError::geo)?;

        if !response.status.is_success() {
            let code = response.status.as_u16();
            return Err(SiteError::geo(format!("geocoding service returned HTTP {}", code))
                .with_status(code)
                .with_details(truncate_body(&response.body)));
        }

        let parsed: GeocodeResponse = serde_json::from_str(&response.body).map_err(|e| {
            SiteError::geo(format!("unreadable geocoding response: {}", e))
                .with_details(truncate_body(&response.body))
        })?;

        if parsed.status != "OK" {
            return Err(
                SiteError::geo(describe_status(&parsed.status, parsed.error_message))
                    .with_details(truncate_body(&response.body)),
            );
        }

        // 多筆候選時直接採用上游排序的第一筆
        let first = parsed
            .results
            .into_iter()
            .next()
            .ok_or_else(|| SiteError::geo("no candidates returned"))?;

        let coordinate = Coordinate::new(first.geometry.location.lat, first.geometry.location.lng);
        tracing::info!("📍 Resolved '{}' to {}", address, coordinate);
        Ok(coordinate)
    }
}

/// Google Places Nearby Search
pub struct GooglePlaces {
    client: Client,
    endpoint: String,
    api_key: ApiKey,
}

impl GooglePlaces {
    pub fn new(client: Client, endpoint: impl Into<String>, api_key: ApiKey) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        }
    }
}

#[async_trait]
impl PlacesLookup for GooglePlaces {
    async fn find_nearby(&self, coordinate: Coordinate, radius_meters: u32) -> Result<Vec<Place>> {
        let location = coordinate.to_string();
        let radius = radius_meters.to_string();
        let request = self.client.get(&self.endpoint).query(&[
            ("location", location.as_str()),
            ("radius", radius.as_str()),
            ("key", self.api_key.expose()),
        ]);

        let response = send(request)
            .await
            .map_err(|e| SiteError::lookup(LookupService::Places, e))?;

        if !response.status.is_success() {
            let code = response.status.as_u16();
            return Err(SiteError::lookup(
                LookupService::Places,
                format!("places service returned HTTP {}", code),
            )
            .with_status(code)
            .with_details(truncate_body(&response.body)));
        }

        let parsed: NearbySearchResponse = serde_json::from_str(&response.body).map_err(|e| {
            SiteError::lookup(
                LookupService::Places,
                format!("unreadable places response: {}", e),
            )
            .with_details(truncate_body(&response.body))
        })?;

        match parsed.status.as_str() {
            "OK" | "ZERO_RESULTS" => {}
            status => {
                return Err(SiteError::lookup(
                    LookupService::Places,
                    describe_status(status, parsed.error_message),
                )
                .with_details(truncate_body(&response.body)));
            }
        }

        let places: Vec<Place> = parsed
            .results
            .into_iter()
            .filter_map(|result| match result.name {
                Some(name) => Some(Place::new(name, result.types)),
                None => {
                    tracing::debug!("Skipping nameless place result");
                    None
                }
            })
            .collect();

        tracing::info!("🏬 Found {} nearby places", places.len());
        Ok(places)
    }
}
