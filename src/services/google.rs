// Google Maps web services: geocoding, nearby search and the distance matrix

use serde::Deserialize;
use tracing::debug;

use crate::error::ServiceError;
use crate::models::{CandidateLocation, Coordinate, Distance, DistanceUnit};
use crate::services::resolution::rank_by_proximity;
use crate::services::{CandidateResolver, DistanceProvider};
use crate::utils::distance::meters_to;

pub const GEOCODE_API_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";
pub const NEARBY_SEARCH_API_URL: &str =
    "https://maps.googleapis.com/maps/api/place/nearbysearch/json";
pub const DISTANCE_MATRIX_API_URL: &str =
    "https://maps.googleapis.com/maps/api/distancematrix/json";

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    formatted_address: String,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct NearbyResult {
    name: String,
    #[serde(default)]
    vicinity: Option<String>,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
pub struct NearbyResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<NearbyResult>,
}

#[derive(Debug, Deserialize)]
struct MatrixValue {
    value: f64,
}

#[derive(Debug, Deserialize)]
struct MatrixElement {
    status: String,
    #[serde(default)]
    distance: Option<MatrixValue>,
}

#[derive(Debug, Deserialize)]
struct MatrixRow {
    elements: Vec<MatrixElement>,
}

#[derive(Debug, Deserialize)]
pub struct DistanceMatrixResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    rows: Vec<MatrixRow>,
}

fn status_error(status: &str, message: Option<String>, not_found: ServiceError) -> ServiceError {
    match status {
        "ZERO_RESULTS" | "NOT_FOUND" => not_found,
        "OVER_QUERY_LIMIT" | "OVER_DAILY_LIMIT" => ServiceError::QuotaExceeded,
        other => ServiceError::Api {
            status: other.to_string(),
            message: message.unwrap_or_default(),
        },
    }
}

impl GeocodeResponse {
    /// First geocoding result as a single candidate named after the query
    pub fn into_candidate(self, query: &str) -> Result<CandidateLocation, ServiceError> {
        if self.status != "OK" {
            return Err(status_error(
                &self.status,
                self.error_message,
                ServiceError::NotFound(query.to_string()),
            ));
        }

        let first = self
            .results
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::NotFound(query.to_string()))?;

        Ok(CandidateLocation::resolved(
            query,
            first.formatted_address,
            Coordinate::new(first.geometry.location.lat, first.geometry.location.lng),
        ))
    }
}

impl NearbyResponse {
    /// Results whose name matches `query` exactly, nearest to `anchor` first
    pub fn into_candidates(
        self,
        query: &str,
        anchor: Coordinate,
        cap: usize,
    ) -> Result<Vec<CandidateLocation>, ServiceError> {
        if self.status != "OK" {
            return Err(status_error(
                &self.status,
                self.error_message,
                ServiceError::NotFound(query.to_string()),
            ));
        }

        let matches: Vec<CandidateLocation> = self
            .results
            .into_iter()
            .filter(|result| result.name == query)
            .map(|result| {
                let full_name = match &result.vicinity {
                    Some(vicinity) => format!("{}, {}", result.name, vicinity),
                    None => result.name.clone(),
                };
                CandidateLocation::resolved(
                    result.name,
                    full_name,
                    Coordinate::new(result.geometry.location.lat, result.geometry.location.lng),
                )
            })
            .collect();

        if matches.is_empty() {
            return Err(ServiceError::NotFound(query.to_string()));
        }

        Ok(rank_by_proximity(matches, anchor, cap))
    }
}

impl DistanceMatrixResponse {
    /// Distance in metres of the single origin/destination element
    pub fn into_meters(self) -> Result<f64, ServiceError> {
        if self.status != "OK" {
            return Err(status_error(
                &self.status,
                self.error_message,
                ServiceError::NoRoute,
            ));
        }

        let element = self
            .rows
            .into_iter()
            .next()
            .and_then(|row| row.elements.into_iter().next())
            .ok_or_else(|| ServiceError::Malformed("missing matrix element".to_string()))?;

        if element.status != "OK" {
            return Err(status_error(&element.status, None, ServiceError::NoRoute));
        }

        element
            .distance
            .map(|distance| distance.value)
            .ok_or_else(|| ServiceError::Malformed("element without distance".to_string()))
    }
}

pub struct GoogleMapsClientParams {
    pub api_key: String,
    pub nearby_cap: usize,
}

/// Client for the Google Maps web services used to resolve and measure a trip
pub struct GoogleMapsClient {
    params: GoogleMapsClientParams,
    client: reqwest::Client,
}

impl GoogleMapsClient {
    pub fn new(params: GoogleMapsClientParams) -> Self {
        Self {
            params,
            client: reqwest::Client::new(),
        }
    }

    async fn get<T>(&self, url: &str, query: &[(&str, String)]) -> Result<T, ServiceError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = self
            .client
            .get(url)
            .query(query)
            .query(&[("key", &self.params.api_key)])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16().to_string();
            let message = response.text().await.unwrap_or_default();
            return Err(ServiceError::Api { status, message });
        }

        Ok(response.json().await?)
    }

    /// Geocodes an exact address
    pub async fn geocode(&self, address: &str) -> Result<CandidateLocation, ServiceError> {
        debug!("Geocoding {:?}", address);
        let response: GeocodeResponse = self
            .get(GEOCODE_API_URL, &[("address", address.to_string())])
            .await?;
        response.into_candidate(address)
    }

    /// Searches for places named `keyword` around `anchor`, ranked by distance
    pub async fn nearby(
        &self,
        keyword: &str,
        anchor: Coordinate,
    ) -> Result<Vec<CandidateLocation>, ServiceError> {
        debug!("Searching {:?} near {}", keyword, anchor);
        let response: NearbyResponse = self
            .get(
                NEARBY_SEARCH_API_URL,
                &[
                    (
                        "location",
                        format!("{},{}", anchor.latitude, anchor.longitude),
                    ),
                    ("rankby", "distance".to_string()),
                    ("keyword", keyword.to_string()),
                ],
            )
            .await?;
        response.into_candidates(keyword, anchor, self.params.nearby_cap)
    }
}

impl CandidateResolver for GoogleMapsClient {
    async fn resolve(
        &self,
        query: &str,
        anchor: Coordinate,
        is_unique: bool,
    ) -> Result<Vec<CandidateLocation>, ServiceError> {
        if is_unique {
            Ok(vec![self.geocode(query).await?])
        } else {
            self.nearby(query, anchor).await
        }
    }
}

impl DistanceProvider for GoogleMapsClient {
    async fn measure(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        unit: DistanceUnit,
    ) -> Result<Distance, ServiceError> {
        let response: DistanceMatrixResponse = self
            .get(
                DISTANCE_MATRIX_API_URL,
                &[
                    (
                        "origins",
                        format!("{},{}", origin.latitude, origin.longitude),
                    ),
                    (
                        "destinations",
                        format!("{},{}", destination.latitude, destination.longitude),
                    ),
                ],
            )
            .await?;
        Ok(meters_to(unit, response.into_meters()?))
    }
}
