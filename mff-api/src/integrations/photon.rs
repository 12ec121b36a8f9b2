use async_trait::async_trait;
use serde::Deserialize;
use shared_types::CitySuggestion;
use std::time::Duration;

use super::{error_body, CitySearch, IntegrationError};

const PHOTON_URL: &str = "https://photon.komoot.io/api/";
/// Bounding box around Germany: min lon, min lat, max lon, max lat
const GERMANY_BBOX: &str = "5.87,47.27,15.04,55.06";
pub const MIN_QUERY_CHARS: usize = 2;

#[derive(Debug, Deserialize)]
struct PhotonResponse {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    properties: Properties,
}

#[derive(Debug, Deserialize)]
struct Properties {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    county: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    countrycode: Option<String>,
}

/// City autocomplete backed by the public Photon geocoder
pub struct PhotonClient {
    client: reqwest::Client,
    endpoint: String,
}

impl PhotonClient {
    pub fn new() -> Result<Self, IntegrationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()?;
        Ok(Self {
            client,
            endpoint: PHOTON_URL.to_string(),
        })
    }
}

#[async_trait]
impl CitySearch for PhotonClient {
    async fn suggest(&self, query: &str) -> Result<Vec<CitySuggestion>, IntegrationError> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            return Ok(Vec::new());
        }

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("q", query),
                ("limit", "5"),
                ("lang", "de"),
                ("layer", "city"),
                ("osm_tag", "place:city"),
                ("osm_tag", "place:town"),
                ("bbox", GERMANY_BBOX),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(IntegrationError::Status {
                service: "photon",
                status: status.as_u16(),
                body: error_body(response).await,
            });
        }

        let body: PhotonResponse = response.json().await?;
        Ok(german_cities(body))
    }
}

fn german_cities(response: PhotonResponse) -> Vec<CitySuggestion> {
    response
        .features
        .into_iter()
        .map(|feature| feature.properties)
        .filter(|p| p.country.as_deref() == Some("Germany") || p.countrycode.as_deref() == Some("DE"))
        .filter_map(|p| {
            let city = p.name?;
            Some(CitySuggestion {
                city,
                state: p.state.or(p.county).unwrap_or_default(),
            })
        })
        .collect()
}
