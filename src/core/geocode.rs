//! Free-text address lookup against the Nominatim search endpoint.
//!
//! One request per lookup, limited to one result. "No match" is a
//! user-correctable condition and is kept distinct from network failures.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";
const USER_AGENT: &str = concat!("alerta-civil/", env!("CARGO_PKG_VERSION"));

#[derive(Error, Debug)]
pub enum GeocodeError {
    /// The service answered, but with zero results.
    #[error("endereço não encontrado")]
    NotFound,
    /// Network or HTTP-level failure; retrying later may succeed.
    #[error("falha de rede: {0}")]
    Transient(#[from] reqwest::Error),
    /// The service answered with something we cannot parse.
    #[error("resposta inválida do serviço de geocodificação: {0}")]
    BadResponse(String),
}

/// First search result, coordinates parsed to decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeocodeHit {
    pub latitude: f64,
    pub longitude: f64,
}

/// Nominatim returns lat/lon as strings.
#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

pub struct GeocodeClient {
    client: Client,
}

impl GeocodeClient {
    pub fn new() -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(15))
            .build()
            .expect("Failed to build HTTP client");
        Self { client }
    }

    /// Resolve `address` to coordinates. The caller keeps its triggering
    /// control disabled until this resolves; there is no cancellation.
    pub async fn lookup(&self, address: &str) -> Result<GeocodeHit, GeocodeError> {
        let response = self
            .client
            .get(SEARCH_URL)
            .query(&[("format", "json"), ("q", address), ("limit", "1")])
            .send()
            .await?
            .error_for_status()?;

        let places: Vec<Place> = response.json().await?;
        first_hit(places)
    }
}

impl Default for GeocodeClient {
    fn default() -> Self {
        Self::new()
    }
}

fn first_hit(places: Vec<Place>) -> Result<GeocodeHit, GeocodeError> {
    let place = places.into_iter().next().ok_or(GeocodeError::NotFound)?;
    let latitude = place
        .lat
        .parse()
        .map_err(|_| GeocodeError::BadResponse(format!("lat não numérica: {:?}", place.lat)))?;
    let longitude = place
        .lon
        .parse()
        .map_err(|_| GeocodeError::BadResponse(format!("lon não numérica: {:?}", place.lon)))?;
    Ok(GeocodeHit {
        latitude,
        longitude,
    })
}
