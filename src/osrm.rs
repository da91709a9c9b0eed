//! OSRM HTTP adapter for road-network distance matrices.
//!
//! Any failure talking to OSRM degrades to the haversine matrix so a planning
//! run never stalls on the routing service.

use std::fmt;

use serde::Deserialize;
use tracing::warn;

use crate::haversine::HaversineMatrix;
use crate::traits::DistanceMatrixProvider;

const METERS_PER_MILE: f64 = 1609.344;

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
        }
    }
}

impl OsrmConfig {
    /// Defaults overridden by `OSRM_BASE_URL`, `OSRM_PROFILE` and `OSRM_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("OSRM_BASE_URL").unwrap_or(defaults.base_url),
            profile: std::env::var("OSRM_PROFILE").unwrap_or(defaults.profile),
            timeout_secs: std::env::var("OSRM_TIMEOUT_SECS")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(defaults.timeout_secs),
        }
    }
}

#[derive(Debug)]
pub enum OsrmError {
    Http(reqwest::Error),
    /// OSRM answered with a non-"Ok" code.
    Service(String),
    /// Table dimensions did not match the request.
    Shape { expected: usize, rows: usize },
}

impl From<reqwest::Error> for OsrmError {
    fn from(err: reqwest::Error) -> Self {
        OsrmError::Http(err)
    }
}

impl fmt::Display for OsrmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OsrmError::Http(err) => write!(f, "OSRM request failed: {}", err),
            OsrmError::Service(code) => write!(f, "OSRM returned code {}", code),
            OsrmError::Shape { expected, rows } => {
                write!(f, "OSRM table has {} rows, expected {}", rows, expected)
            }
        }
    }
}

impl std::error::Error for OsrmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OsrmError::Http(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    /// Road distances in miles, without the haversine fallback.
    pub fn try_matrix(&self, points: &[(f64, f64)]) -> Result<Vec<Vec<f64>>, OsrmError> {
        if points.is_empty() {
            return Ok(Vec::new());
        }

        let body = self
            .client
            .get(table_url(&self.config, points))
            .send()?
            .error_for_status()?
            .json::<OsrmTableResponse>()?;

        into_miles(body, points.len())
    }
}

impl DistanceMatrixProvider for OsrmClient {
    fn matrix_for(&self, points: &[(f64, f64)]) -> Vec<Vec<f64>> {
        match self.try_matrix(points) {
            Ok(matrix) => matrix,
            Err(err) => {
                warn!(error = %err, points = points.len(), "OSRM table unavailable, using haversine");
                HaversineMatrix.matrix_for(points)
            }
        }
    }
}

fn table_url(config: &OsrmConfig, points: &[(f64, f64)]) -> String {
    // OSRM takes lng,lat pairs.
    let coords = points
        .iter()
        .map(|(lat, lng)| format!("{:.6},{:.6}", lng, lat))
        .collect::<Vec<_>>()
        .join(";");

    format!(
        "{}/table/v1/{}/{}?annotations=distance",
        config.base_url.trim_end_matches('/'),
        config.profile,
        coords
    )
}

/// Unreachable pairs come back as null and become infinite; the engine
/// substitutes haversine for those.
fn into_miles(body: OsrmTableResponse, expected: usize) -> Result<Vec<Vec<f64>>, OsrmError> {
    if body.code != "Ok" {
        return Err(OsrmError::Service(body.code));
    }

    let rows = body.distances.unwrap_or_default();
    if rows.len() != expected || rows.iter().any(|row| row.len() != expected) {
        return Err(OsrmError::Shape {
            expected,
            rows: rows.len(),
        });
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|meters| meters.map_or(f64::INFINITY, |m| m / METERS_PER_MILE))
                .collect()
        })
        .collect())
}

#[derive(Debug, Deserialize)]
struct OsrmTableResponse {
    code: String,
    distances: Option<Vec<Vec<Option<f64>>>>,
}
