use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::config::settings::{ApiConfig, LocationConfig};
use crate::models::Timetable;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Why a fetch produced no timetable.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered outside the 2xx range.
    #[error("HTTP error! status: {status}")]
    Network { status: u16 },
    /// A well-formed envelope that reports failure; `payload` is its `data`.
    #[error("API error: {payload}")]
    Api { payload: String },
    /// Transport failures, malformed JSON, missing fields.
    #[error("{0}")]
    Unknown(String),
}

impl FetchError {
    /// The single line shown to the user in place of the timetable.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Unknown(_) => "An unexpected error occurred".to_string(),
            categorized => format!("Failed to load prayer times: {}", categorized),
        }
    }
}

/// Anything that can produce a fresh timetable.
pub trait TimingsSource: Send + Sync {
    fn fetch(&self) -> Result<Timetable, FetchError>;
}

#[derive(Deserialize)]
struct Envelope {
    code: i64,
    status: String,
    #[serde(default)]
    data: Value,
}

/// Turn an HTTP status and body into a timetable or a categorized failure.
pub fn parse_response(status: u16, body: &str) -> Result<Timetable, FetchError> {
    if !(200..300).contains(&status) {
        return Err(FetchError::Network { status });
    }

    let envelope: Envelope = serde_json::from_str(body)
        .map_err(|e| FetchError::Unknown(format!("malformed response: {}", e)))?;

    if envelope.code != 200 || envelope.status != "OK" {
        return Err(FetchError::Api {
            payload: payload_text(&envelope.data),
        });
    }

    serde_json::from_value(envelope.data)
        .map_err(|e| FetchError::Unknown(format!("unexpected timings payload: {}", e)))
}

fn payload_text(data: &Value) -> String {
    match data {
        Value::String(s) => s.clone(),
        Value::Null => "no details".to_string(),
        other => other.to_string(),
    }
}

/// Blocking client for `GET /timingsByCity`.
pub struct AladhanClient {
    http: reqwest::blocking::Client,
    endpoint: String,
    query: Vec<(&'static str, String)>,
}

impl AladhanClient {
    pub fn new(api: &ApiConfig, location: &LocationConfig) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Building HTTP client")?;
        Ok(Self {
            http,
            endpoint: format!("{}/timingsByCity", api.base_url.trim_end_matches('/')),
            query: vec![
                ("city", location.city.clone()),
                ("country", location.country.clone()),
                ("method", location.method.to_string()),
            ],
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl TimingsSource for AladhanClient {
    fn fetch(&self) -> Result<Timetable, FetchError> {
        log::info!("Fetching prayer times from {}", self.endpoint);

        let response = self
            .http
            .get(&self.endpoint)
            .query(&self.query)
            .send()
            .map_err(|e| FetchError::Unknown(format!("request failed: {}", e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| FetchError::Unknown(format!("reading response failed: {}", e)))?;

        parse_response(status, &body)
    }
}
