//! Client for the remote skin-condition prediction API.
//!
//! The API takes a base64 JPEG and returns a class label with a 0.0-1.0
//! confidence. Several base URLs are configured (LAN host, loopback,
//! emulator alias); they are tried in order until one answers successfully.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config;
use crate::models::{ScanDraft, Severity};

#[derive(Error, Debug)]
pub enum PredictionError {
    #[error("Could not connect to backend server. Last error: {last_error}")]
    AllBackendsFailed { last_error: String },
    #[error("Invalid image: {0}")]
    InvalidImage(String),
    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

/// Doctor-visit guidance attached to some predictions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalAdvice {
    pub when_to_see_doctor: String,
    pub urgency: String,
    pub warning_signs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    pub immediate_actions: Vec<String>,
    pub lifestyle_recommendations: Vec<String>,
    pub treatment_suggestions: Vec<String>,
    pub medical_advice: MedicalAdvice,
    pub prevention_tips: Vec<String>,
    pub general_advice: String,
    pub disclaimer: String,
}

/// Response body from POST /predict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub success: bool,
    #[serde(rename = "class", default)]
    pub label: String,
    /// Fraction in 0.0..=1.0
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Recommendations>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PredictionResponse {
    /// Confidence as a whole percentage, clamped to 0..=100.
    pub fn confidence_percent(&self) -> u32 {
        (self.confidence * 100.0).round().clamp(0.0, 100.0) as u32
    }

    /// Maps the prediction to a history draft. Severity is the caller's call.
    pub fn into_draft(self, severity: Severity, image_reference: String) -> ScanDraft {
        ScanDraft {
            confidence: self.confidence_percent(),
            label: self.label,
            severity,
            image_reference,
        }
    }
}

/// Request body for POST /predict
#[derive(Serialize)]
struct PredictRequest<'a> {
    image: &'a str,
}

pub struct PredictionClient {
    base_urls: Vec<String>,
    client: reqwest::Client,
}

impl PredictionClient {
    pub fn new(base_urls: Vec<String>, timeout: Duration) -> Result<Self, PredictionError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PredictionError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_urls: base_urls
                .into_iter()
                .map(|url| url.trim_end_matches('/').to_string())
                .collect(),
            client,
        })
    }

    /// Backends from the environment or the built-in list, 30s timeout.
    pub fn from_config() -> Result<Self, PredictionError> {
        Self::new(config::backend_urls(), config::REQUEST_TIMEOUT)
    }

    pub fn base_urls(&self) -> &[String] {
        &self.base_urls
    }

    /// Encodes raw image bytes and requests a prediction.
    pub async fn predict(&self, image: &[u8]) -> Result<PredictionResponse, PredictionError> {
        if image.is_empty() {
            return Err(PredictionError::InvalidImage("image is empty".into()));
        }
        self.predict_base64(&BASE64.encode(image)).await
    }

    /// Tries each backend in order and returns the first successful prediction.
    pub async fn predict_base64(
        &self,
        image_base64: &str,
    ) -> Result<PredictionResponse, PredictionError> {
        let body = PredictRequest {
            image: image_base64,
        };
        let mut last_error = String::from("no backend configured");

        for base_url in &self.base_urls {
            let url = format!("{base_url}{}", config::PREDICT_ENDPOINT);
            tracing::debug!(%url, "Requesting prediction");

            let response = match self
                .client
                .post(&url)
                .header(reqwest::header::ACCEPT, "application/json")
                .json(&body)
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    last_error = if e.is_timeout() {
                        "request timed out".to_string()
                    } else {
                        e.to_string()
                    };
                    tracing::warn!(%url, error = %last_error, "Backend unreachable");
                    continue;
                }
            };

            let status = response.status();
            if !status.is_success() {
                let text = response.text().await.unwrap_or_default();
                last_error = format!("HTTP {}: {text}", status.as_u16());
                tracing::warn!(%url, error = %last_error, "Backend returned an error status");
                continue;
            }

            match response.json::<PredictionResponse>().await {
                Ok(parsed) if parsed.success => {
                    tracing::info!(label = %parsed.label, confidence = parsed.confidence, "Prediction received");
                    return Ok(parsed);
                }
                Ok(parsed) => {
                    last_error = parsed
                        .error
                        .unwrap_or_else(|| "Unknown server error".to_string());
                    tracing::warn!(%url, error = %last_error, "Backend reported failure");
                }
                Err(e) => {
                    last_error = format!("unreadable response: {e}");
                    tracing::warn!(%url, error = %last_error, "Backend response could not be parsed");
                }
            }
        }

        Err(PredictionError::AllBackendsFailed { last_error })
    }

    /// True as soon as any backend answers GET /ping with a 2xx.
    pub async fn check_health(&self) -> bool {
        for base_url in &self.base_urls {
            let url = format!("{base_url}{}", config::PING_ENDPOINT);
            match self.client.get(&url).send().await {
                Ok(response) if response.status().is_success() => {
                    tracing::debug!(%url, "Backend is healthy");
                    return true;
                }
                Ok(response) => {
                    tracing::warn!(%url, status = response.status().as_u16(), "Health check failed");
                }
                Err(e) => {
                    tracing::warn!(%url, error = %e, "Health check failed");
                }
            }
        }
        false
    }
}
