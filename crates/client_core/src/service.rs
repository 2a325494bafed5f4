//! Network side of a submission: the prediction endpoint and its failure modes.

use async_trait::async_trait;
use reqwest::{header::ACCEPT, Client, StatusCode};
use shared::{
    error::ErrorBody,
    protocol::{HealthResponse, Interpretation, PredictionResponse},
};
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

use crate::validator::ValidatedInput;

const PREDICT_PATH: &str = "/predict";
const HEALTH_PATH: &str = "/health";
const JSON_MEDIA_TYPE: &str = "application/json";

/// A successful prediction, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub trunk_fat_percentage: f64,
    pub interpretation: Interpretation,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("网络请求失败: {0}")]
    Network(String),
    #[error("{message}")]
    Http { status: u16, message: String },
    #[error("{0}")]
    Business(String),
}

impl SubmitError {
    pub fn kind(&self) -> &'static str {
        match self {
            SubmitError::Network(_) => "network",
            SubmitError::Http { .. } => "http",
            SubmitError::Business(_) => "business",
        }
    }
}

pub fn http_fallback_message(status: u16) -> String {
    format!("服务器错误 (HTTP {status})")
}

const BUSINESS_FALLBACK_MESSAGE: &str = "预测失败";

/// Interprets a decoded reply that arrived with an OK status.
pub fn interpret_response(response: PredictionResponse) -> Result<Prediction, SubmitError> {
    if !response.success {
        return Err(SubmitError::Business(
            response
                .error
                .unwrap_or_else(|| BUSINESS_FALLBACK_MESSAGE.to_string()),
        ));
    }

    match (response.trunk_fat_percentage, response.interpretation) {
        (Some(trunk_fat_percentage), Some(interpretation)) => Ok(Prediction {
            trunk_fat_percentage,
            interpretation,
        }),
        (None, _) => Err(SubmitError::Network(
            "malformed reply: missing trunk_fat_percentage".to_string(),
        )),
        (_, None) => Err(SubmitError::Network(
            "malformed reply: missing interpretation".to_string(),
        )),
    }
}

#[async_trait]
pub trait PredictionService: Send + Sync {
    async fn predict(&self, input: &ValidatedInput) -> Result<Prediction, SubmitError>;
}

pub struct HttpPredictionClient {
    http: Client,
    base_url: Url,
}

impl HttpPredictionClient {
    pub fn new(base_url: Url) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, SubmitError> {
        self.base_url
            .join(path)
            .map_err(|err| SubmitError::Network(format!("invalid endpoint {path}: {err}")))
    }

    /// Probes `GET /health`.
    pub async fn health(&self) -> Result<HealthResponse, SubmitError> {
        let url = self.endpoint(HEALTH_PATH)?;
        let response = self
            .http
            .get(url)
            .header(ACCEPT, JSON_MEDIA_TYPE)
            .send()
            .await
            .map_err(|err| SubmitError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(http_error(status, response).await);
        }

        response
            .json::<HealthResponse>()
            .await
            .map_err(|err| SubmitError::Network(format!("malformed reply: {err}")))
    }
}

async fn http_error(status: StatusCode, response: reqwest::Response) -> SubmitError {
    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.error)
        .unwrap_or_else(|| http_fallback_message(status.as_u16()));
    SubmitError::Http {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl PredictionService for HttpPredictionClient {
    async fn predict(&self, input: &ValidatedInput) -> Result<Prediction, SubmitError> {
        let url = self.endpoint(PREDICT_PATH)?;
        let payload = input.to_request();
        debug!(%url, gender = %payload.gender, "sending prediction request");

        let response = self
            .http
            .post(url)
            .header(ACCEPT, JSON_MEDIA_TYPE)
            .json(&payload)
            .send()
            .await
            .map_err(|err| {
                warn!(error = %err, "prediction request failed in transport");
                SubmitError::Network(err.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let err = http_error(status, response).await;
            warn!(status = status.as_u16(), error = %err, "prediction endpoint returned error status");
            return Err(err);
        }

        let body: PredictionResponse = response
            .json()
            .await
            .map_err(|err| SubmitError::Network(format!("malformed reply: {err}")))?;
        let prediction = interpret_response(body).inspect_err(|err| {
            warn!(kind = err.kind(), error = %err, "prediction reply rejected");
        })?;
        info!(
            trunk_fat_percentage = prediction.trunk_fat_percentage,
            risk_level = %prediction.interpretation.risk_level,
            "prediction received"
        );
        Ok(prediction)
    }
}

#[cfg(test)]
#[path = "tests/service_tests.rs"]
mod tests;
