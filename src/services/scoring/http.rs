use reqwest::{Client as HttpClient, StatusCode};
use serde_json::Value;
use std::time::Duration;

use crate::{
    error::{AppError, AppResult},
    models::{FeatureRequest, ModelResponse},
    services::scoring::ScoringModel,
};

/// Client for the external scoring service
///
/// Endpoints:
/// - `GET  {base}/health`  → any 2xx means available
/// - `POST {base}/predict` → JSON feature request in, `ModelResponse` out
#[derive(Clone)]
pub struct HttpScoringClient {
    http_client: HttpClient,
    base_url: String,
}

impl HttpScoringClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        tracing::info!(
            base_url = %base_url,
            timeout_ms = timeout.as_millis() as u64,
            "Configured scoring service client"
        );

        Ok(Self {
            http_client,
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn request_prediction(&self, features: &FeatureRequest) -> AppResult<ModelResponse> {
        let url = format!("{}/predict", self.base_url);

        let response = self.http_client.post(&url).json(features).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Scoring service returned status {}: {}",
                status, body
            )));
        }

        let body: Value = response.json().await?;
        match &body {
            Value::Object(fields) if !fields.is_empty() => {}
            _ => {
                return Err(AppError::ExternalApi(
                    "Scoring service returned an empty body".to_string(),
                ))
            }
        }

        serde_json::from_value(body).map_err(|e| {
            AppError::ExternalApi(format!("Invalid scoring service response format: {}", e))
        })
    }
}

#[async_trait::async_trait]
impl ScoringModel for HttpScoringClient {
    async fn is_available(&self) -> bool {
        let url = format!("{}/health", self.base_url);

        match self.http_client.get(&url).send().await {
            Ok(response) => {
                let available = response.status().is_success();
                tracing::debug!(status = %response.status(), available, "Scoring service health check");
                available
            }
            Err(e) => {
                tracing::warn!(error = %e, "Scoring service health check failed");
                false
            }
        }
    }

    #[tracing::instrument(skip_all)]
    async fn predict(&self, features: &FeatureRequest) -> ModelResponse {
        match self.request_prediction(features).await {
            Ok(response) => {
                tracing::info!(status = %response.status, "Received scoring service response");
                response
            }
            Err(e) => {
                tracing::error!(error = %e, "Scoring service request failed");
                ModelResponse::error(format!("Scoring service request failed: {}", e))
            }
        }
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
