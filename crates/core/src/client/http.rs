use crate::client::error::FlowError;
use crate::client::{ModelInfoSource, PredictionBackend};
use crate::config::Settings;
use crate::domain::contract::{validate_listing, WireModelInfoResponse};
use crate::domain::model_info::{ModelInfo, ServiceHealth};
use crate::domain::prediction::{PredictionRecord, PredictionRequest, PredictionResult};
use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

const PREDICTIONS_PATH: &str = "/predictions";
const RECENT_PREDICTIONS_PATH: &str = "/predictions/recent";
const MODEL_INFO_PATH: &str = "/model-info";
const HEALTH_PATH: &str = "/health";

/// JSON-over-HTTP client for both the prediction backend and the model service.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: reqwest::Client,
    api_url: String,
    ml_url: String,
}

impl HttpBackend {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        Self::new(settings.api_url(), settings.ml_url(), settings.http_timeout())
    }

    pub fn new(api_url: &str, ml_url: &str, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .context("failed to build pricecast http client")?;

        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            ml_url: ml_url.trim_end_matches('/').to_string(),
        })
    }

    fn api(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    fn ml(&self, path: &str) -> String {
        format!("{}{}", self.ml_url, path)
    }

    async fn read_json<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
        what: &'static str,
    ) -> Result<T, FlowError> {
        let res = req.send().await?;
        let status = res.status();
        let text = res.text().await?;

        if !status.is_success() {
            tracing::debug!(%status, body = %text, what, "non-success response");
            return Err(FlowError::Server {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        serde_json::from_str::<T>(&text)
            .map_err(|e| FlowError::decode(format!("{what} response does not match schema: {e}")))
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()?
        .message
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
}

#[async_trait::async_trait]
impl PredictionBackend for HttpBackend {
    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResult, FlowError> {
        let req = self.http.post(self.api(PREDICTIONS_PATH)).json(request);
        self.read_json(req, "prediction").await
    }

    async fn recent_predictions(&self) -> Result<Vec<PredictionRecord>, FlowError> {
        let req = self.http.get(self.api(RECENT_PREDICTIONS_PATH));
        let records: Vec<PredictionRecord> = self.read_json(req, "recent predictions").await?;
        validate_listing(&records).map_err(FlowError::decode)?;
        Ok(records)
    }
}

#[async_trait::async_trait]
impl ModelInfoSource for HttpBackend {
    async fn model_info(&self) -> Result<ModelInfo, FlowError> {
        let req = self.http.get(self.ml(MODEL_INFO_PATH));
        let wire: WireModelInfoResponse = self.read_json(req, "model info").await?;
        wire.validate_and_into_model_info()
            .map_err(FlowError::decode)
    }

    async fn health(&self) -> Result<ServiceHealth, FlowError> {
        let req = self.http.get(self.ml(HEALTH_PATH));
        self.read_json(req, "health").await
    }
}
