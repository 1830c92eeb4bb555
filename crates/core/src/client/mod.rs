pub mod error;
pub mod http;

use crate::client::error::FlowError;
use crate::domain::model_info::{ModelInfo, ServiceHealth};
use crate::domain::prediction::{PredictionRecord, PredictionRequest, PredictionResult};

/// The REST backend that computes and stores predictions.
#[async_trait::async_trait]
pub trait PredictionBackend: Send + Sync {
    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResult, FlowError>;

    async fn recent_predictions(&self) -> Result<Vec<PredictionRecord>, FlowError>;
}

/// The model-serving endpoint's metadata routes.
#[async_trait::async_trait]
pub trait ModelInfoSource: Send + Sync {
    async fn model_info(&self) -> Result<ModelInfo, FlowError>;

    async fn health(&self) -> Result<ServiceHealth, FlowError>;
}
