use crate::client::ModelInfoSource;
use crate::domain::model_info::{ModelInfo, ServiceHealth};
use crate::flow::{FetchEvent, FetchState};

pub const MODEL_INFO_FAILED: &str = "Unable to fetch model information";
pub const HEALTH_FAILED: &str = "Unable to reach the model service";

#[derive(Debug, Default)]
pub struct ModelInfoFlow {
    state: FetchState<ModelInfo>,
}

impl ModelInfoFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FetchState<ModelInfo> {
        &self.state
    }

    pub async fn load(&mut self, source: &dyn ModelInfoSource) {
        if !self.state.is_loading() {
            return;
        }

        let event = match source.model_info().await {
            Ok(info) => FetchEvent::FetchSucceeded(info),
            Err(err) => {
                tracing::warn!(error = %err, "error fetching model info");
                FetchEvent::FetchFailed(MODEL_INFO_FAILED.to_string())
            }
        };
        self.state = std::mem::take(&mut self.state).reduce(event);
    }
}

/// One-shot check of the model service's health route.
pub async fn check_health(source: &dyn ModelInfoSource) -> FetchState<ServiceHealth> {
    let event = match source.health().await {
        Ok(health) => {
            tracing::info!(status = %health.status, model_loaded = health.model_loaded, "model service health");
            FetchEvent::FetchSucceeded(health)
        }
        Err(err) => {
            tracing::warn!(error = %err, "model service health check failed");
            FetchEvent::FetchFailed(HEALTH_FAILED.to_string())
        }
    };
    FetchState::Loading.reduce(event)
}
