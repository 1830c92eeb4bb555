use crate::client::PredictionBackend;
use crate::domain::prediction::PredictionRecord;
use crate::flow::{FetchEvent, FetchState};

pub const HISTORY_FAILED: &str = "Failed to load prediction history";

#[derive(Debug, Default)]
pub struct HistoryFlow {
    state: FetchState<Vec<PredictionRecord>>,
}

impl HistoryFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FetchState<Vec<PredictionRecord>> {
        &self.state
    }

    /// Fetches the recent listing once; later calls are no-ops.
    pub async fn load_recent(&mut self, backend: &dyn PredictionBackend) {
        if !self.state.is_loading() {
            return;
        }

        let event = match backend.recent_predictions().await {
            Ok(records) => {
                tracing::info!(count = records.len(), "loaded prediction history");
                FetchEvent::FetchSucceeded(records)
            }
            Err(err) => {
                tracing::warn!(error = %err, "error fetching predictions");
                FetchEvent::FetchFailed(HISTORY_FAILED.to_string())
            }
        };
        self.state = std::mem::take(&mut self.state).reduce(event);
    }
}
