use crate::domain::model_info::{FeatureImportance, ModelInfo};
use crate::domain::prediction::{PredictionRecord, PredictionRequest, RecordId};
use serde::Deserialize;
use std::collections::BTreeSet;

/// Form input as typed so far. Numeric fields are `None` until they hold a parsable number.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDraft {
    pub hour: Option<f64>,
    pub load: Option<f64>,
    pub temperature: Option<f64>,
    pub weekend: bool,
    pub holiday: bool,
}

impl Default for RequestDraft {
    fn default() -> Self {
        Self {
            hour: Some(12.0),
            load: Some(15000.0),
            temperature: Some(25.0),
            weekend: false,
            holiday: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Missing { field: &'static str },

    #[error("Hour must be a whole number (got {hour})")]
    FractionalHour { hour: f64 },

    #[error("Hour must be between 0 and 23")]
    HourOutOfRange { hour: f64 },

    #[error("Load must be a non-negative number of megawatts")]
    NegativeLoad { load: f64 },

    #[error("Temperature must be a finite number")]
    NonFiniteTemperature,
}

impl RequestDraft {
    pub fn validate_and_into_request(&self) -> Result<PredictionRequest, ValidationError> {
        let hour = self.hour.ok_or(ValidationError::Missing { field: "Hour" })?;
        let load = self.load.ok_or(ValidationError::Missing { field: "Load" })?;
        let temperature = self
            .temperature
            .ok_or(ValidationError::Missing { field: "Temperature" })?;

        if !(0.0..=23.0).contains(&hour) {
            return Err(ValidationError::HourOutOfRange { hour });
        }
        if hour.fract() != 0.0 {
            return Err(ValidationError::FractionalHour { hour });
        }
        if !load.is_finite() || load < 0.0 {
            return Err(ValidationError::NegativeLoad { load });
        }
        if !temperature.is_finite() {
            return Err(ValidationError::NonFiniteTemperature);
        }

        Ok(PredictionRequest {
            hour: hour as u8,
            load,
            temperature,
            weekend: self.weekend,
            holiday: self.holiday,
        })
    }
}

/// Recent-predictions listings must not repeat an id.
pub fn validate_listing(records: &[PredictionRecord]) -> anyhow::Result<()> {
    let mut seen = BTreeSet::<&RecordId>::new();
    for record in records {
        anyhow::ensure!(
            seen.insert(&record.id),
            "duplicate prediction id in listing: {}",
            record.id
        );
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireModelInfoResponse {
    #[serde(default)]
    pub model_info: Option<WireModelInfo>,
    #[serde(default)]
    pub training_data_source: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireModelInfo {
    #[serde(default)]
    pub regressor_type: Option<String>,
    #[serde(default)]
    pub model_type: Option<String>,
    #[serde(default)]
    pub n_estimators: Option<u64>,
    #[serde(default)]
    pub max_depth: Option<u64>,
    #[serde(default)]
    pub feature_importance: Option<FeatureImportance>,
    #[serde(default)]
    pub hyperparameters: Option<WireHyperparameters>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireHyperparameters {
    #[serde(default)]
    pub n_estimators: Option<u64>,
    #[serde(default)]
    pub max_depth: Option<u64>,
}

impl WireModelInfoResponse {
    pub fn validate_and_into_model_info(self) -> anyhow::Result<ModelInfo> {
        let training_data_source = self
            .training_data_source
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let Some(info) = self.model_info else {
            return Ok(ModelInfo {
                regressor_type: None,
                n_estimators: None,
                max_depth: None,
                training_data_source,
                feature_importance: FeatureImportance::Unavailable,
            });
        };

        let feature_importance = info
            .feature_importance
            .unwrap_or(FeatureImportance::Unavailable);
        if let FeatureImportance::Weights(weights) = &feature_importance {
            for w in weights {
                anyhow::ensure!(
                    (0.0..=1.0).contains(&w.weight),
                    "feature importance for {} must be between 0 and 1 (got {})",
                    w.feature,
                    w.weight
                );
            }
        }

        let hyper = info.hyperparameters.as_ref();
        let regressor_type = info
            .regressor_type
            .or(info.model_type)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(ModelInfo {
            regressor_type,
            n_estimators: info.n_estimators.or(hyper.and_then(|h| h.n_estimators)),
            max_depth: info.max_depth.or(hyper.and_then(|h| h.max_depth)),
            training_data_source,
            feature_importance,
        })
    }
}
