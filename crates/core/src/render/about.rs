use crate::domain::model_info::{FeatureImportance, FeatureWeight, ModelInfo, ServiceHealth};
use crate::flow::FetchState;
use std::fmt;

pub const DEFAULT_REGRESSOR: &str = "Random Forest Regressor";
pub const DEFAULT_ESTIMATORS: &str = "100";
pub const DEFAULT_MAX_DEPTH: &str = "Optimal depth determined automatically";
pub const DEFAULT_TRAINING_SOURCE: &str = "Historical and synthetic data";
pub const IMPORTANCE_UNAVAILABLE: &str = "Feature importance information not available";

#[derive(Debug, Clone, PartialEq)]
pub struct ModelDetails {
    pub regressor_type: String,
    pub n_estimators: String,
    pub max_depth: String,
    pub training_data_source: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeatureImportanceView {
    Notice,
    /// `(feature, "12.34%")`, highest weight first.
    Ranked(Vec<(String, String)>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum AboutView {
    Loading,
    Warning(String),
    Model {
        details: ModelDetails,
        features: FeatureImportanceView,
    },
}

pub fn model_details(info: &ModelInfo) -> ModelDetails {
    ModelDetails {
        regressor_type: info
            .regressor_type
            .clone()
            .unwrap_or_else(|| DEFAULT_REGRESSOR.to_string()),
        n_estimators: info
            .n_estimators
            .map(|n| n.to_string())
            .unwrap_or_else(|| DEFAULT_ESTIMATORS.to_string()),
        max_depth: info
            .max_depth
            .map(|d| d.to_string())
            .unwrap_or_else(|| DEFAULT_MAX_DEPTH.to_string()),
        training_data_source: info
            .training_data_source
            .clone()
            .unwrap_or_else(|| DEFAULT_TRAINING_SOURCE.to_string()),
    }
}

/// Descending by weight. The sort is stable, so equal weights keep payload order.
pub fn ranked_features(weights: &[FeatureWeight]) -> Vec<(String, String)> {
    let mut sorted: Vec<&FeatureWeight> = weights.iter().collect();
    sorted.sort_by(|a, b| b.weight.total_cmp(&a.weight));
    sorted
        .into_iter()
        .map(|w| (w.feature.clone(), format!("{:.2}%", w.weight * 100.0)))
        .collect()
}

pub fn feature_importance_view(importance: &FeatureImportance) -> FeatureImportanceView {
    match importance {
        FeatureImportance::Weights(weights) => FeatureImportanceView::Ranked(ranked_features(weights)),
        FeatureImportance::Unavailable => FeatureImportanceView::Notice,
    }
}

pub fn about_view(state: &FetchState<ModelInfo>) -> AboutView {
    match state {
        FetchState::Loading => AboutView::Loading,
        FetchState::Errored(message) => AboutView::Warning(message.clone()),
        FetchState::Loaded(info) => AboutView::Model {
            details: model_details(info),
            features: feature_importance_view(&info.feature_importance),
        },
    }
}

impl fmt::Display for AboutView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Machine Learning Model")?;
        match self {
            AboutView::Loading => writeln!(f, "Loading model information...")?,
            AboutView::Warning(message) => writeln!(f, "[warning] {message}")?,
            AboutView::Model { details, .. } => {
                writeln!(f, "{}", details.regressor_type)?;
                writeln!(f, "Training Data Source: {}", details.training_data_source)?;
                writeln!(f, "Estimators: {}", details.n_estimators)?;
                writeln!(f, "Max Depth: {}", details.max_depth)?;
            }
        }

        writeln!(f)?;
        writeln!(f, "Feature Importance")?;
        match self {
            AboutView::Loading => writeln!(f, "Loading feature importance..."),
            AboutView::Warning(message) => writeln!(f, "[warning] {message}"),
            AboutView::Model {
                features: FeatureImportanceView::Notice,
                ..
            } => writeln!(f, "[info] {IMPORTANCE_UNAVAILABLE}"),
            AboutView::Model {
                features: FeatureImportanceView::Ranked(rows),
                ..
            } => {
                for (feature, pct) in rows {
                    writeln!(f, "  - {feature}: {pct}")?;
                }
                Ok(())
            }
        }
    }
}

pub fn health_line(state: &FetchState<ServiceHealth>) -> String {
    match state {
        FetchState::Loading => "Checking model service...".to_string(),
        FetchState::Errored(message) => format!("[error] {message}"),
        FetchState::Loaded(health) => {
            let loaded = if health.model_loaded {
                "model loaded"
            } else {
                "no model loaded"
            };
            match health.message.as_deref().filter(|m| !m.trim().is_empty()) {
                Some(message) => format!("Model service: {} ({loaded}) - {message}", health.status),
                None => format!("Model service: {} ({loaded})", health.status),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weight(feature: &str, weight: f64) -> FeatureWeight {
        FeatureWeight {
            feature: feature.to_string(),
            weight,
        }
    }

    fn info(feature_importance: FeatureImportance) -> ModelInfo {
        ModelInfo {
            regressor_type: None,
            n_estimators: None,
            max_depth: None,
            training_data_source: None,
            feature_importance,
        }
    }

    #[test]
    fn missing_fields_use_fallbacks() {
        let details = model_details(&info(FeatureImportance::Unavailable));
        assert_eq!(details.regressor_type, DEFAULT_REGRESSOR);
        assert_eq!(details.n_estimators, DEFAULT_ESTIMATORS);
        assert_eq!(details.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(details.training_data_source, DEFAULT_TRAINING_SOURCE);
    }

    #[test]
    fn ranks_descending_with_stable_ties() {
        let weights = [
            weight("hour", 0.2),
            weight("load", 0.45),
            weight("temperature", 0.2),
            weight("is_weekend", 0.1),
            weight("is_holiday", 0.05),
        ];
        let ranked = ranked_features(&weights);
        let names: Vec<_> = ranked.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["load", "hour", "temperature", "is_weekend", "is_holiday"]);
        assert_eq!(ranked[0].1, "45.00%");
        assert_eq!(ranked[4].1, "5.00%");

        assert_eq!(ranked_features(&weights), ranked);
    }

    #[test]
    fn unavailable_marker_renders_notice_without_list() {
        let view = about_view(&FetchState::Loaded(info(FeatureImportance::Unavailable)));
        let AboutView::Model { features, .. } = &view else {
            panic!("expected model view");
        };
        assert_eq!(features, &FeatureImportanceView::Notice);
        let text = view.to_string();
        assert!(text.contains(IMPORTANCE_UNAVAILABLE));
        assert!(!text.contains("  - "));
    }

    #[test]
    fn empty_weights_render_an_empty_list() {
        let view = about_view(&FetchState::Loaded(info(FeatureImportance::Weights(Vec::new()))));
        let AboutView::Model { features, .. } = &view else {
            panic!("expected model view");
        };
        assert_eq!(features, &FeatureImportanceView::Ranked(Vec::new()));
        let text = view.to_string();
        assert!(!text.contains(IMPORTANCE_UNAVAILABLE));
        assert!(text.trim_end().ends_with("Feature Importance"));
    }

    #[test]
    fn failure_renders_warning_in_both_sections() {
        let view = about_view(&FetchState::Errored("Unable to fetch model information".to_string()));
        let text = view.to_string();
        assert_eq!(text.matches("[warning] Unable to fetch model information").count(), 2);
    }

    #[test]
    fn health_line_formats_status() {
        let state = FetchState::Loaded(ServiceHealth {
            status: "healthy".to_string(),
            message: Some("ML service is running".to_string()),
            model_loaded: true,
        });
        assert_eq!(
            health_line(&state),
            "Model service: healthy (model loaded) - ML service is running"
        );
    }
}
