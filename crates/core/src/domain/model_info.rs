use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct ModelInfo {
    pub regressor_type: Option<String>,
    pub n_estimators: Option<u64>,
    pub max_depth: Option<u64>,
    pub training_data_source: Option<String>,
    pub feature_importance: FeatureImportance,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeatureImportance {
    Unavailable,
    /// Weights in the order the service listed them.
    Weights(Vec<FeatureWeight>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureWeight {
    pub feature: String,
    pub weight: f64,
}

impl<'de> Deserialize<'de> for FeatureImportance {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(FeatureImportanceVisitor)
    }
}

struct FeatureImportanceVisitor;

impl<'de> Visitor<'de> for FeatureImportanceVisitor {
    type Value = FeatureImportance;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of feature weights or an \"unavailable\" marker string")
    }

    // Any string is a marker; the service sends "Not available".
    fn visit_str<E>(self, _v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(FeatureImportance::Unavailable)
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(FeatureImportance::Unavailable)
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut weights = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((feature, weight)) = map.next_entry::<String, f64>()? {
            weights.push(FeatureWeight { feature, weight });
        }
        Ok(FeatureImportance::Weights(weights))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServiceHealth {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub model_loaded: bool,
}
