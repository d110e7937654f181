//! Run configuration: an optional JSON file, then command-line overrides

use fieldmatch_core::{Error, Result};
use fieldmatch_embed::{ApiFormat, Device, EmbedderConfig, ProviderKind, DEFAULT_COSINE_MODEL, DEFAULT_PROJECTED_MODEL};
use fieldmatch_matcher::{RecommenderConfig, StrategyKind};
use serde::{Deserialize, Serialize};
use std::fs;
use std::num::NonZeroUsize;
use std::path::Path;
use tracing::debug;

/// Everything a run needs besides the input payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub embedder: EmbedderConfig,
    pub recommender: RecommenderConfig,
}

/// Values given on the command line; `None` leaves the loaded value alone
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub strategy: Option<StrategyKind>,
    pub threshold: Option<f64>,
    pub top_k: Option<usize>,
    pub seed: Option<u64>,
    pub provider: Option<ProviderKind>,
    pub model: Option<String>,
    pub endpoint: Option<String>,
    pub format: Option<ApiFormat>,
    pub device: Option<Device>,
    pub dimension: Option<usize>,
}

impl AppConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        debug!(path = %path.display(), "loaded config file");
        Self::from_json(&text)
            .map_err(|e| Error::InvalidConfig(format!("{}: {}", path.display(), e)))
    }

    /// Apply overrides and validate the result
    pub fn apply(&mut self, overrides: &Overrides) -> Result<()> {
        if let Some(strategy) = overrides.strategy {
            // A new strategy brings its own operating point
            let projection = self.recommender.projection.clone();
            self.recommender = RecommenderConfig::for_strategy(strategy);
            self.recommender.projection = projection;
            if overrides.model.is_none() {
                self.embedder.model = default_model(strategy, &self.embedder.model);
            }
        }
        if let Some(threshold) = overrides.threshold {
            self.recommender.threshold = threshold;
        }
        if let Some(k) = overrides.top_k {
            let k = NonZeroUsize::new(k)
                .ok_or_else(|| Error::InvalidConfig("top-k must be at least 1".into()))?;
            self.recommender.top_k = Some(k);
        }
        if let Some(seed) = overrides.seed {
            self.recommender.projection.seed = seed;
        }

        if let Some(provider) = overrides.provider {
            self.embedder.provider = provider;
        }
        if let Some(model) = &overrides.model {
            self.embedder.model = model.clone();
        }
        if let Some(endpoint) = &overrides.endpoint {
            self.embedder.endpoint = Some(endpoint.clone());
        }
        if let Some(format) = overrides.format {
            self.embedder.format = format;
        }
        if let Some(device) = overrides.device {
            self.embedder.device = device;
        }
        if let Some(dimension) = overrides.dimension {
            self.embedder.dimension = dimension;
        }

        self.recommender.validate()
    }
}

/// Swap between the stock models only; a custom model is left as is
fn default_model(strategy: StrategyKind, current: &str) -> String {
    match (strategy, current) {
        (StrategyKind::Projected, DEFAULT_COSINE_MODEL) => DEFAULT_PROJECTED_MODEL.to_string(),
        (StrategyKind::Cosine, DEFAULT_PROJECTED_MODEL) => DEFAULT_COSINE_MODEL.to_string(),
        _ => current.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldmatch_matcher::{DEFAULT_PROJECTED_THRESHOLD, DEFAULT_PROJECTED_TOP_K};

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(AppConfig::from_json("{}").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_strategy_override_applies_preset() {
        let mut config = AppConfig::default();
        config
            .apply(&Overrides {
                strategy: Some(StrategyKind::Projected),
                ..Overrides::default()
            })
            .unwrap();
        assert_eq!(config.recommender.threshold, DEFAULT_PROJECTED_THRESHOLD);
        assert_eq!(config.recommender.top_k.map(|k| k.get()), Some(DEFAULT_PROJECTED_TOP_K));
        assert_eq!(config.embedder.model, DEFAULT_PROJECTED_MODEL);
    }

    #[test]
    fn test_explicit_values_beat_preset() {
        let mut config = AppConfig::default();
        config
            .apply(&Overrides {
                strategy: Some(StrategyKind::Projected),
                threshold: Some(0.6),
                top_k: Some(1),
                model: Some("my-model".into()),
                seed: Some(7),
                ..Overrides::default()
            })
            .unwrap();
        assert_eq!(config.recommender.threshold, 0.6);
        assert_eq!(config.recommender.top_k.map(|k| k.get()), Some(1));
        assert_eq!(config.recommender.projection.seed, 7);
        assert_eq!(config.embedder.model, "my-model");
    }

    #[test]
    fn test_zero_top_k_rejected() {
        let mut config = AppConfig::default();
        let err = config
            .apply(&Overrides {
                top_k: Some(0),
                ..Overrides::default()
            })
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_bad_json_is_invalid_config() {
        assert!(matches!(
            AppConfig::from_json(r#"{"recommender": {"strategy": "fuzzy"}}"#),
            Err(Error::InvalidConfig(_))
        ));
    }
}
