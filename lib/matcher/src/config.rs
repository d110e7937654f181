//! Recommender configuration and operating-point presets

use crate::matrix::Scorer;
use crate::projection::ProjectionConfig;
use crate::select::SelectionPolicy;
use fieldmatch_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

/// Operating threshold for plain cosine scoring
pub const DEFAULT_COSINE_THRESHOLD: f64 = 0.75;

/// Operating threshold for projected scoring
pub const DEFAULT_PROJECTED_THRESHOLD: f64 = 0.80;

/// Candidates considered per field under projected scoring
pub const DEFAULT_PROJECTED_TOP_K: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    #[default]
    Cosine,
    /// Fixed, untrained projection before cosine; not expected to beat `Cosine`
    Projected,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Cosine => "cosine",
            Self::Projected => "projected",
        })
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cosine" => Ok(Self::Cosine),
            "projected" => Ok(Self::Projected),
            other => Err(format!("unknown strategy '{other}' (expected cosine or projected)")),
        }
    }
}

/// Unset keys fall back to the preset of the chosen strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "PartialRecommenderConfig")]
pub struct RecommenderConfig {
    pub strategy: StrategyKind,

    /// Minimum score for a recommendation
    pub threshold: f64,

    /// Best APIs considered per field; absent means the single best
    pub top_k: Option<NonZeroUsize>,

    /// Layer layout used by the projected strategy
    pub projection: ProjectionConfig,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PartialRecommenderConfig {
    #[serde(default)]
    strategy: StrategyKind,
    threshold: Option<f64>,
    /// Absent keeps the preset; `null` explicitly selects the single best
    #[serde(default, deserialize_with = "present")]
    top_k: Option<Option<NonZeroUsize>>,
    projection: Option<ProjectionConfig>,
}

fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl From<PartialRecommenderConfig> for RecommenderConfig {
    fn from(partial: PartialRecommenderConfig) -> Self {
        let preset = RecommenderConfig::for_strategy(partial.strategy);
        Self {
            strategy: partial.strategy,
            threshold: partial.threshold.unwrap_or(preset.threshold),
            top_k: partial.top_k.unwrap_or(preset.top_k),
            projection: partial.projection.unwrap_or(preset.projection),
        }
    }
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self::cosine()
    }
}

impl RecommenderConfig {
    pub fn cosine() -> Self {
        Self {
            strategy: StrategyKind::Cosine,
            threshold: DEFAULT_COSINE_THRESHOLD,
            top_k: None,
            projection: ProjectionConfig::default(),
        }
    }

    pub fn projected() -> Self {
        Self {
            strategy: StrategyKind::Projected,
            threshold: DEFAULT_PROJECTED_THRESHOLD,
            top_k: NonZeroUsize::new(DEFAULT_PROJECTED_TOP_K),
            projection: ProjectionConfig::default(),
        }
    }

    /// The preset operating point of a strategy
    pub fn for_strategy(strategy: StrategyKind) -> Self {
        match strategy {
            StrategyKind::Cosine => Self::cosine(),
            StrategyKind::Projected => Self::projected(),
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_top_k(mut self, top_k: Option<NonZeroUsize>) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "threshold must be a finite number, got {}",
                self.threshold
            )));
        }
        if self.strategy == StrategyKind::Projected {
            self.projection.validate()?;
        }
        Ok(())
    }

    pub fn policy(&self) -> SelectionPolicy {
        SelectionPolicy::new(self.threshold, self.top_k)
    }

    pub fn scorer(&self) -> Scorer {
        match self.strategy {
            StrategyKind::Cosine => Scorer::Cosine,
            StrategyKind::Projected => Scorer::Projected(self.projection.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let cosine = RecommenderConfig::cosine();
        assert_eq!(cosine.threshold, 0.75);
        assert_eq!(cosine.top_k, None);
        assert_eq!(cosine.scorer(), Scorer::Cosine);

        let projected = RecommenderConfig::projected();
        assert_eq!(projected.threshold, 0.80);
        assert_eq!(projected.top_k.map(NonZeroUsize::get), Some(3));
        assert!(matches!(projected.scorer(), Scorer::Projected(_)));
    }

    #[test]
    fn test_non_finite_threshold_rejected() {
        let config = RecommenderConfig::cosine().with_threshold(f64::NAN);
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
        assert!(RecommenderConfig::cosine().with_threshold(-1.0).validate().is_ok());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: RecommenderConfig =
            serde_json::from_str(r#"{"threshold": 0.5, "topK": 2}"#).unwrap();
        assert_eq!(config.strategy, StrategyKind::Cosine);
        assert_eq!(config.threshold, 0.5);
        assert_eq!(config.top_k, NonZeroUsize::new(2));
    }

    #[test]
    fn test_deserialize_strategy_preset() {
        let config: RecommenderConfig = serde_json::from_str(r#"{"strategy": "projected"}"#).unwrap();
        assert_eq!(config, RecommenderConfig::projected());

        let config: RecommenderConfig =
            serde_json::from_str(r#"{"strategy": "projected", "topK": null, "threshold": 0.6}"#).unwrap();
        assert_eq!(config.top_k, None);
        assert_eq!(config.threshold, 0.6);

        let config: RecommenderConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, RecommenderConfig::cosine());
    }

    #[test]
    fn test_serde_round_trip() {
        let config = RecommenderConfig::projected();
        let text = serde_json::to_string(&config).unwrap();
        assert!(text.contains("\"topK\":3"));
        assert_eq!(serde_json::from_str::<RecommenderConfig>(&text).unwrap(), config);
    }

    #[test]
    fn test_zero_top_k_rejected_at_parse() {
        let parsed = serde_json::from_str::<RecommenderConfig>(r#"{"topK": 0}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_strategy_parse() {
        assert_eq!("Projected".parse::<StrategyKind>().unwrap(), StrategyKind::Projected);
        assert!("learned".parse::<StrategyKind>().is_err());
    }
}
