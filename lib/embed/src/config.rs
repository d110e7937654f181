//! Embedder configuration and provider factory

use crate::device::Device;
use crate::hashing::{HashingEmbedder, DEFAULT_HASHING_DIM};
use crate::http::{ApiFormat, HttpEmbedder};
use crate::provider::EmbeddingProvider;
use fieldmatch_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Sentence-transformer model matched with plain cosine scoring
pub const DEFAULT_COSINE_MODEL: &str = "sentence-transformers/stsb-roberta-large";

/// Sentence-transformer model matched with projected scoring
pub const DEFAULT_PROJECTED_MODEL: &str = "bert-base-nli-mean-tokens";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Built-in deterministic lexical embedder
    #[default]
    Hashing,
    /// Remote embedding service
    Http,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Hashing => "hashing",
            Self::Http => "http",
        })
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hashing" => Ok(Self::Hashing),
            "http" => Ok(Self::Http),
            other => Err(format!("unknown provider '{other}' (expected hashing or http)")),
        }
    }
}

/// Selects and parameterizes the embedding backend for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmbedderConfig {
    pub provider: ProviderKind,

    /// Model identifier passed to the backend
    pub model: String,

    pub device: Device,

    /// Output dimension of the hashing embedder
    pub dimension: usize,

    /// Embedding endpoint URL for the http provider
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    pub format: ApiFormat,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_header: Option<String>,

    pub timeout_secs: u64,
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            model: DEFAULT_COSINE_MODEL.to_string(),
            device: Device::default(),
            dimension: DEFAULT_HASHING_DIM,
            endpoint: None,
            format: ApiFormat::default(),
            auth_header: None,
            timeout_secs: 60,
        }
    }
}

impl EmbedderConfig {
    pub fn hashing(dimension: usize) -> Self {
        Self {
            dimension,
            ..Self::default()
        }
    }

    pub fn http(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: ProviderKind::Http,
            model: model.into(),
            endpoint: Some(endpoint.into()),
            ..Self::default()
        }
    }
}

/// Build the provider described by `config`
pub fn build_provider(config: &EmbedderConfig) -> Result<Box<dyn EmbeddingProvider>> {
    let provider: Box<dyn EmbeddingProvider> = match config.provider {
        ProviderKind::Hashing => {
            Box::new(HashingEmbedder::new(config.dimension)?.with_device(config.device))
        }
        ProviderKind::Http => {
            let endpoint = config
                .endpoint
                .as_deref()
                .ok_or_else(|| Error::InvalidConfig("endpoint is required for the http provider".into()))?;
            if config.timeout_secs == 0 {
                return Err(Error::InvalidConfig("timeoutSecs must be positive".into()));
            }
            let mut embedder = HttpEmbedder::new(endpoint, &config.model, Duration::from_secs(config.timeout_secs))?
                .with_format(config.format)
                .with_device(config.device);
            if let Some(header) = config.auth_header.as_deref() {
                embedder = embedder.with_auth_header(header);
            }
            Box::new(embedder)
        }
    };

    let info = provider.info();
    info!(provider = %info.name, model = %info.model, device = %info.device, "embedding provider ready");
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_builds_hashing() {
        let provider = build_provider(&EmbedderConfig::default()).unwrap();
        let info = provider.info();
        assert_eq!(info.name, "hashing");
        assert_eq!(info.dimension, Some(DEFAULT_HASHING_DIM));
    }

    #[test]
    fn test_http_requires_endpoint() {
        let config = EmbedderConfig {
            provider: ProviderKind::Http,
            ..EmbedderConfig::default()
        };
        assert!(matches!(build_provider(&config), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_http_provider_info() {
        let config = EmbedderConfig::http("http://localhost:8080/v1/embeddings", DEFAULT_PROJECTED_MODEL);
        let provider = build_provider(&config).unwrap();
        let info = provider.info();
        assert_eq!(info.name, "http");
        assert_eq!(info.model, DEFAULT_PROJECTED_MODEL);
        assert_eq!(info.dimension, None);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: EmbedderConfig = serde_json::from_str(
            r#"{"provider": "http", "endpoint": "http://e", "format": "huggingface", "device": "cpu"}"#,
        )
        .unwrap();
        assert_eq!(config.provider, ProviderKind::Http);
        assert_eq!(config.format, ApiFormat::HuggingFace);
        assert_eq!(config.device, Device::Cpu);
        assert_eq!(config.model, DEFAULT_COSINE_MODEL);
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(matches!(
            build_provider(&EmbedderConfig::hashing(0)),
            Err(Error::InvalidConfig(_))
        ));
    }
}
