//! Embedding provider seam.

use crate::device::Device;
use fieldmatch_core::{Result, Vector};
use serde::Serialize;

/// Description of a provider instance, for logs and diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderInfo {
    /// Backend name ("hashing", "http", ...).
    pub name: String,

    /// Model identifier the backend embeds with.
    pub model: String,

    /// Output dimension, when known before the first call.
    pub dimension: Option<usize>,

    /// Device the backend was configured for.
    pub device: Device,
}

/// Maps text to fixed-length vectors.
///
/// Implementations must be deterministic for a fixed model, return exactly
/// one vector per input text, and preserve input order. An empty batch must
/// return an empty result.
pub trait EmbeddingProvider: Send + Sync {
    fn info(&self) -> ProviderInfo;

    /// Embed a batch of texts.
    fn embed(&self, texts: &[String]) -> Result<Vec<Vector>>;
}

impl<P: EmbeddingProvider + ?Sized> EmbeddingProvider for Box<P> {
    fn info(&self) -> ProviderInfo {
        (**self).info()
    }

    fn embed(&self, texts: &[String]) -> Result<Vec<Vector>> {
        (**self).embed(texts)
    }
}

impl<P: EmbeddingProvider + ?Sized> EmbeddingProvider for std::sync::Arc<P> {
    fn info(&self) -> ProviderInfo {
        (**self).info()
    }

    fn embed(&self, texts: &[String]) -> Result<Vec<Vector>> {
        (**self).embed(texts)
    }
}
