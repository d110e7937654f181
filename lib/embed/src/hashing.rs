//! Hashing Embedder
//!
//! Deterministic lexical embedding: words and their character trigrams are
//! hashed into a fixed number of buckets. Needs no model download or network,
//! so it serves offline runs and tests. It captures vocabulary overlap, not
//! meaning.

use crate::device::Device;
use crate::provider::{EmbeddingProvider, ProviderInfo};
use fieldmatch_core::{Error, Result, Vector};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use tracing::{debug, warn};

/// Default output dimension
pub const DEFAULT_HASHING_DIM: usize = 384;

const WORD_WEIGHT: f32 = 2.0;
const TRIGRAM_WEIGHT: f32 = 1.0;

/// Words that carry no signal in short API and field descriptions
const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "have", "in", "is",
    "it", "its", "of", "on", "or", "that", "the", "this", "to", "was", "were", "will", "with",
];

#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dim: usize,
    device: Device,
}

impl HashingEmbedder {
    pub fn new(dim: usize) -> Result<Self> {
        if dim == 0 {
            return Err(Error::InvalidConfig("hashing embedder dimension must be positive".into()));
        }
        Ok(Self {
            dim,
            device: Device::Cpu,
        })
    }

    /// Record the requested device; hashing always runs on the CPU.
    pub fn with_device(mut self, device: Device) -> Self {
        if device.resolve(false) == Device::Accelerator {
            warn!("hashing embedder has no accelerator backend, running on cpu");
        }
        self.device = Device::Cpu;
        self
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Embed a single text
    pub fn embed_text(&self, text: &str) -> Vector {
        let mut vector = vec![0.0f32; self.dim];

        for word in tokenize(text) {
            vector[self.bucket(&word)] += WORD_WEIGHT;
            for trigram in generate_trigrams(&word) {
                vector[self.bucket(&trigram)] += TRIGRAM_WEIGHT;
            }
        }

        let mut vector = Vector::new(vector);
        vector.normalize();
        vector
    }

    fn bucket(&self, token: &str) -> usize {
        let mut hasher = DefaultHasher::new();
        token.hash(&mut hasher);
        (hasher.finish() as usize) % self.dim
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self {
            dim: DEFAULT_HASHING_DIM,
            device: Device::Cpu,
        }
    }
}

impl EmbeddingProvider for HashingEmbedder {
    fn info(&self) -> ProviderInfo {
        ProviderInfo {
            name: "hashing".to_string(),
            model: format!("hashing-{}", self.dim),
            dimension: Some(self.dim),
            device: self.device,
        }
    }

    fn embed(&self, texts: &[String]) -> Result<Vec<Vector>> {
        debug!(texts = texts.len(), dim = self.dim, "hashing embed batch");
        Ok(texts.iter().map(|text| self.embed_text(text)).collect())
    }
}

/// Lowercased alphanumeric words with stop words removed
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty() && !STOP_WORDS.contains(word))
        .map(str::to_string)
        .collect()
}

/// Character trigrams of a space-padded word
fn generate_trigrams(s: &str) -> HashSet<String> {
    let padded = format!("  {}  ", s);
    let chars: Vec<char> = padded.chars().collect();

    chars.windows(3)
        .map(|w| w.iter().collect::<String>())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_text_same_vector() {
        let embedder = HashingEmbedder::default();
        let v1 = embedder.embed_text("user email address");
        let v2 = embedder.embed_text("user email address");
        assert_eq!(v1, v2);
        assert_eq!(v1.dim(), DEFAULT_HASHING_DIM);
        assert!((v1.norm() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_case_and_punctuation_insensitive() {
        let embedder = HashingEmbedder::default();
        let v1 = embedder.embed_text("User E-mail, Address");
        let v2 = embedder.embed_text("user e mail address");
        assert_eq!(v1, v2);
    }

    #[test]
    fn test_shared_vocabulary_scores_higher() {
        let embedder = HashingEmbedder::default();
        let field = embedder.embed_text("user email address");
        let email_api = embedder.embed_text("retrieves the email address of a user");
        let age_api = embedder.embed_text("retrieves the age of a user");
        assert!(field.cosine_similarity(&email_api) > field.cosine_similarity(&age_api));
    }

    #[test]
    fn test_stop_words_only_gives_zero_vector() {
        let embedder = HashingEmbedder::default();
        let v = embedder.embed_text("of the and");
        assert_eq!(v.norm(), 0.0);
        assert_eq!(v.dim(), DEFAULT_HASHING_DIM);
    }

    #[test]
    fn test_batch_preserves_order() {
        let embedder = HashingEmbedder::new(64).unwrap();
        let texts = vec!["alpha".to_string(), "beta".to_string(), "alpha".to_string()];
        let vectors = embedder.embed(&texts).unwrap();
        assert_eq!(vectors.len(), 3);
        assert_eq!(vectors[0], vectors[2]);
        assert_ne!(vectors[0], vectors[1]);
        assert!(embedder.embed(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(matches!(HashingEmbedder::new(0), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_device_resolves_to_cpu() {
        let embedder = HashingEmbedder::default().with_device(Device::Auto);
        assert_eq!(embedder.info().device, Device::Cpu);
    }

    #[test]
    fn test_trigram_generation() {
        let trigrams = generate_trigrams("age");
        assert!(trigrams.contains("  a"));
        assert!(trigrams.contains("age"));
        assert!(trigrams.contains("e  "));
        assert_eq!(trigrams.len(), 5);
    }
}
