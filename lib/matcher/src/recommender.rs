//! End-to-end matching pipeline
//!
//! ```text
//! MatchRequest ──> embed fields ──┐
//!              └─> embed APIs ────┴─> SimilarityMatrix ──> select ──> aggregate ──> Recommendations
//! ```

use crate::aggregate::{aggregate, Recommendations};
use crate::config::RecommenderConfig;
use crate::matrix::SimilarityMatrix;
use crate::select::select;
use ahash::AHashSet;
use fieldmatch_core::{Error, MatchRequest, Result, Vector};
use fieldmatch_embed::EmbeddingProvider;
use tracing::{debug, info, warn};

/// Recommends API methods for schema fields
pub struct Recommender<P = Box<dyn EmbeddingProvider>> {
    provider: P,
    config: RecommenderConfig,
}

impl<P: EmbeddingProvider> Recommender<P> {
    pub fn new(provider: P, config: RecommenderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { provider, config })
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Run the whole pipeline; any failure aborts without a partial result
    pub fn recommend(&self, request: &MatchRequest) -> Result<Recommendations> {
        request.validate()?;
        warn_on_duplicate_names(request);

        let field_names = request.field_descriptions.names();
        info!(
            fields = field_names.len(),
            apis = request.api_methods.len(),
            strategy = %self.config.strategy,
            threshold = self.config.threshold,
            top_k = self.config.top_k.map(|k| k.get()),
            "matching fields against api methods"
        );

        let field_vectors = self.embed_batch(&request.field_descriptions.descriptions(), None)?;
        let api_vectors = self.embed_batch(&request.api_descriptions(), Some(field_vectors[0].dim()))?;

        let matrix = SimilarityMatrix::build(&field_vectors, &api_vectors, &self.config.scorer())?;
        let selections = select(&matrix, &self.config.policy());
        debug!(
            selected = selections.iter().map(|s| s.len()).sum::<usize>(),
            "selection complete"
        );

        let recommendations = aggregate(&field_names, &request.api_methods, &selections);
        info!(
            apis = recommendations.len(),
            entries = recommendations.total_entries(),
            "recommendations ready"
        );
        Ok(recommendations)
    }

    /// Parse a JSON payload, match it, and return pretty JSON
    pub fn recommend_json(&self, input: &str) -> Result<String> {
        let request = MatchRequest::from_json(input)?;
        self.recommend(&request)?.to_json_pretty()
    }

    /// Embed one batch and check it against what the matrix needs
    fn embed_batch(&self, texts: &[String], expected_dim: Option<usize>) -> Result<Vec<Vector>> {
        let vectors = self.provider.embed(texts)?;
        if vectors.len() != texts.len() {
            return Err(Error::EmbeddingFailure(format!(
                "provider returned {} vectors for {} texts",
                vectors.len(),
                texts.len()
            )));
        }

        let dim = expected_dim.unwrap_or_else(|| vectors.first().map_or(0, Vector::dim));
        for (text, vector) in texts.iter().zip(&vectors) {
            if vector.is_empty() {
                return Err(Error::EmbeddingFailure(format!("empty vector for text {text:?}")));
            }
            if !vector.is_finite() {
                return Err(Error::EmbeddingFailure(format!("non-finite vector for text {text:?}")));
            }
            if vector.dim() != dim {
                return Err(Error::DimensionMismatch {
                    expected: dim,
                    actual: vector.dim(),
                });
            }
        }
        Ok(vectors)
    }
}

fn warn_on_duplicate_names(request: &MatchRequest) {
    let mut seen = AHashSet::with_capacity(request.api_methods.len());
    for api in &request.api_methods {
        if !seen.insert(api.name.as_str()) {
            warn!(api = %api.name, "api name appears more than once; entries share one result list");
        }
    }
}
