//! # fieldmatch
//!
//! Recommends which API methods can populate which schema fields by
//! comparing embeddings of their natural-language descriptions.
//!
//! Every field description and every API description is embedded, every
//! field is scored against every API, and each field is assigned to the
//! API (or top-k APIs) whose score clears a threshold. The result is a map
//! from API name to the fields it can serve.
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! fieldmatch --input request.json --threshold 0.5
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use fieldmatch::prelude::*;
//!
//! let request = MatchRequest::from_json(r#"{
//!     "fieldDescriptions": {
//!         "email": "user email address",
//!         "age": "user age in years"
//!     },
//!     "apiMethods": [
//!         {"Name": "GetEmail", "Description": "retrieves the email address of a user"},
//!         {"Name": "GetAge", "Description": "retrieves the age of a user"}
//!     ]
//! }"#).unwrap();
//!
//! let config = RecommenderConfig::cosine().with_threshold(0.5);
//! let recommender = Recommender::new(HashingEmbedder::default(), config).unwrap();
//! let recommendations = recommender.recommend(&request).unwrap();
//!
//! assert_eq!(recommendations.get("GetEmail").unwrap()[0].field, "email");
//! println!("{}", recommendations.to_json_pretty().unwrap());
//! ```
//!
//! ## Crate Structure
//!
//! - `fieldmatch-core` - Vectors, the input model and the error type
//! - `fieldmatch-embed` - Embedding providers (hashing, HTTP) and device selection
//! - `fieldmatch-matcher` - Similarity matrix, selection, aggregation, output

pub mod config;

pub use config::{AppConfig, Overrides};

// Re-export core types
pub use fieldmatch_core::{
    ApiMethod, FieldDescriptions, MatchRequest,
    Vector, cosine_similarity,
    Error, Result,
};

// Re-export embedding providers
pub use fieldmatch_embed::{
    build_provider, ApiFormat, Device, EmbedderConfig, EmbeddingProvider,
    HashingEmbedder, HttpEmbedder, ProviderInfo, ProviderKind,
};

// Re-export matching pipeline
pub use fieldmatch_matcher::{
    Recommendation, Recommendations, Recommender, RecommenderConfig,
    Scorer, SelectionPolicy, SimilarityMatrix, StrategyKind,
};

pub mod prelude {
    pub use crate::{
        AppConfig, MatchRequest, ApiMethod, FieldDescriptions, Vector,
        EmbeddingProvider, HashingEmbedder, EmbedderConfig, Device, build_provider,
        Recommender, RecommenderConfig, Recommendations, StrategyKind,
        Error, Result,
    };
}
