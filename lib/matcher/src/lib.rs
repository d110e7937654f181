//! # fieldmatch Matcher
//!
//! Scores every schema field against every API method and turns the
//! scores into per-API recommendation lists.
//!
//! - [`SimilarityMatrix`] - field × API scores under a [`Scorer`]
//! - [`SelectionPolicy`] - threshold plus optional top-k per field
//! - [`Recommendations`] - per-API lists, deduplicated, in first-seen order
//! - [`Recommender`] - the whole pipeline over an embedding provider
//!
//! ## Example
//!
//! ```rust
//! use fieldmatch_embed::HashingEmbedder;
//! use fieldmatch_matcher::{Recommender, RecommenderConfig};
//!
//! let recommender = Recommender::new(
//!     HashingEmbedder::default(),
//!     RecommenderConfig::cosine().with_threshold(0.5),
//! ).unwrap();
//!
//! let json = recommender.recommend_json(r#"{
//!     "fieldDescriptions": {"email": "user email address"},
//!     "apiMethods": [{"Name": "GetEmail", "Description": "retrieves the email address of a user"}]
//! }"#).unwrap();
//! assert!(json.contains("GetEmail"));
//! ```

pub mod aggregate;
pub mod config;
pub mod emit;
pub mod matrix;
pub mod projection;
pub mod recommender;
pub mod select;

pub use aggregate::{aggregate, ApiRecommendations, Recommendation, Recommendations};
pub use config::{
    RecommenderConfig, StrategyKind, DEFAULT_COSINE_THRESHOLD, DEFAULT_PROJECTED_THRESHOLD,
    DEFAULT_PROJECTED_TOP_K,
};
pub use matrix::{Scorer, SimilarityMatrix};
pub use projection::{Projection, ProjectionConfig};
pub use recommender::Recommender;
pub use select::{select, Candidate, FieldSelection, SelectionPolicy};
