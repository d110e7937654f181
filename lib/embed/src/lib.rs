//! # fieldmatch Embed
//!
//! Embedding providers: the seam between the matching core and whatever
//! model turns descriptions into vectors.
//!
//! - [`EmbeddingProvider`] - text batch → vector batch, order preserving
//! - [`HashingEmbedder`] - deterministic, offline, lexical
//! - [`HttpEmbedder`] - a sentence-embedding model behind an HTTP endpoint
//! - [`build_provider`] - constructs a provider from [`EmbedderConfig`]
//!
//! ## Example
//!
//! ```rust
//! use fieldmatch_embed::{build_provider, EmbedderConfig, EmbeddingProvider};
//!
//! let provider = build_provider(&EmbedderConfig::hashing(128)).unwrap();
//! let vectors = provider.embed(&["user email address".to_string()]).unwrap();
//! assert_eq!(vectors[0].dim(), 128);
//! ```

pub mod config;
pub mod device;
pub mod hashing;
pub mod http;
pub mod provider;

pub use config::{build_provider, EmbedderConfig, ProviderKind, DEFAULT_COSINE_MODEL, DEFAULT_PROJECTED_MODEL};
pub use device::Device;
pub use hashing::{HashingEmbedder, DEFAULT_HASHING_DIM};
pub use http::{ApiFormat, HttpEmbedder};
pub use provider::{EmbeddingProvider, ProviderInfo};
