//! # fieldmatch Core
//!
//! Core types shared by the fieldmatch crates:
//!
//! - [`Vector`] - An embedding with a double-precision cosine kernel
//! - [`MatchRequest`] - The input payload: field descriptions and API methods
//! - [`Error`] - The error taxonomy every stage reports through
//!
//! ## Example
//!
//! ```rust
//! use fieldmatch_core::{MatchRequest, Vector};
//!
//! let request = MatchRequest::from_json(r#"{
//!     "fieldDescriptions": {"email": "user email address"},
//!     "apiMethods": [{"Name": "GetEmail", "Description": "retrieves the email address of a user"}]
//! }"#).unwrap();
//! request.validate().unwrap();
//!
//! let a = Vector::new(vec![1.0, 0.0]);
//! let b = Vector::new(vec![1.0, 1.0]);
//! assert!((a.cosine_similarity(&b) - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-9);
//! ```

pub mod catalog;
pub mod error;
pub mod vector;

pub use catalog::{ApiMethod, FieldDescriptions, MatchRequest};
pub use error::{Error, Result};
pub use vector::{cosine_similarity, Vector};
