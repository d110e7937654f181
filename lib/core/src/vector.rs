use serde::{Deserialize, Serialize};

/// An embedding produced by an embedding provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Vector {
    data: Vec<f32>,
}

impl Vector {
    #[inline]
    #[must_use]
    pub fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    #[inline]
    #[must_use]
    pub fn from_slice(data: &[f32]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// True when every component is a finite number
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|x| x.is_finite())
    }

    /// Euclidean norm, accumulated in double precision
    #[inline]
    pub fn norm(&self) -> f64 {
        norm(&self.data)
    }

    /// Cosine similarity with another vector, clamped to [-1, 1]
    ///
    /// Returns 0.0 for mismatched dimensions or a zero-norm operand.
    #[inline]
    pub fn cosine_similarity(&self, other: &Vector) -> f64 {
        cosine_similarity(&self.data, &other.data)
    }

    /// Normalize the vector to unit length
    #[inline]
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > f64::from(f32::EPSILON) {
            for x in &mut self.data {
                *x = (f64::from(*x) / norm) as f32;
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut v = self.clone();
        v.normalize();
        v
    }
}

impl From<Vec<f32>> for Vector {
    fn from(data: Vec<f32>) -> Self {
        Self::new(data)
    }
}

/// Dot product of two equal-length slices in double precision
#[inline]
pub fn dot(a: &[f32], b: &[f32]) -> f64 {
    // Two accumulators for better pipelining
    let mut sum1 = 0.0f64;
    let mut sum2 = 0.0f64;
    let mut chunks_a = a.chunks_exact(2);
    let mut chunks_b = b.chunks_exact(2);
    for (x, y) in (&mut chunks_a).zip(&mut chunks_b) {
        sum1 += f64::from(x[0]) * f64::from(y[0]);
        sum2 += f64::from(x[1]) * f64::from(y[1]);
    }
    for (x, y) in chunks_a.remainder().iter().zip(chunks_b.remainder()) {
        sum1 += f64::from(*x) * f64::from(*y);
    }
    sum1 + sum2
}

#[inline]
pub fn norm(v: &[f32]) -> f64 {
    dot(v, v).sqrt()
}

/// Cosine similarity: dot product over the product of Euclidean norms
#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }

    let norm_a = norm(a);
    let norm_b = norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot(a, b) / (norm_a * norm_b)).clamp(-1.0, 1.0)
}
