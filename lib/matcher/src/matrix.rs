//! Pairwise similarity between field and API embeddings

use crate::projection::{Projection, ProjectionConfig};
use fieldmatch_core::{Error, Result, Vector};
use tracing::debug;

/// How a pair of embeddings is scored
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Scorer {
    /// Cosine similarity of the raw embeddings
    #[default]
    Cosine,
    /// Cosine similarity after a fixed, untrained projection
    Projected(ProjectionConfig),
}

/// Dense F x A score table; cell (i, j) scores field i against API j
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl SimilarityMatrix {
    /// Score every field embedding against every API embedding
    pub fn build(fields: &[Vector], apis: &[Vector], scorer: &Scorer) -> Result<Self> {
        if fields.is_empty() {
            return Err(Error::EmptyInput("fieldDescriptions"));
        }
        if apis.is_empty() {
            return Err(Error::EmptyInput("apiMethods"));
        }

        let dim = fields[0].dim();
        if let Some(v) = fields.iter().chain(apis).find(|v| v.dim() != dim) {
            return Err(Error::DimensionMismatch {
                expected: dim,
                actual: v.dim(),
            });
        }

        debug!(fields = fields.len(), apis = apis.len(), dim, ?scorer, "building similarity matrix");
        match scorer {
            Scorer::Cosine => Ok(Self::cosine(fields, apis)),
            Scorer::Projected(config) => {
                let projection = Projection::seeded(dim, config)?;
                let fields: Vec<Vector> = fields.iter().map(|v| projection.project(v)).collect();
                let apis: Vec<Vector> = apis.iter().map(|v| projection.project(v)).collect();
                Ok(Self::cosine(&fields, &apis))
            }
        }
    }

    fn cosine(fields: &[Vector], apis: &[Vector]) -> Self {
        let mut data = Vec::with_capacity(fields.len() * apis.len());
        for field in fields {
            data.extend(apis.iter().map(|api| field.cosine_similarity(api)));
        }
        Self {
            rows: fields.len(),
            cols: apis.len(),
            data,
        }
    }

    /// Assemble a matrix from precomputed rows
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.is_empty() {
            return Err(Error::EmptyInput("fieldDescriptions"));
        }
        if cols == 0 {
            return Err(Error::EmptyInput("apiMethods"));
        }
        if let Some(row) = rows.iter().find(|r| r.len() != cols) {
            return Err(Error::DimensionMismatch {
                expected: cols,
                actual: row.len(),
            });
        }

        Ok(Self {
            rows: rows.len(),
            cols,
            data: rows.into_iter().flatten().collect(),
        })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    #[inline]
    pub fn row(&self, row: usize) -> Option<&[f64]> {
        if row < self.rows {
            Some(&self.data[row * self.cols..(row + 1) * self.cols])
        } else {
            None
        }
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks_exact(self.cols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(data: &[f32]) -> Vector {
        Vector::from_slice(data)
    }

    #[test]
    fn test_cosine_matrix() {
        let fields = vec![v(&[1.0, 0.0]), v(&[0.0, 1.0]), v(&[1.0, 1.0])];
        let apis = vec![v(&[2.0, 0.0]), v(&[0.0, -3.0])];
        let m = SimilarityMatrix::build(&fields, &apis, &Scorer::Cosine).unwrap();

        assert_eq!((m.rows(), m.cols()), (3, 2));
        assert!((m.get(0, 0).unwrap() - 1.0).abs() < 1e-12);
        assert!(m.get(0, 1).unwrap().abs() < 1e-12);
        assert!((m.get(1, 1).unwrap() + 1.0).abs() < 1e-12);
        assert!((m.get(2, 0).unwrap() - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-7);
        assert_eq!(m.get(3, 0), None);
        assert_eq!(m.row(2).map(<[f64]>::len), Some(2));
        assert_eq!(m.row(3), None);
        assert_eq!(m.iter_rows().count(), 3);
    }

    #[test]
    fn test_scores_in_range() {
        let fields: Vec<Vector> = (0..5).map(|i| v(&[i as f32, 1.0 - i as f32, 0.5])).collect();
        let apis: Vec<Vector> = (0..4).map(|i| v(&[0.3, i as f32, -(i as f32)])).collect();
        let m = SimilarityMatrix::build(&fields, &apis, &Scorer::Cosine).unwrap();
        assert!(m.iter_rows().flatten().all(|s| (-1.0..=1.0).contains(s)));
    }

    #[test]
    fn test_empty_dimension_rejected() {
        let fields = vec![v(&[1.0])];
        assert!(matches!(
            SimilarityMatrix::build(&fields, &[], &Scorer::Cosine),
            Err(Error::EmptyInput("apiMethods"))
        ));
        assert!(matches!(
            SimilarityMatrix::build(&[], &fields, &Scorer::Cosine),
            Err(Error::EmptyInput("fieldDescriptions"))
        ));
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let fields = vec![v(&[1.0, 0.0])];
        let apis = vec![v(&[1.0, 0.0]), v(&[1.0, 0.0, 0.0])];
        assert!(matches!(
            SimilarityMatrix::build(&fields, &apis, &Scorer::Cosine),
            Err(Error::DimensionMismatch { expected: 2, actual: 3 })
        ));
    }

    #[test]
    fn test_projected_scores_are_deterministic_and_non_negative() {
        let fields = vec![v(&[0.2, -0.4, 0.9, 0.1]), v(&[-1.0, 0.5, 0.0, 0.3])];
        let apis = vec![v(&[0.1, 0.1, 0.8, 0.0]), v(&[-0.9, 0.4, 0.1, 0.2]), v(&[0.0, -1.0, 0.0, 0.0])];
        let scorer = Scorer::Projected(ProjectionConfig::default());

        let a = SimilarityMatrix::build(&fields, &apis, &scorer).unwrap();
        let b = SimilarityMatrix::build(&fields, &apis, &scorer).unwrap();
        assert_eq!(a, b);
        // ReLU features are non-negative, so their cosine never goes below zero
        assert!(a.iter_rows().flatten().all(|s| (0.0..=1.0).contains(s)));
    }

    #[test]
    fn test_from_rows() {
        let m = SimilarityMatrix::from_rows(vec![vec![0.1, 0.2], vec![0.3, 0.4]]).unwrap();
        assert_eq!(m.get(1, 0), Some(0.3));
        assert!(matches!(
            SimilarityMatrix::from_rows(vec![vec![0.1, 0.2], vec![0.3]]),
            Err(Error::DimensionMismatch { expected: 2, actual: 1 })
        ));
        assert!(matches!(
            SimilarityMatrix::from_rows(vec![vec![]]),
            Err(Error::EmptyInput("apiMethods"))
        ));
    }
}
