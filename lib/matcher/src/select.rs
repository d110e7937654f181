//! Recommendation selection policy
//!
//! Each field row is ranked by descending score, ties going to the lower API
//! index. Without a top-k only the best column is a candidate; with a top-k
//! the K best are. Candidates below the threshold are then dropped.

use crate::matrix::SimilarityMatrix;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::cmp::Reverse;
use std::num::NonZeroUsize;

/// A selected API column for one field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub api_index: usize,
    pub score: f64,
}

/// Candidates chosen for one field, best first
pub type FieldSelection = SmallVec<[Candidate; 4]>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionPolicy {
    /// Minimum score a candidate needs to be kept
    pub threshold: f64,
    /// Number of best columns considered per field; `None` means the argmax only
    pub top_k: Option<NonZeroUsize>,
}

impl SelectionPolicy {
    pub fn new(threshold: f64, top_k: Option<NonZeroUsize>) -> Self {
        Self { threshold, top_k }
    }

    /// Candidates for one row of scores
    pub fn select_row(&self, row: &[f64]) -> FieldSelection {
        let ranked: FieldSelection = match self.top_k {
            None => argmax(row).into_iter().collect(),
            Some(k) => top_k(row, k.get()),
        };
        ranked
            .into_iter()
            .filter(|candidate| candidate.score >= self.threshold)
            .collect()
    }
}

/// Apply the policy to every field row of the matrix
pub fn select(matrix: &SimilarityMatrix, policy: &SelectionPolicy) -> Vec<FieldSelection> {
    matrix.iter_rows().map(|row| policy.select_row(row)).collect()
}

/// First occurrence of the maximum score
fn argmax(row: &[f64]) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;
    for (api_index, &score) in row.iter().enumerate() {
        if best.map_or(true, |b| score > b.score) {
            best = Some(Candidate { api_index, score });
        }
    }
    best
}

/// The `k` highest scores; the stable sort keeps ties in column order
fn top_k(row: &[f64], k: usize) -> FieldSelection {
    let mut order: Vec<usize> = (0..row.len()).collect();
    order.sort_by_key(|&j| Reverse(OrderedFloat(row[j])));
    order
        .into_iter()
        .take(k)
        .map(|api_index| Candidate {
            api_index,
            score: row[api_index],
        })
        .collect()
}
