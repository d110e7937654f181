//! Fixed feature projection for the projected scoring strategy
//!
//! A stack of dense layers with rectified-linear activations that reduces an
//! embedding to a smaller feature vector before cosine scoring. The weights
//! are drawn once from a seeded uniform distribution and never fit to data,
//! so the projection is an arbitrary fixed map: projected scores are not
//! expected to rank better than plain cosine similarity.
//!
//! The layer widths are fixed (512, 256, then 128 by default) whatever the
//! input width. Embeddings narrower than the first hidden layer, such as the
//! 384-wide hashing embedder output, are widened before being reduced; only
//! the final width is guaranteed.

use fieldmatch_core::{Error, Result, Vector};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

pub const DEFAULT_HIDDEN_DIMS: [usize; 2] = [512, 256];
pub const DEFAULT_OUTPUT_DIM: usize = 128;
pub const DEFAULT_PROJECTION_SEED: u64 = 42;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectionConfig {
    /// Widths of the hidden layers, in order
    pub hidden: Vec<usize>,
    /// Width of the final feature vector
    pub output: usize,
    pub seed: u64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            hidden: DEFAULT_HIDDEN_DIMS.to_vec(),
            output: DEFAULT_OUTPUT_DIM,
            seed: DEFAULT_PROJECTION_SEED,
        }
    }
}

impl ProjectionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.output == 0 || self.hidden.contains(&0) {
            return Err(Error::InvalidConfig("projection layer widths must be positive".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct Dense {
    input: usize,
    output: usize,
    /// Row-major `output x input`
    weights: Vec<f64>,
    bias: Vec<f64>,
}

impl Dense {
    /// Uniform(-1/sqrt(fan_in), 1/sqrt(fan_in)) for weights and bias
    fn seeded(input: usize, output: usize, rng: &mut StdRng) -> Self {
        let bound = 1.0 / (input as f64).sqrt();
        let weights = (0..input * output).map(|_| rng.random_range(-bound..bound)).collect();
        let bias = (0..output).map(|_| rng.random_range(-bound..bound)).collect();
        Self { input, output, weights, bias }
    }

    fn forward_relu(&self, x: &[f64]) -> Vec<f64> {
        self.weights
            .chunks_exact(self.input)
            .zip(&self.bias)
            .map(|(row, b)| {
                let sum: f64 = row.iter().zip(x).map(|(w, v)| w * v).sum::<f64>() + b;
                sum.max(0.0)
            })
            .collect()
    }
}

/// Seeded stack of `relu(W x + b)` layers
#[derive(Debug, Clone)]
pub struct Projection {
    layers: Vec<Dense>,
}

impl Projection {
    /// Build the layers for embeddings of width `input_dim`
    pub fn seeded(input_dim: usize, config: &ProjectionConfig) -> Result<Self> {
        config.validate()?;
        if input_dim == 0 {
            return Err(Error::InvalidConfig("projection input width must be positive".into()));
        }

        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut layers = Vec::with_capacity(config.hidden.len() + 1);
        let mut input = input_dim;
        for &output in config.hidden.iter().chain(std::iter::once(&config.output)) {
            layers.push(Dense::seeded(input, output, &mut rng));
            input = output;
        }

        Ok(Self { layers })
    }

    pub fn input_dim(&self) -> usize {
        self.layers.first().map_or(0, |l| l.input)
    }

    pub fn output_dim(&self) -> usize {
        self.layers.last().map_or(0, |l| l.output)
    }

    /// Project one embedding; the caller guarantees `v.dim() == input_dim()`
    pub fn project(&self, v: &Vector) -> Vector {
        let mut x: Vec<f64> = v.as_slice().iter().map(|&c| f64::from(c)).collect();
        for layer in &self.layers {
            x = layer.forward_relu(&x);
        }
        Vector::new(x.into_iter().map(|c| c as f32).collect())
    }
}
