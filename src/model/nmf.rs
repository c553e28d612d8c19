// NMF inference with fixed components.
//
// The components matrix H (topics × features) comes from the pretrained
// model. For a new document row x, `transform` finds the non-negative topic
// weights w minimizing ½‖x − wH‖² plus the model's elastic-net penalty on w.
// H never changes, so its Gram matrix H·Hᵀ is computed once at load time.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::trace;

use super::artifacts::read_json;
use super::tfidf::SparseRow;

/// Floor for multiplicative-update denominators.
const EPSILON: f64 = f64::EPSILON;

/// Solver used to fit w against the fixed components.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Solver {
    /// Cyclic coordinate descent
    #[default]
    Cd,
    /// Multiplicative updates
    Mu,
}

/// On-disk form of `nmf.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct NmfArtifact {
    /// Topics × features, all entries non-negative
    pub components: Vec<Vec<f64>>,
    #[serde(default)]
    pub solver: Solver,
    #[serde(default)]
    pub alpha_w: f64,
    #[serde(default)]
    pub l1_ratio: f64,
    #[serde(default = "default_max_iter")]
    pub max_iter: usize,
    #[serde(default = "default_tol")]
    pub tol: f64,
}

fn default_max_iter() -> usize {
    200
}

fn default_tol() -> f64 {
    1e-4
}

/// Pretrained NMF model ready for inference.
#[derive(Debug, Clone)]
pub struct NmfModel {
    components: Vec<Vec<f64>>,
    /// H·Hᵀ, topics × topics
    gram: Vec<Vec<f64>>,
    n_features: usize,
    solver: Solver,
    l1_reg: f64,
    l2_reg: f64,
    max_iter: usize,
    tol: f64,
}

impl NmfModel {
    /// Load the model from `nmf.json`.
    pub fn load(path: &Path) -> Result<Self> {
        let artifact: NmfArtifact = read_json(path)?;
        Self::from_artifact(artifact)
            .with_context(|| format!("Invalid NMF artifact {}", path.display()))
    }

    /// Build a model from an in-memory artifact, validating its shape.
    pub fn from_artifact(artifact: NmfArtifact) -> Result<Self> {
        let n_topics = artifact.components.len();
        if n_topics == 0 {
            anyhow::bail!("components matrix has no topics");
        }
        let n_features = artifact.components[0].len();
        if n_features == 0 {
            anyhow::bail!("components matrix has no features");
        }
        for (topic, row) in artifact.components.iter().enumerate() {
            if row.len() != n_features {
                anyhow::bail!(
                    "topic {topic} has {} weights, expected {n_features}",
                    row.len()
                );
            }
            if row.iter().any(|v| !v.is_finite() || *v < 0.0) {
                anyhow::bail!("topic {topic} has negative or non-finite weights");
            }
        }
        if !(0.0..=1.0).contains(&artifact.l1_ratio) {
            anyhow::bail!("l1_ratio must be within [0, 1], got {}", artifact.l1_ratio);
        }
        if artifact.alpha_w < 0.0 {
            anyhow::bail!("alpha_w must be non-negative, got {}", artifact.alpha_w);
        }

        let gram = artifact
            .components
            .iter()
            .map(|a| artifact.components.iter().map(|b| dot(a, b)).collect())
            .collect();

        // Penalties on W scale with the number of features.
        let scaled_alpha = n_features as f64 * artifact.alpha_w;

        Ok(Self {
            components: artifact.components,
            gram,
            n_features,
            solver: artifact.solver,
            l1_reg: scaled_alpha * artifact.l1_ratio,
            l2_reg: scaled_alpha * (1.0 - artifact.l1_ratio),
            max_iter: artifact.max_iter,
            tol: artifact.tol,
        })
    }

    pub fn n_topics(&self) -> usize {
        self.components.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Topics × features weights.
    pub fn components(&self) -> &[Vec<f64>] {
        &self.components
    }

    /// Unnormalized topic weights for one document row.
    pub fn transform(&self, x: &SparseRow) -> Result<Vec<f64>> {
        if let Some(&(col, _)) = x.iter().find(|(col, _)| *col >= self.n_features) {
            anyhow::bail!(
                "row has column {col}, but the model has {} features",
                self.n_features
            );
        }

        let k = self.n_topics();
        let x_mean = x.iter().map(|(_, v)| v).sum::<f64>() / self.n_features as f64;
        let mut w = vec![(x_mean / k as f64).sqrt(); k];

        // x·Hᵀ, one entry per topic
        let xht: Vec<f64> = self
            .components
            .iter()
            .map(|h| x.iter().map(|&(col, v)| v * h[col]).sum())
            .collect();

        let iterations = match self.solver {
            Solver::Cd => self.coordinate_descent(&mut w, &xht),
            Solver::Mu => self.multiplicative_update(&mut w, &xht, x),
        };
        trace!(iterations, solver = ?self.solver, "NMF transform converged");

        Ok(w)
    }

    fn coordinate_descent(&self, w: &mut [f64], xht: &[f64]) -> usize {
        let k = w.len();
        let mut violation_init = 0.0;

        for iteration in 1..=self.max_iter {
            let mut violation = 0.0;
            for t in 0..k {
                let hess = self.gram[t][t] + self.l2_reg;
                let mut grad = self.l1_reg - xht[t];
                for r in 0..k {
                    grad += self.gram[t][r] * w[r];
                }
                grad += self.l2_reg * w[t];

                let projected = if w[t] == 0.0 { grad.min(0.0) } else { grad };
                violation += projected.abs();

                if hess != 0.0 {
                    w[t] = (w[t] - grad / hess).max(0.0);
                }
            }

            if iteration == 1 {
                violation_init = violation;
            }
            if violation_init == 0.0 || violation / violation_init <= self.tol {
                return iteration;
            }
        }
        self.max_iter
    }

    fn multiplicative_update(&self, w: &mut [f64], xht: &[f64], x: &SparseRow) -> usize {
        let x_sq: f64 = x.iter().map(|(_, v)| v * v).sum();
        let error_at_init = self.frobenius_error(w, xht, x_sq);
        if error_at_init == 0.0 {
            return 0;
        }
        let mut previous_error = error_at_init;

        for iteration in 1..=self.max_iter {
            let delta: Vec<f64> = (0..w.len())
                .map(|t| {
                    let mut denominator = dot(&self.gram[t], w) + self.l1_reg + self.l2_reg * w[t];
                    if denominator == 0.0 {
                        denominator = EPSILON;
                    }
                    xht[t] / denominator
                })
                .collect();
            for (value, d) in w.iter_mut().zip(delta) {
                *value *= d;
            }

            if self.tol > 0.0 && iteration % 10 == 0 {
                let error = self.frobenius_error(w, xht, x_sq);
                if (previous_error - error) / error_at_init < self.tol {
                    return iteration;
                }
                previous_error = error;
            }
        }
        self.max_iter
    }

    /// ‖x − wH‖ expanded so only topic-sized products are needed.
    fn frobenius_error(&self, w: &[f64], xht: &[f64], x_sq: f64) -> f64 {
        let cross = dot(w, xht);
        let reconstruction: f64 = self
            .gram
            .iter()
            .zip(w)
            .map(|(row, wi)| wi * dot(row, w))
            .sum();
        (x_sq - 2.0 * cross + reconstruction).max(0.0).sqrt()
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
