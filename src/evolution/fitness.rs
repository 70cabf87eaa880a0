//! Fitness function for drug-likeness search.

use crate::oracle::{Descriptors, Oracle};

/// Score given to encodings that do not decode.
pub const SENTINEL_SCORE: f64 = 0.0;

/// `druglikeness + (1 - |lipophilicity - target|)`.
pub fn composite_score(descriptors: &Descriptors, target_lipophilicity: f64) -> f64 {
    descriptors.druglikeness + (1.0 - (descriptors.lipophilicity - target_lipophilicity).abs())
}

/// Maps encodings to scores through an oracle.
pub struct FitnessEvaluator<O> {
    oracle: O,
    target_lipophilicity: f64,
}

impl<O: Oracle> FitnessEvaluator<O> {
    /// Create a new fitness evaluator.
    pub fn new(oracle: O, target_lipophilicity: f64) -> Self {
        Self {
            oracle,
            target_lipophilicity,
        }
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn target_lipophilicity(&self) -> f64 {
        self.target_lipophilicity
    }

    /// Score of a decodable encoding, `None` otherwise.
    pub fn score(&self, encoding: &str) -> Option<f64> {
        self.oracle
            .describe(encoding)
            .map(|d| composite_score(&d, self.target_lipophilicity))
    }

    /// Score an encoding; invalid encodings get [`SENTINEL_SCORE`].
    pub fn evaluate(&self, encoding: &str) -> f64 {
        self.score(encoding).unwrap_or(SENTINEL_SCORE)
    }
}
