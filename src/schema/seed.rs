//! Seed vocabulary for initializing the population.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Fixed set of starter SMILES encodings.
///
/// Serialized as a plain JSON array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeedVocabulary {
    encodings: Vec<String>,
}

impl Default for SeedVocabulary {
    fn default() -> Self {
        Self::new(["CCCO", "CCCC", "CC(=O)", "C=C(C)", "CCN(C)"])
    }
}

impl SeedVocabulary {
    /// Create a vocabulary from any collection of encodings.
    pub fn new<I, S>(encodings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            encodings: encodings.into_iter().map(Into::into).collect(),
        }
    }

    /// Number of starter encodings.
    pub fn len(&self) -> usize {
        self.encodings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encodings.is_empty()
    }

    /// Iterate over the starter encodings.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.encodings.iter().map(String::as_str)
    }

    /// Draw one encoding uniformly at random. `None` when empty.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        self.encodings.choose(rng).map(String::as_str)
    }
}
