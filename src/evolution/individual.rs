//! The unit of evolution and population helpers.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::schema::SeedVocabulary;

/// An encoding with its cached fitness.
///
/// `fitness == None` marks the score as stale: it must be recomputed before
/// the individual takes part in selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    /// SMILES encoding.
    pub encoding: String,
    /// Cached score.
    pub fitness: Option<f64>,
}

impl Individual {
    /// Create an unevaluated individual.
    pub fn new(encoding: impl Into<String>) -> Self {
        Self {
            encoding: encoding.into(),
            fitness: None,
        }
    }

    /// Create an individual with a known score.
    pub fn with_fitness(encoding: impl Into<String>, fitness: f64) -> Self {
        Self {
            encoding: encoding.into(),
            fitness: Some(fitness),
        }
    }

    #[inline]
    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    /// Mark the cached score stale.
    pub fn invalidate(&mut self) {
        self.fitness = None;
    }
}

/// Draw `size` individuals from the vocabulary, uniformly with replacement.
pub fn random_population<R: Rng + ?Sized>(
    vocabulary: &SeedVocabulary,
    size: usize,
    rng: &mut R,
) -> Vec<Individual> {
    (0..size)
        .filter_map(|_| vocabulary.draw(rng).map(Individual::new))
        .collect()
}

/// Highest-fitness individual; the first one wins ties. Stale individuals are skipped.
pub fn best_individual(population: &[Individual]) -> Option<&Individual> {
    let mut best: Option<(&Individual, f64)> = None;
    for individual in population {
        let Some(fitness) = individual.fitness else {
            continue;
        };
        match best {
            Some((_, best_fitness)) if fitness <= best_fitness => {}
            _ => best = Some((individual, fitness)),
        }
    }
    best.map(|(individual, _)| individual)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_new_is_stale() {
        let mut ind = Individual::with_fitness("CCO", 1.2);
        assert!(ind.is_evaluated());
        ind.invalidate();
        assert!(!ind.is_evaluated());
        assert!(!Individual::new("CCO").is_evaluated());
    }

    #[test]
    fn test_random_population_draws_from_vocabulary() {
        let vocab = SeedVocabulary::default();
        let mut rng = StdRng::seed_from_u64(11);
        let population = random_population(&vocab, 50, &mut rng);

        assert_eq!(population.len(), 50);
        for ind in &population {
            assert!(vocab.iter().any(|s| s == ind.encoding));
            assert!(!ind.is_evaluated());
        }
    }

    #[test]
    fn test_random_population_is_reproducible() {
        let vocab = SeedVocabulary::default();
        let a = random_population(&vocab, 20, &mut StdRng::seed_from_u64(5));
        let b = random_population(&vocab, 20, &mut StdRng::seed_from_u64(5));
        assert_eq!(a, b);
    }

    #[test]
    fn test_best_individual_first_wins_ties() {
        let population = vec![
            Individual::with_fitness("A", 0.5),
            Individual::with_fitness("B", 1.5),
            Individual::new("C"),
            Individual::with_fitness("D", 1.5),
        ];
        assert_eq!(best_individual(&population).unwrap().encoding, "B");
    }

    #[test]
    fn test_best_individual_of_empty() {
        assert!(best_individual(&[]).is_none());
        assert!(best_individual(&[Individual::new("C")]).is_none());
    }
}
