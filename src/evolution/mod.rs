//! Evolutionary search over SMILES encodings.
//!
//! # Overview
//!
//! - **Individuals** (`individual`): an encoding plus a cached, invalidatable fitness
//! - **Fitness** (`fitness`): composite drug-likeness score with a sentinel for invalid molecules
//! - **Variation** (`operators`): single-point crossover and point mutation that fall
//!   back to the parent whenever the edited encoding does not decode
//! - **Selection** (`selection`): tournament selection over evaluated individuals
//! - **Engine** (`search`): generational loop without elitism
//!
//! # Example
//!
//! ```rust,no_run
//! use druglike_evo::evolution::EvolutionEngine;
//! use druglike_evo::oracle::SmilesOracle;
//! use druglike_evo::schema::EvolutionConfig;
//!
//! let config = EvolutionConfig {
//!     random_seed: Some(42),
//!     ..Default::default()
//! };
//!
//! let mut engine = EvolutionEngine::new(config, SmilesOracle::new())?;
//! let result = engine.run_with_callback(|progress| {
//!     println!("Generation {}: best fitness = {:.3}",
//!         progress.generation, progress.best_fitness);
//! })?;
//!
//! println!("Best SMILES: {} ({:.3})", result.best.encoding, result.best.fitness);
//! # Ok::<(), druglike_evo::evolution::EvolutionError>(())
//! ```

mod fitness;
mod individual;
mod operators;
mod search;
mod selection;

pub use fitness::{FitnessEvaluator, SENTINEL_SCORE, composite_score};
pub use individual::{Individual, best_individual, random_population};
pub use operators::{crossover, mutate};
pub use search::EvolutionEngine;
pub use selection::{select, tournament_index};

use crate::schema::EvolutionConfigError;

/// Faults raised by the search itself, as opposed to invalid candidates.
#[derive(Debug, thiserror::Error)]
pub enum EvolutionError {
    #[error("Individual {index} was selected with stale fitness")]
    StaleFitness { index: usize },
    #[error("Cannot select from an empty population")]
    EmptyPopulation,
    #[error("Tournament size must be non-zero")]
    EmptyTournament,
    #[error("Invalid configuration: {0}")]
    Config(#[from] EvolutionConfigError),
}
