//! Drug-likeness search - evolutionary optimization over SMILES strings.
//!
//! This crate evolves a population of small-molecule SMILES encodings toward
//! a composite score: a drug-likeness estimate plus a reward for lipophilicity
//! near a target value. Crossover and mutation edit the raw strings and fall
//! back to the parent whenever the edit no longer decodes.
//!
//! # Architecture
//!
//! - `schema`: Run configuration, seed vocabulary and result types
//! - `oracle`: Decoding and descriptors (`Oracle` trait, built-in SMILES back-end)
//! - `evolution`: Individuals, fitness, variation, selection and the engine
//!
//! # Example
//!
//! ```rust,no_run
//! use druglike_evo::{EvolutionConfig, EvolutionEngine, SmilesOracle};
//!
//! let config = EvolutionConfig {
//!     population_size: 50,
//!     generations: 20,
//!     random_seed: Some(7),
//!     ..Default::default()
//! };
//!
//! let mut engine = EvolutionEngine::new(config, SmilesOracle::new())?;
//! let result = engine.run()?;
//!
//! println!("Best SMILES: {}, score: {:.3}", result.best.encoding, result.best.fitness);
//! # Ok::<(), druglike_evo::EvolutionError>(())
//! ```

pub mod evolution;
pub mod oracle;
pub mod schema;

// Re-export commonly used types
pub use evolution::{EvolutionEngine, EvolutionError, Individual};
pub use oracle::{Oracle, SmilesOracle};
pub use schema::{EvolutionConfig, EvolutionResult, SeedVocabulary};
