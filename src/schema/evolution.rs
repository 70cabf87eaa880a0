//! Evolution configuration types for drug-likeness search.
//!
//! This module provides the run configuration for the evolutionary search
//! together with the progress and result types it reports.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::SeedVocabulary;

/// Top-level configuration for an evolutionary run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionConfig {
    /// Number of individuals in the population.
    #[serde(default = "default_population_size")]
    pub population_size: usize,
    /// Number of generations to run.
    #[serde(default = "default_generations")]
    pub generations: usize,
    /// Probability of applying crossover to a consecutive pair (0.0-1.0).
    #[serde(default = "default_crossover_rate")]
    pub crossover_rate: f64,
    /// Probability of mutating an individual offspring (0.0-1.0).
    #[serde(default = "default_mutation_rate")]
    pub mutation_rate: f64,
    /// Contestants per tournament.
    #[serde(default = "default_tournament_size")]
    pub tournament_size: usize,
    /// Lipophilicity the fitness function rewards proximity to.
    #[serde(default = "default_target_lipophilicity")]
    pub target_lipophilicity: f64,
    /// Starter encodings used to draw the initial population.
    #[serde(default)]
    pub seed_vocabulary: SeedVocabulary,
    /// Symbols a point mutation may write into an encoding.
    #[serde(default = "default_mutation_alphabet")]
    pub mutation_alphabet: Vec<String>,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Where to write the JSON result of a run, if anywhere.
    #[serde(default)]
    pub output_path: Option<PathBuf>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: default_population_size(),
            generations: default_generations(),
            crossover_rate: default_crossover_rate(),
            mutation_rate: default_mutation_rate(),
            tournament_size: default_tournament_size(),
            target_lipophilicity: default_target_lipophilicity(),
            seed_vocabulary: SeedVocabulary::default(),
            mutation_alphabet: default_mutation_alphabet(),
            random_seed: None,
            output_path: None,
        }
    }
}

fn default_population_size() -> usize {
    100
}
fn default_generations() -> usize {
    100
}
fn default_crossover_rate() -> f64 {
    0.5
}
fn default_mutation_rate() -> f64 {
    0.2
}
fn default_tournament_size() -> usize {
    3
}
fn default_target_lipophilicity() -> f64 {
    2.5
}

/// Atoms plus bond and branch syntax.
pub fn default_mutation_alphabet() -> Vec<String> {
    ["C", "N", "O", "Cl", "Br", "F", "(", ")", "="]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl EvolutionConfig {
    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, EvolutionConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Write this configuration as pretty JSON.
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<(), EvolutionConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

// ============================================================================
// Progress & Results
// ============================================================================

/// Descriptor pair reported for a decodable candidate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Descriptors {
    /// Drug-likeness estimate in [0, 1].
    pub druglikeness: f64,
    /// Lipophilicity estimate (logP).
    pub lipophilicity: f64,
}

/// Serializable view of a scored individual.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSnapshot {
    /// SMILES encoding.
    pub encoding: String,
    /// Fitness score.
    pub fitness: f64,
    /// Descriptors, when the encoding decodes.
    pub descriptors: Option<Descriptors>,
}

/// Progress update delivered once per generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionProgress {
    /// Generations completed so far.
    pub generation: usize,
    /// Total generations configured.
    pub total_generations: usize,
    /// Fitness evaluations performed so far.
    pub evaluations_completed: u64,
    /// Best fitness in the current population.
    pub best_fitness: f64,
    /// Mean fitness of the current population.
    pub avg_fitness: f64,
    /// Best individual of the current population.
    pub best_candidate: Option<CandidateSnapshot>,
    /// Current phase.
    pub phase: EvolutionPhase,
}

/// Evolution history for plotting.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct EvolutionHistory {
    /// Best fitness per generation.
    pub best_fitness: Vec<f64>,
    /// Average fitness per generation.
    pub avg_fitness: Vec<f64>,
    /// Standard deviation per generation.
    pub fitness_std: Vec<f64>,
    /// Fraction of the population that decodes.
    pub valid_fraction: Vec<f64>,
    /// Distinct encodings per generation.
    pub unique_encodings: Vec<usize>,
}

/// Current phase of evolution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum EvolutionPhase {
    /// Building and scoring the initial population.
    #[default]
    Initializing,
    /// Running generations.
    Evolving,
    /// All generations done.
    Complete,
}

/// Final result of an evolution run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionResult {
    /// Best individual of the final population.
    pub best: CandidateSnapshot,
    /// Statistics from the run.
    pub stats: EvolutionStats,
    /// Full history for analysis.
    pub history: EvolutionHistory,
}

impl EvolutionResult {
    /// Load a previously written result.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, EvolutionResultError> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Write the result as pretty JSON.
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<(), EvolutionResultError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Result file errors.
#[derive(Debug, thiserror::Error)]
pub enum EvolutionResultError {
    #[error("Failed to access result file: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to encode or decode result: {0}")]
    Json(#[from] serde_json::Error),
}

/// Statistics from an evolution run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionStats {
    /// Total generations run.
    pub generations: usize,
    /// Fitness-function invocations.
    pub total_evaluations: u64,
    /// Best fitness of the final population.
    pub best_fitness: f64,
    /// Average fitness of the final population.
    pub final_avg_fitness: f64,
    /// Time taken (in seconds).
    pub elapsed_seconds: f64,
    /// Evaluations per second.
    pub evaluations_per_second: f64,
}

// ============================================================================
// Validation
// ============================================================================

/// Evolution configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum EvolutionConfigError {
    #[error("Population size must be non-zero")]
    EmptyPopulation,
    #[error("Tournament size must be non-zero")]
    EmptyTournament,
    #[error("{name} must be within [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },
    #[error("Target lipophilicity must be finite, got {0}")]
    InvalidTarget(f64),
    #[error("Seed vocabulary is empty")]
    EmptyVocabulary,
    #[error("Mutation alphabet is empty or contains an empty symbol")]
    InvalidAlphabet,
    #[error("Failed to read config: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

impl EvolutionConfig {
    /// Validate evolution configuration.
    pub fn validate(&self) -> Result<(), EvolutionConfigError> {
        if self.population_size == 0 {
            return Err(EvolutionConfigError::EmptyPopulation);
        }
        if self.tournament_size == 0 {
            return Err(EvolutionConfigError::EmptyTournament);
        }

        let check_probability = |value: f64, name: &'static str| {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(EvolutionConfigError::InvalidProbability { name, value })
            }
        };
        check_probability(self.crossover_rate, "crossover_rate")?;
        check_probability(self.mutation_rate, "mutation_rate")?;

        if !self.target_lipophilicity.is_finite() {
            return Err(EvolutionConfigError::InvalidTarget(
                self.target_lipophilicity,
            ));
        }
        if self.seed_vocabulary.is_empty() {
            return Err(EvolutionConfigError::EmptyVocabulary);
        }
        if self.mutation_alphabet.is_empty() || self.mutation_alphabet.iter().any(|s| s.is_empty())
        {
            return Err(EvolutionConfigError::InvalidAlphabet);
        }

        Ok(())
    }
}
