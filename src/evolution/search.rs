//! Generational evolution loop.

use std::collections::HashSet;
use std::time::Instant;

use rand::prelude::*;

use crate::oracle::Oracle;
use crate::schema::{
    CandidateSnapshot, EvolutionConfig, EvolutionHistory, EvolutionPhase, EvolutionProgress,
    EvolutionResult, EvolutionStats,
};

use super::fitness::{FitnessEvaluator, SENTINEL_SCORE};
use super::individual::{Individual, best_individual, random_population};
use super::operators::{crossover, mutate};
use super::selection::select;
use super::EvolutionError;

/// Evolution engine that runs the search.
///
/// Every generation selects parents by tournament, applies pairwise crossover
/// and per-individual mutation, scores the stale offspring and replaces the
/// population in full.
pub struct EvolutionEngine<O> {
    config: EvolutionConfig,
    rng: StdRng,
    evaluator: FitnessEvaluator<O>,
    population: Vec<Individual>,
    history: EvolutionHistory,
    generation: usize,
    evaluations: u64,
}

impl<O: Oracle> EvolutionEngine<O> {
    /// Create a new evolution engine.
    pub fn new(config: EvolutionConfig, oracle: O) -> Result<Self, EvolutionError> {
        config.validate()?;

        let rng = match config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let evaluator = FitnessEvaluator::new(oracle, config.target_lipophilicity);

        Ok(Self {
            config,
            rng,
            evaluator,
            population: Vec::new(),
            history: EvolutionHistory::default(),
            generation: 0,
            evaluations: 0,
        })
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    /// Current population.
    pub fn population(&self) -> &[Individual] {
        &self.population
    }

    /// Generations completed.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Fitness-function invocations so far.
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    pub fn history(&self) -> &EvolutionHistory {
        &self.history
    }

    /// Draw and score the initial population.
    pub fn initialize(&mut self) {
        self.generation = 0;
        self.evaluations = 0;
        self.history = EvolutionHistory::default();
        self.population = random_population(
            &self.config.seed_vocabulary,
            self.config.population_size,
            &mut self.rng,
        );
        Self::evaluate_stale(&self.evaluator, &mut self.population, &mut self.evaluations);
        self.record_history();
    }

    /// Score every individual whose fitness is stale.
    ///
    /// Individuals that do not decode get [`SENTINEL_SCORE`] without a
    /// fitness evaluation.
    fn evaluate_stale(
        evaluator: &FitnessEvaluator<O>,
        population: &mut [Individual],
        evaluations: &mut u64,
    ) {
        for individual in population.iter_mut().filter(|i| !i.is_evaluated()) {
            let fitness = match evaluator.score(&individual.encoding) {
                Some(score) => {
                    *evaluations += 1;
                    score
                }
                None => SENTINEL_SCORE,
            };
            individual.fitness = Some(fitness);
        }
    }

    /// Run a single generation step.
    pub fn step_generation(&mut self) -> Result<(), EvolutionError> {
        let size = self.population.len();
        let oracle = self.evaluator.oracle();

        // Selection and cloning
        let mut offspring: Vec<Individual> = select(
            &self.population,
            size,
            self.config.tournament_size,
            &mut self.rng,
        )?
        .into_iter()
        .cloned()
        .collect();

        // Pairwise crossover
        for pair in offspring.chunks_exact_mut(2) {
            if self.rng.gen_bool(self.config.crossover_rate) {
                let (first, second) = crossover(&pair[0], &pair[1], oracle, &mut self.rng);
                pair[0] = first;
                pair[1] = second;
            }
        }

        // Mutation
        for individual in offspring.iter_mut() {
            if self.rng.gen_bool(self.config.mutation_rate) {
                *individual = mutate(
                    individual,
                    &self.config.mutation_alphabet,
                    oracle,
                    &mut self.rng,
                );
            }
        }

        Self::evaluate_stale(&self.evaluator, &mut offspring, &mut self.evaluations);

        debug_assert_eq!(offspring.len(), size);
        self.population = offspring;
        self.generation += 1;
        self.record_history();

        if let Some(last) = self.history.best_fitness.last() {
            log::debug!(
                "Generation {}/{}: best={:.4} avg={:.4} unique={}",
                self.generation,
                self.config.generations,
                last,
                self.history.avg_fitness.last().copied().unwrap_or_default(),
                self.history.unique_encodings.last().copied().unwrap_or_default(),
            );
        }

        Ok(())
    }

    /// Append statistics of the current population to the history.
    fn record_history(&mut self) {
        let fitnesses: Vec<f64> = self.population.iter().filter_map(|i| i.fitness).collect();
        if fitnesses.is_empty() {
            return;
        }

        let n = fitnesses.len() as f64;
        let best = fitnesses.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let avg = fitnesses.iter().sum::<f64>() / n;
        let variance = fitnesses.iter().map(|f| (f - avg).powi(2)).sum::<f64>() / n;

        let oracle = self.evaluator.oracle();
        let valid = self
            .population
            .iter()
            .filter(|i| oracle.is_valid(&i.encoding))
            .count();
        let unique: HashSet<&str> = self.population.iter().map(|i| i.encoding.as_str()).collect();

        self.history.best_fitness.push(best);
        self.history.avg_fitness.push(avg);
        self.history.fitness_std.push(variance.sqrt());
        self.history
            .valid_fraction
            .push(valid as f64 / self.population.len() as f64);
        self.history.unique_encodings.push(unique.len());
    }

    /// Snapshot of an individual with its descriptors.
    fn snapshot(&self, individual: &Individual) -> CandidateSnapshot {
        CandidateSnapshot {
            encoding: individual.encoding.clone(),
            fitness: individual.fitness.unwrap_or(SENTINEL_SCORE),
            descriptors: self.evaluator.oracle().describe(&individual.encoding),
        }
    }

    fn average_fitness(&self) -> f64 {
        if self.population.is_empty() {
            return 0.0;
        }
        self.population.iter().filter_map(|i| i.fitness).sum::<f64>()
            / self.population.len() as f64
    }

    /// Get current progress.
    pub fn progress(&self) -> EvolutionProgress {
        let best = best_individual(&self.population);

        let phase = if self.generation == 0 {
            EvolutionPhase::Initializing
        } else if self.generation >= self.config.generations {
            EvolutionPhase::Complete
        } else {
            EvolutionPhase::Evolving
        };

        EvolutionProgress {
            generation: self.generation,
            total_generations: self.config.generations,
            evaluations_completed: self.evaluations,
            best_fitness: best.and_then(|b| b.fitness).unwrap_or(f64::NEG_INFINITY),
            avg_fitness: self.average_fitness(),
            best_candidate: best.map(|b| self.snapshot(b)),
            phase,
        }
    }

    /// Run evolution with progress callback.
    ///
    /// The callback fires once after the initial population is scored and
    /// once after every generation.
    pub fn run_with_callback<F>(
        &mut self,
        mut callback: F,
    ) -> Result<EvolutionResult, EvolutionError>
    where
        F: FnMut(&EvolutionProgress),
    {
        let start_time = Instant::now();
        log::info!(
            "Starting search: population={} generations={} p_cx={} p_mut={}",
            self.config.population_size,
            self.config.generations,
            self.config.crossover_rate,
            self.config.mutation_rate,
        );

        self.initialize();
        callback(&self.progress());

        for _ in 0..self.config.generations {
            self.step_generation()?;
            callback(&self.progress());
        }

        let elapsed = start_time.elapsed().as_secs_f64();

        // Population is non-empty and fully scored after validation.
        let best = best_individual(&self.population)
            .map(|b| self.snapshot(b))
            .ok_or(EvolutionError::EmptyPopulation)?;

        log::info!(
            "Search finished after {} generations: best {} ({:.4})",
            self.generation,
            best.encoding,
            best.fitness
        );

        Ok(EvolutionResult {
            stats: EvolutionStats {
                generations: self.generation,
                total_evaluations: self.evaluations,
                best_fitness: best.fitness,
                final_avg_fitness: self.average_fitness(),
                elapsed_seconds: elapsed,
                evaluations_per_second: if elapsed > 0.0 {
                    self.evaluations as f64 / elapsed
                } else {
                    0.0
                },
            },
            best,
            history: self.history.clone(),
        })
    }

    /// Run evolution (blocking).
    pub fn run(&mut self) -> Result<EvolutionResult, EvolutionError> {
        self.run_with_callback(|_| {})
    }
}
