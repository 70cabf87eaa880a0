//! Tournament selection.

use rand::Rng;

use super::{EvolutionError, Individual};

/// Run one tournament and return the winner's index.
///
/// Contestants are drawn uniformly with replacement. The highest fitness
/// wins; on equal fitness the earlier draw is kept.
pub fn tournament_index<R: Rng + ?Sized>(
    population: &[Individual],
    size: usize,
    rng: &mut R,
) -> Result<usize, EvolutionError> {
    if population.is_empty() {
        return Err(EvolutionError::EmptyPopulation);
    }
    if size == 0 {
        return Err(EvolutionError::EmptyTournament);
    }

    let mut best: Option<(usize, f64)> = None;
    for _ in 0..size {
        let idx = rng.gen_range(0..population.len());
        let fitness = population[idx]
            .fitness
            .ok_or(EvolutionError::StaleFitness { index: idx })?;
        match best {
            Some((_, best_fitness)) if fitness <= best_fitness => {}
            _ => best = Some((idx, fitness)),
        }
    }

    best.map(|(idx, _)| idx).ok_or(EvolutionError::EmptyTournament)
}

/// Select `k` individuals by repeated tournaments, with repetition.
pub fn select<'a, R: Rng + ?Sized>(
    population: &'a [Individual],
    k: usize,
    tournament_size: usize,
    rng: &mut R,
) -> Result<Vec<&'a Individual>, EvolutionError> {
    (0..k)
        .map(|_| {
            tournament_index(population, tournament_size, &mut *rng).map(|i| &population[i])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn scored(values: &[f64]) -> Vec<Individual> {
        values
            .iter()
            .enumerate()
            .map(|(i, &f)| Individual::with_fitness(format!("C{i}"), f))
            .collect()
    }

    #[test]
    fn test_select_returns_k() {
        let population = scored(&[0.1, 0.5, 0.9, 1.3]);
        let mut rng = StdRng::seed_from_u64(42);

        for k in [0, 1, 4, 10] {
            let selected = select(&population, k, 3, &mut rng).unwrap();
            assert_eq!(selected.len(), k);
        }
    }

    #[test]
    fn test_selection_pressure() {
        let population = scored(&[0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 5.0]);
        let mut rng = StdRng::seed_from_u64(1);

        let selected = select(&population, 400, 3, &mut rng).unwrap();
        let winners = selected.iter().filter(|i| i.fitness == Some(5.0)).count();
        // P(best in a 3-tournament) = 1 - (7/8)^3 ~ 0.33
        assert!(winners > 80, "winners = {winners}");
    }

    #[test]
    fn test_single_contestant_is_uniform_draw() {
        let population = scored(&[1.0, 2.0]);
        let mut rng = StdRng::seed_from_u64(9);

        let selected = select(&population, 200, 1, &mut rng).unwrap();
        assert!(selected.iter().any(|i| i.fitness == Some(1.0)));
        assert!(selected.iter().any(|i| i.fitness == Some(2.0)));
    }

    #[test]
    fn test_winner_is_best_contestant() {
        let population = scored(&[3.0, 1.0, 2.0]);
        let mut rng = StdRng::seed_from_u64(5);

        // A tournament larger than the population almost surely sees index 0.
        let idx = tournament_index(&population, 64, &mut rng).unwrap();
        assert_eq!(idx, 0);
    }

    #[test]
    fn test_stale_fitness_is_a_fault() {
        let mut population = scored(&[1.0, 2.0]);
        population[1].invalidate();
        let mut rng = StdRng::seed_from_u64(0);

        let result = select(&population, 50, 3, &mut rng);
        assert!(matches!(
            result,
            Err(EvolutionError::StaleFitness { index: 1 })
        ));
    }

    #[test]
    fn test_empty_population_is_a_fault() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            select(&[], 1, 3, &mut rng),
            Err(EvolutionError::EmptyPopulation)
        ));
        assert!(select(&[], 0, 3, &mut rng).unwrap().is_empty());
    }

    #[test]
    fn test_zero_tournament_is_a_fault() {
        let population = scored(&[1.0]);
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            tournament_index(&population, 0, &mut rng),
            Err(EvolutionError::EmptyTournament)
        ));
    }
}
