//! Property-based tests for the variation operators and fitness.

use druglike_evo::evolution::{
    Individual, SENTINEL_SCORE, composite_score, crossover, mutate, select,
};
use druglike_evo::oracle::Descriptors;
use druglike_evo::schema::default_mutation_alphabet;
use druglike_evo::{Oracle, SmilesOracle};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Valid molecules of mixed lengths, including the default seed vocabulary.
const MOLECULES: [&str; 12] = [
    "CCCO", "CCCC", "CC(=O)", "C=C(C)", "CCN(C)", "CCO", "CCN", "COC", "CC(C)C", "OCCO",
    "C1CCCCC1", "CC(Cl)Br",
];

fn molecule_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(MOLECULES.to_vec()).prop_map(str::to_string)
}

/// Arbitrary strings over SMILES-ish characters, mostly invalid.
fn noise_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[CNOSFBrlI()=#1-3%\\[\\]H+-]{0,16}").unwrap()
}

proptest! {
    #[test]
    fn test_mutation_is_valid_or_parent(smiles in molecule_strategy(), seed in any::<u64>()) {
        let oracle = SmilesOracle::new();
        let alphabet = default_mutation_alphabet();
        let parent = Individual::with_fitness(smiles, 1.0);
        let mut rng = StdRng::seed_from_u64(seed);

        let child = mutate(&parent, &alphabet, &oracle, &mut rng);
        prop_assert!(child == parent || oracle.is_valid(&child.encoding));
        if child.encoding != parent.encoding {
            prop_assert_eq!(child.fitness, None);
        }
    }

    #[test]
    fn test_crossover_children_are_valid_or_parents(
        a in molecule_strategy(),
        b in molecule_strategy(),
        seed in any::<u64>(),
    ) {
        let oracle = SmilesOracle::new();
        let a = Individual::with_fitness(a, 0.5);
        let b = Individual::with_fitness(b, 1.5);
        let mut rng = StdRng::seed_from_u64(seed);

        let (x, y) = crossover(&a, &b, &oracle, &mut rng);
        prop_assert!(x == a || oracle.is_valid(&x.encoding));
        prop_assert!(y == b || oracle.is_valid(&y.encoding));
    }

    #[test]
    fn test_crossover_of_unequal_lengths_is_identity(
        a in molecule_strategy(),
        b in molecule_strategy(),
        seed in any::<u64>(),
    ) {
        prop_assume!(a.chars().count() != b.chars().count());
        let a = Individual::with_fitness(a, 0.5);
        let b = Individual::with_fitness(b, 1.5);
        let mut rng = StdRng::seed_from_u64(seed);

        let (x, y) = crossover(&a, &b, &SmilesOracle::new(), &mut rng);
        prop_assert_eq!(x, a);
        prop_assert_eq!(y, b);
    }

    #[test]
    fn test_composite_score_matches_formula(
        druglikeness in 0.0f64..=1.0,
        lipophilicity in -10.0f64..10.0,
        target in -5.0f64..5.0,
    ) {
        let d = Descriptors { druglikeness, lipophilicity };
        let score = composite_score(&d, target);
        let expected = druglikeness + 1.0 - (lipophilicity - target).abs();
        prop_assert!((score - expected).abs() < 1e-12);
        prop_assert!(score <= druglikeness + 1.0);
    }

    #[test]
    fn test_selection_draws_from_population(
        fitnesses in prop::collection::vec(-2.0f64..2.0, 1..20),
        k in 0usize..40,
        tournament in 1usize..6,
        seed in any::<u64>(),
    ) {
        let population: Vec<Individual> = fitnesses
            .iter()
            .enumerate()
            .map(|(i, &f)| Individual::with_fitness(format!("C{i}"), f))
            .collect();
        let mut rng = StdRng::seed_from_u64(seed);

        let selected = select(&population, k, tournament, &mut rng).unwrap();
        prop_assert_eq!(selected.len(), k);
        for s in selected {
            prop_assert!(population.contains(s));
        }
    }

    #[test]
    fn test_oracle_never_panics(smiles in noise_strategy()) {
        let oracle = SmilesOracle::new();
        let first = oracle.describe(&smiles);
        prop_assert_eq!(first, oracle.describe(&smiles));
        if let Some(d) = first {
            prop_assert!((0.0..=1.0).contains(&d.druglikeness));
            prop_assert!(composite_score(&d, 2.5).is_finite());
        }
    }
}

#[test]
fn test_invalid_encoding_scores_sentinel() {
    use druglike_evo::evolution::FitnessEvaluator;

    let evaluator = FitnessEvaluator::new(SmilesOracle::new(), 2.5);
    for smiles in ["", "C(", ")C", "C==C", "C1CC", "[Xx]"] {
        assert_eq!(evaluator.evaluate(smiles), SENTINEL_SCORE, "{smiles}");
    }
}
