//! Drug-likeness search CLI - Run an evolutionary search from JSON configuration.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::time::Instant;

use druglike_evo::{EvolutionConfig, EvolutionEngine, SmilesOracle};

fn print_usage(program: &str) {
    eprintln!("Usage: {} [config.json] [generations]", program);
    eprintln!();
    eprintln!("Evolve SMILES strings toward a drug-likeness score.");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  config.json  Path to run configuration (default: built-in defaults)");
    eprintln!("  generations  Override the number of generations");
    eprintln!();
    eprintln!("Print the default configuration with --example.");
}

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("--example") => {
            print_example_config();
            return;
        }
        Some("-h" | "--help") => {
            print_usage(&args[0]);
            return;
        }
        _ => {}
    }

    // Load configuration
    let mut config = match args.get(1) {
        Some(path) => EvolutionConfig::from_json_file(path).unwrap_or_else(|e| {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }),
        None => EvolutionConfig::default(),
    };

    if let Some(raw) = args.get(2) {
        config.generations = raw.parse().unwrap_or_else(|_| {
            eprintln!("Invalid generation count: {}", raw);
            print_usage(&args[0]);
            std::process::exit(1);
        });
    }

    println!("Drug-likeness Search");
    println!("====================");
    println!("Population: {}", config.population_size);
    println!("Generations: {}", config.generations);
    println!(
        "Crossover: {}, Mutation: {}, Tournament: {}",
        config.crossover_rate, config.mutation_rate, config.tournament_size
    );
    println!("Target logP: {}", config.target_lipophilicity);
    if let Some(seed) = config.random_seed {
        println!("Seed: {}", seed);
    }
    println!();

    let output_path = config.output_path.clone();
    let generations = config.generations;

    let mut engine = EvolutionEngine::new(config, SmilesOracle::new()).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    println!("Running search...");
    let start = Instant::now();
    let report_every = (generations / 10).max(1);

    let result = engine
        .run_with_callback(|progress| {
            // Print progress every 10%
            if progress.generation > 0 && progress.generation % report_every == 0 {
                println!(
                    "  Generation {}/{}: best={:.4}, avg={:.4}, evals={}",
                    progress.generation,
                    progress.total_generations,
                    progress.best_fitness,
                    progress.avg_fitness,
                    progress.evaluations_completed
                );
            }
        })
        .unwrap_or_else(|e| {
            eprintln!("Search failed: {}", e);
            std::process::exit(1);
        });

    let elapsed = start.elapsed();

    println!();
    if let Some(descriptors) = result.best.descriptors {
        println!(
            "Descriptors: QED={:.4}, logP={:.4}",
            descriptors.druglikeness, descriptors.lipophilicity
        );
    }
    println!(
        "Evaluations: {} in {:.2}s ({:.1} evals/s)",
        result.stats.total_evaluations,
        elapsed.as_secs_f32(),
        result.stats.evaluations_per_second
    );
    println!(
        "Best SMILES: {}, score: {:.4}",
        result.best.encoding, result.best.fitness
    );

    if let Some(path) = output_path {
        if let Err(e) = result.to_json_file(&path) {
            eprintln!("Error writing result to {}: {}", path.display(), e);
            std::process::exit(1);
        }
        println!("Result written to {}", path.display());
    }
}

fn print_example_config() {
    let config = EvolutionConfig {
        random_seed: Some(42),
        ..Default::default()
    };

    println!("Example configuration (config.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing config: {}", e),
    }
}
