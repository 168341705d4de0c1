use floppy::logging::{EvolutionLogger, GenerationLog, ReportingLevel, Stats};
use floppy::{
    CourseConfig, DecisionPolicy, PhysicsConfig, PopulationConfig, PopulationController,
    TickOutcome,
};

use std::num::NonZeroUsize;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

const RUNS: u64 = 16;
const GENERATIONS: usize = 50;
// One simulated hour per run at 60 ticks per second.
const TICK_BUDGET: u64 = 60 * 60 * 60;
const CHAMPION_PATH: &str = "champion.ron";

#[derive(Serialize)]
struct ChampionRecord<'a> {
    seed: u64,
    generation: usize,
    fitness: f32,
    policy: DecisionPolicy,
    population: &'a PopulationConfig,
    course: &'a CourseConfig,
    physics: &'a PhysicsConfig,
}

struct RunResult {
    seed: u64,
    logger: EvolutionLogger,
    generations: usize,
}

fn main() {
    init_tracing();

    let population_config = PopulationConfig {
        size: NonZeroUsize::new(100).unwrap(),
        ..PopulationConfig::default()
    };
    let course_config = CourseConfig::with_screen(1920, 1080);
    let physics_config = PhysicsConfig::default();

    let results: Vec<RunResult> = (0..RUNS)
        .into_par_iter()
        .filter_map(|seed| {
            match run(seed, &population_config, &course_config, &physics_config) {
                Ok(result) => Some(result),
                Err(e) => {
                    eprintln!("run {} failed: {}", seed, e);
                    None
                }
            }
        })
        .collect();

    report(&results);

    let best = results
        .iter()
        .filter_map(|r| r.logger.best().map(|log| (r.seed, log)))
        .max_by(|(_, a), (_, b)| {
            a.fitness
                .maximum
                .partial_cmp(&b.fitness.maximum)
                .unwrap_or_else(|| panic!("invalid fitness detected (NaN)"))
        });
    match best {
        Some((seed, log)) => save_champion(
            seed,
            log,
            &population_config,
            &course_config,
            &physics_config,
        ),
        None => warn!("no generation completed, nothing to save"),
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn run(
    seed: u64,
    population_config: &PopulationConfig,
    course_config: &CourseConfig,
    physics_config: &PhysicsConfig,
) -> Result<RunResult, Box<dyn std::error::Error + Send + Sync>> {
    let mut controller = PopulationController::from_seed(
        population_config.clone(),
        course_config.clone(),
        *physics_config,
        seed,
    )?;
    let mut logger = EvolutionLogger::new(ReportingLevel::ChampionPolicy);

    while controller.generation() < GENERATIONS && controller.tick_count() < TICK_BUDGET {
        if let TickOutcome::GenerationCompleted(summary) = controller.tick() {
            logger.log(&summary);
        }
    }
    if controller.generation() < GENERATIONS {
        warn!(
            seed,
            generations = controller.generation(),
            "tick budget exhausted before the last generation"
        );
    }

    Ok(RunResult {
        seed,
        logger,
        generations: controller.generation(),
    })
}

fn report(results: &[RunResult]) {
    for result in results {
        if let Some(log) = result.logger.best() {
            info!(
                seed = result.seed,
                generations = result.generations,
                best_generation = log.generation_number,
                best_fitness = log.fitness.maximum,
                "run finished"
            );
        }
    }

    let best_per_run: Vec<f32> = results
        .iter()
        .filter_map(|r| r.logger.best().map(|log| log.fitness.maximum))
        .collect();
    if best_per_run.is_empty() {
        return;
    }
    let imitation_share: f32 = results
        .iter()
        .flat_map(|r| r.logger.iter())
        .map(|log| log.imitations as f32 / (log.imitations + log.restarts).max(1) as f32)
        .sum::<f32>()
        / results.iter().map(|r| r.logger.iter().count()).sum::<usize>().max(1) as f32;

    println!(
        "Best survival time per run (s) {:?} over {} runs, {:.1}% of policies imitated a reference",
        Stats::from(best_per_run.into_iter()),
        results.len(),
        imitation_share * 100.0,
    );
}

fn save_champion(
    seed: u64,
    log: &GenerationLog,
    population: &PopulationConfig,
    course: &CourseConfig,
    physics: &PhysicsConfig,
) {
    let policy = match log.champion {
        Some(policy) => policy,
        None => {
            warn!("best generation kept no policy");
            return;
        }
    };
    let record = ChampionRecord {
        seed,
        generation: log.generation_number,
        fitness: log.fitness.maximum,
        policy,
        population,
        course,
        physics,
    };
    let serialized = match ron::ser::to_string_pretty(&record, ron::ser::PrettyConfig::default()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", e);
            return;
        }
    };
    if let Err(e) = std::fs::write(CHAMPION_PATH, serialized) {
        eprintln!("{}", e);
        return;
    }
    println!(
        "Champion from seed {} (generation {}, {:.2}s): {:?}, written to {}",
        seed, log.generation_number, log.fitness.maximum, policy, CHAMPION_PATH
    );
}
