//! A population of flapping agents learning to cross
//! a continuously scrolling obstacle course.
//!
//! Every agent is driven by a single logistic neuron fed
//! with four sensor readings. All agents fly the same
//! course at once; once all of them have crashed, the
//! longest survivor becomes the reference the others
//! imitate, with random restarts keeping the population
//! exploring.
//!
//! The simulation is deterministic given its random source,
//! and knows nothing of windows, drawing or input devices:
//! whatever presents it calls [`PopulationController::tick`]
//! once per frame and reads back rectangles and colors.
//!
//! # Example usage: running a few generations headless
//! ```
//! use floppy::{CourseConfig, PhysicsConfig, PopulationConfig, PopulationController, TickOutcome};
//! use floppy::logging::{EvolutionLogger, ReportingLevel};
//! use std::num::NonZeroUsize;
//!
//! let population_config = PopulationConfig {
//!     size: NonZeroUsize::new(20).unwrap(),
//!     ..PopulationConfig::default()
//! };
//!
//! let mut controller = PopulationController::from_seed(
//!     population_config,
//!     CourseConfig::with_screen(800, 600),
//!     PhysicsConfig::default(),
//!     1234,
//! )
//! .unwrap();
//! let mut logger = EvolutionLogger::new(ReportingLevel::ChampionPolicy);
//!
//! for _ in 0..20_000 {
//!     if let TickOutcome::GenerationCompleted(summary) = controller.tick() {
//!         logger.log(&summary);
//!     }
//!     if controller.generation() == 5 {
//!         break;
//!     }
//! }
//!
//! for log in logger.iter() {
//!     println!("{}", log);
//! }
//! ```

mod agents;
mod geometry;
mod obstacles;
mod policy;
mod populations;
pub mod rng;

pub use agents::*;
pub use geometry::*;
pub use obstacles::*;
pub use policy::*;
pub use populations::*;
