//! A population of agents flying through one shared
//! obstacle course. When every agent has died, the
//! longest survivor becomes the reference the others
//! imitate during the next generation.
mod config;
mod errors;
pub mod logging;

pub use config::PopulationConfig;
pub use errors::ConfigError;

use crate::agents::{Agent, PhysicsConfig};
use crate::obstacles::{CourseConfig, ObstacleField, ObstaclePair, SpawnTimer};
use crate::policy::{Adaptation, DecisionPolicy};
use crate::rng::{self, SimRng};
use logging::Stats;

use rand::Rng;
use tracing::debug;

/// What happened during a call to [`PopulationController::tick`].
#[derive(Clone, Debug)]
pub enum TickOutcome {
    /// At least one agent is still flying.
    Running { alive: usize },
    /// Every agent died this tick and the population
    /// moved on to the next generation.
    GenerationCompleted(GenerationSummary),
}

/// Record of one generation transition.
#[derive(Clone, Debug)]
pub struct GenerationSummary {
    /// The generation that just ended.
    pub generation: usize,
    /// Survival times of the ending generation, in seconds.
    pub fitness: Stats,
    /// Index of the agent every policy was pulled towards,
    /// if the fitness spread was wide enough to trust it.
    pub reference: Option<usize>,
    /// Policy of the longest survivor, before adaptation.
    pub champion: DecisionPolicy,
    /// Policies redrawn at random.
    pub restarts: usize,
    /// Policies nudged towards the reference.
    pub imitations: usize,
}

/// Owns the agents, the obstacle course and the
/// random source, and advances them one tick at a time.
#[derive(Clone, Debug)]
pub struct PopulationController<R = SimRng> {
    agents: Vec<Agent>,
    obstacles: ObstacleField,
    spawn_timer: SpawnTimer,
    lane_x: i32,
    generation: usize,
    tick_count: u64,
    population_config: PopulationConfig,
    physics_config: PhysicsConfig,
    rng: R,
}

impl PopulationController<SimRng> {
    /// Creates a controller with a reproducible random source.
    ///
    /// # Errors
    /// Returns an error if any configuration is invalid.
    ///
    /// # Examples
    /// ```
    /// use floppy::{CourseConfig, PhysicsConfig, PopulationConfig, PopulationController};
    ///
    /// let controller = PopulationController::from_seed(
    ///     PopulationConfig::default(),
    ///     CourseConfig::with_screen(800, 600),
    ///     PhysicsConfig::default(),
    ///     42,
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(controller.agents().len(), 100);
    /// assert_eq!(controller.lane_x(), 130);
    /// ```
    pub fn from_seed(
        population_config: PopulationConfig,
        course_config: CourseConfig,
        physics_config: PhysicsConfig,
        seed: u64,
    ) -> Result<PopulationController<SimRng>, ConfigError> {
        PopulationController::new(
            population_config,
            course_config,
            physics_config,
            rng::seeded(seed),
        )
    }
}

impl<R: Rng> PopulationController<R> {
    /// Creates a population of randomly initialized agents,
    /// all in the same lane, vertically centered.
    ///
    /// # Errors
    /// Returns an error if any configuration is invalid.
    pub fn new(
        population_config: PopulationConfig,
        course_config: CourseConfig,
        physics_config: PhysicsConfig,
        rng: R,
    ) -> Result<PopulationController<R>, ConfigError> {
        PopulationController::new_seeded(
            vec![],
            population_config,
            course_config,
            physics_config,
            rng,
        )
    }

    /// Creates a population whose first agents use the passed
    /// policies. The remaining agents are randomly initialized.
    ///
    /// # Errors
    /// Returns an error if any configuration is invalid, or if
    /// there are more policies than the configured population size.
    ///
    /// # Examples
    /// ```
    /// use floppy::{rng, CourseConfig, DecisionPolicy, PhysicsConfig, PopulationConfig, PopulationController};
    ///
    /// let policy = DecisionPolicy::from_weights([0.1, -0.2, 0.3, -0.4]);
    /// let controller = PopulationController::new_seeded(
    ///     vec![policy],
    ///     PopulationConfig::default(),
    ///     CourseConfig::default(),
    ///     PhysicsConfig::default(),
    ///     rng::seeded(0),
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(controller.agents()[0].policy(), &policy);
    /// ```
    pub fn new_seeded(
        policies: Vec<DecisionPolicy>,
        population_config: PopulationConfig,
        course_config: CourseConfig,
        physics_config: PhysicsConfig,
        mut rng: R,
    ) -> Result<PopulationController<R>, ConfigError> {
        population_config.validate()?;
        course_config.validate()?;
        physics_config.validate()?;
        let size = population_config.size.get();
        if policies.len() > size {
            return Err(ConfigError::TooManySeeds {
                seeds: policies.len(),
                size,
            });
        }
        if physics_config.agent_size > course_config.screen_width
            || physics_config.agent_size > course_config.screen_height
        {
            return Err(ConfigError::AgentDoesNotFit {
                agent_size: physics_config.agent_size,
                screen_width: course_config.screen_width,
                screen_height: course_config.screen_height,
            });
        }

        let half = physics_config.agent_size / 2;
        let lane_x = course_config.screen_width / 5 - half;
        let spawn_y = course_config.screen_height / 2 - half;
        let seeded_count = policies.len();
        let mut agents = Vec::with_capacity(size);
        for policy in policies {
            agents.push(Agent::new(lane_x, spawn_y, policy, physics_config, &mut rng));
        }
        for _ in seeded_count..size {
            let policy = DecisionPolicy::new(&mut rng);
            agents.push(Agent::new(lane_x, spawn_y, policy, physics_config, &mut rng));
        }

        Ok(PopulationController {
            agents,
            spawn_timer: SpawnTimer::new(&course_config, &physics_config),
            obstacles: ObstacleField::new(course_config),
            lane_x,
            generation: 0,
            tick_count: 0,
            population_config,
            physics_config,
            rng,
        })
    }

    /// Advances the simulation by one tick: obstacles scroll,
    /// every living agent senses the nearest obstacle ahead of
    /// the shared lane and acts, and the spawn timer counts down.
    ///
    /// If every agent is dead at the end of the tick, the
    /// generation transition runs before returning.
    pub fn tick(&mut self) -> TickOutcome {
        self.tick_count += 1;
        self.obstacles.advance();

        let nearest = self.obstacles.nearest_ahead(self.lane_x);
        let course = self.obstacles.course();
        for agent in &mut self.agents {
            agent.update(
                self.obstacles.pairs(),
                nearest,
                course,
                self.population_config.jump_threshold,
            );
        }

        if self.all_dead() {
            return TickOutcome::GenerationCompleted(self.run_generation());
        }

        if self.spawn_timer.tick(&mut self.rng) {
            self.obstacles.spawn_pair(&mut self.rng);
        }
        TickOutcome::Running {
            alive: self.alive_count(),
        }
    }

    /// Returns whether every agent is dead.
    pub fn all_dead(&self) -> bool {
        self.agents.iter().all(|a| !a.is_alive())
    }

    /// Number of agents still flying.
    pub fn alive_count(&self) -> usize {
        self.agents.iter().filter(|a| a.is_alive()).count()
    }

    /// Moves the population on to the next generation.
    ///
    /// The course is cleared and the spawn timer held while the
    /// agent with the highest fitness is chosen as reference. If
    /// the gap between the highest and lowest fitness is below
    /// the [spread gate], there is no reference and every policy
    /// restarts. Each policy is then [adapted] and every agent
    /// resurrected.
    ///
    /// [spread gate]: PopulationConfig::spread_gate
    /// [adapted]: DecisionPolicy::adapt
    pub fn run_generation(&mut self) -> GenerationSummary {
        self.spawn_timer.pause();
        self.obstacles.clear();

        let fitness = Stats::from(self.agents.iter().map(Agent::fitness));
        let champion = self.champion_index();
        let reference = if fitness.maximum - fitness.minimum < self.population_config.spread_gate {
            None
        } else {
            Some(champion)
        };
        let champion_policy = *self.agents[champion].policy();
        let reference_policy = reference.map(|i| *self.agents[i].policy());

        let (mut restarts, mut imitations) = (0, 0);
        for agent in &mut self.agents {
            match agent.policy_mut().adapt(
                reference_policy.as_ref(),
                &self.population_config,
                &mut self.rng,
            ) {
                Adaptation::Restarted => restarts += 1,
                Adaptation::Imitated => imitations += 1,
            }
            agent.resurrect();
        }

        debug!(
            generation = self.generation,
            max_fitness = fitness.maximum,
            min_fitness = fitness.minimum,
            reference = ?reference,
            restarts,
            imitations,
            "generation finished",
        );

        let summary = GenerationSummary {
            generation: self.generation,
            fitness,
            reference,
            champion: champion_policy,
            restarts,
            imitations,
        };
        self.generation += 1;
        self.spawn_timer.resume();
        summary
    }

    /// Makes every agent jump, regardless of its policy.
    pub fn jump_all(&mut self) {
        self.agents.iter_mut().for_each(Agent::jump);
    }

    /// Index of the first agent with the highest fitness.
    fn champion_index(&self) -> usize {
        let mut best = 0;
        for (i, agent) in self.agents.iter().enumerate() {
            if agent.fitness() > self.agents[best].fitness() {
                best = i;
            }
        }
        best
    }

    /// Returns the agent with the highest current fitness.
    pub fn champion(&self) -> &Agent {
        &self.agents[self.champion_index()]
    }

    /// The obstacle pair the agents are currently sensing.
    pub fn nearest_obstacle(&self) -> Option<&ObstaclePair> {
        self.obstacles.nearest_ahead(self.lane_x)
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn obstacles(&self) -> &ObstacleField {
        &self.obstacles
    }

    /// Gives collaborators direct control over the course,
    /// e.g. to place a pair by hand.
    pub fn obstacles_mut(&mut self) -> &mut ObstacleField {
        &mut self.obstacles
    }

    pub fn spawn_timer_mut(&mut self) -> &mut SpawnTimer {
        &mut self.spawn_timer
    }

    /// Horizontal position shared by every agent.
    pub fn lane_x(&self) -> i32 {
        self.lane_x
    }

    /// Number of completed generations.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Number of ticks run so far.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn population_config(&self) -> &PopulationConfig {
        &self.population_config
    }

    pub fn physics_config(&self) -> &PhysicsConfig {
        &self.physics_config
    }
}
