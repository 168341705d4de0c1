use super::GenerationSummary;
use crate::policy::DecisionPolicy;

use std::fmt;

/// Defines different possible reporting levels for logging.
#[derive(Clone, Copy, Debug)]
pub enum ReportingLevel {
    /// Keeps the best policy of every generation.
    ChampionPolicy,
    /// Keeps no policies.
    NoPolicies,
}

/// A snapshot of one generation transition.
#[derive(Clone, Debug)]
pub struct GenerationLog {
    pub generation_number: usize,
    pub fitness: Stats,
    pub reference_selected: bool,
    pub restarts: usize,
    pub imitations: usize,
    pub champion: Option<DecisionPolicy>,
}

impl fmt::Display for GenerationLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Log {{\n\
            \tgeneration_number: {:?}\n\
            \tfitness: {:?}\n\
            \treference_selected: {:?}\n\
            \trestarts: {:?}\n\
            \timitations: {:?}\n\
            {}}}",
            self.generation_number,
            self.fitness,
            self.reference_selected,
            self.restarts,
            self.imitations,
            match &self.champion {
                Some(policy) => format!("\tchampion: {:?}\n", policy),
                None => String::new(),
            }
        )
    }
}

/// A struct for reporting basic statistical data.
#[derive(Clone, Debug, PartialEq)]
pub struct Stats {
    pub maximum: f32,
    pub minimum: f32,
    pub mean: f32,
    pub median: f32,
}

impl Stats {
    /// Returns statistics about numbers in a sequence.
    ///
    /// # Panics
    /// Panics if the sequence is empty or contains NaN.
    ///
    /// # Examples
    /// ```
    /// use floppy::logging::Stats;
    ///
    /// let stats = Stats::from([-2.0, -1.0, 0.5, 1.0, 1.5].iter().copied());
    /// assert_eq!(stats.maximum, 1.5);
    /// assert_eq!(stats.minimum, -2.0);
    /// assert_eq!(stats.mean, 0.0);
    /// assert_eq!(stats.median, 0.5);
    ///
    /// let stats = Stats::from([4.0, 1.0, 3.0, 2.0].iter().copied());
    /// assert_eq!(stats.median, 2.5);
    /// ```
    pub fn from(data: impl Iterator<Item = f32>) -> Stats {
        let mut data: Vec<f32> = data.collect();
        assert!(!data.is_empty(), "statistics of an empty sequence");
        let len = data.len();
        let (mut max, mut min, mut sum) = (f32::MIN, f32::MAX, 0.0);
        for d in &data {
            max = d.max(max);
            min = d.min(min);
            sum += d;
        }
        let mean = sum / len as f32;
        let (lower, middle, _) = data.select_nth_unstable_by(len / 2, |a, b| {
            a.partial_cmp(b)
                .unwrap_or_else(|| panic!("invalid statistic detected (NaN)"))
        });
        let median = if len % 2 == 1 {
            *middle
        } else {
            // The other middle value is the largest of the lower partition.
            (lower.iter().copied().fold(f32::MIN, f32::max) + *middle) / 2.0
        };
        Stats {
            maximum: max,
            minimum: min,
            mean,
            median,
        }
    }
}

/// A log of the evolution of a population over time.
#[derive(Clone, Debug)]
pub struct EvolutionLogger {
    reporting_level: ReportingLevel,
    logs: Vec<GenerationLog>,
}

impl EvolutionLogger {
    /// Returns a logger with the appropiate reporting level.
    ///
    /// # Examples
    /// ```
    /// use floppy::logging::{EvolutionLogger, ReportingLevel};
    ///
    /// let logger = EvolutionLogger::new(ReportingLevel::NoPolicies);
    /// assert_eq!(logger.iter().count(), 0);
    /// ```
    pub fn new(reporting_level: ReportingLevel) -> EvolutionLogger {
        EvolutionLogger {
            reporting_level,
            logs: vec![],
        }
    }

    /// Stores a snapshot of a generation transition.
    ///
    /// # Examples
    /// ```
    /// use floppy::logging::{EvolutionLogger, ReportingLevel};
    /// use floppy::{CourseConfig, PhysicsConfig, PopulationConfig, PopulationController};
    ///
    /// let mut controller = PopulationController::from_seed(
    ///     PopulationConfig::default(),
    ///     CourseConfig::with_screen(800, 600),
    ///     PhysicsConfig::default(),
    ///     7,
    /// )
    /// .unwrap();
    /// let mut logger = EvolutionLogger::new(ReportingLevel::ChampionPolicy);
    ///
    /// let summary = controller.run_generation();
    /// logger.log(&summary);
    /// assert_eq!(logger.iter().next().unwrap().generation_number, 0);
    /// ```
    pub fn log(&mut self, summary: &GenerationSummary) {
        self.logs.push(GenerationLog {
            generation_number: summary.generation,
            fitness: summary.fitness.clone(),
            reference_selected: summary.reference.is_some(),
            restarts: summary.restarts,
            imitations: summary.imitations,
            champion: match self.reporting_level {
                ReportingLevel::ChampionPolicy => Some(summary.champion),
                ReportingLevel::NoPolicies => None,
            },
        })
    }

    /// Iterate over all logged snapshots.
    pub fn iter(&self) -> impl Iterator<Item = &GenerationLog> {
        self.logs.iter()
    }

    /// Returns the log with the highest maximum fitness,
    /// earliest first on ties.
    pub fn best(&self) -> Option<&GenerationLog> {
        self.logs.iter().fold(None, |best, log| match best {
            Some(b) if b.fitness.maximum >= log.fitness.maximum => Some(b),
            _ => Some(log),
        })
    }
}
