use super::errors::ConfigError;

use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;

/// Configuration data for population selection
/// and policy adaptation.
///
/// # Note
/// All quantities expressing probabilities
/// should be in the range [0.0, 1.0]. This is
/// checked by [`validate`] when a controller
/// is created.
///
/// [`validate`]: PopulationConfig::validate
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    /// Number of agents in the population.
    pub size: NonZeroUsize,
    /// A uniform draw above this value makes a policy
    /// restart from random weights instead of imitating
    /// the generation's reference agent.
    pub exploration_threshold: f32,
    /// Fraction of the distance to the reference
    /// weights covered by one imitation step.
    pub learning_rate: f32,
    /// Minimum difference between the best and worst
    /// fitness of a generation, in seconds, for the best
    /// agent to be trusted as a reference.
    pub spread_gate: f32,
    /// Policy activations below this trigger a jump.
    pub jump_threshold: f32,
}

impl Default for PopulationConfig {
    /// Returns the configuration of the sample run:
    /// 100 agents, 0.9 exploration threshold, 0.2
    /// learning rate, 0.5s spread gate and 0.4 jump
    /// threshold.
    fn default() -> PopulationConfig {
        PopulationConfig {
            // SAFETY: 100 is a valid NonZeroUsize.
            size: unsafe { NonZeroUsize::new_unchecked(100) },
            exploration_threshold: 0.9,
            learning_rate: 0.2,
            spread_gate: 0.5,
            jump_threshold: 0.4,
        }
    }
}

impl PopulationConfig {
    /// Checks that every probability lies in [0, 1]
    /// and that the spread gate is not negative.
    ///
    /// # Examples
    /// ```
    /// use floppy::PopulationConfig;
    ///
    /// assert!(PopulationConfig::default().validate().is_ok());
    ///
    /// let cfg = PopulationConfig {
    ///     learning_rate: 1.5,
    ///     ..PopulationConfig::default()
    /// };
    /// assert!(cfg.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("exploration_threshold", self.exploration_threshold),
            ("learning_rate", self.learning_rate),
            ("jump_threshold", self.jump_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ProbabilityOutOfRange(name, value));
            }
        }
        if self.spread_gate.is_nan() || self.spread_gate < 0.0 {
            return Err(ConfigError::Negative("spread_gate"));
        }
        Ok(())
    }
}
