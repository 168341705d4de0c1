use crate::populations::PopulationConfig;
use crate::rng::SignedUnit;

use rand::Rng;
use serde::{Deserialize, Serialize};

use std::fmt;

/// Number of sensor channels feeding a policy:
/// own bottom edge, own vertical velocity,
/// nearest gap floor and nearest obstacle right edge.
pub const SENSOR_COUNT: usize = 4;

/// Sensor readings are raw pixel magnitudes (up to
/// the screen width) and are divided by this before
/// the logistic function is applied.
pub const INPUT_SCALE: f32 = 1000.0;

// Closest values to 0 and 1 representable as f32
// on the open interval (0, 1).
const MIN_ACTIVATION: f32 = f32::MIN_POSITIVE;
const MAX_ACTIVATION: f32 = 1.0 - f32::EPSILON / 2.0;

/// How a policy was changed during a generation transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Adaptation {
    /// Weights were redrawn at random.
    Restarted,
    /// Weights were nudged towards a reference policy.
    Imitated,
}

/// A single logistic neuron with one weight per sensor.
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecisionPolicy {
    weights: [f32; SENSOR_COUNT],
}

impl DecisionPolicy {
    /// Returns a policy with random weights in (-1, 1).
    ///
    /// # Examples
    /// ```
    /// use floppy::{rng, DecisionPolicy};
    ///
    /// let policy = DecisionPolicy::new(&mut rng::seeded(0));
    /// assert!(policy.weights().iter().all(|w| w.abs() <= 1.0));
    /// ```
    pub fn new(rng: &mut impl Rng) -> DecisionPolicy {
        let mut policy = DecisionPolicy::from_weights([0.0; SENSOR_COUNT]);
        policy.reinitialize(rng);
        policy
    }

    /// Returns a policy with the given weights.
    pub const fn from_weights(weights: [f32; SENSOR_COUNT]) -> DecisionPolicy {
        DecisionPolicy { weights }
    }

    pub fn weights(&self) -> &[f32; SENSOR_COUNT] {
        &self.weights
    }

    /// Returns the neuron's activation for the given
    /// sensor readings, strictly inside (0, 1).
    ///
    /// # Examples
    /// ```
    /// use floppy::DecisionPolicy;
    ///
    /// let policy = DecisionPolicy::from_weights([1.0, 0.0, 0.0, 0.0]);
    /// assert_eq!(policy.evaluate([0.0, 5.0, 5.0, 5.0]), 0.5);
    /// assert!(policy.evaluate([1000.0, 0.0, 0.0, 0.0]) > 0.73);
    /// ```
    pub fn evaluate(&self, inputs: [f32; SENSOR_COUNT]) -> f32 {
        let x: f32 = self
            .weights
            .iter()
            .zip(inputs.iter())
            .map(|(w, i)| w * i)
            .sum();
        sigmoid(x / INPUT_SCALE)
    }

    /// Redraws every weight: magnitude uniform in [0, 1),
    /// sign flipped with probability 0.5.
    pub fn reinitialize(&mut self, rng: &mut impl Rng) {
        for w in &mut self.weights {
            *w = rng.sample(SignedUnit);
        }
    }

    /// Moves the policy for the next generation.
    ///
    /// Without a reference, or when a uniform draw exceeds
    /// the configured [exploration threshold], the weights
    /// are redrawn. Otherwise each weight moves a
    /// [learning rate] fraction of the way towards the
    /// reference's.
    ///
    /// [exploration threshold]: PopulationConfig::exploration_threshold
    /// [learning rate]: PopulationConfig::learning_rate
    ///
    /// # Examples
    /// ```
    /// use floppy::{rng, Adaptation, DecisionPolicy, PopulationConfig};
    ///
    /// let config = PopulationConfig {
    ///     exploration_threshold: 1.0,
    ///     ..PopulationConfig::default()
    /// };
    /// let reference = DecisionPolicy::from_weights([1.0, -1.0, 0.5, 0.0]);
    /// let mut policy = DecisionPolicy::from_weights([0.0; 4]);
    ///
    /// let outcome = policy.adapt(Some(&reference), &config, &mut rng::seeded(3));
    /// assert_eq!(outcome, Adaptation::Imitated);
    /// assert_eq!(policy.weights(), &[0.2, -0.2, 0.1, 0.0]);
    /// ```
    pub fn adapt(
        &mut self,
        reference: Option<&DecisionPolicy>,
        config: &PopulationConfig,
        rng: &mut impl Rng,
    ) -> Adaptation {
        match reference {
            Some(reference) if rng.gen::<f32>() <= config.exploration_threshold => {
                for (w, r) in self.weights.iter_mut().zip(reference.weights.iter()) {
                    *w += (r - *w) * config.learning_rate;
                }
                Adaptation::Imitated
            }
            _ => {
                self.reinitialize(rng);
                Adaptation::Restarted
            }
        }
    }
}

fn sigmoid(x: f32) -> f32 {
    (1.0 / (1.0 + (-x).exp())).clamp(MIN_ACTIVATION, MAX_ACTIVATION)
}

impl fmt::Debug for DecisionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.6}, {:.6}, {:.6}, {:.6}]",
            self.weights[0], self.weights[1], self.weights[2], self.weights[3]
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng;

    #[test]
    fn evaluation_is_pure() {
        let policy = DecisionPolicy::new(&mut rng::seeded(11));
        let inputs = [330.0, -4.0, 700.0, 1210.0];
        let first = policy.evaluate(inputs);
        for _ in 0..100 {
            assert_eq!(policy.evaluate(inputs), first);
        }
    }

    #[test]
    fn evaluation_is_strictly_between_zero_and_one() {
        let policy = DecisionPolicy::from_weights([1.0, 1.0, 1.0, 1.0]);
        for magnitude in [0.0, 1.0, 1e3, 1e5, 1e9, f32::MAX / 8.0] {
            for sign in [-1.0, 1.0] {
                let v = policy.evaluate([sign * magnitude; SENSOR_COUNT]);
                assert!(v > 0.0 && v < 1.0, "{} for input {}", v, sign * magnitude);
            }
        }
        let negative = DecisionPolicy::from_weights([-1.0; SENSOR_COUNT]);
        assert!(negative.evaluate([f32::MAX / 8.0; SENSOR_COUNT]) > 0.0);
    }

    #[test]
    fn evaluation_scales_inputs() {
        let policy = DecisionPolicy::from_weights([0.5, 0.0, 0.0, 0.0]);
        let expected = 1.0 / (1.0 + (-1.0f32).exp());
        assert!((policy.evaluate([2000.0, 0.0, 0.0, 0.0]) - expected).abs() < 1e-6);
    }

    #[test]
    fn reinitialized_weights_are_bounded() {
        let mut rng = rng::seeded(5);
        let mut policy = DecisionPolicy::from_weights([9.0; SENSOR_COUNT]);
        for _ in 0..200 {
            policy.reinitialize(&mut rng);
            assert!(policy.weights().iter().all(|w| (-1.0..=1.0).contains(w)));
        }
    }

    #[test]
    fn imitation_moves_one_learning_rate_step() {
        let config = PopulationConfig {
            exploration_threshold: 1.0,
            ..PopulationConfig::default()
        };
        let reference = DecisionPolicy::from_weights([1.0, 0.0, 0.0, 0.0]);
        let mut policy = DecisionPolicy::from_weights([0.0; SENSOR_COUNT]);

        let outcome = policy.adapt(Some(&reference), &config, &mut rng::seeded(0));

        assert_eq!(outcome, Adaptation::Imitated);
        assert_eq!(policy.weights(), &[0.2, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn missing_reference_always_restarts() {
        let config = PopulationConfig {
            exploration_threshold: 1.0,
            ..PopulationConfig::default()
        };
        let mut rng = rng::seeded(9);
        for _ in 0..50 {
            let mut policy = DecisionPolicy::from_weights([0.0; SENSOR_COUNT]);
            assert_eq!(policy.adapt(None, &config, &mut rng), Adaptation::Restarted);
            assert_ne!(policy.weights(), &[0.0; SENSOR_COUNT]);
        }
    }

    #[test]
    fn zero_threshold_always_restarts() {
        let config = PopulationConfig {
            exploration_threshold: 0.0,
            ..PopulationConfig::default()
        };
        let reference = DecisionPolicy::from_weights([1.0; SENSOR_COUNT]);
        let mut rng = rng::seeded(1);
        let restarts = (0..1000)
            .filter(|_| {
                let mut policy = DecisionPolicy::new(&mut rng);
                policy.adapt(Some(&reference), &config, &mut rng) == Adaptation::Restarted
            })
            .count();
        // A draw of exactly 0.0 is the only way to imitate.
        assert!(restarts >= 999);
    }

    #[test]
    fn default_threshold_mostly_imitates() {
        let config = PopulationConfig::default();
        let reference = DecisionPolicy::from_weights([1.0; SENSOR_COUNT]);
        let mut rng = rng::seeded(21);
        let imitations = (0..2000)
            .filter(|_| {
                let mut policy = DecisionPolicy::new(&mut rng);
                policy.adapt(Some(&reference), &config, &mut rng) == Adaptation::Imitated
            })
            .count();
        assert!((1700..=1900).contains(&imitations), "{}", imitations);
    }
}
