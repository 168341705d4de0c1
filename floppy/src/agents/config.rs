use crate::populations::ConfigError;

use serde::{Deserialize, Serialize};

/// Per-tick physics shared by every agent.
///
/// Speeds are in pixels per tick; `y` grows downwards,
/// so negative velocities move an agent up.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Side of an agent's square bounding box.
    pub agent_size: i32,
    /// Velocity added every tick.
    pub gravity: i32,
    /// Upper bound on downward velocity.
    pub max_fall_speed: i32,
    /// Velocity assigned by a jump.
    pub jump_impulse: i32,
    /// Simulated ticks per second. Survival time
    /// is reported in seconds using this rate.
    pub tick_rate: f32,
}

impl Default for PhysicsConfig {
    fn default() -> PhysicsConfig {
        PhysicsConfig {
            agent_size: 60,
            gravity: 1,
            max_fall_speed: 15,
            jump_impulse: -15,
            tick_rate: 60.0,
        }
    }
}

impl PhysicsConfig {
    /// Checks that the agent has a size and time flows.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.agent_size <= 0 {
            return Err(ConfigError::NonPositive("agent_size"));
        }
        if self.tick_rate.is_nan() || self.tick_rate <= 0.0 {
            return Err(ConfigError::NonPositive("tick_rate"));
        }
        Ok(())
    }

    /// Converts a duration in milliseconds into
    /// a whole number of ticks, never less than one.
    pub fn ticks_for_millis(&self, millis: u32) -> u32 {
        ((millis as f32 * self.tick_rate / 1000.0).round() as u32).max(1)
    }
}
