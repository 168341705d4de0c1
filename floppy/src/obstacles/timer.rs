use super::CourseConfig;
use crate::agents::PhysicsConfig;

use rand::Rng;

/// Tick-driven countdown deciding when the next obstacle
/// pair enters the course.
///
/// After every expiry the timer re-arms itself with the
/// base period scaled by a random whole multiplier.
#[derive(Clone, Debug)]
pub struct SpawnTimer {
    remaining: Option<u32>,
    initial_delay: u32,
    base_period: u32,
    multiplier_min: u32,
    multiplier_max: u32,
}

impl SpawnTimer {
    /// Returns a running timer armed with the initial delay.
    ///
    /// # Examples
    /// ```
    /// use floppy::{rng, CourseConfig, PhysicsConfig, SpawnTimer};
    ///
    /// let mut timer = SpawnTimer::new(&CourseConfig::default(), &PhysicsConfig::default());
    /// let mut rng = rng::seeded(0);
    ///
    /// // 100ms at 60 ticks per second.
    /// let fired = (1..=6).map(|_| timer.tick(&mut rng)).collect::<Vec<_>>();
    /// assert_eq!(fired, [false, false, false, false, false, true]);
    /// ```
    pub fn new(course: &CourseConfig, physics: &PhysicsConfig) -> SpawnTimer {
        let initial_delay = physics.ticks_for_millis(course.initial_spawn_delay_ms);
        SpawnTimer {
            remaining: Some(initial_delay),
            initial_delay,
            base_period: physics.ticks_for_millis(course.spawn_base_period_ms),
            multiplier_min: course.spawn_multiplier_min,
            multiplier_max: course.spawn_multiplier_max,
        }
    }

    /// Counts down one tick. Returns whether a pair
    /// should be spawned now. Paused timers never fire.
    pub fn tick(&mut self, rng: &mut impl Rng) -> bool {
        match self.remaining {
            None => false,
            Some(remaining) if remaining > 1 => {
                self.remaining = Some(remaining - 1);
                false
            }
            Some(_) => {
                self.remaining = Some(self.next_delay(rng));
                true
            }
        }
    }

    /// Stops the countdown.
    pub fn pause(&mut self) {
        self.remaining = None;
    }

    /// Restarts the countdown from the initial delay.
    pub fn resume(&mut self) {
        self.remaining = Some(self.initial_delay);
    }

    pub fn is_running(&self) -> bool {
        self.remaining.is_some()
    }

    /// Ticks left before the next spawn, if running.
    pub fn remaining(&self) -> Option<u32> {
        self.remaining
    }

    fn next_delay(&self, rng: &mut impl Rng) -> u32 {
        let multiplier = rng.gen_range(self.multiplier_min..=self.multiplier_max.max(self.multiplier_min));
        self.base_period.saturating_mul(multiplier).max(1)
    }
}
