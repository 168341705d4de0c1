//! Agents are the flapping entities of the simulation.
//! Each one senses the nearest obstacle, asks its
//! policy whether to jump, and falls otherwise.
mod config;

pub use config::PhysicsConfig;

use crate::geometry::{Color, Rect};
use crate::obstacles::{CourseConfig, ObstaclePair};
use crate::policy::{DecisionPolicy, SENSOR_COUNT};

use rand::Rng;

/// An agent with a policy, a vertical physics
/// state and a survival-time fitness.
#[derive(Clone, Debug)]
pub struct Agent {
    rect: Rect,
    spawn_y: i32,
    velocity: i32,
    alive: bool,
    ticks_survived: u64,
    policy: DecisionPolicy,
    color: Color,
    physics: PhysicsConfig,
}

impl Agent {
    /// Creates a living agent whose bounding box has its
    /// top-left corner at `(x, y)`, with a random color.
    ///
    /// # Examples
    /// ```
    /// use floppy::{rng, Agent, DecisionPolicy, PhysicsConfig};
    ///
    /// let mut rng = rng::seeded(0);
    /// let policy = DecisionPolicy::new(&mut rng);
    /// let agent = Agent::new(130, 270, policy, PhysicsConfig::default(), &mut rng);
    ///
    /// assert!(agent.is_alive());
    /// assert_eq!(agent.rect().bottom(), 330);
    /// assert_eq!(agent.fitness(), 0.0);
    /// ```
    pub fn new(
        x: i32,
        y: i32,
        policy: DecisionPolicy,
        physics: PhysicsConfig,
        rng: &mut impl Rng,
    ) -> Agent {
        Agent {
            rect: Rect::new(x, y, physics.agent_size, physics.agent_size),
            spawn_y: y,
            velocity: 0,
            alive: true,
            ticks_survived: 0,
            policy,
            color: Color::random(rng),
            physics,
        }
    }

    /// Advances the agent by one tick.
    ///
    /// Dead agents are left untouched. A living agent first
    /// checks whether it should die; if not, it consults its
    /// policy, possibly jumping, then applies gravity and
    /// moves.
    pub fn update(
        &mut self,
        obstacles: &[ObstaclePair],
        nearest: Option<&ObstaclePair>,
        course: &CourseConfig,
        jump_threshold: f32,
    ) {
        if !self.alive {
            return;
        }
        if self.should_die(obstacles, course.screen_height) {
            self.die();
            return;
        }
        if self.policy.evaluate(self.sensors(nearest, course)) < jump_threshold {
            self.jump();
        }
        self.velocity = (self.velocity + self.physics.gravity).min(self.physics.max_fall_speed);
        self.rect.y += self.velocity;
        self.ticks_survived += 1;
    }

    /// Sets the vertical velocity to the jump impulse,
    /// regardless of its previous value.
    pub fn jump(&mut self) {
        self.velocity = self.physics.jump_impulse;
    }

    /// Sensor readings fed to the policy. Without a sensed
    /// obstacle, a fixed gap floor and the maximum sight
    /// distance are reported.
    pub fn sensors(
        &self,
        nearest: Option<&ObstaclePair>,
        course: &CourseConfig,
    ) -> [f32; SENSOR_COUNT] {
        let (gap_floor, obstacle_right) = match nearest {
            Some(pair) => (pair.gap_floor(), pair.right()),
            None => (course.default_gap_floor, course.max_sight),
        };
        [
            self.rect.bottom() as f32,
            self.velocity as f32,
            gap_floor as f32,
            obstacle_right as f32,
        ]
    }

    /// Returns whether the agent left the screen vertically
    /// or overlaps any obstacle.
    pub fn should_die(&self, obstacles: &[ObstaclePair], screen_height: i32) -> bool {
        self.rect.top() < 0
            || self.rect.bottom() > screen_height
            || obstacles
                .iter()
                .flat_map(ObstaclePair::rects)
                .any(|r| self.rect.intersects(&r))
    }

    /// Kills the agent, freezing its fitness and moving
    /// it back to its spawn height.
    pub fn die(&mut self) {
        self.alive = false;
        self.rect.y = self.spawn_y;
    }

    /// Brings the agent back to life with its
    /// survival time counted from zero.
    pub fn resurrect(&mut self) {
        self.alive = true;
        self.ticks_survived = 0;
    }

    /// Survival time in seconds since the last resurrection.
    /// Frozen once the agent dies.
    pub fn fitness(&self) -> f32 {
        self.ticks_survived as f32 / self.physics.tick_rate
    }

    /// Ticks survived since the last resurrection.
    pub fn ticks_survived(&self) -> u64 {
        self.ticks_survived
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn velocity(&self) -> i32 {
        self.velocity
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn policy(&self) -> &DecisionPolicy {
        &self.policy
    }

    pub(crate) fn policy_mut(&mut self) -> &mut DecisionPolicy {
        &mut self.policy
    }

    /// Marks the agent as dead after having survived `ticks`.
    #[cfg(test)]
    pub(crate) fn kill_after(&mut self, ticks: u64) {
        self.ticks_survived = ticks;
        self.die();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng;

    const IDLE: DecisionPolicy = DecisionPolicy::from_weights([0.0; SENSOR_COUNT]);
    const EAGER: DecisionPolicy = DecisionPolicy::from_weights([-1.0, 0.0, 0.0, -1.0]);

    fn agent_with(policy: DecisionPolicy) -> Agent {
        Agent::new(130, 270, policy, PhysicsConfig::default(), &mut rng::seeded(0))
    }

    fn tall_course() -> CourseConfig {
        CourseConfig::with_screen(800, 100_000)
    }

    #[test]
    fn velocity_never_exceeds_fall_speed() {
        let course = tall_course();
        let mut agent = agent_with(IDLE);
        for _ in 0..200 {
            agent.update(&[], None, &course, 0.4);
            assert!(agent.is_alive());
            assert!(agent.velocity() <= 15);
        }
        assert_eq!(agent.velocity(), 15);
    }

    #[test]
    fn jump_overrides_velocity() {
        let course = tall_course();
        let mut agent = agent_with(IDLE);
        for _ in 0..30 {
            agent.update(&[], None, &course, 0.4);
        }
        agent.jump();
        assert_eq!(agent.velocity(), -15);
        agent.jump();
        assert_eq!(agent.velocity(), -15);
    }

    #[test]
    fn policy_triggers_jump_before_gravity() {
        let course = CourseConfig::with_screen(800, 600);
        let mut agent = agent_with(EAGER);
        agent.update(&[], None, &course, 0.4);
        assert_eq!(agent.velocity(), -14);
        assert_eq!(agent.rect().y, 256);
    }

    #[test]
    fn idle_agent_falls_out_of_the_screen() {
        let course = CourseConfig::with_screen(800, 600);
        let mut agent = agent_with(IDLE);
        let mut ticks = 0;
        while agent.is_alive() {
            agent.update(&[], None, &course, 0.4);
            ticks += 1;
            assert!(ticks < 100);
        }
        // 26 ticks of falling bring the bottom edge to 615,
        // detected at the start of the 27th.
        assert_eq!(ticks, 27);
        assert_eq!(agent.ticks_survived(), 26);
        assert_eq!(agent.rect().y, 270);
    }

    #[test]
    fn sensors_default_without_obstacle() {
        let course = CourseConfig::with_screen(800, 600);
        let agent = agent_with(IDLE);
        assert_eq!(agent.sensors(None, &course), [330.0, 0.0, 600.0, 1920.0]);

        let pair = ObstaclePair::new(400, 100, &course);
        assert_eq!(agent.sensors(Some(&pair), &course), [330.0, 0.0, 400.0, 470.0]);
    }

    #[test]
    fn collision_kills() {
        let course = CourseConfig::with_screen(800, 600);
        let mut agent = agent_with(IDLE);
        // Top block reaches y = 300, overlapping the agent at 270..330.
        let pair = ObstaclePair::new(150, 300, &course);
        assert!(agent.should_die(&[pair], course.screen_height));
        agent.update(&[pair], Some(&pair), &course, 0.4);
        assert!(!agent.is_alive());
        assert_eq!(agent.fitness(), 0.0);

        // Touching edges do not collide.
        let pair = ObstaclePair::new(190, 100, &course);
        assert!(!agent.should_die(&[pair], course.screen_height));
    }

    #[test]
    fn death_freezes_state() {
        let course = CourseConfig::with_screen(800, 600);
        let mut agent = agent_with(IDLE);
        for _ in 0..10 {
            agent.update(&[], None, &course, 0.4);
        }
        agent.die();
        let (rect, velocity, fitness) = (agent.rect(), agent.velocity(), agent.fitness());
        let blocking = ObstaclePair::new(100, 300, &course);
        for _ in 0..50 {
            agent.update(&[blocking], Some(&blocking), &course, 0.4);
            assert_eq!(agent.rect(), rect);
            assert_eq!(agent.velocity(), velocity);
            assert_eq!(agent.fitness(), fitness);
        }

        agent.resurrect();
        assert!(agent.is_alive());
        assert_eq!(agent.fitness(), 0.0);
    }

    #[test]
    fn fitness_grows_while_alive() {
        let course = tall_course();
        let mut agent = agent_with(IDLE);
        let mut last = agent.fitness();
        for _ in 0..120 {
            agent.update(&[], None, &course, 0.4);
            assert!(agent.fitness() >= last);
            last = agent.fitness();
        }
        assert_eq!(agent.fitness(), 2.0);
    }
}
