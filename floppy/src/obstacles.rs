//! The scrolling obstacle course: pairs of blocks
//! with a gap between them, entering from the right
//! edge of the screen and leaving through the left.
mod config;
mod timer;

pub use config::CourseConfig;
pub use timer::SpawnTimer;

use crate::geometry::{Color, Rect};

use rand::Rng;
use tracing::trace;

/// Color obstacles are drawn with.
pub const OBSTACLE_COLOR: Color = Color(0, 255, 100);
/// Color of the obstacle currently sensed by the agents.
pub const NEAREST_OBSTACLE_COLOR: Color = Color(100, 100, 100);

/// A top and a bottom block sharing their horizontal
/// extent, separated by a gap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObstaclePair {
    top: Rect,
    bottom: Rect,
}

impl ObstaclePair {
    /// Creates a pair at horizontal position `x` whose top
    /// block is `gap_top` high. The bottom block starts
    /// `gap_size` below it and reaches the bottom of the screen.
    ///
    /// # Examples
    /// ```
    /// use floppy::{CourseConfig, ObstaclePair};
    ///
    /// let course = CourseConfig::with_screen(800, 600);
    /// let pair = ObstaclePair::new(800, 100, &course);
    ///
    /// assert_eq!(pair.top().bottom(), 100);
    /// assert_eq!(pair.gap_floor(), 400);
    /// assert_eq!(pair.bottom().bottom(), 600);
    /// assert_eq!(pair.right(), 870);
    /// ```
    pub fn new(x: i32, gap_top: i32, course: &CourseConfig) -> ObstaclePair {
        let gap_floor = gap_top + course.gap_size;
        ObstaclePair {
            top: Rect::new(x, 0, course.obstacle_width, gap_top),
            bottom: Rect::new(
                x,
                gap_floor,
                course.obstacle_width,
                course.screen_height - gap_floor,
            ),
        }
    }

    pub fn top(&self) -> Rect {
        self.top
    }

    pub fn bottom(&self) -> Rect {
        self.bottom
    }

    /// Both blocks of the pair.
    pub fn rects(&self) -> [Rect; 2] {
        [self.top, self.bottom]
    }

    pub fn left(&self) -> i32 {
        self.top.left()
    }

    pub fn right(&self) -> i32 {
        self.top.right()
    }

    /// Upper edge of the gap.
    pub fn gap_ceiling(&self) -> i32 {
        self.top.bottom()
    }

    /// Lower edge of the gap.
    pub fn gap_floor(&self) -> i32 {
        self.bottom.top()
    }

    fn shift_left(&mut self, distance: i32) {
        self.top.x -= distance;
        self.bottom.x -= distance;
    }
}

/// The obstacle pairs currently on the course,
/// in spawn order.
#[derive(Clone, Debug)]
pub struct ObstacleField {
    pairs: Vec<ObstaclePair>,
    course: CourseConfig,
}

impl ObstacleField {
    /// Creates an empty field.
    pub fn new(course: CourseConfig) -> ObstacleField {
        ObstacleField {
            pairs: vec![],
            course,
        }
    }

    /// Drops every pair that has fully left the screen,
    /// then scrolls the remaining ones left.
    pub fn advance(&mut self) {
        self.pairs.retain(|pair| pair.right() >= 0);
        let speed = self.course.scroll_speed;
        for pair in &mut self.pairs {
            pair.shift_left(speed);
        }
    }

    /// Adds a pair at the right edge of the screen with
    /// a randomly placed gap.
    pub fn spawn_pair(&mut self, rng: &mut impl Rng) -> &ObstaclePair {
        let gap_top = rng.gen_range(self.course.lowest_gap_top()..=self.course.highest_gap_top());
        self.spawn_pair_with_gap(gap_top)
    }

    /// Adds a pair at the right edge of the screen with
    /// a top block `gap_top` high, clamped so that the gap
    /// respects the configured margins.
    pub fn spawn_pair_with_gap(&mut self, gap_top: i32) -> &ObstaclePair {
        let gap_top = gap_top.clamp(self.course.lowest_gap_top(), self.course.highest_gap_top());
        trace!(gap_top, "spawning obstacle pair");
        self.pairs
            .push(ObstaclePair::new(self.course.screen_width, gap_top, &self.course));
        &self.pairs[self.pairs.len() - 1]
    }

    /// Removes every pair.
    pub fn clear(&mut self) {
        self.pairs.clear();
    }

    /// Returns the pair whose right edge is closest ahead of
    /// `lane_x`, within sight. Pairs whose gap floor is not
    /// below the sensor margin are skipped.
    ///
    /// # Examples
    /// ```
    /// use floppy::{CourseConfig, ObstacleField};
    ///
    /// let mut field = ObstacleField::new(CourseConfig::with_screen(800, 600));
    /// assert!(field.nearest_ahead(130).is_none());
    ///
    /// field.spawn_pair_with_gap(150);
    /// assert_eq!(field.nearest_ahead(130).unwrap().gap_floor(), 450);
    /// assert!(field.nearest_ahead(900).is_none());
    /// ```
    pub fn nearest_ahead(&self, lane_x: i32) -> Option<&ObstaclePair> {
        self.pairs
            .iter()
            .filter(|pair| pair.gap_floor() > self.course.sensor_margin)
            .map(|pair| (pair.right() - lane_x, pair))
            .filter(|(distance, _)| 0 < *distance && *distance <= self.course.max_sight)
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, pair)| pair)
    }

    pub fn pairs(&self) -> &[ObstaclePair] {
        &self.pairs
    }

    /// Every block on the course, for drawing.
    pub fn rects(&self) -> impl Iterator<Item = Rect> + '_ {
        self.pairs.iter().flat_map(ObstaclePair::rects)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn course(&self) -> &CourseConfig {
        &self.course
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng;

    #[test]
    fn spawned_gaps_stay_within_margins() {
        let mut field = ObstacleField::new(CourseConfig::with_screen(800, 600));
        let mut rng = rng::seeded(4);
        let mut seen = std::collections::BTreeSet::new();
        for _ in 0..2000 {
            let pair = *field.spawn_pair(&mut rng);
            assert!((100..=200).contains(&pair.gap_ceiling()));
            assert_eq!(pair.gap_floor() - pair.gap_ceiling(), 300);
            assert_eq!(pair.top().top(), 0);
            assert_eq!(pair.bottom().bottom(), 600);
            assert_eq!(pair.left(), 800);
            assert_eq!(pair.top().width, 70);
            assert_eq!(pair.bottom().width, 70);
            seen.insert(pair.gap_ceiling());
        }
        assert!(seen.contains(&100));
        assert!(seen.contains(&200));
        assert_eq!(field.len(), 2000);
    }

    #[test]
    fn explicit_gaps_are_clamped() {
        let mut field = ObstacleField::new(CourseConfig::with_screen(800, 600));
        assert_eq!(field.spawn_pair_with_gap(0).gap_ceiling(), 100);
        assert_eq!(field.spawn_pair_with_gap(450).gap_ceiling(), 200);
    }

    #[test]
    fn pair_scrolls_off_and_is_removed() {
        let mut field = ObstacleField::new(CourseConfig::with_screen(800, 600));
        field.spawn_pair_with_gap(100);

        // Pairs enter with their left edge on the screen border and
        // leave once their right edge is past zero, so the left edge
        // touching zero after 160 advances still leaves a visible pair.
        for _ in 0..160 {
            field.advance();
        }
        assert_eq!(field.pairs()[0].left(), 0);
        assert_eq!(field.pairs()[0].top().left(), field.pairs()[0].bottom().left());

        // The right edge is 870 - 5n after n advances.
        for _ in 160..175 {
            field.advance();
        }
        assert_eq!(field.pairs()[0].right(), -5);

        field.advance();
        assert!(field.is_empty());
    }

    #[test]
    fn removal_does_not_skip_neighbours() {
        let course = CourseConfig::with_screen(800, 600);
        let mut field = ObstacleField::new(course.clone());
        field.pairs = vec![
            ObstaclePair::new(-80, 100, &course),
            ObstaclePair::new(-75, 100, &course),
            ObstaclePair::new(10, 100, &course),
            ObstaclePair::new(-100, 100, &course),
            ObstaclePair::new(300, 100, &course),
        ];
        field.advance();
        let lefts: Vec<i32> = field.pairs().iter().map(ObstaclePair::left).collect();
        assert_eq!(lefts, vec![5, 295]);
    }

    #[test]
    fn nearest_ignores_pairs_behind_and_out_of_sight() {
        let course = CourseConfig {
            max_sight: 500,
            ..CourseConfig::with_screen(800, 600)
        };
        let mut field = ObstacleField::new(course.clone());
        field.pairs = vec![
            ObstaclePair::new(60, 100, &course),
            ObstaclePair::new(700, 150, &course),
            ObstaclePair::new(300, 120, &course),
            ObstaclePair::new(200, 130, &course),
        ];
        // Right edges: 130 (not ahead), 770 (out of sight), 370, 270.
        assert_eq!(field.nearest_ahead(130).unwrap().gap_ceiling(), 130);
        assert_eq!(field.nearest_ahead(300).unwrap().gap_ceiling(), 120);
        assert!(field.nearest_ahead(770).is_none());
    }

    #[test]
    fn nearest_skips_gaps_hugging_the_top() {
        let course = CourseConfig {
            gap_size: 10,
            gap_margin: 0,
            ..CourseConfig::with_screen(800, 600)
        };
        let mut field = ObstacleField::new(course.clone());
        field.pairs = vec![
            ObstaclePair::new(200, 5, &course),
            ObstaclePair::new(400, 50, &course),
        ];
        assert_eq!(field.nearest_ahead(130).unwrap().left(), 400);
    }

    #[test]
    fn clear_empties_the_field() {
        let mut field = ObstacleField::new(CourseConfig::with_screen(800, 600));
        field.spawn_pair_with_gap(100);
        field.spawn_pair_with_gap(150);
        assert_eq!(field.rects().count(), 4);
        field.clear();
        assert!(field.is_empty());
        assert!(field.nearest_ahead(0).is_none());
    }
}
