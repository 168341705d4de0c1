use crate::populations::ConfigError;

use serde::{Deserialize, Serialize};

/// Geometry and cadence of the obstacle course.
///
/// The screen dimensions are provided once at startup
/// and never change during a run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseConfig {
    pub screen_width: i32,
    pub screen_height: i32,
    /// Vertical size of the opening in every obstacle pair.
    pub gap_size: i32,
    /// Minimum distance between the gap and either
    /// edge of the screen.
    pub gap_margin: i32,
    /// Horizontal size of every obstacle.
    pub obstacle_width: i32,
    /// Pixels an obstacle moves left each tick.
    pub scroll_speed: i32,
    /// Pairs whose gap floor is not below this are
    /// ignored when looking for the nearest obstacle.
    pub sensor_margin: i32,
    /// Farthest horizontal distance at which an
    /// obstacle can be sensed.
    pub max_sight: i32,
    /// Gap floor reported when no obstacle is sensed.
    pub default_gap_floor: i32,
    /// Delay before the first spawn of every generation.
    pub initial_spawn_delay_ms: u32,
    /// Spawn delays are this period times a random multiplier.
    pub spawn_base_period_ms: u32,
    pub spawn_multiplier_min: u32,
    pub spawn_multiplier_max: u32,
}

impl Default for CourseConfig {
    fn default() -> CourseConfig {
        CourseConfig {
            screen_width: 1920,
            screen_height: 1080,
            gap_size: 300,
            gap_margin: 100,
            obstacle_width: 70,
            scroll_speed: 5,
            sensor_margin: 20,
            max_sight: 1920,
            default_gap_floor: 600,
            initial_spawn_delay_ms: 100,
            spawn_base_period_ms: 1000,
            spawn_multiplier_min: 2,
            spawn_multiplier_max: 5,
        }
    }
}

impl CourseConfig {
    /// Returns the default course on a screen
    /// of the given size.
    ///
    /// # Examples
    /// ```
    /// use floppy::CourseConfig;
    ///
    /// let course = CourseConfig::with_screen(800, 600);
    /// assert_eq!(course.gap_size, 300);
    /// assert_eq!(course.highest_gap_top(), 200);
    /// ```
    pub fn with_screen(screen_width: i32, screen_height: i32) -> CourseConfig {
        CourseConfig {
            screen_width,
            screen_height,
            ..CourseConfig::default()
        }
    }

    /// Smallest allowed height of a pair's top block.
    pub fn lowest_gap_top(&self) -> i32 {
        self.gap_margin
    }

    /// Largest allowed height of a pair's top block.
    pub fn highest_gap_top(&self) -> i32 {
        self.screen_height - self.gap_margin - self.gap_size
    }

    /// Checks that a gap always fits on screen and that
    /// obstacles have a size and actually scroll.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("screen_width", self.screen_width),
            ("screen_height", self.screen_height),
            ("gap_size", self.gap_size),
            ("obstacle_width", self.obstacle_width),
            ("scroll_speed", self.scroll_speed),
            ("max_sight", self.max_sight),
        ] {
            if value <= 0 {
                return Err(ConfigError::NonPositive(name));
            }
        }
        if self.gap_margin < 0 {
            return Err(ConfigError::Negative("gap_margin"));
        }
        if self.highest_gap_top() < self.lowest_gap_top() {
            return Err(ConfigError::GapDoesNotFit {
                screen_height: self.screen_height,
                gap_size: self.gap_size,
                gap_margin: self.gap_margin,
            });
        }
        if self.spawn_multiplier_min == 0 || self.spawn_multiplier_min > self.spawn_multiplier_max {
            return Err(ConfigError::EmptyMultiplierRange(
                self.spawn_multiplier_min,
                self.spawn_multiplier_max,
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_course_is_valid() {
        assert_eq!(CourseConfig::default().validate(), Ok(()));
        assert_eq!(CourseConfig::with_screen(800, 600).validate(), Ok(()));
    }

    #[test]
    fn gap_must_fit() {
        let course = CourseConfig::with_screen(800, 499);
        assert_eq!(
            course.validate(),
            Err(ConfigError::GapDoesNotFit {
                screen_height: 499,
                gap_size: 300,
                gap_margin: 100,
            })
        );
        // Exactly one valid gap position.
        assert_eq!(CourseConfig::with_screen(800, 500).validate(), Ok(()));
    }

    #[test]
    fn multiplier_range_must_be_non_empty() {
        let course = CourseConfig {
            spawn_multiplier_min: 6,
            ..CourseConfig::default()
        };
        assert_eq!(course.validate(), Err(ConfigError::EmptyMultiplierRange(6, 5)));
    }

    #[test]
    fn partial_documents_fill_in_defaults() {
        let course: CourseConfig =
            serde_json::from_str(r#"{ "screen_width": 800, "screen_height": 600 }"#).unwrap();
        assert_eq!(course, CourseConfig::with_screen(800, 600));
    }
}
