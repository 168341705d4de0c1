use rand::Rng;
use serde::{Deserialize, Serialize};

use std::fmt;

/// An axis-aligned rectangle in screen pixels.
///
/// The origin is the top-left corner of the screen,
/// with `y` growing downwards.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Creates a new rectangle from its top-left
    /// corner and its dimensions.
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Rect {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn left(&self) -> i32 {
        self.x
    }

    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    pub const fn top(&self) -> i32 {
        self.y
    }

    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Returns whether the two rectangles overlap.
    ///
    /// Rectangles that only share an edge do not
    /// overlap.
    ///
    /// # Examples
    /// ```
    /// use floppy::Rect;
    ///
    /// let a = Rect::new(0, 0, 10, 10);
    /// assert!(a.intersects(&Rect::new(9, 9, 5, 5)));
    /// assert!(!a.intersects(&Rect::new(10, 0, 5, 5)));
    /// ```
    pub const fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

impl fmt::Debug for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}) {}x{}",
            self.x, self.y, self.width, self.height
        )
    }
}

/// An RGB color, as handed to whatever draws the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    /// Returns a uniformly random color.
    pub fn random(rng: &mut impl Rng) -> Color {
        Color(rng.gen(), rng.gen(), rng.gen())
    }
}
