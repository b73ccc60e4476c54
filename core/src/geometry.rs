use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::PIXELS_PER_UNIT;

/// Continuous location on the battle map measured in map units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position(DVec2);

impl Position {
    /// Origin of the map coordinate system.
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    /// Creates a new position from its horizontal and vertical components.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self(DVec2::new(x, y))
    }

    /// Horizontal component measured in map units.
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.0.x
    }

    /// Vertical component measured in map units.
    #[must_use]
    pub const fn y(&self) -> f64 {
        self.0.y
    }

    /// Grid cell the position floors into.
    #[must_use]
    pub fn grid_coord(&self) -> GridCoord {
        GridCoord::new(self.0.x.floor() as i32, self.0.y.floor() as i32)
    }

    /// Euclidean distance between the two positions.
    #[must_use]
    pub fn distance(&self, other: Position) -> f64 {
        self.0.distance(other.0)
    }

    /// Unit vector pointing from `self` toward `other`.
    ///
    /// Coincident positions yield a zero vector.
    #[must_use]
    pub fn direction_to(&self, other: Position) -> Position {
        Self((other.0 - self.0).normalize_or_zero())
    }

    /// Linear interpolation between `self` (`t = 0`) and `other` (`t = 1`).
    #[must_use]
    pub fn lerp(&self, other: Position, t: f64) -> Position {
        Self(self.0.lerp(other.0, t))
    }

    /// Steps toward `target` by at most `step` map units.
    ///
    /// Lands exactly on `target` when it is no further than one step away.
    #[must_use]
    pub fn move_towards(&self, target: Position, step: f64) -> Position {
        let distance = self.distance(target);
        if distance <= step {
            return target;
        }

        Self(self.0 + (target.0 - self.0) / distance * step)
    }

    /// Clamps each axis independently into the inclusive `[min, max]` bounds.
    #[must_use]
    pub fn clamp(&self, min: Position, max: Position) -> Position {
        Self(self.0.clamp(min.0, max.0))
    }

    /// Converts map units into screen pixels.
    #[must_use]
    pub fn to_pixels(&self) -> Position {
        Self(self.0 * PIXELS_PER_UNIT)
    }

    /// Converts screen pixels into map units.
    #[must_use]
    pub fn from_pixels(pixels: Position) -> Position {
        Self(pixels.0 / PIXELS_PER_UNIT)
    }
}

/// Integer coordinate of a single cell in the spatial grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    x: i32,
    y: i32,
}

impl GridCoord {
    /// Creates a new grid coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Column of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row of the cell.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }
}
