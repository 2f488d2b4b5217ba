use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned box described by its minimum corner and size.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    min: Vec2,
    size: Vec2,
}

impl Aabb {
    /// Creates a box from its minimum corner and size. Negative sizes collapse to zero.
    #[must_use]
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self {
            min,
            size: size.max(Vec2::ZERO),
        }
    }

    /// Creates a box centred on the provided point.
    #[must_use]
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self::new(center - size * 0.5, size)
    }

    /// Minimum corner.
    #[must_use]
    pub const fn min(&self) -> Vec2 {
        self.min
    }

    /// Maximum corner.
    #[must_use]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Extent along each axis.
    #[must_use]
    pub const fn size(&self) -> Vec2 {
        self.size
    }

    /// Centre point.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Area of the box.
    #[must_use]
    pub fn area(&self) -> f32 {
        self.size.x * self.size.y
    }

    /// Box sharing the same minimum corner with its size grown by `by`.
    #[must_use]
    pub fn grown(&self, by: Vec2) -> Self {
        Self::new(self.min, self.size + by)
    }

    /// Box sharing the same minimum corner with its size multiplied by `factor`.
    #[must_use]
    pub fn resized(&self, factor: f32) -> Self {
        Self::new(self.min, self.size * factor)
    }

    /// Strict overlap test; touching edges do not intersect.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        other.min.x < a_max.x && self.min.x < b_max.x && other.min.y < a_max.y && self.min.y < b_max.y
    }

    /// Reports whether `point` lies inside or on the boundary of the box.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.max();
        point.x >= self.min.x && point.x <= max.x && point.y >= self.min.y && point.y <= max.y
    }
}
