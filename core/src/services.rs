//! Seams between the simulation and the environment it runs in.

use std::fmt::Debug;

use glam::Vec2;

use crate::Aabb;

/// Read-only view of solid terrain consumed by beam hitscans and line-of-sight checks.
pub trait Terrain: Debug {
    /// Casts `samples.len()` parallel rays spread across `width` and writes each
    /// ray's unobstructed distance, capped at `max_distance`, into `samples`.
    fn laser_scan(
        &self,
        origin: Vec2,
        direction: Vec2,
        width: f32,
        max_distance: f32,
        samples: &mut [f32],
    );

    /// Reports whether a straight line between the two boxes is free of solid terrain.
    fn can_hit_line(&self, from: Aabb, to: Aabb) -> bool;
}

/// Entity that beams may strike.
pub trait Targetable {
    /// World-space hitbox.
    fn hitbox(&self) -> Aabb;

    /// Reports whether the entity is hostile and may currently be struck.
    fn is_strikeable(&self) -> bool;

    /// Reports whether the entity accepts a hit from a beam with the given inner brightness.
    fn accepts_beam(&self, inner_brightness: f32) -> bool;
}

/// Foreign projectile that overcharged beams may erode, hijack, or shatter.
pub trait Absorbable {
    /// World-space hitbox.
    fn hitbox(&self) -> Aabb;

    /// Reports whether the projectile is currently eligible for absorption.
    fn is_absorbable(&self) -> bool;
}
