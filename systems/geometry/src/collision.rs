//! Beam corridor collision and intercept prediction.

use prism_core::{Aabb, Vec2};

/// Beam hitbox width per unit of beam scale.
pub const HITBOX_COLLISION_WIDTH: f32 = 24.0;

/// Extra size absorption adds to projectile hitboxes.
const ABSORB_PADDING: f32 = 16.0;

/// Width multiplier of the absorption corridor.
const ABSORB_WIDTH_FACTOR: f32 = 1.6;

/// Clips the parametric segment `start + delta * t` for `t` in `[0, t_max]`
/// against the box `[min, max]`, returning the entry parameter.
fn clip(start: Vec2, delta: Vec2, min: Vec2, max: Vec2, t_max: f32) -> Option<f32> {
    let mut enter = 0.0_f32;
    let mut exit = t_max;
    for ((s, d), (lo, hi)) in start
        .to_array()
        .into_iter()
        .zip(delta.to_array())
        .zip(min.to_array().into_iter().zip(max.to_array()))
    {
        if d.abs() <= f32::EPSILON {
            if s < lo || s > hi {
                return None;
            }
            continue;
        }
        let inverse = 1.0 / d;
        let (near, far) = {
            let a = (lo - s) * inverse;
            let b = (hi - s) * inverse;
            if a <= b {
                (a, b)
            } else {
                (b, a)
            }
        };
        enter = enter.max(near);
        exit = exit.min(far);
        if enter > exit {
            return None;
        }
    }
    Some(enter)
}

/// Reports whether the segment from `start` to `end`, thickened to `width`,
/// touches `aabb`.
#[must_use]
pub fn segment_hits_aabb(aabb: Aabb, start: Vec2, end: Vec2, width: f32) -> bool {
    if !(start.is_finite() && end.is_finite()) {
        return false;
    }
    let pad = Vec2::splat(width.max(0.0) / 2.0);
    clip(start, end - start, aabb.min() - pad, aabb.max() + pad, 1.0).is_some()
}

/// Distance along the unit ray `origin + direction * t` at which it enters
/// `aabb`; 0 when the origin already lies inside.
#[must_use]
pub fn ray_entry(origin: Vec2, direction: Vec2, aabb: Aabb) -> Option<f32> {
    if !(origin.is_finite() && direction.is_finite()) {
        return None;
    }
    clip(origin, direction, aabb.min(), aabb.max(), f32::INFINITY)
}

/// Collision policy of a beam against another entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Corridor {
    /// Striking targets: hitbox as-is, base width.
    Strike,
    /// Absorbing projectiles: padded hitbox, widened corridor.
    Absorb,
}

impl Corridor {
    /// Reports whether an entity with hitbox `other` lies in the corridor of a
    /// beam whose core box is `core` and which spans `start` to `end` at `scale`.
    #[must_use]
    pub fn hits(self, core: Aabb, other: Aabb, start: Vec2, end: Vec2, scale: f32) -> bool {
        let width = HITBOX_COLLISION_WIDTH * scale;
        let (other, width) = match self {
            Self::Strike => (other, width),
            Self::Absorb => (
                other.grown(Vec2::splat(ABSORB_PADDING)),
                width * ABSORB_WIDTH_FACTOR,
            ),
        };
        core.intersects(&other) || segment_hits_aabb(other, start, end, width)
    }
}

/// Predicts where a projectile fired from `shooter` at `projectile_speed`
/// should aim to meet a target at `target` moving with `target_velocity`.
///
/// Solves the shooter/target/meeting-point triangle with the law of sines and
/// leads by half the solved distance. Returns `None` when no finite solution
/// exists.
#[must_use]
pub fn intercept_point(
    shooter: Vec2,
    target: Vec2,
    target_velocity: Vec2,
    projectile_speed: f32,
) -> Option<Vec2> {
    let speed = f64::from(target_velocity.length());
    if speed <= f64::EPSILON {
        return Some(target);
    }
    if projectile_speed <= 0.0 {
        return None;
    }

    let heading = target + target_velocity * 3600.0;
    let to_shooter = shooter - target;
    let to_heading = heading - target;
    let sin_b = f64::from(to_shooter.perp_dot(to_heading))
        / (f64::from(to_shooter.length()) * f64::from(to_heading.length()));
    let sin_a = speed / f64::from(projectile_speed) * sin_b;
    let sin_c = sin_a * (1.0 - sin_b * sin_b).sqrt() + sin_b * (1.0 - sin_a * sin_a).sqrt();
    let length_bc = sin_a / sin_c * f64::from(to_shooter.length());

    let lead = target_velocity.normalize() * (length_bc / 2.0) as f32;
    let point = target + lead;
    point.is_finite().then_some(point)
}
