#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure geometry for the prism swarm: orbits, aiming, beam pose, hitscans,
//! and beam collision corridors.
//!
//! Nothing here touches world state. Terrain is consulted only through the
//! [`Terrain`](prism_core::Terrain) trait.

mod collision;
mod hitscan;

use std::f32::consts::{PI, TAU};

use prism_core::Vec2;

pub use collision::{
    intercept_point, ray_entry, segment_hits_aabb, Corridor, HITBOX_COLLISION_WIDTH,
};
pub use hitscan::{
    chord_length, hitscan_length, short_range, smooth_length, HitscanInput, HITSCAN_SAMPLES,
    LENGTH_CHANGE_FACTOR, TILE_COLLISION_WIDTH,
};

/// Direction used whenever a vector cannot be normalised.
pub const DEFAULT_DIRECTION: Vec2 = Vec2::NEG_Y;

/// Largest beam width scale, reached at full charge.
pub const MAX_BEAM_SCALE: f32 = 2.0;

/// Largest angular spread multiplier, used at zero charge.
pub const MAX_BEAM_SPREAD: f32 = 1.3;

/// Orbit expansion ticks needed to reach the full orbit radius.
pub const ORBIT_EXPANSION_TICKS: f32 = 180.0;

/// Distance beams start ahead of their controller's centre.
pub const MUZZLE_OFFSET: f32 = 16.0;

/// Linear interpolation between `from` and `to`.
#[must_use]
pub fn lerp(from: f32, to: f32, amount: f32) -> f32 {
    from + (to - from) * amount
}

/// Rotates `vector` counter-clockwise by `angle` radians.
#[must_use]
pub fn rotate(vector: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(vector.x * cos - vector.y * sin, vector.x * sin + vector.y * cos)
}

/// Angle of `vector` measured from +X.
#[must_use]
pub fn angle_of(vector: Vec2) -> f32 {
    vector.y.atan2(vector.x)
}

/// Normalises `primary`, falling back to `secondary`, then to [`DEFAULT_DIRECTION`].
#[must_use]
pub fn normalize_or(primary: Vec2, secondary: Vec2) -> Vec2 {
    primary
        .try_normalize()
        .or_else(|| secondary.try_normalize())
        .unwrap_or(DEFAULT_DIRECTION)
}

/// Moves the unit direction of `current` a fraction `responsiveness` of the
/// way toward the unit vector `target`, returning a unit vector.
#[must_use]
pub fn blend_aim(current: Vec2, target: Vec2, responsiveness: f32) -> Vec2 {
    let target = target.try_normalize().unwrap_or(DEFAULT_DIRECTION);
    let from = current.try_normalize().unwrap_or(target);
    from.lerp(target, responsiveness)
        .try_normalize()
        .unwrap_or(target)
}

/// Expanding circular orbit of a controller around its actor.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Orbit {
    angle: f32,
    expansion: f32,
}

impl Orbit {
    /// Current orbit angle in radians.
    #[must_use]
    pub const fn angle(&self) -> f32 {
        self.angle
    }

    /// Elapsed expansion ticks, capped at [`ORBIT_EXPANSION_TICKS`].
    #[must_use]
    pub const fn expansion(&self) -> f32 {
        self.expansion
    }

    /// Overrides the orbit angle.
    pub fn set_angle(&mut self, angle: f32) {
        self.angle = angle;
    }

    /// Orbit radius; grows quadratically with expansion up to `max_distance`.
    #[must_use]
    pub fn radius(&self, max_distance: f32) -> f32 {
        let progress = self.expansion / ORBIT_EXPANSION_TICKS;
        max_distance * progress * progress
    }

    /// Offset of the orbit point from the orbit centre.
    #[must_use]
    pub fn offset(&self, max_distance: f32) -> Vec2 {
        let (sin, cos) = self.angle.sin_cos();
        Vec2::new(cos, sin) * self.radius(max_distance)
    }

    /// Spins the orbit and widens it by one tick. Faster attack speeds slow the spin.
    pub fn advance(&mut self, attack_speed: f32) {
        let speed = if attack_speed > 0.0 { attack_speed } else { 1.0 };
        self.angle += PI / 60.0 * self.expansion / ORBIT_EXPANSION_TICKS / speed;
        self.angle %= TAU;
        if self.expansion < ORBIT_EXPANSION_TICKS {
            self.expansion += 1.0;
        }
    }
}

/// Charge-dependent beam shape parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BeamShape {
    /// Width scale.
    pub scale: f32,
    /// Angular spread multiplier.
    pub spread: f32,
    /// Sideways emitter offset.
    pub sideways_offset: f32,
    /// Forward emitter offset; negative values pull the origin back.
    pub forward_offset: f32,
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
    /// Charge ticks per full revolution of the beam phase; lower spins faster.
    pub spin_rate: f32,
}

impl BeamShape {
    /// Shape at full charge.
    pub const FULL: Self = Self {
        scale: MAX_BEAM_SCALE,
        spread: 0.0,
        sideways_offset: 6.0,
        forward_offset: -9.0,
        opacity: 1.0,
        spin_rate: 8.0,
    };

    /// Interpolates the shape for a charge ratio in `[0, 1]`.
    #[must_use]
    pub fn at(charge_ratio: f32) -> Self {
        let ratio = charge_ratio.clamp(0.0, 1.0);
        if ratio >= 1.0 {
            return Self::FULL;
        }

        let (opacity, spin_rate) = if ratio <= 0.66 {
            let progress = ratio * 1.5;
            (lerp(0.05, 0.6, progress), lerp(32.0, 20.0, progress))
        } else {
            let progress = (ratio - 0.66) * 3.0;
            (lerp(0.6, 1.0, progress), lerp(20.0, 8.0, progress))
        };

        Self {
            scale: lerp(0.0, MAX_BEAM_SCALE, ratio),
            spread: lerp(MAX_BEAM_SPREAD, 0.0, ratio),
            sideways_offset: lerp(20.0, 6.0, ratio),
            forward_offset: lerp(-21.0, -9.0, ratio),
            opacity,
            spin_rate,
        }
    }
}

/// Origin and direction of one beam in a controller's fan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BeamPose {
    /// Beam origin.
    pub origin: Vec2,
    /// Unit beam direction.
    pub direction: Vec2,
}

/// Places beam `slot` of `beam_count` around a controller.
///
/// The slot's phase rotates with charge; its origin traces an ellipse around
/// the muzzle and its direction swings within the current spread.
#[must_use]
pub fn beam_pose(
    host_center: Vec2,
    host_velocity: Vec2,
    charge: f32,
    slot: usize,
    beam_count: usize,
    shape: &BeamShape,
) -> BeamPose {
    let count = beam_count.max(1) as f32;
    let host_direction = host_velocity.try_normalize().unwrap_or(DEFAULT_DIRECTION);
    let phase_offset = slot as f32 - count / 2.0 + 0.5;
    let deviation = (charge / shape.spin_rate.max(f32::EPSILON) + phase_offset) / count * TAU;

    let unit_rotation = rotate(Vec2::Y, deviation);
    let span = rotate(
        unit_rotation * Vec2::new(4.0, shape.sideways_offset),
        angle_of(host_direction),
    );
    let swing = unit_rotation.y * PI / count * shape.spread;

    let origin = host_center
        + host_direction * MUZZLE_OFFSET
        + host_direction * shape.forward_offset
        + span;
    let direction = rotate(host_direction, swing)
        .try_normalize()
        .unwrap_or(DEFAULT_DIRECTION);

    BeamPose { origin, direction }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn rotate_quarter_turn_maps_x_to_y() {
        let rotated = rotate(Vec2::X, PI / 2.0);
        assert_relative_eq!(rotated.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(rotated.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn normalize_or_walks_the_fallback_chain() {
        assert_eq!(normalize_or(Vec2::new(3.0, 0.0), Vec2::Y), Vec2::X);
        assert_eq!(normalize_or(Vec2::ZERO, Vec2::new(0.0, 5.0)), Vec2::Y);
        assert_eq!(normalize_or(Vec2::ZERO, Vec2::ZERO), DEFAULT_DIRECTION);
        assert_eq!(
            normalize_or(Vec2::new(f32::NAN, 1.0), Vec2::ZERO),
            DEFAULT_DIRECTION
        );
    }

    #[test]
    fn blend_aim_stays_unit_and_moves_toward_target() {
        let blended = blend_aim(Vec2::X * 32.0, Vec2::Y, 0.12);
        assert_relative_eq!(blended.length(), 1.0, epsilon = 1e-5);
        assert!(blended.y > 0.0 && blended.x > blended.y);
    }

    #[test]
    fn blend_aim_with_zero_velocity_snaps_to_target() {
        assert_eq!(blend_aim(Vec2::ZERO, Vec2::new(0.0, -2.0), 0.12), Vec2::NEG_Y);
    }

    #[test]
    fn orbit_expands_quadratically_and_caps() {
        let mut orbit = Orbit::default();
        assert_eq!(orbit.radius(120.0), 0.0);
        for _ in 0..90 {
            orbit.advance(1.0);
        }
        assert_relative_eq!(orbit.radius(120.0), 30.0, epsilon = 1e-4);
        for _ in 0..500 {
            orbit.advance(1.0);
        }
        assert_eq!(orbit.expansion(), ORBIT_EXPANSION_TICKS);
        assert_relative_eq!(orbit.offset(120.0).length(), 120.0, epsilon = 1e-3);
    }

    #[test]
    fn shape_interpolates_through_both_phases() {
        let empty = BeamShape::at(0.0);
        assert_eq!(empty.scale, 0.0);
        assert_relative_eq!(empty.spread, MAX_BEAM_SPREAD);
        assert_relative_eq!(empty.opacity, 0.05);
        assert_relative_eq!(empty.spin_rate, 32.0);

        let knee = BeamShape::at(0.66);
        assert_relative_eq!(knee.opacity, lerp(0.05, 0.6, 0.99), epsilon = 1e-5);

        let late = BeamShape::at(0.9);
        assert!(late.opacity > 0.6 && late.opacity < 1.0);
        assert!(late.spin_rate < 20.0);

        assert_eq!(BeamShape::at(1.0), BeamShape::FULL);
        assert_eq!(BeamShape::at(3.0), BeamShape::FULL);
    }

    #[test]
    fn full_charge_beams_point_along_the_host() {
        let pose = beam_pose(Vec2::ZERO, Vec2::X * 32.0, 240.0, 2, 4, &BeamShape::FULL);
        assert_relative_eq!(pose.direction.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(pose.direction.y, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn uncharged_beams_mirror_around_the_fan_centre() {
        let shape = BeamShape::at(0.0);
        let poses: Vec<BeamPose> = (0..6)
            .map(|slot| beam_pose(Vec2::ZERO, Vec2::X, 0.0, slot, 6, &shape))
            .collect();
        for pose in &poses {
            assert_relative_eq!(pose.direction.length(), 1.0, epsilon = 1e-5);
        }
        assert_relative_eq!(poses[0].direction.x, poses[5].direction.x, epsilon = 1e-5);
        assert_relative_eq!(poses[0].direction.y, poses[5].direction.y, epsilon = 1e-5);
        let muzzle = MUZZLE_OFFSET - 21.0;
        assert_relative_eq!(poses[0].origin.x, 2.0 * muzzle - poses[5].origin.x, epsilon = 1e-4);
    }

    #[test]
    fn degenerate_host_velocity_uses_default_direction() {
        let pose = beam_pose(Vec2::ZERO, Vec2::ZERO, 0.0, 0, 1, &BeamShape::FULL);
        assert_relative_eq!(pose.direction.y, -1.0, epsilon = 1e-5);
    }
}
