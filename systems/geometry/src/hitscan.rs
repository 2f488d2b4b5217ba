//! Beam length resolution against terrain.

use prism_core::{Terrain, Vec2};

/// Number of parallel rays averaged by a beam hitscan.
pub const HITSCAN_SAMPLES: usize = 2;

/// Terrain collision width per unit of beam scale.
pub const TILE_COLLISION_WIDTH: f32 = 0.1;

/// Fraction of the distance to the hitscan length covered each tick.
pub const LENGTH_CHANGE_FACTOR: f32 = 0.8;

/// Inputs for [`hitscan_length`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitscanInput {
    /// Beam origin.
    pub origin: Vec2,
    /// Unit beam direction.
    pub direction: Vec2,
    /// Centre of the actor the swarm orbits.
    pub anchor: Vec2,
    /// Centre of the emitting controller.
    pub emitter: Vec2,
    /// Charge ratio in `[0, 1]`.
    pub charge_ratio: f32,
    /// Inner brightness in `[0, 1]`.
    pub inner_brightness: f32,
    /// Beam width scale.
    pub scale: f32,
    /// Upper bound on beam length.
    pub max_length: f32,
}

/// Length of the chord a beam leaving `emitter` along `direction` cuts
/// through the circle centred on `anchor` passing through `emitter`.
///
/// Terrain sampling starts past this chord so beams fired inward across the
/// orbit are not stopped by terrain behind the actor. Degenerate inputs and
/// beams aimed tangentially or outward yield 0.
#[must_use]
pub fn chord_length(anchor: Vec2, emitter: Vec2, direction: Vec2) -> f32 {
    let radial = anchor - emitter;
    let radius = radial.length();
    let speed = direction.length();
    if !(radius > f32::EPSILON && speed > f32::EPSILON) {
        return 0.0;
    }

    let cos_theta = (radial.dot(direction) / radius / speed).clamp(-1.0, 1.0);
    let theta = f64::from(cos_theta).acos();
    let central = std::f64::consts::PI - theta * 2.0;
    if !(central > 0.0 && theta > 0.0) {
        return 0.0;
    }

    let chord = f64::from(radius) * central.sin() / theta.sin();
    if chord.is_finite() && chord > 0.0 {
        chord as f32
    } else {
        0.0
    }
}

/// Terrain scan range for a charge ratio; short while charging, full at 50% charge.
#[must_use]
pub fn short_range(charge_ratio: f32, max_length: f32) -> f32 {
    let reach = charge_ratio * 2.0;
    (reach * reach * max_length / 2.0 + 16.0).min(max_length)
}

/// Target length of a beam this tick.
///
/// Fully overcharged beams ignore terrain. Partially overcharged beams blend
/// toward the maximum length with a fifth-power ease.
#[must_use]
pub fn hitscan_length<T: Terrain + ?Sized>(terrain: &T, input: &HitscanInput) -> f32 {
    let max = input.max_length;
    if input.inner_brightness <= 0.0 {
        return max;
    }

    let chord = chord_length(input.anchor, input.emitter, input.direction);
    let sampling_origin = input.origin + input.direction * chord;
    let mut samples = [0.0; HITSCAN_SAMPLES];
    terrain.laser_scan(
        sampling_origin,
        input.direction,
        TILE_COLLISION_WIDTH * input.scale,
        short_range(input.charge_ratio, max),
        &mut samples,
    );

    let mut length = samples.iter().sum::<f32>() / HITSCAN_SAMPLES as f32 + chord;
    if length < max {
        length += 1.0;
    }

    if input.inner_brightness < 1.0 {
        let ratio = (1.0 - input.inner_brightness).powi(5);
        length = length * (1.0 - ratio) + max * ratio;
    }

    length.clamp(0.0, max)
}

/// Moves `previous` toward `target` by [`LENGTH_CHANGE_FACTOR`].
#[must_use]
pub fn smooth_length(previous: f32, target: f32, max_length: f32) -> f32 {
    (previous + (target - previous) * LENGTH_CHANGE_FACTOR).clamp(0.0, max_length)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use prism_core::Aabb;

    use super::*;

    #[derive(Debug)]
    struct WallAt(f32);

    impl Terrain for WallAt {
        fn laser_scan(
            &self,
            _origin: Vec2,
            _direction: Vec2,
            _width: f32,
            max_distance: f32,
            samples: &mut [f32],
        ) {
            for sample in samples {
                *sample = self.0.min(max_distance);
            }
        }

        fn can_hit_line(&self, _from: Aabb, _to: Aabb) -> bool {
            true
        }
    }

    fn input(charge_ratio: f32, inner_brightness: f32) -> HitscanInput {
        HitscanInput {
            origin: Vec2::new(50.0, 0.0),
            direction: Vec2::X,
            anchor: Vec2::ZERO,
            emitter: Vec2::new(50.0, 0.0),
            charge_ratio,
            inner_brightness,
            scale: 2.0,
            max_length: 4096.0,
        }
    }

    #[test]
    fn tangential_chord_is_zero_and_finite() {
        let chord = chord_length(Vec2::ZERO, Vec2::new(50.0, 0.0), Vec2::Y);
        assert!(chord.is_finite());
        assert!((0.0..1e-3).contains(&chord), "chord {chord}");
    }

    #[test]
    fn inward_chord_matches_circle_geometry() {
        let direction = Vec2::new(-1.0, 1.0).normalize();
        let chord = chord_length(Vec2::ZERO, Vec2::new(50.0, 0.0), direction);
        let expected = 2.0 * 50.0 * std::f32::consts::FRAC_1_SQRT_2;
        assert_relative_eq!(chord, expected, epsilon = 1e-3);
    }

    #[test]
    fn outward_and_degenerate_chords_are_zero() {
        assert_eq!(chord_length(Vec2::ZERO, Vec2::new(50.0, 0.0), Vec2::X), 0.0);
        assert_eq!(chord_length(Vec2::ZERO, Vec2::ZERO, Vec2::X), 0.0);
        assert_eq!(chord_length(Vec2::ZERO, Vec2::new(5.0, 0.0), Vec2::ZERO), 0.0);
        assert_eq!(
            chord_length(Vec2::ZERO, Vec2::new(5.0, 0.0), Vec2::new(f32::NAN, 0.0)),
            0.0
        );
    }

    #[test]
    fn short_range_grows_with_charge() {
        assert_relative_eq!(short_range(0.0, 4096.0), 16.0);
        assert_relative_eq!(short_range(0.25, 4096.0), 0.25 * 2048.0 + 16.0);
        assert_relative_eq!(short_range(1.0, 4096.0), 4096.0);
    }

    #[test]
    fn open_terrain_beam_reaches_scan_range() {
        let length = hitscan_length(&WallAt(f32::INFINITY), &input(1.0, 1.0));
        assert_relative_eq!(length, 4096.0);
    }

    #[test]
    fn walls_stop_the_beam_one_unit_past_contact() {
        let length = hitscan_length(&WallAt(300.0), &input(1.0, 1.0));
        assert_relative_eq!(length, 301.0);
    }

    #[test]
    fn deep_overcharge_ignores_terrain() {
        let length = hitscan_length(&WallAt(10.0), &input(1.0, 0.0));
        assert_eq!(length, 4096.0);
    }

    #[test]
    fn partial_overcharge_blends_toward_max() {
        let length = hitscan_length(&WallAt(300.0), &input(1.0, 0.5));
        let ratio = 0.5_f32.powi(5);
        assert_relative_eq!(length, 301.0 * (1.0 - ratio) + 4096.0 * ratio, epsilon = 1e-2);
    }

    #[test]
    fn smoothing_covers_eighty_percent_of_the_gap() {
        assert_relative_eq!(smooth_length(100.0, 200.0, 4096.0), 180.0);
        assert_relative_eq!(smooth_length(200.0, 100.0, 4096.0), 120.0);
        assert_eq!(smooth_length(0.0, 10_000.0, 4096.0), 4096.0);
    }
}
