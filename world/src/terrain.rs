//! Solid terrain the beams scan against.

use prism_core::{Aabb, Terrain, Vec2};
use prism_system_geometry::{ray_entry, segment_hits_aabb};

/// Terrain made of solid axis-aligned boxes. An empty terrain is fully open.
#[derive(Clone, Debug, Default)]
pub struct SolidTerrain {
    solids: Vec<Aabb>,
}

impl SolidTerrain {
    /// Creates terrain with nothing solid in it.
    #[must_use]
    pub fn open() -> Self {
        Self::default()
    }

    /// Creates terrain from the provided solid boxes.
    #[must_use]
    pub fn with_solids(solids: Vec<Aabb>) -> Self {
        Self { solids }
    }

    /// Adds a solid box.
    pub fn push(&mut self, solid: Aabb) {
        self.solids.push(solid);
    }

    /// Solid boxes making up the terrain.
    #[must_use]
    pub fn solids(&self) -> &[Aabb] {
        &self.solids
    }

    fn first_hit(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> f32 {
        self.solids
            .iter()
            .filter_map(|solid| ray_entry(origin, direction, *solid))
            .fold(max_distance, f32::min)
            .clamp(0.0, max_distance.max(0.0))
    }
}

impl Terrain for SolidTerrain {
    fn laser_scan(
        &self,
        origin: Vec2,
        direction: Vec2,
        width: f32,
        max_distance: f32,
        samples: &mut [f32],
    ) {
        let count = samples.len();
        if count == 0 {
            return;
        }
        let side = direction.perp();
        for (index, sample) in samples.iter_mut().enumerate() {
            let offset = if count == 1 {
                0.0
            } else {
                (index as f32 / (count - 1) as f32 - 0.5) * width
            };
            *sample = self.first_hit(origin + side * offset, direction, max_distance);
        }
    }

    fn can_hit_line(&self, from: Aabb, to: Aabb) -> bool {
        let start = from.center();
        let end = to.center();
        !self
            .solids
            .iter()
            .any(|solid| segment_hits_aabb(*solid, start, end, 0.0))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn open_terrain_scans_to_the_limit() {
        let terrain = SolidTerrain::open();
        let mut samples = [0.0; 2];
        terrain.laser_scan(Vec2::ZERO, Vec2::X, 1.0, 300.0, &mut samples);
        assert_eq!(samples, [300.0, 300.0]);
    }

    #[test]
    fn scans_stop_at_the_nearest_solid() {
        let terrain = SolidTerrain::with_solids(vec![
            Aabb::new(Vec2::new(200.0, -50.0), Vec2::new(10.0, 100.0)),
            Aabb::new(Vec2::new(100.0, -50.0), Vec2::new(10.0, 100.0)),
        ]);
        let mut samples = [0.0; 2];
        terrain.laser_scan(Vec2::ZERO, Vec2::X, 2.0, 300.0, &mut samples);
        for sample in samples {
            assert_relative_eq!(sample, 100.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn walls_block_line_of_sight() {
        let mut terrain = SolidTerrain::open();
        let from = Aabb::from_center(Vec2::ZERO, Vec2::splat(10.0));
        let to = Aabb::from_center(Vec2::new(200.0, 0.0), Vec2::splat(10.0));
        assert!(terrain.can_hit_line(from, to));
        terrain.push(Aabb::new(Vec2::new(90.0, -20.0), Vec2::new(20.0, 40.0)));
        assert!(!terrain.can_hit_line(from, to));
        assert_eq!(terrain.solids().len(), 1);
    }
}
