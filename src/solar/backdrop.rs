use std::f32::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::engine::resources::{DrawMode, Model};

/// Random star points inside a cube of side `extent` centred on the origin,
/// interleaved as position + colour (stride 6). The same seed yields the same
/// sky.
pub fn starfield(count: u32, extent: f32, seed: u64) -> Model {
    let mut rng = StdRng::seed_from_u64(seed);
    let half = extent.abs() / 2.0;
    let spread = half.is_finite() && half > 0.0;

    let mut vertices = Vec::with_capacity(count as usize * 6);
    for _ in 0..count {
        for _ in 0..3 {
            vertices.push(if spread { rng.gen_range(-half..half) } else { 0.0 });
        }
        for _ in 0..3 {
            vertices.push(rng.gen_range(0.0..=1.0));
        }
    }
    Model::from_vertices(vertices, 6, DrawMode::Points)
}

/// Unit circle in the XZ plane, scaled per planet at draw time.
pub fn orbit_ring(segments: u32) -> Model {
    let segments = segments.max(3);
    let vertices = (0..segments)
        .flat_map(|i| {
            let angle = TAU * i as f32 / segments as f32;
            [angle.cos(), 0.0, angle.sin()]
        })
        .collect();
    Model::from_vertices(vertices, 3, DrawMode::LineLoop)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starfield_is_deterministic_per_seed() {
        let a = starfield(64, 50.0, 7);
        let b = starfield(64, 50.0, 7);
        let c = starfield(64, 50.0, 8);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.vertex_count(), 64);
        assert!(a.vertices.chunks(6).all(|v| v[..3].iter().all(|p| p.abs() <= 25.0)));
    }

    #[test]
    fn degenerate_extent_collapses_stars_to_origin() {
        for extent in [0.0, f32::INFINITY, f32::NAN] {
            let sky = starfield(8, extent, 1);
            assert_eq!(sky.vertex_count(), 8);
            assert!(sky.vertices.chunks(6).all(|v| v[..3] == [0.0, 0.0, 0.0]));
        }
    }

    #[test]
    fn orbit_ring_lies_on_unit_circle() {
        let ring = orbit_ring(90);
        assert_eq!(ring.vertex_count(), 90);
        for vertex in ring.vertices.chunks(3) {
            let radius = (vertex[0] * vertex[0] + vertex[2] * vertex[2]).sqrt();
            assert!((radius - 1.0).abs() < 1e-5);
            assert_eq!(vertex[1], 0.0);
        }
    }
}
