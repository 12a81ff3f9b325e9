//! Hotspot placement
//!
//! Authoring helper that assigns every hotspot in a catalog a random position
//! inside the panorama sphere. Positions are drawn from a seeded generator, so
//! the same seed always yields the same catalog; the viewer only ever reads the
//! fixed coordinates written here.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use tourfolio_viz::geometry::SPHERE_RADIUS;

use crate::catalog::Catalog;

/// Fraction of the sphere radius hotspots are placed within
pub const PLACEMENT_MARGIN: f32 = 0.9;

/// Uniformly distributed point inside a sphere of `radius` centered at the origin
pub fn random_point_in_sphere<R: Rng>(rng: &mut R, radius: f32) -> [f32; 3] {
    let theta = rng.random_range(0.0..std::f32::consts::TAU);
    let phi = (2.0 * rng.random::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
    // Cube root keeps the density uniform over the volume
    let r = radius * rng.random::<f32>().cbrt();

    [
        r * phi.sin() * theta.cos(),
        r * phi.sin() * theta.sin(),
        r * phi.cos(),
    ]
}

/// A hotspot that received a new position
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub id: String,
    pub position: [f32; 3],
}

/// Reposition every hotspot in `catalog`, in catalog order
pub fn place_hotspots(catalog: &mut Catalog, seed: u64) -> Vec<Placement> {
    let mut rng = Pcg32::seed_from_u64(seed);
    let radius = SPHERE_RADIUS * PLACEMENT_MARGIN;

    catalog
        .hotspots_mut()
        .map(|hotspot| {
            hotspot.position = random_point_in_sphere(&mut rng, radius);
            Placement {
                id: hotspot.id.clone(),
                position: hotspot.position,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn fixture() -> Catalog {
        Catalog::load(Path::new("tests/fixtures/catalog.yaml")).unwrap()
    }

    fn length([x, y, z]: [f32; 3]) -> f32 {
        (x * x + y * y + z * z).sqrt()
    }

    #[test]
    fn points_stay_inside_radius() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..1000 {
            let point = random_point_in_sphere(&mut rng, 10.0);
            assert!(length(point) <= 10.0 + 1e-4);
        }
    }

    #[test]
    fn points_fill_the_volume() {
        let mut rng = Pcg32::seed_from_u64(11);
        let points: Vec<_> = (0..2000)
            .map(|_| random_point_in_sphere(&mut rng, 1.0))
            .collect();

        // Half the volume lies beyond r = 0.5^(1/3) ~ 0.794
        let outer = points.iter().filter(|p| length(**p) > 0.794).count();
        assert!((800..1200).contains(&outer), "outer shell count {outer}");

        let upper = points.iter().filter(|p| p[2] > 0.0).count();
        assert!((800..1200).contains(&upper), "upper half count {upper}");
    }

    #[test]
    fn same_seed_same_positions() {
        let mut a = fixture();
        let mut b = fixture();
        assert_eq!(place_hotspots(&mut a, 42), place_hotspots(&mut b, 42));
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_differ() {
        let mut a = fixture();
        let mut b = fixture();
        assert_ne!(place_hotspots(&mut a, 1), place_hotspots(&mut b, 2));
    }

    #[test]
    fn placed_catalog_still_validates() {
        let mut catalog = fixture();
        let placements = place_hotspots(&mut catalog, 2024);
        assert_eq!(placements.len(), 11);
        assert!(placements
            .iter()
            .all(|p| length(p.position) < SPHERE_RADIUS * PLACEMENT_MARGIN + 1e-3));
        catalog.validate().unwrap();
    }
}
