//! Solvent accessible surface by spherical point sampling.
//!
//! Each atom is inflated by the water radius and probed with a fixed set of
//! points spread over the unit sphere along a golden-section spiral. A point
//! counts as accessible when no inflated neighbor atom covers it.

use crate::residue::{ResidueGeometry, RADIUS_WATER};
use crate::types::Point3D;

/// Number of points on each side of the equator; `2 * N + 1` in total.
pub const SURFACE_DOT_COUNT: usize = 200;

/// Unit-sphere sample points with equal area weights.
#[derive(Debug, Clone)]
pub struct SurfaceDots {
    points: Vec<Point3D>,
    weight: f64,
}

impl SurfaceDots {
    /// Build `2 * n + 1` points on a golden-section spiral.
    pub fn new(n: usize) -> Self {
        let count = 2 * n + 1;
        let golden_ratio = (1.0 + 5.0f64.sqrt()) / 2.0;
        let half = n as i64;

        let points = (-half..=half)
            .map(|i| {
                let lat = (2.0 * i as f64 / count as f64).asin();
                let lon = (i as f64 % golden_ratio) * 2.0 * std::f64::consts::PI / golden_ratio;
                Point3D::new(lon.sin() * lat.cos(), lon.cos() * lat.cos(), lat.sin())
            })
            .collect();

        Self {
            points,
            weight: 4.0 * std::f64::consts::PI / count as f64,
        }
    }

    pub fn points(&self) -> &[Point3D] {
        &self.points
    }

    /// Area of the unit sphere represented by one point.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl Default for SurfaceDots {
    fn default() -> Self {
        Self::new(SURFACE_DOT_COUNT)
    }
}

/// A neighbor atom that may occlude part of the probe sphere.
struct Candidate {
    /// Position relative to the probe atom.
    location: Point3D,
    /// Squared inflated radius.
    radius: f64,
    /// Squared distance to the probe atom.
    distance: f64,
}

/// Accessible area of one atom, in square angstroms.
fn atom_surface(
    atom: &Point3D,
    radius: f64,
    neighbours: &[&ResidueGeometry],
    dots: &SurfaceDots,
) -> f64 {
    let mut candidates = Vec::new();
    let probe = radius + RADIUS_WATER;

    for residue in neighbours {
        if !residue.atom_intersects_box(atom, radius) {
            continue;
        }
        for (other, other_radius) in residue.atoms() {
            let distance = atom.distance_squared(&other);
            let reach = probe + other_radius + RADIUS_WATER;
            if distance < reach * reach && distance > 0.0001 {
                let inflated = other_radius + RADIUS_WATER;
                candidates.push(Candidate {
                    location: other.sub(atom),
                    radius: inflated * inflated,
                    distance,
                });
            }
        }
    }

    // closest first, so covered points are rejected early
    candidates.sort_unstable_by(|a, b| a.distance.total_cmp(&b.distance));

    let free = dots
        .points()
        .iter()
        .filter(|dot| {
            let xx = dot.scale(probe);
            candidates
                .iter()
                .all(|c| c.radius < xx.distance_squared(&c.location))
        })
        .count();

    free as f64 * dots.weight() * probe * probe
}

/// Residues whose bounding spheres overlap that of `index`, itself included.
fn neighbours(geometry: &[ResidueGeometry], index: usize) -> Vec<&ResidueGeometry> {
    let residue = &geometry[index];
    geometry
        .iter()
        .filter(|other| residue.center.distance_to(&other.center) < residue.radius + other.radius)
        .collect()
}

/// Accessible surface of residue `index`: the sum over its backbone and
/// side-chain atoms.
pub(crate) fn residue_accessibility(
    geometry: &[ResidueGeometry],
    index: usize,
    dots: &SurfaceDots,
) -> f64 {
    let neighbours = neighbours(geometry, index);
    geometry[index]
        .atoms()
        .map(|(atom, radius)| atom_surface(&atom, radius, &neighbours, dots))
        .sum()
}

/// Accessible surface of every residue, in residue order.
pub(crate) fn calculate_accessibilities(geometry: &[ResidueGeometry]) -> Vec<f64> {
    let dots = SurfaceDots::default();
    let n = geometry.len();

    #[cfg(feature = "parallel")]
    let accessibility = {
        use rayon::prelude::*;
        (0..n)
            .into_par_iter()
            .map(|i| residue_accessibility(geometry, i, &dots))
            .collect()
    };

    #[cfg(not(feature = "parallel"))]
    let accessibility = (0..n)
        .map(|i| residue_accessibility(geometry, i, &dots))
        .collect();

    accessibility
}
