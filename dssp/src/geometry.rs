//! Coordinate geometry: distances, angles, dihedrals and per-residue backbone
//! angles.
//!
//! Backbone angles that cannot be computed (chain terminus, sequence gap,
//! missing atom) are reported as [`UNDEFINED_ANGLE`] rather than as an error.

use crate::types::{Chain, Point3D, Residue};

/// Sentinel for a backbone angle that is not defined for a residue.
pub const UNDEFINED_ANGLE: f64 = 360.0;

/// Euclidean distance between two points.
pub fn distance_points(p1: &Point3D, p2: &Point3D) -> f64 {
    p1.distance_to(p2)
}

/// Bond angle in degrees at the central point `p2`.
pub fn angle_points(p1: &Point3D, p2: &Point3D, p3: &Point3D) -> f64 {
    let v1 = p1.sub(p2);
    let v2 = p3.sub(p2);
    let cos_angle = v1.dot(&v2) / (v1.norm() * v2.norm());
    // Clamp for numerical safety
    cos_angle.clamp(-1.0, 1.0).acos().to_degrees()
}

/// Dihedral (torsion) angle in degrees defined by four points.
pub fn dihedral_points(p1: &Point3D, p2: &Point3D, p3: &Point3D, p4: &Point3D) -> f64 {
    let b1 = p2.sub(p1);
    let b2 = p3.sub(p2);
    let b3 = p4.sub(p3);

    let n1 = b1.cross(&b2);
    let n2 = b2.cross(&b3);

    let m1 = n1.cross(&b2.normalize());

    let x = n1.dot(&n2);
    let y = m1.dot(&n2);

    (-y).atan2(x).to_degrees()
}

/// Cosine of the angle between the vectors `p1 - p2` and `p3 - p4`.
///
/// Returns 0 when either vector has zero length.
pub fn cosine_angle(p1: &Point3D, p2: &Point3D, p3: &Point3D, p4: &Point3D) -> f64 {
    let v12 = p1.sub(p2);
    let v34 = p3.sub(p4);

    let x = v12.dot(&v12) * v34.dot(&v34);
    if x > 0.0 {
        v12.dot(&v34) / x.sqrt()
    } else {
        0.0
    }
}

/// Backbone angles of one residue, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BackboneAngles {
    pub phi: f64,
    pub psi: f64,
    pub omega: f64,
    /// CA(i-1)-CA(i)-CA(i+1)-CA(i+2) virtual torsion.
    pub alpha: f64,
    /// Virtual bond angle between CA(i-2)->CA(i) and CA(i)->CA(i+2).
    pub kappa: f64,
    /// Cosine of the angle between C=O(i) and C=O(i-1); 0 when undefined.
    pub tco: f64,
}

impl Default for BackboneAngles {
    fn default() -> Self {
        Self {
            phi: UNDEFINED_ANGLE,
            psi: UNDEFINED_ANGLE,
            omega: UNDEFINED_ANGLE,
            alpha: UNDEFINED_ANGLE,
            kappa: UNDEFINED_ANGLE,
            tco: 0.0,
        }
    }
}

fn atom(residue: &Residue, name: &str) -> Option<Point3D> {
    residue.get_atom(name).map(|a| a.coords)
}

fn phi(prev: &Residue, curr: &Residue) -> Option<f64> {
    if prev.seq_id + 1 != curr.seq_id {
        return None;
    }
    Some(dihedral_points(
        &atom(prev, "C")?,
        &atom(curr, "N")?,
        &atom(curr, "CA")?,
        &atom(curr, "C")?,
    ))
}

fn psi(curr: &Residue, next: &Residue) -> Option<f64> {
    if curr.seq_id + 1 != next.seq_id {
        return None;
    }
    Some(dihedral_points(
        &atom(curr, "N")?,
        &atom(curr, "CA")?,
        &atom(curr, "C")?,
        &atom(next, "N")?,
    ))
}

fn omega(curr: &Residue, next: &Residue) -> Option<f64> {
    Some(dihedral_points(
        &atom(curr, "CA")?,
        &atom(curr, "C")?,
        &atom(next, "N")?,
        &atom(next, "CA")?,
    ))
}

fn alpha(prev: &Residue, curr: &Residue, next: &Residue, next_next: &Residue) -> Option<f64> {
    Some(dihedral_points(
        &atom(prev, "CA")?,
        &atom(curr, "CA")?,
        &atom(next, "CA")?,
        &atom(next_next, "CA")?,
    ))
}

fn kappa(prev_prev: &Residue, curr: &Residue, next_next: &Residue) -> Option<f64> {
    if prev_prev.seq_id + 4 != next_next.seq_id {
        return None;
    }
    let ca = atom(curr, "CA")?;
    let ckap = cosine_angle(&ca, &atom(prev_prev, "CA")?, &atom(next_next, "CA")?, &ca);
    let skap = (1.0 - ckap * ckap).max(0.0).sqrt();
    Some(skap.atan2(ckap).to_degrees())
}

fn tco(prev: &Residue, curr: &Residue) -> Option<f64> {
    if prev.seq_id + 1 != curr.seq_id {
        return None;
    }
    Some(cosine_angle(
        &atom(curr, "C")?,
        &atom(curr, "O")?,
        &atom(prev, "C")?,
        &atom(prev, "O")?,
    ))
}

/// Compute backbone angles for every residue of a chain.
///
/// The result has one entry per residue of `chain`, complete or not, so
/// neighbors are looked up in the input chain exactly as deposited.
pub fn backbone_angles(chain: &Chain) -> Vec<BackboneAngles> {
    let residues = &chain.residues;
    let n = residues.len();

    (0..n)
        .map(|i| {
            let curr = &residues[i];
            let prev = i.checked_sub(1).map(|k| &residues[k]);
            let next = residues.get(i + 1);

            let mut angles = BackboneAngles::default();
            if let Some(prev) = prev {
                angles.phi = phi(prev, curr).unwrap_or(UNDEFINED_ANGLE);
                angles.tco = tco(prev, curr).unwrap_or(0.0);
            }
            if let Some(next) = next {
                angles.psi = psi(curr, next).unwrap_or(UNDEFINED_ANGLE);
                angles.omega = omega(curr, next).unwrap_or(UNDEFINED_ANGLE);
            }
            if let (Some(prev), Some(next), Some(next_next)) = (prev, next, residues.get(i + 2)) {
                angles.alpha = alpha(prev, curr, next, next_next).unwrap_or(UNDEFINED_ANGLE);
            }
            if i >= 2 && i + 2 < n {
                angles.kappa =
                    kappa(&residues[i - 2], curr, &residues[i + 2]).unwrap_or(UNDEFINED_ANGLE);
            }
            angles
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::types::{Atom, Residue};

    #[test]
    fn test_distance() {
        let a = Point3D::new(0.0, 0.0, 0.0);
        let b = Point3D::new(3.0, 4.0, 0.0);
        assert!((distance_points(&a, &b) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_angle_90() {
        let p1 = Point3D::new(1.0, 0.0, 0.0);
        let p2 = Point3D::new(0.0, 0.0, 0.0);
        let p3 = Point3D::new(0.0, 1.0, 0.0);
        assert!((angle_points(&p1, &p2, &p3) - 90.0).abs() < 1e-10);
    }

    #[test]
    fn test_dihedral() {
        // Trans conformation: ~180 degrees
        let p1 = Point3D::new(1.0, 0.0, 0.0);
        let p2 = Point3D::new(0.0, 0.0, 0.0);
        let p3 = Point3D::new(0.0, 1.0, 0.0);
        let p4 = Point3D::new(-1.0, 1.0, 0.0);
        let d = dihedral_points(&p1, &p2, &p3, &p4);
        assert!((d.abs() - 180.0).abs() < 1e-10);
    }

    #[test]
    fn test_cosine_angle() {
        let o = Point3D::zero();
        let x = Point3D::new(2.0, 0.0, 0.0);
        let y = Point3D::new(0.0, 3.0, 0.0);
        assert!(cosine_angle(&x, &o, &y, &o).abs() < 1e-10);
        assert!((cosine_angle(&x, &o, &x, &o) - 1.0).abs() < 1e-10);
        // degenerate vector
        assert_eq!(cosine_angle(&o, &o, &x, &o), 0.0);
    }

    #[test]
    fn ideal_helix_angles() {
        let chain = fixtures::alpha_helix_chain("A", 8);
        let angles = backbone_angles(&chain);
        assert_eq!(angles.len(), 8);

        assert_eq!(angles[0].phi, UNDEFINED_ANGLE);
        assert_eq!(angles[7].psi, UNDEFINED_ANGLE);
        assert_eq!(angles[0].kappa, UNDEFINED_ANGLE);
        assert_eq!(angles[1].kappa, UNDEFINED_ANGLE);
        assert_eq!(angles[6].kappa, UNDEFINED_ANGLE);

        for a in &angles[1..7] {
            assert!((a.phi - fixtures::HELIX_PHI).abs() < 1e-6, "phi {}", a.phi);
            assert!((a.psi - fixtures::HELIX_PSI).abs() < 1e-6, "psi {}", a.psi);
            assert!((a.omega.abs() - 180.0).abs() < 1e-6, "omega {}", a.omega);
            assert!(a.tco > 0.0);
        }
        for a in &angles[2..6] {
            // tight helical turn
            assert!(a.kappa > 70.0 && a.kappa < 180.0, "kappa {}", a.kappa);
        }
    }

    #[test]
    fn sequence_gap_leaves_angles_undefined() {
        let mut chain = fixtures::alpha_helix_chain("A", 5);
        // renumber the tail so residues 2 and 3 are no longer sequence neighbors
        for r in chain.residues.iter_mut().skip(3) {
            r.seq_id += 10;
        }
        let angles = backbone_angles(&chain);
        assert_eq!(angles[2].psi, UNDEFINED_ANGLE);
        assert_eq!(angles[3].phi, UNDEFINED_ANGLE);
        assert_eq!(angles[2].kappa, UNDEFINED_ANGLE);
        assert_eq!(angles[3].tco, 0.0);
        // omega only needs a following residue
        assert_ne!(angles[2].omega, UNDEFINED_ANGLE);
    }

    #[test]
    fn missing_atoms_leave_angles_undefined() {
        let chain = Chain::new(
            "A",
            vec![
                Residue::new("GLY", 1, vec![Atom::new("CA", Point3D::zero())]),
                Residue::new("GLY", 2, vec![Atom::new("CA", Point3D::new(3.8, 0.0, 0.0))]),
            ],
        );
        let angles = backbone_angles(&chain);
        assert_eq!(angles[0], BackboneAngles::default());
        assert_eq!(angles[1], BackboneAngles::default());
    }
}
