//! Synthetic backbones for tests, built from internal coordinates.

use crate::types::{Atom, Chain, Point3D, Residue, Structure};

pub const HELIX_PHI: f64 = -57.0;
pub const HELIX_PSI: f64 = -47.0;

const N_CA: f64 = 1.458;
const CA_C: f64 = 1.525;
const C_N: f64 = 1.329;
const C_O: f64 = 1.231;
const ANGLE_N_CA_C: f64 = 111.2;
const ANGLE_CA_C_N: f64 = 116.2;
const ANGLE_C_N_CA: f64 = 121.7;
const ANGLE_CA_C_O: f64 = 120.5;

/// Place `d` so that |cd| = `bond`, angle bcd = `angle` and dihedral
/// abcd = `torsion` (degrees).
fn place(a: &Point3D, b: &Point3D, c: &Point3D, bond: f64, angle: f64, torsion: f64) -> Point3D {
    let angle = angle.to_radians();
    let torsion = torsion.to_radians();
    let bc = c.sub(b).normalize();
    let n = b.sub(a).cross(&bc).normalize();
    let m = n.cross(&bc);
    c.add(&bc.scale(-bond * angle.cos()))
        .add(&m.scale(bond * angle.sin() * torsion.cos()))
        .add(&n.scale(bond * angle.sin() * torsion.sin()))
}

/// Backbone N, CA, C, O per residue for the given phi/psi series, with
/// planar trans peptides.
pub fn backbone(phis: &[f64], psis: &[f64]) -> Vec<[Point3D; 4]> {
    let mut out: Vec<[Point3D; 4]> = Vec::with_capacity(phis.len());
    let theta = ANGLE_N_CA_C.to_radians();
    for k in 0..phis.len() {
        let (n, ca, c) = match out.last() {
            None => {
                let n = Point3D::zero();
                let ca = Point3D::new(N_CA, 0.0, 0.0);
                let c = ca.add(&Point3D::new(-CA_C * theta.cos(), CA_C * theta.sin(), 0.0));
                (n, ca, c)
            }
            Some([pn, pca, pc, _]) => {
                let n = place(pn, pca, pc, C_N, ANGLE_CA_C_N, psis[k - 1]);
                let ca = place(pca, pc, &n, N_CA, ANGLE_C_N_CA, 180.0);
                let c = place(pc, &n, &ca, CA_C, ANGLE_N_CA_C, phis[k]);
                (n, ca, c)
            }
        };
        let o = place(&n, &ca, &c, C_O, ANGLE_CA_C_O, psis[k] + 180.0);
        out.push([n, ca, c, o]);
    }
    out
}

/// Residue with backbone atoms only.
pub fn backbone_residue(compound: &str, seq_id: i32, atoms: &[Point3D; 4]) -> Residue {
    let names = ["N", "CA", "C", "O"];
    Residue::new(
        compound,
        seq_id,
        names
            .iter()
            .zip(atoms.iter())
            .map(|(name, p)| Atom::new(name, *p))
            .collect(),
    )
}

pub fn chain_from_backbone(id: &str, backbone: &[[Point3D; 4]]) -> Chain {
    Chain::new(
        id,
        backbone
            .iter()
            .enumerate()
            .map(|(k, atoms)| backbone_residue("ALA", k as i32 + 1, atoms))
            .collect(),
    )
}

/// Ideal alpha helix of `n` alanines.
pub fn alpha_helix_chain(id: &str, n: usize) -> Chain {
    chain_from_backbone(id, &backbone(&vec![HELIX_PHI; n], &vec![HELIX_PSI; n]))
}

pub fn helix_structure(n: usize) -> Structure {
    Structure::new("helix", vec![alpha_helix_chain("A", n)])
}

/// Orthonormal frame of an extended strand: x along the strand, y along
/// the middle carbonyl, z completing the right-handed set.
fn strand_frame(strand: &[[Point3D; 4]]) -> (Point3D, Point3D, Point3D, Point3D) {
    let m = strand.len() / 2;
    let ax = strand[strand.len() - 1][1].sub(&strand[0][1]).normalize();
    let co = strand[m][3].sub(&strand[m][2]);
    let y = co.sub(&ax.scale(co.dot(&ax))).normalize();
    let z = ax.cross(&y);
    (strand[m][1], ax, y, z)
}

/// Two antiparallel strands of `n` residues on chains A and B. Chain B is
/// chain A turned 180 degrees about the axis normal to the sheet and pushed
/// 5.6 A along the middle carbonyl.
pub fn antiparallel_pair(n: usize) -> Structure {
    let a = backbone(&vec![-139.0; n], &vec![135.0; n]);
    let (origin, _, y, z) = strand_frame(&a);
    let b: Vec<[Point3D; 4]> = a
        .iter()
        .map(|atoms| {
            atoms.map(|p| {
                let v = p.sub(&origin);
                origin
                    .add(&z.scale(2.0 * v.dot(&z)).sub(&v))
                    .add(&y.scale(5.6))
            })
        })
        .collect();
    Structure::new(
        "antiparallel",
        vec![chain_from_backbone("A", &a), chain_from_backbone("B", &b)],
    )
}

/// Two parallel strands of `n` residues on chains A and B; B is a pure
/// translation of A.
pub fn parallel_pair(n: usize) -> Structure {
    let a = backbone(&vec![-119.0; n], &vec![113.0; n]);
    let (_, ax, y, z) = strand_frame(&a);
    let shift = y.scale(5.7).add(&ax.scale(1.5)).add(&z.scale(0.25));
    let b: Vec<[Point3D; 4]> = a.iter().map(|atoms| atoms.map(|p| p.add(&shift))).collect();
    Structure::new(
        "parallel",
        vec![chain_from_backbone("A", &a), chain_from_backbone("B", &b)],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bond_geometry() {
        let bb = backbone(&[HELIX_PHI; 3], &[HELIX_PSI; 3]);
        for res in &bb {
            assert!((res[0].distance_to(&res[1]) - N_CA).abs() < 1e-9);
            assert!((res[1].distance_to(&res[2]) - CA_C).abs() < 1e-9);
            assert!((res[2].distance_to(&res[3]) - C_O).abs() < 1e-9);
        }
        assert!((bb[0][2].distance_to(&bb[1][0]) - C_N).abs() < 1e-9);
    }

    #[test]
    fn strands_do_not_clash() {
        for s in [antiparallel_pair(5), parallel_pair(5)] {
            let a = &s.chains[0];
            let b = &s.chains[1];
            let closest = a
                .residues
                .iter()
                .flat_map(|r| r.atoms.iter())
                .flat_map(|x| {
                    b.residues
                        .iter()
                        .flat_map(|r| r.atoms.iter())
                        .map(move |y| x.coords.distance_to(&y.coords))
                })
                .fold(f64::INFINITY, f64::min);
            assert!(closest > 2.5, "{} closest {closest}", s.id);
        }
    }
}
