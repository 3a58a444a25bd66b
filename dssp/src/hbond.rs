//! Backbone hydrogen bonds using the Kabsch-Sander electrostatic model.
//!
//! The energy between a donor N-H and an acceptor C=O is
//!
//! ```text
//! E = K * (1/d(H,O) - 1/d(H,C) + 1/d(N,C) - 1/d(N,O)),   K = -27.888 kcal*A/mol
//! ```
//!
//! rounded to three decimals and floored at [`MIN_HBOND_ENERGY`]. Every
//! residue keeps its two lowest-energy acceptor and donor links.

use crate::residue::{HBond, ResidueGeometry, ResidueState};
use crate::types::Point3D;

/// Interatomic distance below which a pair is treated as a clash.
pub const MIN_DISTANCE: f64 = 0.5;
/// Only residue pairs with CA atoms closer than this are scored.
pub const MIN_CA_DISTANCE: f64 = 9.0;
/// Energy floor, also assigned to clashing pairs.
pub const MIN_HBOND_ENERGY: f64 = -9.9;
/// A bond counts when its energy is below this value.
pub const MAX_HBOND_ENERGY: f64 = -0.5;
/// -332 * 0.42 * 0.2
pub const COUPLING_CONSTANT: f64 = -27.888;

/// Electrostatic energy of the bond donor N-H -> acceptor C=O, in kcal/mol.
pub fn hbond_energy(
    donor_n: &Point3D,
    donor_h: &Point3D,
    acceptor_c: &Point3D,
    acceptor_o: &Point3D,
) -> f64 {
    let d_ho = donor_h.distance_to(acceptor_o);
    let d_hc = donor_h.distance_to(acceptor_c);
    let d_nc = donor_n.distance_to(acceptor_c);
    let d_no = donor_n.distance_to(acceptor_o);

    let energy = if d_ho < MIN_DISTANCE
        || d_hc < MIN_DISTANCE
        || d_nc < MIN_DISTANCE
        || d_no < MIN_DISTANCE
    {
        MIN_HBOND_ENERGY
    } else {
        COUPLING_CONSTANT / d_ho - COUPLING_CONSTANT / d_hc + COUPLING_CONSTANT / d_nc
            - COUPLING_CONSTANT / d_no
    };

    let energy = (energy * 1000.0).round() / 1000.0;
    energy.max(MIN_HBOND_ENERGY)
}

/// Energy of the bond from residue `donor` to residue `acceptor`, or `None`
/// when the donor has no amide hydrogen (proline, segment start).
fn residue_energy(geometry: &[ResidueGeometry], donor: usize, acceptor: usize) -> Option<f64> {
    let d = &geometry[donor];
    let a = &geometry[acceptor];
    let h = d.h.as_ref()?;
    Some(hbond_energy(&d.n, h, &a.c, &a.o))
}

/// Candidate bonds involving residue `i` and a later residue, in the order
/// they are applied.
fn pair_energies(geometry: &[ResidueGeometry], i: usize) -> Vec<(usize, usize, f64)> {
    let mut out = Vec::new();
    for j in (i + 1)..geometry.len() {
        if geometry[i].ca.distance_to(&geometry[j].ca) >= MIN_CA_DISTANCE {
            continue;
        }
        if let Some(e) = residue_energy(geometry, i, j) {
            out.push((i, j, e));
        }
        if j != i + 1 {
            if let Some(e) = residue_energy(geometry, j, i) {
                out.push((j, i, e));
            }
        }
    }
    out
}

/// Insert a bond into a residue's two strongest slots.
fn insert_bond(slots: &mut [HBond; 2], partner: usize, energy: f64) {
    if energy < slots[0].energy {
        slots[1] = slots[0];
        slots[0] = HBond {
            residue: Some(partner),
            energy,
        };
    } else if energy < slots[1].energy {
        slots[1] = HBond {
            residue: Some(partner),
            energy,
        };
    }
}

/// Score every residue pair within [`MIN_CA_DISTANCE`] and record the top two
/// links per residue.
///
/// Pairs are applied in ascending `(i, j)` order with `i -> j` before
/// `j -> i`, so ties resolve the same way with or without the `parallel`
/// feature. Returns the number of pairs scored.
pub(crate) fn calculate_hbond_energies(
    geometry: &[ResidueGeometry],
    state: &mut [ResidueState],
) -> usize {
    let n = geometry.len();

    #[cfg(feature = "parallel")]
    let bonds: Vec<Vec<(usize, usize, f64)>> = {
        use rayon::prelude::*;
        (0..n)
            .into_par_iter()
            .map(|i| pair_energies(geometry, i))
            .collect()
    };

    #[cfg(not(feature = "parallel"))]
    let bonds: Vec<Vec<(usize, usize, f64)>> =
        (0..n).map(|i| pair_energies(geometry, i)).collect();

    let mut scored = 0;
    for (donor, acceptor, energy) in bonds.into_iter().flatten() {
        insert_bond(&mut state[donor].acceptor, acceptor, energy);
        insert_bond(&mut state[acceptor].donor, donor, energy);
        scored += 1;
    }
    scored
}

/// True when `a`'s N-H donates a recorded bond to `b`'s C=O with energy
/// below [`MAX_HBOND_ENERGY`].
pub(crate) fn test_bond(state: &[ResidueState], a: usize, b: usize) -> bool {
    state[a]
        .acceptor
        .iter()
        .any(|bond| bond.residue == Some(b) && bond.energy < MAX_HBOND_ENERGY)
}
