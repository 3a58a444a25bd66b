//! Aggregate statistics over an assignment.

use dssp_core::Summarizable;

use crate::hbond::MAX_HBOND_ENERGY;
use crate::residue::{ResidueGeometry, ResidueState};
use crate::secondary::SecondaryStructure;

/// Number of buckets in each histogram. Larger values land in the last one.
pub const HISTOGRAM_SIZE: usize = 30;

/// Histogram bucket for a count of `n` (at least 1).
pub(crate) fn histogram_bucket(n: usize) -> usize {
    n.min(HISTOGRAM_SIZE).saturating_sub(1)
}

/// Counts and histograms collected while assigning secondary structure.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Statistics {
    /// Retained (complete) residues.
    pub residues: u32,
    /// Break-free segments among the retained residues.
    pub chains: u32,
    pub ss_bridges: u32,
    pub intra_chain_ss_bridges: u32,
    /// Recorded donor links with energy below -0.5 kcal/mol.
    pub hbonds: u32,
    pub hbonds_in_parallel_bridges: u32,
    pub hbonds_in_antiparallel_bridges: u32,
    /// Bonds binned by donor number minus acceptor number, -5..=5.
    pub hbonds_per_distance: [u32; 11],
    pub residues_per_alpha_helix: [u32; HISTOGRAM_SIZE],
    pub parallel_bridges_per_ladder: [u32; HISTOGRAM_SIZE],
    pub antiparallel_bridges_per_ladder: [u32; HISTOGRAM_SIZE],
    pub ladders_per_sheet: [u32; HISTOGRAM_SIZE],
    /// Total accessible surface in square angstroms.
    pub accessible_surface: f64,
}

impl Default for Statistics {
    fn default() -> Self {
        Self {
            residues: 0,
            chains: 0,
            ss_bridges: 0,
            intra_chain_ss_bridges: 0,
            hbonds: 0,
            hbonds_in_parallel_bridges: 0,
            hbonds_in_antiparallel_bridges: 0,
            hbonds_per_distance: [0; 11],
            residues_per_alpha_helix: [0; HISTOGRAM_SIZE],
            parallel_bridges_per_ladder: [0; HISTOGRAM_SIZE],
            antiparallel_bridges_per_ladder: [0; HISTOGRAM_SIZE],
            ladders_per_sheet: [0; HISTOGRAM_SIZE],
            accessible_surface: 0.0,
        }
    }
}

impl Statistics {
    /// Inter-chain disulfide bridges.
    pub fn inter_chain_ss_bridges(&self) -> u32 {
        self.ss_bridges - self.intra_chain_ss_bridges
    }

    /// Bonds between residues `distance` apart in numbering (donor minus
    /// acceptor), or `None` outside -5..=5.
    pub fn hbonds_at_distance(&self, distance: i32) -> Option<u32> {
        if (-5..=5).contains(&distance) {
            Some(self.hbonds_per_distance[(distance + 5) as usize])
        } else {
            None
        }
    }

    /// Total number of ladders.
    pub fn ladders(&self) -> u32 {
        self.parallel_bridges_per_ladder.iter().sum::<u32>()
            + self.antiparallel_bridges_per_ladder.iter().sum::<u32>()
    }
}

impl Summarizable for Statistics {
    fn summary(&self) -> String {
        format!(
            "{} residue(s) in {} chain(s), {} H-bond(s), {} SS bridge(s), {} ladder(s), {:.1} A^2 accessible",
            self.residues,
            self.chains,
            self.hbonds,
            self.ss_bridges,
            self.ladders(),
            self.accessible_surface,
        )
    }
}

/// Count hydrogen bonds from the donor slots of every residue.
pub(crate) fn count_hbonds(
    geometry: &[ResidueGeometry],
    state: &[ResidueState],
    stats: &mut Statistics,
) {
    for (acceptor, s) in state.iter().enumerate() {
        for bond in &s.donor {
            let Some(donor) = bond.residue else {
                continue;
            };
            if bond.energy >= MAX_HBOND_ENERGY {
                continue;
            }
            stats.hbonds += 1;
            let k = geometry[donor].number - geometry[acceptor].number;
            if (-5..=5).contains(&k) {
                stats.hbonds_per_distance[(k + 5) as usize] += 1;
            }
        }
    }
}

/// Histogram of alpha-helix lengths. A run ends at a non-helix residue, at
/// a segment boundary or at the end of the residue list.
pub(crate) fn count_alpha_helices(
    geometry: &[ResidueGeometry],
    state: &[ResidueState],
    stats: &mut Statistics,
) {
    let mut length = 0;
    let mut segment = None;

    for (g, s) in geometry.iter().zip(state) {
        if segment != Some(g.segment) {
            if length > 0 {
                stats.residues_per_alpha_helix[histogram_bucket(length)] += 1;
            }
            length = 0;
            segment = Some(g.segment);
        }

        if s.secondary_structure == SecondaryStructure::AlphaHelix {
            length += 1;
        } else if length > 0 {
            stats.residues_per_alpha_helix[histogram_bucket(length)] += 1;
            length = 0;
        }
    }

    if length > 0 {
        stats.residues_per_alpha_helix[histogram_bucket(length)] += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::hbond::calculate_hbond_energies;
    use crate::residue::build_residues;
    use crate::types::Structure;

    #[test]
    fn bucket_capping() {
        assert_eq!(histogram_bucket(1), 0);
        assert_eq!(histogram_bucket(30), 29);
        assert_eq!(histogram_bucket(75), 29);
        assert_eq!(histogram_bucket(0), 0);
    }

    #[test]
    fn helix_hbonds_are_binned_at_plus_four() {
        let geometry = build_residues(&fixtures::helix_structure(12)).geometry;
        let mut state = vec![ResidueState::default(); geometry.len()];
        calculate_hbond_energies(&geometry, &mut state);
        let mut stats = Statistics::default();
        count_hbonds(&geometry, &state, &mut stats);

        assert_eq!(stats.hbonds, 8);
        assert_eq!(stats.hbonds_at_distance(4), Some(8));
        assert_eq!(stats.hbonds_at_distance(3), Some(0));
        assert_eq!(stats.hbonds_at_distance(6), None);
    }

    #[test]
    fn helix_runs_flush_at_segment_and_end() {
        let s = Structure::new(
            "two",
            vec![fixtures::alpha_helix_chain("A", 4), fixtures::alpha_helix_chain("B", 4)],
        );
        let geometry = build_residues(&s).geometry;
        let mut state = vec![ResidueState::default(); geometry.len()];
        for (k, st) in state.iter_mut().enumerate() {
            if k != 0 {
                st.secondary_structure = SecondaryStructure::AlphaHelix;
            }
        }
        let mut stats = Statistics::default();
        count_alpha_helices(&geometry, &state, &mut stats);

        // residues 1..=3 on A, then all four on B
        assert_eq!(stats.residues_per_alpha_helix[2], 1);
        assert_eq!(stats.residues_per_alpha_helix[3], 1);
        assert_eq!(stats.residues_per_alpha_helix.iter().sum::<u32>(), 2);
    }

    #[test]
    fn summary_mentions_counts() {
        let stats = Statistics {
            residues: 12,
            chains: 1,
            hbonds: 8,
            ss_bridges: 2,
            intra_chain_ss_bridges: 1,
            ..Default::default()
        };
        assert_eq!(stats.inter_chain_ss_bridges(), 1);
        let text = stats.summary();
        assert!(text.contains("12 residue(s)"));
        assert!(text.contains("8 H-bond(s)"));
        assert!(text.contains("2 SS bridge(s)"));
    }
}
