//! Helix, turn and bend classification.

use crate::geometry::UNDEFINED_ANGLE;
use crate::hbond::test_bond;
use crate::residue::{no_chain_break, ResidueGeometry, ResidueState};
use crate::secondary::{HelixFlag, HelixStride, SecondaryStructure};

/// Kappa above which a residue is a bend.
pub const BEND_KAPPA: f64 = 70.0;

/// Mark helix turns for every stride: the donor end of an i+n -> i bond
/// gets `End`, the residues in between `Middle` and residue i `Start` (or
/// `StartAndEnd` when it already ends another turn).
fn mark_turns(geometry: &[ResidueGeometry], state: &mut [ResidueState]) {
    let n = geometry.len();
    for stride in HelixStride::ALL {
        let s = stride.offset();
        for i in 0..n.saturating_sub(s) {
            if !no_chain_break(geometry, i, i + s) || !test_bond(state, i + s, i) {
                continue;
            }

            state[i + s].set_helix_flag(stride, HelixFlag::End);
            for j in (i + 1)..(i + s) {
                if state[j].helix_flag(stride) == HelixFlag::None {
                    state[j].set_helix_flag(stride, HelixFlag::Middle);
                }
            }

            let start = if state[i].helix_flag(stride) == HelixFlag::End {
                HelixFlag::StartAndEnd
            } else {
                HelixFlag::Start
            };
            state[i].set_helix_flag(stride, start);
        }
    }
}

/// Residues i..i+stride are labelled `ss` when turns of `stride` start at both
/// i-1 and i and `replaceable` accepts every residue currently in the span.
fn promote(
    state: &mut [ResidueState],
    stride: HelixStride,
    ss: SecondaryStructure,
    replaceable: impl Fn(SecondaryStructure) -> bool,
) {
    let n = state.len();
    let span = stride.offset();

    for i in 1..n.saturating_sub(span) {
        if !(state[i].is_helix_start(stride) && state[i - 1].is_helix_start(stride)) {
            continue;
        }
        if (i..i + span).all(|j| replaceable(state[j].secondary_structure)) {
            for s in &mut state[i..i + span] {
                s.secondary_structure = ss;
            }
        }
    }
}

/// Assign alpha, 3_10 and pi helices, then turns and bends for the
/// remaining loop residues.
pub(crate) fn calculate_alpha_helices(
    geometry: &[ResidueGeometry],
    state: &mut [ResidueState],
    prefer_pi_helices: bool,
) {
    mark_turns(geometry, state);

    for (g, s) in geometry.iter().zip(state.iter_mut()) {
        let kappa = g.angles.kappa;
        s.bend = kappa != UNDEFINED_ANGLE && kappa > BEND_KAPPA;
    }

    promote(state, HelixStride::Four, SecondaryStructure::AlphaHelix, |_| true);
    promote(state, HelixStride::Three, SecondaryStructure::Helix3, |ss| {
        matches!(ss, SecondaryStructure::Loop | SecondaryStructure::Helix3)
    });
    promote(state, HelixStride::Five, SecondaryStructure::Helix5, |ss| {
        matches!(ss, SecondaryStructure::Loop | SecondaryStructure::Helix5)
            || (prefer_pi_helices && ss == SecondaryStructure::AlphaHelix)
    });

    let n = state.len();
    for i in 1..n.saturating_sub(1) {
        if state[i].secondary_structure != SecondaryStructure::Loop {
            continue;
        }
        let is_turn = HelixStride::ALL.iter().any(|&stride| {
            (1..stride.offset()).any(|k| i >= k && state[i - k].is_helix_start(stride))
        });
        if is_turn {
            state[i].secondary_structure = SecondaryStructure::Turn;
        } else if state[i].bend {
            state[i].secondary_structure = SecondaryStructure::Bend;
        }
    }

    if log::log_enabled!(log::Level::Trace) {
        for (g, s) in geometry.iter().zip(state.iter()) {
            let flags: String = HelixStride::ALL
                .iter()
                .map(|&stride| s.helix_flag(stride).code(stride))
                .collect();
            log::trace!(
                "{}:{}/{} {} {}",
                g.chain_id,
                g.seq_id,
                g.compound_id,
                s.secondary_structure.code(),
                flags
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::hbond::calculate_hbond_energies;
    use crate::residue::{build_residues, HBond};
    use crate::types::Structure;

    fn run(structure: &Structure, prefer_pi: bool) -> Vec<ResidueState> {
        let geometry = build_residues(structure).geometry;
        let mut state = vec![ResidueState::default(); geometry.len()];
        calculate_hbond_energies(&geometry, &mut state);
        calculate_alpha_helices(&geometry, &mut state, prefer_pi);
        state
    }

    fn ss_string(state: &[ResidueState]) -> String {
        state.iter().map(|s| s.secondary_structure.code()).collect()
    }

    fn flags(state: &[ResidueState], stride: HelixStride) -> String {
        state.iter().map(|s| s.helix_flag(stride).code(stride)).collect()
    }

    #[test]
    fn twelve_residue_alpha_helix() {
        let state = run(&fixtures::helix_structure(12), true);
        assert_eq!(ss_string(&state), " HHHHHHHHHH ");
        assert_eq!(flags(&state, HelixStride::Four), ">>>>XXXX<<<<");
        assert_eq!(flags(&state, HelixStride::Three), "            ");
        assert_eq!(flags(&state, HelixStride::Five), "            ");
    }

    #[test]
    fn five_residue_helix_is_a_turn() {
        // a single i -> i+4 bond: one turn, no consecutive starts
        let state = run(&fixtures::helix_structure(5), true);
        assert_eq!(flags(&state, HelixStride::Four), ">444<");
        assert_eq!(ss_string(&state), " TTT ");
    }

    #[test]
    fn no_helix_across_chain_break() {
        // the same helix split over two chains
        let mut chain = fixtures::alpha_helix_chain("A", 12);
        let tail = chain.residues.split_off(6);
        let mut second = fixtures::alpha_helix_chain("B", 0);
        second.residues = tail;
        let state = run(&Structure::new("split", vec![chain, second]), true);

        for i in 0..6 {
            for stride in HelixStride::ALL {
                let f = state[i].helix_flag(stride);
                // no turn started on A may end on B
                if f.is_start() {
                    assert!(i + stride.offset() < 6, "stride {stride:?} start at {i}");
                }
            }
        }
        // each half keeps its own helix
        assert_eq!(ss_string(&state), " HHHH  HHHH ");
    }

    #[test]
    fn bend_needs_defined_kappa() {
        let state = run(&fixtures::helix_structure(12), true);
        // ideal helix kappa is about 108 degrees
        assert!(!state[0].bend && !state[1].bend);
        assert!(state[2..10].iter().all(|s| s.bend));
        assert!(!state[10].bend && !state[11].bend);
    }

    /// Ideal-helix geometry with only the given donor -> acceptor bonds
    /// recorded. Kappa is cleared unless `bends` is set.
    fn with_bonds(
        n: usize,
        bonds: &[(usize, usize)],
        bends: bool,
    ) -> (Vec<ResidueGeometry>, Vec<ResidueState>) {
        let mut geometry = build_residues(&fixtures::helix_structure(n)).geometry;
        if !bends {
            for g in &mut geometry {
                g.angles.kappa = UNDEFINED_ANGLE;
            }
        }
        let mut state = vec![ResidueState::default(); n];
        for &(donor, acceptor) in bonds {
            let slot = usize::from(state[donor].acceptor[0].residue.is_some());
            state[donor].acceptor[slot] = HBond {
                residue: Some(acceptor),
                energy: -2.0,
            };
        }
        (geometry, state)
    }

    #[test]
    fn pi_helix_preference() {
        // stride-4 starts at 2..=4, stride-5 starts at 2 and 3
        let bonds = [(6, 2), (7, 3), (8, 4), (7, 2), (8, 3)];

        let (geometry, mut preferred) = with_bonds(12, &bonds, false);
        calculate_alpha_helices(&geometry, &mut preferred, true);
        assert_eq!(ss_string(&preferred), "   IIIII    ");

        let (geometry, mut state) = with_bonds(12, &bonds, false);
        calculate_alpha_helices(&geometry, &mut state, false);
        assert_eq!(ss_string(&state), "   HHHHH    ");
        assert_eq!(flags(&state, HelixStride::Five), "  >>555<<   ");
    }

    #[test]
    fn three_ten_helix() {
        let backbone = fixtures::backbone(&[-49.0; 12], &[-26.0; 12]);
        let chain = fixtures::chain_from_backbone("A", &backbone);
        let state = run(&Structure::new("310", vec![chain]), true);
        assert_eq!(ss_string(&state), " GGGGGGGGGG ");
        assert_eq!(flags(&state, HelixStride::Three), ">>>XXXXXX<<<");
        assert_eq!(flags(&state, HelixStride::Four), "            ");
    }

    #[test]
    fn pi_helix_overlapping_alpha_helix() {
        // six alpha residues running into eight pi residues
        let psis: Vec<f64> = [-47.0; 6].into_iter().chain([-70.0; 8]).collect();
        let backbone = fixtures::backbone(&[-57.0; 14], &psis);
        let chain = fixtures::chain_from_backbone("A", &backbone);
        let structure = Structure::new("alpha-pi", vec![chain]);

        let preferred = run(&structure, true);
        assert_eq!(flags(&preferred, HelixStride::Four), ">>>>X<<<<     ");
        assert_eq!(flags(&preferred, HelixStride::Five), "    >>>>><<<<<");
        assert_eq!(ss_string(&preferred), " HHHHIIIIIIII ");

        let alpha_first = run(&structure, false);
        assert_eq!(ss_string(&alpha_first), " HHHHHHHIIIII ");
    }

    #[test]
    fn single_turns_of_each_stride() {
        let (geometry, mut state) = with_bonds(12, &[(5, 2)], false);
        calculate_alpha_helices(&geometry, &mut state, true);
        assert_eq!(flags(&state, HelixStride::Three), "  >33<      ");
        assert_eq!(ss_string(&state), "   TT       ");

        let (geometry, mut state) = with_bonds(12, &[(7, 2)], false);
        calculate_alpha_helices(&geometry, &mut state, true);
        assert_eq!(flags(&state, HelixStride::Five), "  >5555<    ");
        assert_eq!(ss_string(&state), "   TTTT     ");
    }

    #[test]
    fn bent_loop_residues() {
        // helical kappa without any hydrogen bond: bends only
        let (geometry, mut state) = with_bonds(12, &[], true);
        calculate_alpha_helices(&geometry, &mut state, true);
        assert_eq!(ss_string(&state), "  SSSSSSSS  ");

        // a turn takes precedence over a bend
        let (geometry, mut state) = with_bonds(12, &[(5, 2)], true);
        calculate_alpha_helices(&geometry, &mut state, true);
        assert_eq!(ss_string(&state), "  STTSSSSS  ");
    }
}
