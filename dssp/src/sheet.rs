//! Beta bridges, ladders and sheets.
//!
//! Bridges are found from the hydrogen-bond pattern around residue pairs,
//! merged into ladders (tolerating small bulges) and ladders sharing a
//! residue are grouped into sheets.

use std::collections::VecDeque;

use crate::hbond::test_bond;
use crate::residue::{no_chain_break, BridgePartner, ResidueGeometry, ResidueState};
use crate::secondary::SecondaryStructure;
use crate::stats::{histogram_bucket, Statistics};

/// Strand orientation of a bridge or ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BridgeType {
    Parallel,
    Antiparallel,
}

/// A bridge, or after merging a ladder: two runs of residue indices paired
/// across the strands.
#[derive(Debug, Clone)]
struct Bridge {
    kind: BridgeType,
    i: VecDeque<usize>,
    j: VecDeque<usize>,
    chain_i: String,
    ladder: u32,
    sheet: u32,
}

impl Bridge {
    fn first(deque: &VecDeque<usize>) -> usize {
        deque.front().copied().unwrap_or_default()
    }

    fn last(deque: &VecDeque<usize>) -> usize {
        deque.back().copied().unwrap_or_default()
    }

    /// Whether any residue of `self` also belongs to `other`.
    fn linked(&self, other: &Bridge) -> bool {
        self.i
            .iter()
            .chain(self.j.iter())
            .any(|r| other.i.contains(r) || other.j.contains(r))
    }
}

/// Classify the pair (i, j) from the bonds of i-1, i, i+1 and j-1, j, j+1.
pub(crate) fn test_bridge(
    geometry: &[ResidueGeometry],
    state: &[ResidueState],
    i: usize,
    j: usize,
) -> Option<BridgeType> {
    if i == 0 || j + 1 >= geometry.len() {
        return None;
    }
    let (a, b, c) = (i - 1, i, i + 1);
    let (d, e, f) = (j - 1, j, j + 1);

    if !no_chain_break(geometry, a, c) || !no_chain_break(geometry, d, f) {
        return None;
    }

    let bond = |x, y| test_bond(state, x, y);
    if (bond(c, e) && bond(e, a)) || (bond(f, b) && bond(b, d)) {
        Some(BridgeType::Parallel)
    } else if (bond(c, d) && bond(f, a)) || (bond(e, b) && bond(b, e)) {
        Some(BridgeType::Antiparallel)
    } else {
        None
    }
}

/// Scan all residue pairs at least three apart and grow bridges.
fn find_bridges(geometry: &[ResidueGeometry], state: &[ResidueState]) -> Vec<Bridge> {
    let n = geometry.len();
    let mut bridges: Vec<Bridge> = Vec::new();

    for i in 1..n.saturating_sub(4) {
        for j in (i + 3)..n.saturating_sub(1) {
            let Some(kind) = test_bridge(geometry, state, i, j) else {
                continue;
            };

            let extended = bridges.iter_mut().find(|bridge| {
                kind == bridge.kind
                    && i == Bridge::last(&bridge.i) + 1
                    && match kind {
                        BridgeType::Parallel => Bridge::last(&bridge.j) + 1 == j,
                        BridgeType::Antiparallel => Bridge::first(&bridge.j) == j + 1,
                    }
            });

            match extended {
                Some(bridge) => {
                    bridge.i.push_back(i);
                    match kind {
                        BridgeType::Parallel => bridge.j.push_back(j),
                        BridgeType::Antiparallel => bridge.j.push_front(j),
                    }
                }
                None => bridges.push(Bridge {
                    kind,
                    i: VecDeque::from([i]),
                    j: VecDeque::from([j]),
                    chain_i: geometry[i].chain_id.clone(),
                    ladder: 0,
                    sheet: 0,
                }),
            }
        }
    }

    bridges
}

/// Merge bridges into ladders, allowing a bulge of up to five residues on
/// one strand and two on the other, or up to two on both.
fn extend_ladders(geometry: &[ResidueGeometry], bridges: &mut Vec<Bridge>) {
    bridges.sort_by(|a, b| {
        a.chain_i
            .cmp(&b.chain_i)
            .then(Bridge::first(&a.i).cmp(&Bridge::first(&b.i)))
    });

    let mut i = 0;
    while i < bridges.len() {
        let mut j = i + 1;
        while j < bridges.len() {
            let ibi = Bridge::first(&bridges[i].i);
            let iei = Bridge::last(&bridges[i].i);
            let jbi = Bridge::first(&bridges[i].j);
            let jei = Bridge::last(&bridges[i].j);
            let ibj = Bridge::first(&bridges[j].i);
            let iej = Bridge::last(&bridges[j].i);
            let jbj = Bridge::first(&bridges[j].j);
            let jej = Bridge::last(&bridges[j].j);

            let i_gap = ibj.checked_sub(iei);
            let mergeable = bridges[i].kind == bridges[j].kind
                && no_chain_break(geometry, ibi.min(ibj), iei.max(iej))
                && no_chain_break(geometry, jbi.min(jbj), jei.max(jej))
                && i_gap.is_some_and(|gap| gap < 6)
                && !(iei >= ibj && ibi <= iej);

            if !mergeable {
                j += 1;
                continue;
            }

            let j_gap = match bridges[i].kind {
                BridgeType::Parallel => jbj.checked_sub(jei),
                BridgeType::Antiparallel => jbi.checked_sub(jej),
            };
            let bulge = match (i_gap, j_gap) {
                (Some(gi), Some(gj)) => (gj < 6 && gi < 3) || gj < 3,
                _ => false,
            };

            if bulge {
                let other = bridges.remove(j);
                let ladder = &mut bridges[i];
                ladder.i.extend(other.i);
                match ladder.kind {
                    BridgeType::Parallel => ladder.j.extend(other.j),
                    BridgeType::Antiparallel => {
                        for r in other.j.into_iter().rev() {
                            ladder.j.push_front(r);
                        }
                    }
                }
            } else {
                j += 1;
            }
        }
        i += 1;
    }
}

/// Group ladders into sheets. Sheet ids start at 1, ladder ids at 0 and
/// follow ladder order within each sheet.
fn assign_sheets(bridges: &mut [Bridge], stats: &mut Statistics) {
    for bridge in bridges.iter() {
        let bucket = histogram_bucket(bridge.i.len());
        match bridge.kind {
            BridgeType::Parallel => stats.parallel_bridges_per_ladder[bucket] += 1,
            BridgeType::Antiparallel => stats.antiparallel_bridges_per_ladder[bucket] += 1,
        }
    }

    let mut remaining: Vec<usize> = (0..bridges.len()).collect();
    let mut sheet = 1;
    let mut ladder = 0;

    while !remaining.is_empty() {
        let mut members = vec![remaining.remove(0)];

        loop {
            let next = remaining
                .iter()
                .position(|&b| members.iter().any(|&a| bridges[a].linked(&bridges[b])));
            match next {
                Some(pos) => members.push(remaining.remove(pos)),
                None => break,
            }
        }
        members.sort_unstable();

        for &m in &members {
            bridges[m].ladder = ladder;
            bridges[m].sheet = sheet;
            ladder += 1;
        }

        if members.len() == 1 && bridges[members[0]].i.len() > 1 {
            stats.ladders_per_sheet[0] += 1;
        } else if members.len() > 1 {
            stats.ladders_per_sheet[histogram_bucket(members.len())] += 1;
        }

        sheet += 1;
    }
}

/// Write bridge partners, strand/bridge states and sheet ids to the
/// residues of every ladder.
fn assign_partners(bridges: &[Bridge], state: &mut [ResidueState], stats: &mut Statistics) {
    for bridge in bridges {
        let has_partner = |run: &VecDeque<usize>| {
            usize::from(run.iter().any(|&r| state[r].beta_partner[0].residue.is_some()))
        };
        let beta_i = has_partner(&bridge.i);
        let beta_j = has_partner(&bridge.j);

        let ss = if bridge.i.len() > 1 {
            SecondaryStructure::Strand
        } else {
            SecondaryStructure::BetaBridge
        };

        let ibi = Bridge::first(&bridge.i);
        let iei = Bridge::last(&bridge.i);
        let hbonds = (iei - ibi + 2) as u32;
        let parallel = bridge.kind == BridgeType::Parallel;
        if parallel {
            stats.hbonds_in_parallel_bridges += hbonds;
        } else {
            stats.hbonds_in_antiparallel_bridges += hbonds;
        }

        let partner = |residue: usize| BridgePartner {
            residue: Some(residue),
            ladder: bridge.ladder,
            parallel,
        };

        if parallel {
            for (&ri, &rj) in bridge.i.iter().zip(bridge.j.iter()) {
                state[ri].beta_partner[beta_i] = partner(rj);
            }
            for (&rj, &ri) in bridge.j.iter().zip(bridge.i.iter()) {
                state[rj].beta_partner[beta_j] = partner(ri);
            }
        } else {
            for (&ri, &rj) in bridge.i.iter().zip(bridge.j.iter().rev()) {
                state[ri].beta_partner[beta_i] = partner(rj);
            }
            for (&rj, &ri) in bridge.j.iter().zip(bridge.i.iter().rev()) {
                state[rj].beta_partner[beta_j] = partner(ri);
            }
        }

        let spans = [
            ibi..=iei,
            Bridge::first(&bridge.j)..=Bridge::last(&bridge.j),
        ];
        for span in spans {
            for r in span {
                if state[r].secondary_structure != SecondaryStructure::Strand {
                    state[r].secondary_structure = ss;
                }
                state[r].sheet = bridge.sheet;
            }
        }
    }
}

/// Detect bridges, build ladders and sheets, and label the residues.
pub(crate) fn calculate_beta_sheets(
    geometry: &[ResidueGeometry],
    state: &mut [ResidueState],
    stats: &mut Statistics,
) -> usize {
    let mut bridges = find_bridges(geometry, state);
    let found = bridges.len();
    extend_ladders(geometry, &mut bridges);
    assign_sheets(&mut bridges, stats);
    assign_partners(&bridges, state, stats);
    log::debug!("{found} bridge(s) merged into {} ladder(s)", bridges.len());
    found
}
