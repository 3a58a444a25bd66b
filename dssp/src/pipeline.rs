//! The assignment pipeline and its read-only result set.
//!
//! [`Dssp::new`] runs every stage to completion or fails without returning a
//! partial result. Accessibility is computed on a scoped worker thread over
//! the immutable geometry while the main thread scores hydrogen bonds and
//! assigns secondary structure.

use core::fmt;

use dssp_core::hash::sha256;
use dssp_core::{ContentAddressable, DsspError, Result, Summarizable};

use crate::geometry::BackboneAngles;
use crate::hbond::calculate_hbond_energies;
use crate::helix::calculate_alpha_helices;
use crate::residue::{build_residues, ResidueGeometry, ResidueState, ResidueType};
use crate::secondary::{HelixFlag, HelixStride, SecondaryStructure, SecondaryStructureCounts};
use crate::sheet::calculate_beta_sheets;
use crate::stats::{count_alpha_helices, count_hbonds, Statistics};
use crate::surface::calculate_accessibilities;
use crate::types::{DisulfideBond, ResidueKey, Structure};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Options for a DSSP run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DsspOptions {
    /// Let pi-helices overwrite alpha-helices.
    pub prefer_pi_helices: bool,
    /// Compute solvent accessibility. When off every residue reports 0.
    pub calculate_accessibility: bool,
}

impl Default for DsspOptions {
    fn default() -> Self {
        Self {
            prefer_pi_helices: true,
            calculate_accessibility: true,
        }
    }
}

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Building,
    BondScoring,
    StructureAssignment,
    Finalizing,
    Ready,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Building => "building residues",
            Stage::BondScoring => "scoring hydrogen bonds",
            Stage::StructureAssignment => "assigning secondary structure",
            Stage::Finalizing => "finalizing statistics",
            Stage::Ready => "ready",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Secondary structure and accessibility for every complete residue of a
/// structure.
#[derive(Debug, Clone)]
pub struct Dssp {
    geometry: Vec<ResidueGeometry>,
    state: Vec<ResidueState>,
    stats: Statistics,
    options: DsspOptions,
}

fn find_index(geometry: &[ResidueGeometry], chain_id: &str, seq_id: i32) -> Option<usize> {
    geometry
        .iter()
        .position(|g| g.chain_id == chain_id && g.seq_id == seq_id)
}

/// Resolve and number the disulfide bridges.
///
/// Records are numbered from 1 in input order. Only residues typed as
/// cysteine carry the number; other compounds (CYX, CSS and the like) are
/// left unnumbered but still count towards the statistics.
fn assign_disulfides(
    geometry: &[ResidueGeometry],
    bonds: &[DisulfideBond],
    state: &mut [ResidueState],
    stats: &mut Statistics,
) -> Result<()> {
    let resolve = |key: &ResidueKey| {
        find_index(geometry, &key.chain_id, key.seq_id)
            .ok_or_else(|| DsspError::MissingResidue(key.to_string()))
    };

    for (nr, bond) in (1u32..).zip(bonds) {
        let ends = [resolve(&bond.first)?, resolve(&bond.second)?];
        for index in ends {
            if geometry[index].residue_type == ResidueType::Cys {
                state[index].ss_bridge_nr = nr;
            } else {
                log::debug!(
                    "disulfide {nr} names {}:{}/{}, not numbered",
                    geometry[index].chain_id,
                    geometry[index].seq_id,
                    geometry[index].compound_id
                );
            }
        }

        stats.ss_bridges += 1;
        if bond.first.chain_id == bond.second.chain_id {
            stats.intra_chain_ss_bridges += 1;
        }
    }
    Ok(())
}

impl Dssp {
    /// Run with default options.
    ///
    /// # Errors
    ///
    /// Returns [`DsspError::MissingResidue`] when a disulfide record names a
    /// residue that is absent or incomplete.
    pub fn new(structure: &Structure) -> Result<Self> {
        Self::with_options(structure, &DsspOptions::default())
    }

    /// Run with explicit options.
    ///
    /// # Errors
    ///
    /// See [`Dssp::new`].
    pub fn with_options(structure: &Structure, options: &DsspOptions) -> Result<Self> {
        log::debug!("{}: {}", structure.id, Stage::Building);
        let built = build_residues(structure);
        log::debug!(
            "{} residue(s) retained in {} segment(s), {} incomplete skipped",
            built.geometry.len(),
            built.segments,
            built.skipped
        );

        let geometry = built.geometry;
        let mut state = vec![ResidueState::default(); geometry.len()];
        let mut stats = Statistics {
            residues: geometry.len() as u32,
            chains: built.segments as u32,
            ..Default::default()
        };
        assign_disulfides(&geometry, &structure.disulfides, &mut state, &mut stats)?;

        let accessibility = std::thread::scope(|scope| {
            let worker = options
                .calculate_accessibility
                .then(|| scope.spawn(|| calculate_accessibilities(&geometry)));

            log::debug!("{}: {}", structure.id, Stage::BondScoring);
            let scored = calculate_hbond_energies(&geometry, &mut state);
            log::debug!("{scored} donor/acceptor pair(s) scored");

            log::debug!("{}: {}", structure.id, Stage::StructureAssignment);
            calculate_beta_sheets(&geometry, &mut state, &mut stats);
            calculate_alpha_helices(&geometry, &mut state, options.prefer_pi_helices);

            match worker {
                Some(handle) => handle
                    .join()
                    .map_err(|_| DsspError::Other("accessibility worker panicked".into())),
                None => Ok(vec![0.0; geometry.len()]),
            }
        })?;

        log::debug!("{}: {}", structure.id, Stage::Finalizing);
        for (s, acc) in state.iter_mut().zip(accessibility) {
            s.accessibility = acc;
            stats.accessible_surface += acc;
        }
        count_hbonds(&geometry, &state, &mut stats);
        count_alpha_helices(&geometry, &state, &mut stats);

        log::debug!("{}: {}", structure.id, Stage::Ready);
        Ok(Self {
            geometry,
            state,
            stats,
            options: options.clone(),
        })
    }

    pub fn options(&self) -> &DsspOptions {
        &self.options
    }

    /// Number of retained residues.
    pub fn len(&self) -> usize {
        self.geometry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometry.is_empty()
    }

    /// Residue at position `index` of the retained sequence.
    pub fn get(&self, index: usize) -> Option<ResidueInfo<'_>> {
        (index < self.len()).then_some(ResidueInfo { dssp: self, index })
    }

    /// Iterate over all residues in sequence order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            dssp: self,
            range: 0..self.len(),
        }
    }

    /// Look up a residue by chain id and sequence number.
    pub fn find(&self, chain_id: &str, seq_id: i32) -> Option<ResidueInfo<'_>> {
        find_index(&self.geometry, chain_id, seq_id).map(|index| ResidueInfo { dssp: self, index })
    }

    fn lookup(&self, chain_id: &str, seq_id: i32) -> Result<ResidueInfo<'_>> {
        self.find(chain_id, seq_id)
            .ok_or_else(|| DsspError::NotFound(ResidueKey::new(chain_id, seq_id).to_string()))
    }

    /// Secondary structure of the residue at (chain id, sequence number).
    ///
    /// # Errors
    ///
    /// [`DsspError::NotFound`] when no retained residue matches.
    pub fn secondary_structure(&self, chain_id: &str, seq_id: i32) -> Result<SecondaryStructure> {
        Ok(self.lookup(chain_id, seq_id)?.secondary_structure())
    }

    /// Accessible surface of the residue at (chain id, sequence number).
    ///
    /// # Errors
    ///
    /// [`DsspError::NotFound`] when no retained residue matches.
    pub fn accessibility(&self, chain_id: &str, seq_id: i32) -> Result<f64> {
        Ok(self.lookup(chain_id, seq_id)?.accessibility())
    }

    /// Whether an alpha turn ends at this residue and another starts at the
    /// next one.
    ///
    /// # Errors
    ///
    /// [`DsspError::NotFound`] when no retained residue matches.
    pub fn is_alpha_helix_end_before_start(&self, chain_id: &str, seq_id: i32) -> Result<bool> {
        Ok(self
            .lookup(chain_id, seq_id)?
            .is_alpha_helix_end_before_start())
    }

    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }

    /// One DSSP code per residue, loops as spaces.
    pub fn ss_string(&self) -> String {
        self.state
            .iter()
            .map(|s| s.secondary_structure.code())
            .collect()
    }

    pub fn counts(&self) -> SecondaryStructureCounts {
        self.state.iter().map(|s| s.secondary_structure).collect()
    }
}

impl Summarizable for Dssp {
    fn summary(&self) -> String {
        let c = self.counts();
        format!(
            "DSSP: {} residue(s), H:{} B:{} E:{} G:{} I:{} T:{} S:{}",
            self.len(),
            c.alpha_helix,
            c.beta_bridge,
            c.strand,
            c.helix3,
            c.helix5,
            c.turn,
            c.bend,
        )
    }
}

impl ContentAddressable for Dssp {
    fn content_hash(&self) -> String {
        fn index_bytes(index: Option<usize>) -> [u8; 8] {
            index.map_or(u64::MAX, |i| i as u64).to_le_bytes()
        }

        let mut bytes = Vec::with_capacity(self.len() * 128);
        for (g, s) in self.geometry.iter().zip(&self.state) {
            bytes.extend_from_slice(g.chain_id.as_bytes());
            bytes.extend_from_slice(&g.number.to_le_bytes());
            bytes.push(s.secondary_structure.code() as u8);
            for stride in HelixStride::ALL {
                bytes.push(s.helix_flag(stride).code(stride) as u8);
            }
            bytes.push(u8::from(s.bend));
            bytes.extend_from_slice(&s.ss_bridge_nr.to_le_bytes());
            for bond in s.acceptor.iter().chain(&s.donor) {
                bytes.extend_from_slice(&index_bytes(bond.residue));
                bytes.extend_from_slice(&bond.energy.to_le_bytes());
            }
            for partner in &s.beta_partner {
                bytes.extend_from_slice(&index_bytes(partner.residue));
                bytes.extend_from_slice(&partner.ladder.to_le_bytes());
                bytes.push(u8::from(partner.parallel));
            }
            bytes.extend_from_slice(&s.sheet.to_le_bytes());
            bytes.extend_from_slice(&s.accessibility.to_le_bytes());
        }
        sha256(&bytes)
    }
}

// ---------------------------------------------------------------------------
// Residue views
// ---------------------------------------------------------------------------

/// Read-only view of one residue's assignment.
#[derive(Clone, Copy)]
pub struct ResidueInfo<'a> {
    dssp: &'a Dssp,
    index: usize,
}

impl<'a> ResidueInfo<'a> {
    fn geometry(&self) -> &'a ResidueGeometry {
        &self.dssp.geometry[self.index]
    }

    fn state(&self) -> &'a ResidueState {
        &self.dssp.state[self.index]
    }

    fn at(&self, index: usize) -> ResidueInfo<'a> {
        ResidueInfo {
            dssp: self.dssp,
            index,
        }
    }

    /// Position in the retained residue sequence.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Chain-break-aware residue number, starting at 1.
    pub fn number(&self) -> i32 {
        self.geometry().number
    }

    pub fn chain_id(&self) -> &'a str {
        &self.geometry().chain_id
    }

    pub fn seq_id(&self) -> i32 {
        self.geometry().seq_id
    }

    pub fn auth_seq_id(&self) -> i32 {
        self.geometry().auth_seq_id
    }

    pub fn compound_id(&self) -> &'a str {
        &self.geometry().compound_id
    }

    pub fn residue_type(&self) -> ResidueType {
        self.geometry().residue_type
    }

    pub fn secondary_structure(&self) -> SecondaryStructure {
        self.state().secondary_structure
    }

    pub fn helix(&self, stride: HelixStride) -> HelixFlag {
        self.state().helix_flag(stride)
    }

    pub fn is_bend(&self) -> bool {
        self.state().bend
    }

    /// True when this residue starts a new segment after a chain change or
    /// a broken peptide bond.
    pub fn chain_break(&self) -> bool {
        self.geometry().chain_break
    }

    /// Bridge partner in slot `n` (0 or 1): the partner residue, its ladder
    /// id and whether the ladder is parallel.
    pub fn bridge_partner(&self, n: usize) -> Option<(ResidueInfo<'a>, u32, bool)> {
        let partner = self.state().beta_partner.get(n)?;
        partner
            .residue
            .map(|r| (self.at(r), partner.ladder, partner.parallel))
    }

    /// Sheet id, 0 when the residue is not in a sheet.
    pub fn sheet(&self) -> u32 {
        self.state().sheet
    }

    /// Accessible surface in square angstroms.
    pub fn accessibility(&self) -> f64 {
        self.state().accessibility
    }

    /// Acceptor in slot `n`: the residue whose C=O receives this residue's
    /// N-H, with the bond energy in kcal/mol.
    pub fn acceptor(&self, n: usize) -> Option<(ResidueInfo<'a>, f64)> {
        let bond = self.state().acceptor.get(n)?;
        bond.residue.map(|r| (self.at(r), bond.energy))
    }

    /// Donor in slot `n`: the residue whose N-H reaches this residue's C=O.
    pub fn donor(&self, n: usize) -> Option<(ResidueInfo<'a>, f64)> {
        let bond = self.state().donor.get(n)?;
        bond.residue.map(|r| (self.at(r), bond.energy))
    }

    /// Disulfide bridge number, 0 for an unbonded cysteine.
    ///
    /// # Errors
    ///
    /// [`DsspError::NotCysteine`] for any other residue type.
    pub fn ss_bridge_nr(&self) -> Result<u32> {
        if self.residue_type() != ResidueType::Cys {
            return Err(DsspError::NotCysteine(format!(
                "{}:{}/{}",
                self.chain_id(),
                self.seq_id(),
                self.compound_id()
            )));
        }
        Ok(self.state().ss_bridge_nr)
    }

    pub fn angles(&self) -> BackboneAngles {
        self.geometry().angles
    }

    /// Whether an alpha turn ends here and another starts at the next
    /// residue. False for the last residue.
    pub fn is_alpha_helix_end_before_start(&self) -> bool {
        let Some(next) = self.dssp.state.get(self.index + 1) else {
            return false;
        };
        self.helix(HelixStride::Four) == HelixFlag::End
            && next.helix_flag(HelixStride::Four) == HelixFlag::Start
    }
}

impl fmt::Debug for ResidueInfo<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResidueInfo")
            .field("number", &self.number())
            .field("chain_id", &self.chain_id())
            .field("seq_id", &self.seq_id())
            .field("compound_id", &self.compound_id())
            .field("secondary_structure", &self.secondary_structure())
            .finish()
    }
}

impl PartialEq for ResidueInfo<'_> {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.dssp, other.dssp) && self.index == other.index
    }
}

/// Iterator over the residues of a [`Dssp`] result.
pub struct Iter<'a> {
    dssp: &'a Dssp,
    range: core::ops::Range<usize>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = ResidueInfo<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.range.next().map(|index| ResidueInfo {
            dssp: self.dssp,
            index,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.range.next_back().map(|index| ResidueInfo {
            dssp: self.dssp,
            index,
        })
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a Dssp {
    type Item = ResidueInfo<'a>;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
