//! Residue records: the immutable geometry arena and the mutable assignment
//! state, both indexed by retained-residue position.
//!
//! Only residues with all four backbone atoms are retained. Every partner
//! relation (hydrogen bonds, bridge partners) is an index into these arenas.

use crate::geometry::{backbone_angles, BackboneAngles};
use crate::secondary::{HelixFlag, HelixStride, SecondaryStructure};
use crate::types::{Point3D, Residue, Structure};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Van der Waals radius of backbone N.
pub const RADIUS_N: f64 = 1.65;
/// Van der Waals radius of CA.
pub const RADIUS_CA: f64 = 1.87;
/// Van der Waals radius of backbone C.
pub const RADIUS_C: f64 = 1.76;
/// Van der Waals radius of backbone O.
pub const RADIUS_O: f64 = 1.4;
/// Radius used for every side-chain atom.
pub const RADIUS_SIDE_ATOM: f64 = 1.8;
/// Solvent probe radius.
pub const RADIUS_WATER: f64 = 1.4;

/// C(i)-N(i+1) distance above which the chain is considered broken.
pub const MAX_PEPTIDE_BOND_LENGTH: f64 = 2.5;

// ---------------------------------------------------------------------------
// Residue typing
// ---------------------------------------------------------------------------

/// Standard amino-acid type, derived from the three-letter compound id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResidueType {
    Ala,
    Arg,
    Asn,
    Asp,
    Cys,
    Gln,
    Glu,
    Gly,
    His,
    Ile,
    Leu,
    Lys,
    Met,
    Phe,
    Pro,
    Ser,
    Thr,
    Trp,
    Tyr,
    Val,
    Unknown,
}

const RESIDUE_TABLE: [(&str, char, ResidueType); 20] = [
    ("ALA", 'A', ResidueType::Ala),
    ("ARG", 'R', ResidueType::Arg),
    ("ASN", 'N', ResidueType::Asn),
    ("ASP", 'D', ResidueType::Asp),
    ("CYS", 'C', ResidueType::Cys),
    ("GLN", 'Q', ResidueType::Gln),
    ("GLU", 'E', ResidueType::Glu),
    ("GLY", 'G', ResidueType::Gly),
    ("HIS", 'H', ResidueType::His),
    ("ILE", 'I', ResidueType::Ile),
    ("LEU", 'L', ResidueType::Leu),
    ("LYS", 'K', ResidueType::Lys),
    ("MET", 'M', ResidueType::Met),
    ("PHE", 'F', ResidueType::Phe),
    ("PRO", 'P', ResidueType::Pro),
    ("SER", 'S', ResidueType::Ser),
    ("THR", 'T', ResidueType::Thr),
    ("TRP", 'W', ResidueType::Trp),
    ("TYR", 'Y', ResidueType::Tyr),
    ("VAL", 'V', ResidueType::Val),
];

impl ResidueType {
    /// Map a three-letter compound id (case-insensitive, surrounding
    /// whitespace ignored). Anything non-standard is [`ResidueType::Unknown`].
    pub fn from_compound_id(id: &str) -> Self {
        let id = id.trim();
        RESIDUE_TABLE
            .iter()
            .find(|(code, _, _)| code.eq_ignore_ascii_case(id))
            .map(|&(_, _, t)| t)
            .unwrap_or(ResidueType::Unknown)
    }

    /// One-letter amino-acid code; `X` for unknown.
    pub fn one_letter(&self) -> char {
        RESIDUE_TABLE
            .iter()
            .find(|(_, _, t)| t == self)
            .map(|&(_, c, _)| c)
            .unwrap_or('X')
    }
}

// ---------------------------------------------------------------------------
// Immutable geometry
// ---------------------------------------------------------------------------

/// Geometry of a retained residue. Written once while building, read-only
/// afterwards, so it can be shared with the accessibility worker.
#[derive(Debug, Clone)]
pub(crate) struct ResidueGeometry {
    /// Chain-break-aware running number, starting at 1.
    pub number: i32,
    /// Index of the break-free segment this residue belongs to.
    pub segment: usize,
    /// True when this residue opens a new segment after an earlier one.
    pub chain_break: bool,
    pub chain_id: String,
    pub seq_id: i32,
    pub auth_seq_id: i32,
    pub compound_id: String,
    pub residue_type: ResidueType,
    pub n: Point3D,
    pub ca: Point3D,
    pub c: Point3D,
    pub o: Point3D,
    /// Amide hydrogen; absent for proline and the first residue of a segment.
    pub h: Option<Point3D>,
    pub side_chain: Vec<Point3D>,
    pub box_min: Point3D,
    pub box_max: Point3D,
    pub center: Point3D,
    pub radius: f64,
    pub angles: BackboneAngles,
}

impl ResidueGeometry {
    fn new(
        chain_id: &str,
        residue: &Residue,
        backbone: [Point3D; 4],
        angles: BackboneAngles,
    ) -> Self {
        let [n, ca, c, o] = backbone;
        let mut side_chain = Vec::new();

        let mut box_min = Point3D::new(f64::MAX, f64::MAX, f64::MAX);
        let mut box_max = Point3D::new(f64::MIN, f64::MIN, f64::MIN);
        let mut extend = |p: &Point3D, radius: f64| {
            let r = radius + 2.0 * RADIUS_WATER;
            box_min.x = box_min.x.min(p.x - r);
            box_min.y = box_min.y.min(p.y - r);
            box_min.z = box_min.z.min(p.z - r);
            box_max.x = box_max.x.max(p.x + r);
            box_max.y = box_max.y.max(p.y + r);
            box_max.z = box_max.z.max(p.z + r);
        };

        for (p, radius) in [(n, RADIUS_N), (ca, RADIUS_CA), (c, RADIUS_C), (o, RADIUS_O)] {
            extend(&p, radius);
        }
        // repeated backbone names are dropped, not treated as side chain
        for atom in residue.atoms.iter().filter(|a| !a.is_backbone()) {
            side_chain.push(atom.coords);
            extend(&atom.coords, RADIUS_SIDE_ATOM);
        }

        let radius = (box_max.x - box_min.x)
            .max(box_max.y - box_min.y)
            .max(box_max.z - box_min.z);
        let center = box_min.add(&box_max).scale(0.5);

        Self {
            number: 0,
            segment: 0,
            chain_break: false,
            chain_id: chain_id.to_string(),
            seq_id: residue.seq_id,
            auth_seq_id: residue.auth_seq_id,
            compound_id: residue.compound_id.trim().to_string(),
            residue_type: ResidueType::from_compound_id(&residue.compound_id),
            n,
            ca,
            c,
            o,
            h: None,
            side_chain,
            box_min,
            box_max,
            center,
            radius,
            angles,
        }
    }

    /// Backbone atoms with their radii, N first.
    pub fn backbone(&self) -> [(Point3D, f64); 4] {
        [
            (self.n, RADIUS_N),
            (self.ca, RADIUS_CA),
            (self.c, RADIUS_C),
            (self.o, RADIUS_O),
        ]
    }

    /// All atoms with their radii: backbone then side chain.
    pub fn atoms(&self) -> impl Iterator<Item = (Point3D, f64)> + '_ {
        self.backbone().into_iter().chain(
            self.side_chain
                .iter()
                .map(|p| (*p, RADIUS_SIDE_ATOM)),
        )
    }

    /// Whether a sphere around `atom` overlaps this residue's box.
    pub fn atom_intersects_box(&self, atom: &Point3D, radius: f64) -> bool {
        atom.x + radius >= self.box_min.x
            && atom.x - radius <= self.box_max.x
            && atom.y + radius >= self.box_min.y
            && atom.y - radius <= self.box_max.y
            && atom.z + radius >= self.box_min.z
            && atom.z - radius <= self.box_max.z
    }
}

/// True when `a` and `b` lie in the same break-free segment.
pub(crate) fn no_chain_break(geometry: &[ResidueGeometry], a: usize, b: usize) -> bool {
    geometry[a].segment == geometry[b].segment
}

/// Outcome of residue construction.
pub(crate) struct BuiltResidues {
    pub geometry: Vec<ResidueGeometry>,
    pub segments: usize,
    pub skipped: usize,
}

/// Build the geometry arena from the input chains, in chain order.
///
/// Incomplete residues are skipped. A new segment starts at every chain id
/// change and wherever the peptide bond to the previous retained residue is
/// longer than [`MAX_PEPTIDE_BOND_LENGTH`]; the running number skips one value
/// at each such break.
pub(crate) fn build_residues(structure: &Structure) -> BuiltResidues {
    let mut geometry: Vec<ResidueGeometry> = Vec::with_capacity(structure.residue_count());
    let mut skipped = 0;
    let mut number = 0;
    let mut segment = 0;

    for chain in &structure.chains {
        let angles = backbone_angles(chain);
        for (residue, angles) in chain.residues.iter().zip(angles) {
            let Some(backbone) = residue.backbone() else {
                skipped += 1;
                continue;
            };
            let mut res = ResidueGeometry::new(&chain.id, residue, backbone, angles);

            number += 1;
            if let Some(prev) = geometry.last() {
                if prev.chain_id != res.chain_id
                    || prev.c.distance_to(&res.n) > MAX_PEPTIDE_BOND_LENGTH
                {
                    number += 1;
                    segment += 1;
                    res.chain_break = true;
                }
            }
            res.number = number;
            res.segment = segment;

            if let Some(prev) = geometry.last() {
                if prev.segment == res.segment && res.residue_type != ResidueType::Pro {
                    let co = prev.c.sub(&prev.o);
                    let len = co.norm();
                    if len > 0.0 {
                        res.h = Some(res.n.add(&co.scale(1.0 / len)));
                    }
                }
            }

            geometry.push(res);
        }
    }

    let segments = if geometry.is_empty() { 0 } else { segment + 1 };
    BuiltResidues {
        geometry,
        segments,
        skipped,
    }
}

// ---------------------------------------------------------------------------
// Mutable assignment state
// ---------------------------------------------------------------------------

/// One recorded hydrogen bond: the partner residue and the bond energy in
/// kcal/mol. An empty slot has no partner and energy 0.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct HBond {
    pub residue: Option<usize>,
    pub energy: f64,
}

/// One bridge partner slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct BridgePartner {
    pub residue: Option<usize>,
    pub ladder: u32,
    pub parallel: bool,
}

/// Assignment state of a retained residue, mutated by the pipeline stages.
#[derive(Debug, Clone, Default)]
pub(crate) struct ResidueState {
    pub secondary_structure: SecondaryStructure,
    /// Strongest bonds where this residue's N-H donates to another C=O.
    pub acceptor: [HBond; 2],
    /// Strongest bonds where this residue's C=O accepts from another N-H.
    pub donor: [HBond; 2],
    pub beta_partner: [BridgePartner; 2],
    pub sheet: u32,
    pub helix_flags: [HelixFlag; 3],
    pub bend: bool,
    pub accessibility: f64,
    pub ss_bridge_nr: u32,
}

impl ResidueState {
    pub fn helix_flag(&self, stride: HelixStride) -> HelixFlag {
        self.helix_flags[stride.index()]
    }

    pub fn set_helix_flag(&mut self, stride: HelixStride, flag: HelixFlag) {
        self.helix_flags[stride.index()] = flag;
    }

    pub fn is_helix_start(&self, stride: HelixStride) -> bool {
        self.helix_flag(stride).is_start()
    }
}
