//! Core types for the macromolecular input model.
//!
//! These mirror what a structure reader hands to the assignment engine:
//! ordered chains of residues, each residue a bag of named atoms, plus the
//! explicit disulfide records from the connectivity metadata.

use dssp_core::hash::sha256;
use dssp_core::{ContentAddressable, Summarizable};

/// A point in 3D Cartesian space.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3D {
    /// Create a new point.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The origin.
    pub fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point3D) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Squared Euclidean distance to another point.
    pub fn distance_squared(&self, other: &Point3D) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    /// Dot product.
    pub fn dot(&self, other: &Point3D) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product.
    pub fn cross(&self, other: &Point3D) -> Point3D {
        Point3D {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Vector magnitude.
    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Unit vector in the same direction, or zero if magnitude is zero.
    pub fn normalize(&self) -> Point3D {
        let n = self.norm();
        if n < 1e-15 {
            Point3D::zero()
        } else {
            Point3D {
                x: self.x / n,
                y: self.y / n,
                z: self.z / n,
            }
        }
    }

    /// Vector addition.
    pub fn add(&self, other: &Point3D) -> Point3D {
        Point3D {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }

    /// Vector subtraction.
    pub fn sub(&self, other: &Point3D) -> Point3D {
        Point3D {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }

    /// Scalar multiplication.
    pub fn scale(&self, s: f64) -> Point3D {
        Point3D {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }
}

/// A single atom of a residue.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Atom {
    /// Atom serial number.
    pub serial: u32,
    /// Atom name (e.g. "CA", "N", "CB").
    pub name: String,
    /// Element symbol.
    pub element: Option<String>,
    /// Alternate location indicator.
    pub alt_loc: Option<char>,
    /// 3D coordinates in Angstroms.
    pub coords: Point3D,
}

impl Atom {
    /// Create an atom with just a name and position.
    pub fn new(name: &str, coords: Point3D) -> Self {
        Self {
            serial: 0,
            name: name.into(),
            element: None,
            alt_loc: None,
            coords,
        }
    }

    /// Whether this atom is a backbone atom (N, CA, C, O).
    pub fn is_backbone(&self) -> bool {
        matches!(self.name.trim(), "N" | "CA" | "C" | "O")
    }
}

/// A monomer of a polymer chain.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Residue {
    /// Three-letter compound id (e.g. "ALA", "PRO").
    pub compound_id: String,
    /// Sequence number within the chain's entity sequence.
    pub seq_id: i32,
    /// Author-provided sequence number.
    pub auth_seq_id: i32,
    /// Insertion code.
    pub ins_code: Option<char>,
    /// Atoms belonging to this residue.
    pub atoms: Vec<Atom>,
}

impl Residue {
    /// Create a residue whose author numbering equals its sequence number.
    pub fn new(compound_id: &str, seq_id: i32, atoms: Vec<Atom>) -> Self {
        Self {
            compound_id: compound_id.into(),
            seq_id,
            auth_seq_id: seq_id,
            ins_code: None,
            atoms,
        }
    }

    /// Get an atom by name, returning the first match.
    pub fn get_atom(&self, name: &str) -> Option<&Atom> {
        self.atoms.iter().find(|a| a.name.trim() == name)
    }

    /// N, CA, C and O positions, first occurrence of each name. `None`
    /// marks an incomplete residue.
    pub fn backbone(&self) -> Option<[Point3D; 4]> {
        let at = |name| self.get_atom(name).map(|a| a.coords);
        Some([at("N")?, at("CA")?, at("C")?, at("O")?])
    }
}

/// A polymer chain.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chain {
    /// Chain (asym) identifier.
    pub id: String,
    /// Author-provided chain identifier.
    pub auth_id: String,
    /// Residues in this chain, in sequence order.
    pub residues: Vec<Residue>,
}

impl Chain {
    /// Create a new chain whose author id equals its id.
    pub fn new(id: &str, residues: Vec<Residue>) -> Self {
        Self {
            id: id.into(),
            auth_id: id.into(),
            residues,
        }
    }

    /// Number of residues.
    pub fn residue_count(&self) -> usize {
        self.residues.len()
    }

    /// Total number of atoms across all residues.
    pub fn atom_count(&self) -> usize {
        self.residues.iter().map(|r| r.atoms.len()).sum()
    }
}

/// Identifies a residue by chain id and sequence number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResidueKey {
    pub chain_id: String,
    pub seq_id: i32,
}

impl ResidueKey {
    pub fn new(chain_id: &str, seq_id: i32) -> Self {
        Self {
            chain_id: chain_id.into(),
            seq_id,
        }
    }
}

impl core::fmt::Display for ResidueKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}:{}", self.chain_id, self.seq_id)
    }
}

/// An explicit disulfide bond record from the connectivity metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DisulfideBond {
    pub first: ResidueKey,
    pub second: ResidueKey,
}

/// A complete macromolecular structure (one or more chains).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Structure {
    /// Entry identifier or user-supplied name.
    pub id: String,
    /// Polymer chains in this structure.
    pub chains: Vec<Chain>,
    /// Disulfide bonds declared by the connectivity records.
    pub disulfides: Vec<DisulfideBond>,
}

impl Structure {
    /// Create a structure without connectivity records.
    pub fn new(id: &str, chains: Vec<Chain>) -> Self {
        Self {
            id: id.into(),
            chains,
            disulfides: Vec::new(),
        }
    }

    /// Number of chains.
    pub fn chain_count(&self) -> usize {
        self.chains.len()
    }

    /// Total residues across all chains.
    pub fn residue_count(&self) -> usize {
        self.chains.iter().map(|c| c.residue_count()).sum()
    }

    /// Total atoms across all chains.
    pub fn atom_count(&self) -> usize {
        self.chains.iter().map(|c| c.atom_count()).sum()
    }
}

impl Summarizable for Structure {
    fn summary(&self) -> String {
        format!(
            "Structure {}: {} chain(s), {} residue(s), {} atom(s), {} disulfide(s)",
            self.id,
            self.chain_count(),
            self.residue_count(),
            self.atom_count(),
            self.disulfides.len(),
        )
    }
}

impl ContentAddressable for Structure {
    fn content_hash(&self) -> String {
        let mut bytes = Vec::with_capacity(64 * self.atom_count());
        bytes.extend_from_slice(self.id.as_bytes());
        for chain in &self.chains {
            bytes.extend_from_slice(chain.id.as_bytes());
            for residue in &chain.residues {
                bytes.extend_from_slice(residue.compound_id.as_bytes());
                bytes.extend_from_slice(&residue.seq_id.to_le_bytes());
                for atom in &residue.atoms {
                    bytes.extend_from_slice(atom.name.as_bytes());
                    for v in [atom.coords.x, atom.coords.y, atom.coords.z] {
                        bytes.extend_from_slice(&v.to_le_bytes());
                    }
                }
            }
        }
        for bond in &self.disulfides {
            bytes.extend_from_slice(bond.first.to_string().as_bytes());
            bytes.extend_from_slice(bond.second.to_string().as_bytes());
        }
        sha256(&bytes)
    }
}
