//! Kabsch-Sander secondary structure and solvent accessibility for protein
//! structures.
//!
//! - **Input model**: Chains of residues with named atoms in [`types`]
//! - **Geometry**: Distances, dihedrals and backbone angles in [`geometry`]
//! - **Hydrogen bonds**: Electrostatic N-H..O=C energies in [`hbond`]
//! - **Secondary structure**: Helices, bridges, ladders and sheets via [`Dssp`]
//! - **Accessibility**: Per-residue accessible surface in [`surface`]
//! - **Statistics**: Bond, ladder and helix histograms in [`stats`]
//!
//! # Quick start
//!
//! ```
//! use dssp::types::{Atom, Chain, Point3D, Residue, Structure};
//! use dssp::{Dssp, SecondaryStructure};
//!
//! let residue = Residue::new(
//!     "ALA",
//!     1,
//!     vec![
//!         Atom::new("N", Point3D::new(0.000, 0.000, 0.000)),
//!         Atom::new("CA", Point3D::new(1.458, 0.000, 0.000)),
//!         Atom::new("C", Point3D::new(2.009, 1.420, 0.000)),
//!         Atom::new("O", Point3D::new(1.246, 2.390, 0.000)),
//!         Atom::new("CB", Point3D::new(1.988, -0.773, -1.199)),
//!     ],
//! );
//! let structure = Structure::new("1TST", vec![Chain::new("A", vec![residue])]);
//!
//! let dssp = Dssp::new(&structure).unwrap();
//! assert_eq!(dssp.len(), 1);
//! assert_eq!(dssp.secondary_structure("A", 1).unwrap(), SecondaryStructure::Loop);
//! assert!(dssp.accessibility("A", 1).unwrap() > 0.0);
//! assert_eq!(dssp.statistics().chains, 1);
//! ```

pub mod geometry;
pub mod hbond;
pub mod helix;
pub mod pipeline;
pub mod residue;
pub mod secondary;
mod sheet;
pub mod stats;
pub mod surface;
pub mod types;

#[cfg(test)]
mod fixtures;

pub use dssp_core::{DsspError, Result};
pub use geometry::{backbone_angles, BackboneAngles};
pub use hbond::hbond_energy;
pub use pipeline::{Dssp, DsspOptions, ResidueInfo};
pub use residue::ResidueType;
pub use secondary::{
    HelixFlag, HelixStride, SecondaryStructure, SecondaryStructureClass, SecondaryStructureCounts,
};
pub use stats::Statistics;
pub use types::{Atom, Chain, DisulfideBond, Point3D, Residue, ResidueKey, Structure};
