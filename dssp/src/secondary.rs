//! Secondary structure states and helix flags.
//!
//! [`SecondaryStructure`] is the 8-state DSSP classification; it reduces to
//! the 4-state [`SecondaryStructureClass`] for coarse summaries.

/// Full 8-state DSSP classification of a residue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SecondaryStructure {
    /// No regular structure.
    #[default]
    Loop,
    /// Alpha-helix (two consecutive i -> i+4 turns).
    AlphaHelix,
    /// Isolated beta-bridge residue.
    BetaBridge,
    /// Extended strand in a ladder.
    Strand,
    /// 3_10-helix (i -> i+3 pattern).
    Helix3,
    /// Pi-helix (i -> i+5 pattern).
    Helix5,
    /// Hydrogen-bonded turn.
    Turn,
    /// Bend (kappa > 70 degrees).
    Bend,
}

impl SecondaryStructure {
    /// All states, in declaration order.
    pub const ALL: [SecondaryStructure; 8] = [
        SecondaryStructure::Loop,
        SecondaryStructure::AlphaHelix,
        SecondaryStructure::BetaBridge,
        SecondaryStructure::Strand,
        SecondaryStructure::Helix3,
        SecondaryStructure::Helix5,
        SecondaryStructure::Turn,
        SecondaryStructure::Bend,
    ];

    /// Single-character DSSP code. Loop is a space.
    pub fn code(&self) -> char {
        match self {
            SecondaryStructure::Loop => ' ',
            SecondaryStructure::AlphaHelix => 'H',
            SecondaryStructure::BetaBridge => 'B',
            SecondaryStructure::Strand => 'E',
            SecondaryStructure::Helix3 => 'G',
            SecondaryStructure::Helix5 => 'I',
            SecondaryStructure::Turn => 'T',
            SecondaryStructure::Bend => 'S',
        }
    }

    /// Parse a single-character DSSP code.
    pub fn from_code(code: char) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.code() == code)
    }

    /// Convert to the simplified 4-state classification.
    pub fn to_class(&self) -> SecondaryStructureClass {
        match self {
            SecondaryStructure::AlphaHelix
            | SecondaryStructure::Helix3
            | SecondaryStructure::Helix5 => SecondaryStructureClass::Helix,
            SecondaryStructure::Strand | SecondaryStructure::BetaBridge => {
                SecondaryStructureClass::Sheet
            }
            SecondaryStructure::Turn | SecondaryStructure::Bend => SecondaryStructureClass::Turn,
            SecondaryStructure::Loop => SecondaryStructureClass::Coil,
        }
    }

    pub fn is_helix(&self) -> bool {
        self.to_class() == SecondaryStructureClass::Helix
    }
}

/// Simplified 4-state classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SecondaryStructureClass {
    Helix,
    Sheet,
    Turn,
    Coil,
}

impl SecondaryStructureClass {
    /// Single-character code.
    pub fn code(&self) -> char {
        match self {
            SecondaryStructureClass::Helix => 'H',
            SecondaryStructureClass::Sheet => 'E',
            SecondaryStructureClass::Turn => 'T',
            SecondaryStructureClass::Coil => 'C',
        }
    }
}

/// Counts of each DSSP state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SecondaryStructureCounts {
    pub alpha_helix: usize,
    pub beta_bridge: usize,
    pub strand: usize,
    pub helix3: usize,
    pub helix5: usize,
    pub turn: usize,
    pub bend: usize,
    pub loops: usize,
}

impl SecondaryStructureCounts {
    pub fn add(&mut self, ss: SecondaryStructure) {
        match ss {
            SecondaryStructure::AlphaHelix => self.alpha_helix += 1,
            SecondaryStructure::BetaBridge => self.beta_bridge += 1,
            SecondaryStructure::Strand => self.strand += 1,
            SecondaryStructure::Helix3 => self.helix3 += 1,
            SecondaryStructure::Helix5 => self.helix5 += 1,
            SecondaryStructure::Turn => self.turn += 1,
            SecondaryStructure::Bend => self.bend += 1,
            SecondaryStructure::Loop => self.loops += 1,
        }
    }

    /// Total number of residues counted.
    pub fn total(&self) -> usize {
        self.alpha_helix
            + self.beta_bridge
            + self.strand
            + self.helix3
            + self.helix5
            + self.turn
            + self.bend
            + self.loops
    }
}

impl FromIterator<SecondaryStructure> for SecondaryStructureCounts {
    fn from_iter<I: IntoIterator<Item = SecondaryStructure>>(iter: I) -> Self {
        let mut counts = Self::default();
        for ss in iter {
            counts.add(ss);
        }
        counts
    }
}

/// Helix stride: the sequence distance of the turn's hydrogen bond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HelixStride {
    /// 3_10 helix, i -> i+3.
    Three,
    /// Alpha helix, i -> i+4.
    Four,
    /// Pi helix, i -> i+5.
    Five,
}

impl HelixStride {
    pub const ALL: [HelixStride; 3] = [HelixStride::Three, HelixStride::Four, HelixStride::Five];

    /// Residue offset spanned by the turn.
    pub fn offset(&self) -> usize {
        match self {
            HelixStride::Three => 3,
            HelixStride::Four => 4,
            HelixStride::Five => 5,
        }
    }

    /// Slot in per-residue flag arrays.
    pub(crate) fn index(&self) -> usize {
        self.offset() - 3
    }
}

/// Per-residue, per-stride helix flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HelixFlag {
    #[default]
    None,
    /// First residue of a turn (its C=O accepts the bond).
    Start,
    /// Last residue of a turn (its N-H donates the bond).
    End,
    /// End of one turn and start of the next.
    StartAndEnd,
    /// Strictly inside a turn.
    Middle,
}

impl HelixFlag {
    /// Whether a turn starts at this residue.
    pub fn is_start(&self) -> bool {
        matches!(self, HelixFlag::Start | HelixFlag::StartAndEnd)
    }

    /// Whether a turn ends at this residue.
    pub fn is_end(&self) -> bool {
        matches!(self, HelixFlag::End | HelixFlag::StartAndEnd)
    }

    /// DSSP listing character: `>` start, `<` end, `X` both, the stride
    /// digit for a middle residue and a space otherwise.
    pub fn code(&self, stride: HelixStride) -> char {
        match self {
            HelixFlag::None => ' ',
            HelixFlag::Start => '>',
            HelixFlag::End => '<',
            HelixFlag::StartAndEnd => 'X',
            HelixFlag::Middle => match stride {
                HelixStride::Three => '3',
                HelixStride::Four => '4',
                HelixStride::Five => '5',
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for ss in SecondaryStructure::ALL {
            assert_eq!(SecondaryStructure::from_code(ss.code()), Some(ss));
        }
        assert_eq!(SecondaryStructure::from_code('C'), None);
        assert_eq!(SecondaryStructure::default().code(), ' ');
    }

    #[test]
    fn reduce_to_class() {
        assert_eq!(SecondaryStructure::Helix5.to_class(), SecondaryStructureClass::Helix);
        assert_eq!(SecondaryStructure::BetaBridge.to_class(), SecondaryStructureClass::Sheet);
        assert_eq!(SecondaryStructure::Bend.to_class(), SecondaryStructureClass::Turn);
        assert_eq!(SecondaryStructure::Loop.to_class().code(), 'C');
        assert!(SecondaryStructure::Helix3.is_helix());
        assert!(!SecondaryStructure::Strand.is_helix());
    }

    #[test]
    fn counts_from_iter() {
        let counts: SecondaryStructureCounts = [
            SecondaryStructure::AlphaHelix,
            SecondaryStructure::AlphaHelix,
            SecondaryStructure::Strand,
            SecondaryStructure::Loop,
        ]
        .into_iter()
        .collect();
        assert_eq!(counts.alpha_helix, 2);
        assert_eq!(counts.strand, 1);
        assert_eq!(counts.loops, 1);
        assert_eq!(counts.total(), 4);
    }

    #[test]
    fn helix_flag_codes() {
        assert_eq!(HelixFlag::Start.code(HelixStride::Four), '>');
        assert_eq!(HelixFlag::End.code(HelixStride::Three), '<');
        assert_eq!(HelixFlag::StartAndEnd.code(HelixStride::Five), 'X');
        assert_eq!(HelixFlag::Middle.code(HelixStride::Five), '5');
        assert_eq!(HelixFlag::None.code(HelixStride::Four), ' ');
        assert!(HelixFlag::StartAndEnd.is_start() && HelixFlag::StartAndEnd.is_end());
        assert!(!HelixFlag::Middle.is_start());
    }

    #[test]
    fn stride_slots() {
        let slots: Vec<usize> = HelixStride::ALL.iter().map(|s| s.index()).collect();
        assert_eq!(slots, vec![0, 1, 2]);
        assert_eq!(HelixStride::Five.offset(), 5);
    }
}
