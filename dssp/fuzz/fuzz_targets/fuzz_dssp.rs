#![no_main]
use dssp::types::{Atom, Chain, Point3D, Residue, Structure};
use libfuzzer_sys::fuzz_target;

const NAMES: [&str; 5] = ["N", "CA", "C", "O", "CB"];

// Every 10 bytes become one atom: a name selector, a chain switch and three
// signed 16-bit coordinates in hundredths of an angstrom.
fuzz_target!(|data: &[u8]| {
    let mut chains: Vec<Chain> = vec![Chain::new("A", vec![])];
    let mut seq_id = 1;
    let mut atoms = vec![];

    for chunk in data.chunks_exact(10) {
        let coord = |k: usize| f64::from(i16::from_le_bytes([chunk[k], chunk[k + 1]])) / 100.0;
        let name = NAMES[chunk[0] as usize % NAMES.len()];
        atoms.push(Atom::new(name, Point3D::new(coord(2), coord(4), coord(6))));

        if atoms.len() == NAMES.len() || chunk[1] & 0x80 != 0 {
            let residue = Residue::new("ALA", seq_id, std::mem::take(&mut atoms));
            seq_id += 1;
            if let Some(chain) = chains.last_mut() {
                chain.residues.push(residue);
            }
            if chunk[1] & 0x40 != 0 {
                let id = chains.len().to_string();
                chains.push(Chain::new(&id, vec![]));
            }
        }
    }

    if let Ok(dssp) = dssp::Dssp::new(&Structure::new("fuzz", chains)) {
        for residue in &dssp {
            assert!(residue.accessibility() >= 0.0);
        }
    }
});
