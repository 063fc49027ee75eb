//! PDB text format reader.
//!
//! Reads `ATOM`/`HETATM` coordinates and `CONECT` connectivity from the
//! first model of a file. Bonds are inferred by distance when the file
//! carries no connectivity at all.

use std::collections::BTreeSet;

use glam::Vec3;
use rustc_hash::FxHashMap;

use super::{element, infer_bonds, Atom, Bond, LoadSettings, Molecule};
use crate::error::MolvisError;

/// Extract and trim a 0-based column range. Short lines yield `None`.
fn column(line: &str, start: usize, end: usize) -> Option<&str> {
    let end = end.min(line.len());
    if start >= end {
        return None;
    }
    line.get(start..end).map(str::trim)
}

fn coordinate(
    line: &str,
    start: usize,
    axis: char,
    line_no: usize,
) -> Result<f32, MolvisError> {
    column(line, start, start + 8)
        .and_then(|s| s.parse::<f32>().ok())
        .ok_or_else(|| {
            MolvisError::StructureLoad(format!(
                "line {line_no}: invalid {axis} coordinate"
            ))
        })
}

/// Element symbol from columns 77-78, else the letters of the atom name.
fn element_symbol(line: &str, atom_name: &str) -> String {
    if let Some(sym) = column(line, 76, 78).filter(|s| !s.is_empty()) {
        return element::normalize_symbol(sym);
    }
    // Names like "1HB " or " CA " carry digits around the symbol.
    let letters: String = atom_name
        .trim()
        .chars()
        .skip_while(char::is_ascii_digit)
        .take_while(char::is_ascii_alphabetic)
        .collect();
    if letters.len() >= 2 {
        let two = element::normalize_symbol(&letters[..2]);
        // Two-letter symbols only when the name is left-justified in the
        // record (column 13), which is how PDB marks "FE" vs "F".
        let left_justified = line.get(12..13).is_some_and(|c| c != " ");
        if left_justified && element::find(&two).is_some() {
            return two;
        }
    }
    element::normalize_symbol(&letters[..letters.len().min(1)])
}

/// Parse an `ATOM`/`HETATM` record.
///
/// PDB column layout (1-indexed → 0-indexed):
///    7-11 →  6..11  serial
///   13-16 → 12..16  atom name
///   18-20 → 17..20  residue name
///      22 → 21      chain id
///   23-26 → 22..26  residue sequence number
///   31-54 → 30..54  x, y, z (8.3 each)
///   77-78 → 76..78  element symbol
fn parse_atom(line: &str, line_no: usize) -> Result<Atom, MolvisError> {
    let serial = column(line, 6, 11)
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(0);
    let raw_name = line.get(12..16).unwrap_or("");
    let name = raw_name.trim().to_owned();
    let residue = column(line, 17, 20).unwrap_or("").to_owned();
    let chain = line.get(21..22).and_then(|s| s.chars().next()).unwrap_or(' ');
    let residue_seq = column(line, 22, 26)
        .and_then(|s| s.parse::<i32>().ok())
        .unwrap_or(0);
    let x = coordinate(line, 30, 'x', line_no)?;
    let y = coordinate(line, 38, 'y', line_no)?;
    let z = coordinate(line, 46, 'z', line_no)?;
    let symbol = element_symbol(line, raw_name);

    Ok(Atom {
        serial,
        name,
        residue,
        chain,
        residue_seq,
        position: Vec3::new(x, y, z),
        symbol,
    })
}

/// Collect the bonds of one `CONECT` record into `bonds`.
///
/// Bonded serials occupy 5-character fields from column 12.
fn parse_conect(
    line: &str,
    line_no: usize,
    serial_to_index: &FxHashMap<u32, u32>,
    bonds: &mut BTreeSet<Bond>,
) {
    let Some(central) = column(line, 6, 11).and_then(|s| s.parse::<u32>().ok())
    else {
        log::warn!("line {line_no}: CONECT without a central serial");
        return;
    };
    let Some(&central_idx) = serial_to_index.get(&central) else {
        log::warn!("line {line_no}: CONECT references unknown atom {central}");
        return;
    };

    for start in (11..line.len()).step_by(5) {
        let Some(field) = column(line, start, start + 5) else {
            break;
        };
        if field.is_empty() {
            continue;
        }
        let Ok(serial) = field.parse::<u32>() else {
            continue;
        };
        match serial_to_index.get(&serial) {
            Some(&target_idx) => {
                if let Some(bond) = Bond::new(central_idx, target_idx) {
                    let _ = bonds.insert(bond);
                }
            }
            None => log::warn!(
                "line {line_no}: CONECT references unknown atom {serial}"
            ),
        }
    }
}

/// Parse PDB text into a [`Molecule`].
///
/// # Errors
///
/// Returns [`MolvisError::StructureLoad`] for malformed coordinates
/// (with the 1-based line number) and for files without atoms.
pub fn parse(
    name: &str,
    content: &str,
    settings: &LoadSettings,
) -> Result<Molecule, MolvisError> {
    let mut atoms = Vec::new();
    let mut serial_to_index = FxHashMap::default();
    let mut conect_lines = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        if line.starts_with("ATOM") || line.starts_with("HETATM") {
            let atom = parse_atom(line, line_no)?;
            let _ = serial_to_index.insert(atom.serial, atoms.len() as u32);
            atoms.push(atom);
        } else if line.starts_with("CONECT") {
            conect_lines.push((line_no, line));
        } else if line.starts_with("ENDMDL") || line.starts_with("END ") || line == "END" {
            break;
        }
    }

    if atoms.is_empty() {
        return Err(MolvisError::StructureLoad(format!(
            "{name}: no ATOM or HETATM records"
        )));
    }

    // CONECT records may follow the END of the first model.
    if conect_lines.is_empty() {
        conect_lines = content
            .lines()
            .enumerate()
            .filter(|(_, l)| l.starts_with("CONECT"))
            .map(|(i, l)| (i + 1, l))
            .collect();
    }

    let mut bond_set = BTreeSet::new();
    for (line_no, line) in conect_lines {
        parse_conect(line, line_no, &serial_to_index, &mut bond_set);
    }
    let mut bonds: Vec<Bond> = bond_set.into_iter().collect();

    if bonds.is_empty() && settings.infer_bonds {
        bonds = infer_bonds(&atoms, settings.bond_tolerance);
        log::debug!("{name}: inferred {} bonds", bonds.len());
    }

    log::info!("{name}: {} atoms, {} bonds", atoms.len(), bonds.len());

    Ok(Molecule {
        name: name.to_owned(),
        atoms,
        bonds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAFFEINE_FRAGMENT: &str = "\
COMPND    CAFFEINE FRAGMENT
HETATM    1  C1  UNK     1       1.000   2.000   3.000  1.00  0.00           C
HETATM    2  N1  UNK     1       2.400   2.000   3.000  1.00  0.00           N
HETATM    3  O1  UNK     1       0.300   3.100   3.000  1.00  0.00           O
HETATM    4 FE   HEM     2       9.000   9.000   9.000  1.00  0.00
CONECT    1    2    3
CONECT    2    1
CONECT    3    1
END
";

    fn no_inference() -> LoadSettings {
        LoadSettings {
            infer_bonds: false,
            ..LoadSettings::default()
        }
    }

    #[test]
    fn parses_atoms_and_columns() {
        let mol = parse("caffeine", CAFFEINE_FRAGMENT, &no_inference()).unwrap();
        assert_eq!(mol.atoms.len(), 4);
        let c = &mol.atoms[0];
        assert_eq!(c.serial, 1);
        assert_eq!(c.name, "C1");
        assert_eq!(c.residue, "UNK");
        assert_eq!(c.residue_seq, 1);
        assert_eq!(c.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(c.symbol, "C");
        assert_eq!(mol.atoms[1].symbol, "N");
    }

    #[test]
    fn element_falls_back_to_atom_name() {
        let mol = parse("heme", CAFFEINE_FRAGMENT, &no_inference()).unwrap();
        assert_eq!(mol.atoms[3].symbol, "Fe");
    }

    #[test]
    fn conect_bonds_are_deduplicated() {
        let mol = parse("caffeine", CAFFEINE_FRAGMENT, &no_inference()).unwrap();
        assert_eq!(mol.bonds, vec![Bond { a: 0, b: 1 }, Bond { a: 0, b: 2 }]);
    }

    #[test]
    fn conect_with_unknown_serial_is_skipped() {
        let text = "\
ATOM      1  N   ALA A   1       0.000   0.000   0.000  1.00  0.00           N
ATOM      2  CA  ALA A   1       1.450   0.000   0.000  1.00  0.00           C
CONECT    1    2   99
CONECT   42    1
";
        let mol = parse("ala", text, &no_inference()).unwrap();
        assert_eq!(mol.bonds, vec![Bond { a: 0, b: 1 }]);
        assert_eq!(mol.atoms[1].chain, 'A');
    }

    #[test]
    fn bad_coordinate_reports_line() {
        let text = "\
REMARK    test
ATOM      1  N   ALA A   1       0.000   abc     0.000  1.00  0.00           N
";
        let err = parse("bad", text, &no_inference()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("line 2"), "{msg}");
        assert!(msg.contains("y coordinate"), "{msg}");
    }

    #[test]
    fn empty_file_is_an_error() {
        assert!(parse("empty", "REMARK nothing\nEND\n", &no_inference()).is_err());
    }

    #[test]
    fn only_first_model_is_read() {
        let text = "\
MODEL        1
ATOM      1  CA  GLY A   1       0.000   0.000   0.000  1.00  0.00           C
ENDMDL
MODEL        2
ATOM      1  CA  GLY A   1       5.000   0.000   0.000  1.00  0.00           C
ENDMDL
";
        let mol = parse("nmr", text, &no_inference()).unwrap();
        assert_eq!(mol.atoms.len(), 1);
        assert_eq!(mol.atoms[0].position, Vec3::ZERO);
    }

    #[test]
    fn bonds_inferred_without_conect() {
        let text = "\
ATOM      1  N   ALA A   1       0.000   0.000   0.000  1.00  0.00           N
ATOM      2  CA  ALA A   1       1.450   0.000   0.000  1.00  0.00           C
ATOM      3  C   ALA A   1       2.000   1.400   0.000  1.00  0.00           C
";
        let mol = parse("ala", text, &LoadSettings::default()).unwrap();
        assert_eq!(mol.bonds, vec![Bond { a: 0, b: 1 }, Bond { a: 1, b: 2 }]);
    }
}
