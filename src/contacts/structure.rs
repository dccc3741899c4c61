//! Atom lookup over a loaded structure.

use super::structs::AtomRecord;
use crate::error::{ContactsError, Result};
use pdbtbx::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

/// Byte range of the B-factor field (columns 61-66) of an ATOM/HETATM record.
const B_FACTOR_COLUMNS: (usize, usize) = (60, 66);

/// Where the atoms of a [`StructureTable`] come from.
#[derive(Debug, Clone)]
enum Records {
    /// Lines of a PDB file and the line numbers of the first model's atom records
    PdbLines {
        lines: Vec<String>,
        atom_lines: Vec<usize>,
    },
    /// Structure read by pdbtbx, atoms in hierarchy order
    Model(PDB),
}

/// Columnar view over the atoms of the first model of a structure file.
///
/// Rows are addressed by zero-based atom index. For PDB files this is the
/// order of the ATOM/HETATM records in the file, which is the order GROMACS
/// index files refer to (after shifting from one-based). The source records
/// are kept so annotations can be written back.
#[derive(Debug, Clone)]
pub struct StructureTable {
    records: Records,
    segment: Vec<String>,
    chain: Vec<String>,
    residue_name: Vec<String>,
    residue_sequence_number: Vec<isize>,
    atom_name: Vec<String>,
    b_factor: Vec<f64>,
}

impl StructureTable {
    /// Read a PDB or mmCIF file.
    ///
    /// The file is validated with pdbtbx. PDB files are then indexed by their
    /// own atom records, so residues whose numbers wrap or restart keep their
    /// position. Unlike [`crate::load_model`], no residues are removed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let load_err = |reason: String| ContactsError::StructureLoad {
            path: path.to_path_buf(),
            reason,
        };
        let input_file = path
            .to_str()
            .ok_or_else(|| load_err("path is not valid UTF-8".to_string()))?;

        let (pdb, pdb_warnings) = pdbtbx::ReadOptions::default()
            .set_only_atomic_coords(true)
            .set_level(pdbtbx::StrictnessLevel::Loose)
            .read(input_file)
            .map_err(|errors| load_err(join_pdb_errors(&errors)))?;
        for e in &pdb_warnings {
            match e.level() {
                pdbtbx::ErrorLevel::BreakingError => error!("{e}"),
                pdbtbx::ErrorLevel::InvalidatingError => error!("{e}"),
                _ => warn!("{e}"),
            }
        }

        let table = if is_pdb_format(path) {
            let text = std::fs::read_to_string(path).map_err(|e| load_err(e.to_string()))?;
            Self::from_pdb_text(&text).map_err(load_err)?
        } else {
            Self::from_pdb(pdb)
        };
        debug!("Loaded {} atoms from {}", table.len(), path.display());

        Ok(table)
    }

    /// Build the table from an already loaded structure, in pdbtbx's
    /// hierarchy order. Segments are empty because pdbtbx does not keep them.
    pub fn from_pdb(pdb: PDB) -> Self {
        let first_model = pdb.models().next().map(|m| m.serial_number());

        let mut chain = Vec::new();
        let mut residue_name = Vec::new();
        let mut residue_sequence_number = Vec::new();
        let mut atom_name = Vec::new();
        let mut b_factor = Vec::new();
        for hier in pdb
            .atoms_with_hierarchy()
            .filter(|x| Some(x.model().serial_number()) == first_model)
        {
            chain.push(hier.chain().id().to_string());
            residue_name.push(hier.residue().name().unwrap_or("").to_string());
            residue_sequence_number.push(hier.residue().serial_number());
            atom_name.push(hier.atom().name().to_string());
            b_factor.push(hier.atom().b_factor());
        }

        Self {
            segment: vec![String::new(); chain.len()],
            records: Records::Model(pdb),
            chain,
            residue_name,
            residue_sequence_number,
            atom_name,
            b_factor,
        }
    }

    /// Index the ATOM/HETATM records of the first model of PDB text.
    fn from_pdb_text(text: &str) -> std::result::Result<Self, String> {
        let lines: Vec<String> = text.lines().map(|l| l.to_string()).collect();

        let mut atom_lines = Vec::new();
        let mut segment = Vec::new();
        let mut chain = Vec::new();
        let mut residue_name = Vec::new();
        let mut residue_sequence_number = Vec::new();
        let mut atom_name = Vec::new();
        let mut b_factor = Vec::new();
        for (line_idx, line) in lines.iter().enumerate() {
            let record = field(line, 0, 6);
            if record == "ENDMDL" {
                break;
            }
            if record != "ATOM" && record != "HETATM" {
                continue;
            }

            let resseq = field(line, 22, 26);
            let resseq = resseq.parse::<isize>().map_err(|_| {
                format!(
                    "invalid residue number '{resseq}' on line {}",
                    line_idx + 1
                )
            })?;
            let (b_start, b_end) = B_FACTOR_COLUMNS;

            atom_lines.push(line_idx);
            segment.push(field(line, 72, 76).to_string());
            chain.push(field(line, 21, 22).to_string());
            residue_name.push(field(line, 17, 21).to_string());
            residue_sequence_number.push(resseq);
            atom_name.push(field(line, 12, 16).to_string());
            b_factor.push(field(line, b_start, b_end).parse().unwrap_or(0.0));
        }

        Ok(Self {
            records: Records::PdbLines { lines, atom_lines },
            segment,
            chain,
            residue_name,
            residue_sequence_number,
            atom_name,
            b_factor,
        })
    }

    /// Number of addressable atoms.
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Whether the first model holds no atoms.
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Resolve the descriptive fields of the atom at `index`.
    pub fn resolve(&self, index: usize) -> Result<AtomRecord> {
        if index >= self.len() {
            return Err(ContactsError::IndexResolution {
                index,
                len: self.len(),
            });
        }
        Ok(AtomRecord {
            index,
            segment: self.segment[index].clone(),
            chain: self.chain[index].clone(),
            residue_name: self.residue_name[index].clone(),
            residue_sequence_number: self.residue_sequence_number[index],
            atom_name: self.atom_name[index].clone(),
        })
    }

    /// B-factor currently stored for the atom at `index`.
    pub fn b_factor(&self, index: usize) -> Option<f64> {
        self.b_factor.get(index).copied()
    }

    /// Write each value of `annotation` into the B-factor of the atom with
    /// that index. Atoms missing from the mapping keep their value, indices
    /// past the end are ignored.
    ///
    /// Every value is checked before anything is written, so a rejected value
    /// leaves the structure unchanged.
    pub fn apply_annotation(&mut self, annotation: &BTreeMap<usize, f64>) -> Result<()> {
        let n_atoms = self.len();
        let annotation: Vec<(usize, f64)> = annotation
            .iter()
            .filter(|(&index, _)| index < n_atoms)
            .map(|(&index, &value)| (index, value))
            .collect();
        for &(index, value) in &annotation {
            // Six columns with two decimals
            if !(0.0..10000.0).contains(&value) {
                return Err(ContactsError::Annotation {
                    index,
                    reason: format!("{value} does not fit the B-factor field"),
                });
            }
        }

        match &mut self.records {
            Records::PdbLines { lines, atom_lines } => {
                for &(index, value) in &annotation {
                    let line = &mut lines[atom_lines[index]];
                    *line = with_b_factor(line, value);
                }
            }
            Records::Model(pdb) => {
                let targets: BTreeMap<usize, f64> = annotation.iter().copied().collect();
                // The first model's atoms come first in iteration order
                for (index, atom) in pdb.atoms_mut().take(n_atoms).enumerate() {
                    if let Some(&value) = targets.get(&index) {
                        atom.set_b_factor(value)
                            .map_err(|reason| ContactsError::Annotation { index, reason })?;
                    }
                }
            }
        }
        for (index, value) in annotation {
            self.b_factor[index] = value;
        }
        Ok(())
    }

    /// Save the structure in PDB format.
    ///
    /// Structures read from PDB files are written back line by line, so
    /// record order and every field other than an annotated B-factor stay as
    /// they were. Structures read from other formats are written by pdbtbx.
    pub fn write_pdb(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let write_err = |reason: String| ContactsError::ExportWrite {
            path: PathBuf::from(path),
            reason,
        };
        match &self.records {
            Records::PdbLines { lines, .. } => {
                let mut text = lines.join("\n");
                text.push('\n');
                std::fs::write(path, text).map_err(|e| write_err(e.to_string()))
            }
            Records::Model(pdb) => {
                let output_file = path
                    .to_str()
                    .ok_or_else(|| write_err("path is not valid UTF-8".to_string()))?;
                pdbtbx::save_pdb(pdb, output_file, pdbtbx::StrictnessLevel::Loose)
                    .map_err(|errors| write_err(join_pdb_errors(&errors)))
            }
        }
    }
}

fn join_pdb_errors(errors: &[PDBError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

fn is_pdb_format(path: &Path) -> bool {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("")
        .to_lowercase();
    name.ends_with(".pdb") || name.ends_with(".ent")
}

/// Trimmed fixed-width field `start..end` of a record, empty when the line is shorter.
fn field(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end.min(line.len())).unwrap_or("").trim()
}

/// The record with its B-factor field replaced by `value`.
fn with_b_factor(line: &str, value: f64) -> String {
    let (b_start, b_end) = B_FACTOR_COLUMNS;
    let head: String = line.chars().take(b_start).collect();
    let tail: String = line.chars().skip(b_end).collect();
    format!("{head:<b_start$}{value:6.2}{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_path(name: &str) -> String {
        let root = env!("CARGO_MANIFEST_DIR");
        format!("{}/test-data/{}", root, name)
    }

    fn load_fixture() -> StructureTable {
        StructureTable::load(fixture_path("contacts.pdb")).unwrap()
    }

    #[test]
    fn test_resolve_fields() {
        let structure = load_fixture();
        assert_eq!(structure.len(), 14);

        let og = structure.resolve(4).unwrap();
        assert_eq!(og.index, 4);
        assert_eq!(og.segment, "PROA");
        assert_eq!(og.chain, "A");
        assert_eq!(og.residue_name, "SER");
        assert_eq!(og.residue_sequence_number, 1);
        assert_eq!(og.atom_name, "OG");

        let oe1 = structure.resolve(12).unwrap();
        assert_eq!(oe1.segment, "PROB");
        assert_eq!(oe1.chain, "B");
        assert_eq!(oe1.residue_name, "GLU");
        assert_eq!(oe1.atom_name, "OE1");
    }

    #[test]
    fn test_resolve_boundary() {
        let structure = load_fixture();
        let last = structure.resolve(structure.len() - 1).unwrap();
        assert_eq!(last.residue_name, "HOH");
        assert_eq!(last.segment, "SOLV");

        match structure.resolve(structure.len()) {
            Err(ContactsError::IndexResolution { index, len }) => {
                assert_eq!(index, 14);
                assert_eq!(len, 14);
            }
            other => panic!("Expected an index resolution error, got {other:?}"),
        }
    }

    #[test]
    fn test_restarting_residue_numbers_keep_file_order() {
        let structure = StructureTable::load(fixture_path("restart.pdb")).unwrap();
        assert_eq!(structure.len(), 6);

        let atoms: Vec<AtomRecord> = (0..6).map(|i| structure.resolve(i).unwrap()).collect();
        let names: Vec<&str> = atoms.iter().map(|a| a.atom_name.as_str()).collect();
        assert_eq!(names, vec!["N", "CA", "N", "N", "OW", "OW"]);
        let residues: Vec<(&str, &str, isize)> = atoms
            .iter()
            .map(|a| (a.chain.as_str(), a.residue_name.as_str(), a.residue_sequence_number))
            .collect();
        assert_eq!(
            residues,
            vec![
                ("A", "SER", 1),
                ("A", "SER", 1),
                ("A", "GLY", 2),
                ("B", "ALA", 1),
                ("A", "SOL", 1),
                ("A", "SOL", 3),
            ]
        );
        let segments: Vec<&str> = atoms.iter().map(|a| a.segment.as_str()).collect();
        assert_eq!(segments, vec!["PROA", "PROA", "PROA", "PROB", "SOLV", "SOLV"]);
    }

    #[test]
    fn test_restarting_residue_numbers_annotate_in_place() {
        let mut structure = StructureTable::load(fixture_path("restart.pdb")).unwrap();
        structure
            .apply_annotation(&BTreeMap::from([(2, 33.33), (4, 99.99)]))
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("annotated.pdb");
        structure.write_pdb(&output).unwrap();

        let original = std::fs::read_to_string(fixture_path("restart.pdb")).unwrap();
        let written = std::fs::read_to_string(&output).unwrap();
        let original: Vec<&str> = original.lines().collect();
        let written: Vec<&str> = written.lines().collect();
        assert_eq!(original.len(), written.len());
        for (line_idx, (before, after)) in original.iter().zip(&written).enumerate() {
            match line_idx {
                // Records of atoms 2 and 4
                3 | 5 => {
                    assert_eq!(&before[..60], &after[..60]);
                    assert_eq!(&before[66..], &after[66..]);
                }
                _ => assert_eq!(before, after),
            }
        }
        assert_eq!(&written[3][60..66], " 33.33");
        assert_eq!(&written[5][60..66], " 99.99");
    }

    #[test]
    fn test_missing_structure_file() {
        assert!(matches!(
            StructureTable::load(fixture_path("does-not-exist.pdb")),
            Err(ContactsError::StructureLoad { .. })
        ));
    }

    #[test]
    fn test_apply_annotation_leaves_other_atoms() {
        let mut structure = load_fixture();
        let annotation = BTreeMap::from([(0, 42.5), (13, 99.99), (20, 1.0)]);
        structure.apply_annotation(&annotation).unwrap();

        assert_eq!(structure.b_factor(0), Some(42.5));
        assert_eq!(structure.b_factor(13), Some(99.99));
        assert_eq!(structure.b_factor(1), Some(10.0));
        assert_eq!(structure.b_factor(14), None);
    }

    #[test]
    fn test_rejected_annotation_changes_nothing() {
        let mut structure = load_fixture();
        let annotation = BTreeMap::from([(0, 42.5), (3, -1.0)]);
        match structure.apply_annotation(&annotation) {
            Err(ContactsError::Annotation { index, .. }) => assert_eq!(index, 3),
            other => panic!("Expected an annotation error, got {other:?}"),
        }
        assert_eq!(structure.b_factor(0), Some(10.0));
    }

    #[test]
    fn test_model_annotation_sets_atoms() {
        let (pdb, _) = pdbtbx::ReadOptions::default()
            .set_only_atomic_coords(true)
            .set_level(pdbtbx::StrictnessLevel::Loose)
            .read(&fixture_path("contacts.pdb"))
            .unwrap();
        let mut structure = StructureTable::from_pdb(pdb);
        assert_eq!(structure.resolve(4).unwrap().segment, "");

        structure
            .apply_annotation(&BTreeMap::from([(4, 50.0)]))
            .unwrap();
        assert_eq!(structure.b_factor(4), Some(50.0));
        match &structure.records {
            Records::Model(pdb) => {
                assert_eq!(pdb.atoms().nth(4).map(|a| a.b_factor()), Some(50.0))
            }
            Records::PdbLines { .. } => panic!("Expected a pdbtbx model"),
        }
    }

    #[test]
    fn test_fields_of_short_records() {
        let text = "\
ATOM      1  N   SER A   1       1.000   2.000  -1.500  1.00 10.00      PROA N
ATOM      2  CA  SER A   1       2.100   2.700  -1.200
ENDMDL
ATOM      1  N   SER A   1       1.000   2.000  -1.500  1.00 10.00      PROA N
";
        let structure = StructureTable::from_pdb_text(text).unwrap();
        assert_eq!(structure.len(), 2);
        assert_eq!(structure.resolve(1).unwrap().segment, "");
        assert_eq!(structure.b_factor(1), Some(0.0));
        assert_eq!(
            with_b_factor("ATOM      2  CA  SER A   1       2.100   2.700  -1.200", 7.5),
            "ATOM      2  CA  SER A   1       2.100   2.700  -1.200        7.50"
        );
    }

    #[test]
    fn test_invalid_residue_number() {
        let text = "ATOM      1  N   SER A  x1       1.000   2.000  -1.500  1.00 10.00\n";
        let reason = StructureTable::from_pdb_text(text).unwrap_err();
        assert!(reason.contains("line 1"), "{reason}");
    }

    #[test]
    fn test_write_pdb_round_trip() {
        let mut structure = load_fixture();
        structure
            .apply_annotation(&BTreeMap::from([(4, 74.99)]))
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("annotated.pdb");
        structure.write_pdb(&output).unwrap();

        let text = std::fs::read_to_string(&output).unwrap();
        assert!(text.ends_with('\n'));

        let reloaded = StructureTable::load(&output).unwrap();
        assert_eq!(reloaded.len(), structure.len());
        assert_eq!(reloaded.b_factor(4), Some(74.99));
        assert_eq!(reloaded.b_factor(5), Some(10.0));
        let og = reloaded.resolve(4).unwrap();
        assert_eq!(og.atom_name, "OG");
        assert_eq!(og.segment, "PROA");
        assert_eq!(reloaded.resolve(13).unwrap().segment, "SOLV");
    }
}
