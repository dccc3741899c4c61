//! Contact extraction from `gmx hbond` output.
//!
//! An index group lists the atom pairs of each contact, an existence map
//! tells in which frames each contact is present. The rows of the map follow
//! the order of the pairs in the group, so both files must come from the same
//! `gmx hbond` run.
pub mod export;
pub mod index;
pub mod matrix;
pub mod structs;
pub mod structure;
pub mod xpm;

// Re-exports
pub use export::ExportTargets;
pub use index::{parse_group, read_group};
pub use matrix::contact_matrix;
pub use structs::*;
pub use structure::StructureTable;
pub use xpm::read_existence_rows;

use crate::error::{ContactsError, Result};
use polars::prelude::*;
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, warn};

/// Column names of the table built by [`ContactCollection::to_table`].
pub const CONTACT_COLUMNS: [&str; 11] = [
    "Segment1", "Chain1", "Residue1", "ResSeq1", "Atom1", "Segment2", "Chain2", "Residue2",
    "ResSeq2", "Atom2", "Count",
];

/// Run the contacts pipeline on a structure, an index file and an existence map.
///
/// # Arguments
///
/// * `structure_file` - PDB or mmCIF file the atom indices refer to
/// * `index_file` - GROMACS index file whose last group lists the contacts
/// * `xpm_file` - Existence map with one row per contact in the group
/// * `group` - Name of the index group, without brackets
/// * `begin` - Number of leading frames to drop from each row
///
/// # Example
///
/// ```no_run
/// use md_davis::get_contacts;
///
/// let contacts = get_contacts("md.pdb", "hbond.ndx", "hbmap.xpm", "hbonds_Protein", 0).unwrap();
/// println!("{}", contacts.to_table().unwrap());
/// ```
pub fn get_contacts(
    structure_file: impl AsRef<Path>,
    index_file: impl AsRef<Path>,
    xpm_file: impl AsRef<Path>,
    group: &str,
    begin: usize,
) -> Result<ContactCollection> {
    let structure = StructureTable::load(structure_file)?;
    let mut contacts = ContactCollection::new(structure).with_begin(begin);
    contacts.parse_indices(index_file, group)?;
    contacts.add_counts(xpm_file)?;
    debug!(
        "Parsed {} contacts over {} frames",
        contacts.len(),
        contacts.n_frames()
    );
    Ok(contacts)
}

/// Contacts of one index group together with the structure they refer to.
#[derive(Debug, Clone)]
pub struct ContactCollection {
    contacts: Vec<Contact>,
    structure: StructureTable,
    begin: usize,
}

impl ContactCollection {
    /// An empty collection bound to `structure`.
    pub fn new(structure: StructureTable) -> Self {
        Self {
            contacts: Vec::new(),
            structure,
            begin: 0,
        }
    }

    /// Drop the first `frames` frames of every row read by [`Self::add_counts`].
    pub fn with_begin(mut self, frames: usize) -> Self {
        self.begin = frames;
        self
    }

    /// Append one contact per atom pair of `group` in the index file.
    pub fn parse_indices(&mut self, index_file: impl AsRef<Path>, group: &str) -> Result<()> {
        let file = File::open(index_file.as_ref())?;
        self.parse_indices_from_reader(BufReader::new(file), group)
    }

    /// Same as [`Self::parse_indices`] on an already opened reader.
    pub fn parse_indices_from_reader<R: BufRead>(&mut self, reader: R, group: &str) -> Result<()> {
        for (first, last) in read_group(reader, group)? {
            let atom1 = self.structure.resolve(first)?;
            let atom2 = self.structure.resolve(last)?;
            self.contacts.push(Contact::new(atom1, atom2));
        }
        Ok(())
    }

    /// Fill in the presence series of every contact from an existence map.
    pub fn add_counts(&mut self, xpm_file: impl AsRef<Path>) -> Result<()> {
        let file = File::open(xpm_file.as_ref())?;
        self.add_counts_from_reader(BufReader::new(file))
    }

    /// Same as [`Self::add_counts`] on an already opened reader.
    ///
    /// Row `n` of the map belongs to contact `n`. More rows than contacts is
    /// an error and leaves the collection untouched; fewer rows only warns,
    /// the trailing contacts keep an empty series.
    pub fn add_counts_from_reader<R: BufRead>(&mut self, reader: R) -> Result<()> {
        let rows = read_existence_rows(reader)?;
        if rows.len() > self.contacts.len() {
            return Err(ContactsError::RowCountMismatch {
                rows: rows.len(),
                contacts: self.contacts.len(),
            });
        }
        if rows.len() < self.contacts.len() {
            warn!(
                "Existence map has {} rows for {} contacts; is the index group the last one in the file?",
                rows.len(),
                self.contacts.len()
            );
        }

        let begin = self.begin;
        for (contact, row) in self.contacts.iter_mut().zip(rows) {
            contact.set_time_series(row.into_iter().skip(begin).collect());
        }
        Ok(())
    }

    /// Number of contacts.
    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    /// Whether no contacts were parsed.
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Iterate over the contacts in index-file order.
    pub fn iter(&self) -> std::slice::Iter<'_, Contact> {
        self.contacts.iter()
    }

    /// The contacts in index-file order.
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// The bound structure.
    pub fn structure(&self) -> &StructureTable {
        &self.structure
    }

    /// Release the bound structure.
    pub fn into_structure(self) -> StructureTable {
        self.structure
    }

    /// Length of the longest presence series.
    pub fn n_frames(&self) -> usize {
        self.contacts.iter().map(|c| c.n_frames()).max().unwrap_or(0)
    }

    /// One row per contact with the fields of both atoms and the count.
    pub fn to_table(&self) -> Result<DataFrame> {
        let c = &self.contacts;
        let df = df!(
            "Segment1" => c.iter().map(|x| x.atom1.segment.to_owned()).collect::<Vec<String>>(),
            "Chain1" => c.iter().map(|x| x.atom1.chain.to_owned()).collect::<Vec<String>>(),
            "Residue1" => c.iter().map(|x| x.atom1.residue_name.to_owned()).collect::<Vec<String>>(),
            "ResSeq1" => c.iter().map(|x| x.atom1.residue_sequence_number as i64).collect::<Vec<i64>>(),
            "Atom1" => c.iter().map(|x| x.atom1.atom_name.to_owned()).collect::<Vec<String>>(),
            "Segment2" => c.iter().map(|x| x.atom2.segment.to_owned()).collect::<Vec<String>>(),
            "Chain2" => c.iter().map(|x| x.atom2.chain.to_owned()).collect::<Vec<String>>(),
            "Residue2" => c.iter().map(|x| x.atom2.residue_name.to_owned()).collect::<Vec<String>>(),
            "ResSeq2" => c.iter().map(|x| x.atom2.residue_sequence_number as i64).collect::<Vec<i64>>(),
            "Atom2" => c.iter().map(|x| x.atom2.atom_name.to_owned()).collect::<Vec<String>>(),
            "Count" => c.iter().map(|x| x.count as i64).collect::<Vec<i64>>(),
        )?;
        Ok(df)
    }

    /// Per-atom share of frames in which at least one of the atom's contacts
    /// is present, scaled to `0..=99.99` and rounded to two decimals.
    ///
    /// Atoms without any presence data do not appear in the mapping.
    pub fn contact_frequencies(&self) -> BTreeMap<usize, f64> {
        let mut presence: BTreeMap<usize, Vec<bool>> = BTreeMap::new();
        for contact in self.contacts.iter().filter(|c| c.n_frames() > 0) {
            for index in [contact.atom1.index, contact.atom2.index] {
                let frames = presence.entry(index).or_default();
                if frames.len() < contact.n_frames() {
                    frames.resize(contact.n_frames(), false);
                }
                for (frame, &x) in frames.iter_mut().zip(&contact.time_series) {
                    *frame |= x == 1;
                }
            }
        }

        presence
            .into_iter()
            .map(|(index, frames)| {
                let present = frames.iter().filter(|&&p| p).count();
                let freq = present as f64 / frames.len() as f64 * 99.99;
                (index, (freq * 100.0).round() / 100.0)
            })
            .collect()
    }

    /// Write [`Self::contact_frequencies`] into the B-factors of the bound structure.
    pub fn annotate_structure(&mut self) -> Result<&StructureTable> {
        let annotation = self.contact_frequencies();
        debug!("Annotating {} atoms with contact frequencies", annotation.len());
        self.structure.apply_annotation(&annotation)?;
        Ok(&self.structure)
    }
}

impl<'a> IntoIterator for &'a ContactCollection {
    type Item = &'a Contact;
    type IntoIter = std::slice::Iter<'a, Contact>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for ContactCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Segment Chain Residue ResSeq Atom -- Segment Chain Residue ResSeq Atom : Count"
        )?;
        for contact in &self.contacts {
            write!(f, "\n{contact}")?;
        }
        Ok(())
    }
}
