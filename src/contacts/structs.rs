//! Atoms and contacts.

use std::cmp::Ordering;
use std::fmt;

/// One atom of the structure, identified by its descriptive fields.
#[derive(Debug, Hash, PartialEq, Eq, Clone)]
pub struct AtomRecord {
    /// Zero-based row offset in the structure's atom table
    pub index: usize,
    /// Segment identifier
    pub segment: String,
    /// Chain identifier
    pub chain: String,
    /// Three-letter residue name
    pub residue_name: String,
    /// Residue sequence number
    pub residue_sequence_number: isize,
    /// Atom name
    pub atom_name: String,
}

impl AtomRecord {
    /// Dash-joined description, e.g. `PROA-A-ARG-12-NH1`.
    pub fn label(&self) -> String {
        format!(
            "{}-{}-{}-{}-{}",
            self.segment,
            self.chain,
            self.residue_name,
            self.residue_sequence_number,
            self.atom_name
        )
    }

    fn sort_key(&self) -> (&str, &str, &str, isize, &str) {
        (
            self.segment.as_str(),
            self.chain.as_str(),
            self.residue_name.as_str(),
            self.residue_sequence_number,
            self.atom_name.as_str(),
        )
    }
}

/// Ordered by segment, chain, residue name, residue number and atom name.
/// Records with identical fields fall back to their index.
impl Ord for AtomRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key()
            .cmp(&other.sort_key())
            .then(self.index.cmp(&other.index))
    }
}

impl PartialOrd for AtomRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for AtomRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{segment:2} {chain} {resn} {resi:>3} {atomn:4}",
            segment = self.segment,
            chain = self.chain,
            resn = self.residue_name,
            resi = self.residue_sequence_number,
            atomn = self.atom_name
        )
    }
}

/// A candidate atom-atom pairing tracked over the frames of a trajectory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    /// First endpoint
    pub atom1: AtomRecord,
    /// Second endpoint
    pub atom2: AtomRecord,
    /// Presence per frame, `1` when the contact exists in that frame
    pub time_series: Vec<u8>,
    /// Number of frames with the contact present
    pub count: usize,
}

impl Contact {
    /// A contact between two atoms with no presence data yet.
    pub fn new(atom1: AtomRecord, atom2: AtomRecord) -> Self {
        Self {
            atom1,
            atom2,
            time_series: Vec::new(),
            count: 0,
        }
    }

    /// Store the presence series and derive the count from it.
    pub fn set_time_series(&mut self, time_series: Vec<u8>) {
        self.count = time_series.iter().map(|&x| x as usize).sum();
        self.time_series = time_series;
    }

    /// Number of frames covered by the presence series.
    pub fn n_frames(&self) -> usize {
        self.time_series.len()
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -- {}: {}", self.atom1, self.atom2, self.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(index: usize, chain: &str, resi: isize, atomn: &str) -> AtomRecord {
        AtomRecord {
            index,
            segment: "PROA".to_string(),
            chain: chain.to_string(),
            residue_name: "SER".to_string(),
            residue_sequence_number: resi,
            atom_name: atomn.to_string(),
        }
    }

    #[test]
    fn test_first_differing_field_decides() {
        let a = record(10, "A", 5, "OG");
        let b = record(1, "A", 12, "N");
        assert!(a < b, "Residue 5 should sort before residue 12");

        let c = record(0, "B", 1, "N");
        assert!(b < c, "Chain A should sort before chain B");

        // Same fields, index breaks the tie
        let d = record(11, "A", 5, "OG");
        assert!(a < d);
        assert_ne!(a, d);
    }

    #[test]
    fn test_set_time_series_updates_count() {
        let mut contact = Contact::new(record(0, "A", 1, "N"), record(5, "A", 3, "O"));
        assert_eq!(contact.count, 0);
        assert!(contact.time_series.is_empty());

        contact.set_time_series(vec![1, 0, 1, 1]);
        assert_eq!(contact.count, 3);
        assert_eq!(contact.n_frames(), 4);
    }

    #[test]
    fn test_display() {
        let contact = Contact::new(record(0, "A", 1, "N"), record(5, "A", 13, "O"));
        assert_eq!(
            contact.to_string(),
            "PROA A SER   1 N    -- PROA A SER  13 O   : 0"
        );
        assert_eq!(contact.atom2.label(), "PROA-A-SER-13-O");
    }
}
