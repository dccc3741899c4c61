//! Contact matrix tables.

use super::{AtomRecord, ContactCollection};
use crate::error::Result;
use polars::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

/// Tabulate contacts as an `atom1 x atom2` matrix of the percentage of
/// frames in which each contact is present.
///
/// The first column, `Atom`, holds the [`AtomRecord::label`] of every
/// distinct first atom; each following column is named after a distinct
/// second atom. Both axes are sorted by chain, then residue number, residue
/// name and atom name. Pairs without a contact are null.
pub fn contact_matrix(contacts: &ContactCollection) -> Result<DataFrame> {
    let rows: BTreeSet<_> = contacts.iter().map(|c| axis_key(&c.atom1)).collect();
    let cols: BTreeSet<_> = contacts.iter().map(|c| axis_key(&c.atom2)).collect();
    let row_labels: Vec<String> = rows.into_iter().map(|(_, label)| label).collect();
    let col_labels: Vec<String> = cols.into_iter().map(|(_, label)| label).collect();

    let mut percent: BTreeMap<(String, String), f64> = BTreeMap::new();
    for contact in contacts {
        let value = match contact.n_frames() {
            0 => 0.0,
            n => contact.count as f64 * 100.0 / n as f64,
        };
        percent.insert((contact.atom1.label(), contact.atom2.label()), value);
    }

    let mut columns = vec![Column::new("Atom".into(), &row_labels)];
    for col_label in &col_labels {
        let values: Vec<Option<f64>> = row_labels
            .iter()
            .map(|row_label| {
                percent
                    .get(&(row_label.to_owned(), col_label.to_owned()))
                    .copied()
            })
            .collect();
        columns.push(Column::new(col_label.as_str().into(), values));
    }

    Ok(DataFrame::new(columns)?)
}

/// Sort position of an atom on a matrix axis, with its label.
fn axis_key(atom: &AtomRecord) -> ((String, isize, String, String, String), String) {
    (
        (
            atom.chain.to_owned(),
            atom.residue_sequence_number,
            atom.residue_name.to_owned(),
            atom.atom_name.to_owned(),
            atom.segment.to_owned(),
        ),
        atom.label(),
    )
}
