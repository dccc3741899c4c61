#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

//! # MD DaVis Library
//!
//! Post-processing of molecular dynamics trajectories of proteins. The
//! contacts pipeline combines a structure, a GROMACS index group and a
//! hydrogen-bond existence map into per-contact presence series, which can be
//! tabulated as Polars DataFrames or written back into the B-factor column of
//! the structure.

mod chains;
pub mod contacts;
mod error;
mod residues;
mod sequences;
mod utils;

// Re-export key public types
pub use chains::ChainExt;
pub use contacts::{
    contact_matrix, get_contacts, AtomRecord, Contact, ContactCollection, ExportTargets,
    StructureTable, CONTACT_COLUMNS,
};
pub use error::{ContactsError, Result};
pub use residues::{one_letter_code, ResidueExt};
pub use sequences::get_sequences;
pub use utils::{load_model, read_df_from_file, write_df_to_file, DataFrameFileType};
