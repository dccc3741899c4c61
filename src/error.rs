use std::path::PathBuf;
use thiserror::Error;

/// Result type used across the contacts pipeline.
pub type Result<T> = std::result::Result<T, ContactsError>;

/// Errors raised while loading, parsing, aggregating or exporting contacts.
#[derive(Debug, Error)]
pub enum ContactsError {
    /// The structure file is missing, unreadable or unparseable.
    #[error("Failed to load structure '{path}': {reason}", path = path.display())]
    StructureLoad {
        /// Path of the structure file
        path: PathBuf,
        /// Reader messages
        reason: String,
    },

    /// An atom index points past the end of the structure's atom table.
    #[error("Atom index {index} is out of range for a structure with {len} atoms")]
    IndexResolution {
        /// Zero-based atom index
        index: usize,
        /// Number of atoms in the structure
        len: usize,
    },

    /// A data line of the index group holds something other than one-based atom indices.
    #[error("Invalid atom index '{token}' on line {line} of the index file")]
    IndexParse {
        /// One-based line number in the index file
        line: usize,
        /// Offending token
        token: String,
    },

    /// The existence map has more data rows than there are contacts.
    #[error("Existence map has {rows} rows but only {contacts} contacts were parsed")]
    RowCountMismatch {
        /// Number of data rows in the existence map
        rows: usize,
        /// Number of parsed contacts
        contacts: usize,
    },

    /// A B-factor value cannot be stored in the structure.
    #[error("Cannot set the B-factor of atom {index}: {reason}")]
    Annotation {
        /// Zero-based atom index
        index: usize,
        /// Rejected value or reader message
        reason: String,
    },

    /// An output target could not be written.
    #[error("Failed to write '{path}': {reason}", path = path.display())]
    ExportWrite {
        /// Destination path
        path: PathBuf,
        /// Underlying failure
        reason: String,
    },

    /// One or more of the requested output targets failed.
    #[error("{} export target(s) failed: {}", .0.len(), join_errors(.0))]
    Exports(Vec<ContactsError>),

    /// Plain I/O failure while reading an input file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failure while assembling a table.
    #[error("Table error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}

fn join_errors(errors: &[ContactsError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
