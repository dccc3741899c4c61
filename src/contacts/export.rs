//! Writing a contact collection to its output targets.

use super::{contact_matrix, ContactCollection};
use crate::error::{ContactsError, Result};
use crate::utils::{write_df_to_file, DataFrameFileType};
use std::path::PathBuf;
use tracing::{debug, info};

/// Output targets of one run. Empty by default.
#[derive(Debug, Clone, Default)]
pub struct ExportTargets {
    /// Destinations of the contacts table
    pub table: Vec<(PathBuf, DataFrameFileType)>,
    /// Destination of the contact matrix, written as CSV
    pub matrix: Option<PathBuf>,
    /// Destination of the structure annotated with contact frequencies
    pub annotated_structure: Option<PathBuf>,
}

impl ExportTargets {
    /// Number of requested targets.
    pub fn len(&self) -> usize {
        self.table.len()
            + usize::from(self.matrix.is_some())
            + usize::from(self.annotated_structure.is_some())
    }

    /// Whether no target was requested.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ContactCollection {
    /// Write the collection to every target in `targets`.
    ///
    /// Targets fail independently: every target is attempted and finished
    /// files stay in place when a later one fails. All failures are returned
    /// together as [`ContactsError::Exports`].
    pub fn export(&mut self, targets: &ExportTargets) -> Result<()> {
        let mut failures = Vec::new();

        if !targets.table.is_empty() {
            match self.to_table() {
                Ok(df) => {
                    for (path, file_type) in &targets.table {
                        match write_df_to_file(&mut df.clone(), path, *file_type) {
                            Ok(()) => info!("Contacts saved to {}", path.display()),
                            Err(e) => failures.push(e),
                        }
                    }
                }
                Err(e) => failures.push(e),
            }
        }

        if let Some(path) = &targets.matrix {
            let written = contact_matrix(self)
                .and_then(|mut df| write_df_to_file(&mut df, path, DataFrameFileType::Csv));
            match written {
                Ok(()) => info!("Contact matrix saved to {}", path.display()),
                Err(e) => failures.push(e),
            }
        }

        if let Some(path) = &targets.annotated_structure {
            debug!("Writing contact frequencies to the B-factor column");
            match self.annotate_structure().and_then(|s| s.write_pdb(path)) {
                Ok(()) => info!("Annotated structure saved to {}", path.display()),
                Err(e) => failures.push(e),
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(ContactsError::Exports(failures))
        }
    }
}
