use crate::error::{ContactsError, Result};
use crate::residues::ResidueExt;
use pdbtbx::*;
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Open an atomic data file with [`pdbtbx::ReadOptions`] and remove water molecules.
pub fn load_model(input_file: &str) -> Result<(PDB, Vec<PDBError>)> {
    let (mut pdb, errors) = pdbtbx::ReadOptions::default()
        .set_only_atomic_coords(true)
        .set_level(pdbtbx::StrictnessLevel::Loose)
        .read(input_file)
        .map_err(|errors| ContactsError::StructureLoad {
            path: PathBuf::from(input_file),
            reason: errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; "),
        })?;

    // Remove water molecules from model
    pdb.remove_residues_by(|res| res.resn().is_none());

    Ok((pdb, errors))
}

/// Write a DataFrame to `file_path` in the given format.
///
/// The path is used as is; no extension is added.
pub fn write_df_to_file(
    df: &mut DataFrame,
    file_path: &Path,
    file_type: DataFrameFileType,
) -> Result<()> {
    let write_err = |reason: String| ContactsError::ExportWrite {
        path: file_path.to_path_buf(),
        reason,
    };
    let mut file = File::create(file_path).map_err(|e| write_err(e.to_string()))?;
    match file_type {
        DataFrameFileType::Csv => CsvWriter::new(&mut file).finish(df),
        DataFrameFileType::Parquet => ParquetWriter::new(&mut file).finish(df).map(|_| ()),
        DataFrameFileType::Json => JsonWriter::new(&mut file)
            .with_json_format(JsonFormat::Json)
            .finish(df),
        DataFrameFileType::NDJson => JsonWriter::new(&mut file)
            .with_json_format(JsonFormat::JsonLines)
            .finish(df),
    }
    .map_err(|e| write_err(e.to_string()))
}

/// Read a DataFrame written by [`write_df_to_file`].
pub fn read_df_from_file(file_path: &Path, file_type: DataFrameFileType) -> Result<DataFrame> {
    let df = match file_type {
        DataFrameFileType::Csv => CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(file_path.to_path_buf()))?
            .finish()?,
        DataFrameFileType::Parquet => ParquetReader::new(File::open(file_path)?).finish()?,
        DataFrameFileType::Json => JsonReader::new(File::open(file_path)?)
            .with_json_format(JsonFormat::Json)
            .finish()?,
        DataFrameFileType::NDJson => JsonReader::new(File::open(file_path)?)
            .with_json_format(JsonFormat::JsonLines)
            .finish()?,
    };
    Ok(df)
}

/// File format for writing DataFrames.
#[derive(clap::ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
pub enum DataFrameFileType {
    /// Comma-separated values
    Csv,
    /// Parquet columnar storage
    Parquet,
    /// Standard JSON
    Json,
    /// Newline-delimited JSON
    NDJson,
}

impl std::fmt::Display for DataFrameFileType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            DataFrameFileType::Csv => write!(f, "csv"),
            DataFrameFileType::Parquet => write!(f, "parquet"),
            DataFrameFileType::Json => write!(f, "json"),
            DataFrameFileType::NDJson => write!(f, "ndjson"),
        }
    }
}
