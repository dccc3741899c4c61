use clap::Parser;
use md_davis::{get_contacts, DataFrameFileType, ExportTargets, Result};
use polars::prelude::*;
use std::path::PathBuf;
use tracing::{debug, info, trace};

#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub(crate) struct Args {
    /// Existence map (.xpm) written by `gmx hbond -hbm`
    #[arg(short, long)]
    file: PathBuf,

    /// Index file (.ndx) written by `gmx hbond -hbn`
    #[arg(short, long)]
    index: PathBuf,

    /// Structure file (PDB or mmCIF) the atom indices refer to
    #[arg(short, long)]
    structure: PathBuf,

    /// Group to match from the index file to get the list of contacts.
    /// It has to be the last group of the file.
    #[arg(short, long)]
    group: String,

    /// Number of leading frames to skip
    #[arg(short, long, default_value_t = 0)]
    begin: usize,

    /// Save the contacts table to a CSV file
    #[arg(long, value_name = "FILENAME")]
    csv: Option<PathBuf>,

    /// Save the contacts table to a Parquet file
    #[arg(long, value_name = "FILENAME")]
    parquet: Option<PathBuf>,

    /// Save the contacts table to a JSON file
    #[arg(long, value_name = "FILENAME")]
    json: Option<PathBuf>,

    /// Save the contacts table to a newline-delimited JSON file
    #[arg(long, value_name = "FILENAME")]
    ndjson: Option<PathBuf>,

    /// Save a CSV file containing the contact matrix (percentage of frames)
    #[arg(long, value_name = "FILENAME")]
    matrix: Option<PathBuf>,

    /// Save a PDB file with the percentage of frames in the B-factor column
    #[arg(long, value_name = "FILENAME")]
    pdb: Option<PathBuf>,
}

pub(crate) fn run(args: &Args) -> Result<()> {
    trace!("{args:?}");

    let mut contacts = get_contacts(
        &args.structure,
        &args.index,
        &args.file,
        &args.group,
        args.begin,
    )?;
    println!("{contacts}");

    let df_contacts = contacts.to_table()?;
    let df_present = df_contacts
        .clone()
        .lazy()
        .filter(col("Count").gt(lit(0)))
        .collect()?;
    info!(
        "{} of {} contacts are present in at least one of {} frames",
        df_present.height(),
        df_contacts.height(),
        contacts.n_frames()
    );

    let targets = ExportTargets {
        table: [
            (&args.csv, DataFrameFileType::Csv),
            (&args.parquet, DataFrameFileType::Parquet),
            (&args.json, DataFrameFileType::Json),
            (&args.ndjson, DataFrameFileType::NDJson),
        ]
        .into_iter()
        .filter_map(|(path, file_type)| path.clone().map(|p| (p, file_type)))
        .collect(),
        matrix: args.matrix.clone(),
        annotated_structure: args.pdb.clone(),
    };
    debug!("Writing {} output targets", targets.len());
    contacts.export(&targets)?;

    Ok(())
}
