use clap::Parser;
use md_davis::{get_sequences, load_model, Result};
use std::path::{Path, PathBuf};
use tracing::{trace, warn};

#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub(crate) struct Args {
    /// Path to the PDB or mmCIF files to be analyzed
    #[arg(required = true)]
    input: Vec<PathBuf>,
}

pub(crate) fn run(args: &Args) -> Result<()> {
    trace!("{args:?}");

    for f in &args.input {
        let input_file = f.to_string_lossy();
        let (pdb, pdb_warnings) = load_model(&input_file)?;
        for e in &pdb_warnings {
            warn!("{e}");
        }

        let file_id = Path::new(f)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        // Print sequences as FASTA records
        for (chain, seq) in get_sequences(&pdb) {
            println!(">{file_id}_{chain}\n{seq}");
        }
    }
    Ok(())
}
