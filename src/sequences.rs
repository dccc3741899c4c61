//! Sequence extraction from protein structures.

use crate::chains::ChainExt;
use pdbtbx::*;

/// Get the sequence of every chain of the first model, in chain order.
///
/// # Arguments
///
/// * `pdb` - Reference to a PDB structure
///
/// # Returns
///
/// Pairs of chain identifier and one-letter sequence. Chains holding only
/// waters are left out.
///
/// # Example
///
/// ```no_run
/// use md_davis::{load_model, get_sequences};
///
/// let (pdb, _errors) = load_model("path/to/structure.pdb").unwrap();
/// for (chain_id, seq) in get_sequences(&pdb) {
///     println!("Chain {}: {}", chain_id, seq);
/// }
/// ```
pub fn get_sequences(pdb: &PDB) -> Vec<(String, String)> {
    let Some(model) = pdb.models().next() else {
        return Vec::new();
    };
    model
        .chains()
        .map(|chain| (chain.id().to_string(), chain.pdb_seq().join("")))
        .filter(|(_, seq)| !seq.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::load_model;

    #[test]
    fn test_fixture_sequences() {
        let root = env!("CARGO_MANIFEST_DIR");
        let path = format!("{}/{}", root, "test-data/contacts.pdb");

        let (pdb, _) = load_model(&path).unwrap();
        let seqs = get_sequences(&pdb);
        assert_eq!(
            seqs,
            vec![
                ("A".to_string(), "SR".to_string()),
                ("B".to_string(), "E".to_string())
            ]
        );
    }
}
