use crate::residues::ResidueExt;
use pdbtbx::*;

/// Sequence helpers for [`Chain`].
pub trait ChainExt {
    /// One-letter codes of the chain's residues, waters skipped.
    fn pdb_seq(&self) -> Vec<&'static str>;
}

impl ChainExt for Chain {
    fn pdb_seq(&self) -> Vec<&'static str> {
        self.residues().filter_map(|res| res.resn()).collect()
    }
}
