use pdbtbx::*;

/// Water residue names written by common MD engines.
pub const WATER_NAMES: [&str; 5] = ["HOH", "WAT", "SOL", "TIP3", "TIP4"];

/// One-letter code of a three-letter residue name, accepting the
/// protonation and disulfide variants used by Amber/CHARMM/GROMACS
/// force fields. Waters give `None`; anything else unknown gives `X`.
pub fn one_letter_code(name: &str) -> Option<&'static str> {
    let name = name.to_uppercase();
    if WATER_NAMES.contains(&name.as_str()) {
        return None;
    }
    let code = match name.as_str() {
        "ALA" => "A",
        "ARG" | "ARN" => "R",
        "ASN" => "N",
        "ASP" | "ASH" => "D",
        "CYS" | "CYX" | "CYM" => "C",
        "GLN" => "Q",
        "GLU" | "GLH" => "E",
        "GLY" => "G",
        "HIS" | "HID" | "HIE" | "HIP" | "HSD" | "HSE" | "HSP" => "H",
        "ILE" => "I",
        "LEU" => "L",
        "LYS" | "LYN" => "K",
        "MET" => "M",
        "PHE" => "F",
        "PRO" => "P",
        "SER" => "S",
        "THR" => "T",
        "TRP" => "W",
        "TYR" => "Y",
        "VAL" => "V",
        _ => "X",
    };
    Some(code)
}

/// Naming helpers for [`Residue`].
pub trait ResidueExt {
    /// The residue one-letter code, or `None` for waters.
    fn resn(&self) -> Option<&'static str>;
}

impl ResidueExt for Residue {
    fn resn(&self) -> Option<&'static str> {
        one_letter_code(self.name().unwrap_or(""))
    }
}
