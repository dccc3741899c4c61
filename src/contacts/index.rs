//! Reader for GROMACS index (`.ndx`) groups of contact atom pairs.

use crate::error::{ContactsError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, warn};

/// Parse the atom pairs listed under `[ group ]` in an index file.
///
/// See [`read_group`] for the format rules.
pub fn parse_group(index_file: impl AsRef<Path>, group: &str) -> Result<Vec<(usize, usize)>> {
    let file = File::open(index_file.as_ref())?;
    read_group(BufReader::new(file), group)
}

/// Parse the atom pairs listed under `[ group ]`.
///
/// Every line after the header is captured until the end of the input, so
/// the requested group has to be the last one. Indices are one-based on disk
/// and returned zero-based. The first and the last index of a line form the
/// pair, which for `gmx hbond` output are the donor and the acceptor.
///
/// A missing header yields an empty list.
pub fn read_group<R: BufRead>(reader: R, group: &str) -> Result<Vec<(usize, usize)>> {
    let header = format!("[ {group} ]");
    let mut pairs = Vec::new();
    let mut capture = false;

    for (line_idx, line) in reader.lines().enumerate() {
        let line = line?;
        if capture {
            if let Some(pair) = parse_pair(&line, line_idx + 1)? {
                pairs.push(pair);
            }
        } else if line.trim_end_matches('\r') == header {
            debug!("Found group {header} on line {}", line_idx + 1);
            capture = true;
        }
    }

    if !capture {
        warn!("Group {header} not found in the index file");
    }
    Ok(pairs)
}

fn parse_pair(line: &str, line_no: usize) -> Result<Option<(usize, usize)>> {
    let indices = line
        .split_whitespace()
        .map(|token| {
            token
                .parse::<usize>()
                .ok()
                .and_then(|i| i.checked_sub(1))
                .ok_or_else(|| ContactsError::IndexParse {
                    line: line_no,
                    token: token.to_string(),
                })
        })
        .collect::<Result<Vec<usize>>>()?;

    match (indices.first(), indices.last()) {
        (Some(&first), Some(&last)) => Ok(Some((first, last))),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NDX: &str = "\
[ donors_hydrogens_Protein ]
   1    1    5    5
[ hbonds_Protein ]
  42   17
   5    6   13
";

    #[test]
    fn test_last_group_pairs() {
        let pairs = read_group(NDX.as_bytes(), "hbonds_Protein").unwrap();
        assert_eq!(pairs, vec![(41, 16), (4, 12)]);
    }

    #[test]
    fn test_fixture_file() {
        let root = env!("CARGO_MANIFEST_DIR");
        let path = format!("{}/{}", root, "test-data/hbonds.ndx");
        let pairs = parse_group(path, "hbonds_Protein").unwrap();
        assert_eq!(pairs, vec![(4, 12), (9, 12), (5, 3)]);
    }

    #[test]
    fn test_missing_group_is_empty() {
        let pairs = read_group(NDX.as_bytes(), "Hbonds").unwrap();
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_header_must_match_exactly() {
        let ndx = "[hbonds_Protein]\n1 2\n[ hbonds_Protein ] \n3 4\n";
        assert!(read_group(ndx.as_bytes(), "hbonds_Protein")
            .unwrap()
            .is_empty());

        let ndx = "[ hbonds_Protein ]\r\n1 2\r\n";
        assert_eq!(
            read_group(ndx.as_bytes(), "hbonds_Protein").unwrap(),
            vec![(0, 1)]
        );
    }

    #[test]
    fn test_single_index_and_blank_lines() {
        let ndx = "[ Hbonds ]\n7\n\n3 9\n";
        let pairs = read_group(ndx.as_bytes(), "Hbonds").unwrap();
        assert_eq!(pairs, vec![(6, 6), (2, 8)]);
    }

    #[test]
    fn test_group_followed_by_header_fails() {
        let ndx = "[ Hbonds ]\n3 9\n[ Other ]\n1 2\n";
        match read_group(ndx.as_bytes(), "Hbonds") {
            Err(ContactsError::IndexParse { line, token }) => {
                assert_eq!(line, 3);
                assert_eq!(token, "[");
            }
            other => panic!("Expected an index parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_index_is_invalid() {
        let ndx = "[ Hbonds ]\n0 9\n";
        assert!(matches!(
            read_group(ndx.as_bytes(), "Hbonds"),
            Err(ContactsError::IndexParse { line: 2, .. })
        ));
    }
}
