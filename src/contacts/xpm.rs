//! Reader for the existence maps (`.xpm`) written by `gmx hbond -hbm`.

use crate::error::Result;
use std::io::BufRead;
use tracing::trace;

/// Character marking a frame in which the contact is present.
pub const PRESENT: char = 'o';

/// Decode the data rows of an existence map.
///
/// Rows are the quoted lines after the first line containing `x-axis:`; the
/// header, colour table and axis comments before it are skipped. Each
/// character between the first and the last quote becomes `1` when it is
/// [`PRESENT`] and `0` otherwise.
pub fn read_existence_rows<R: BufRead>(reader: R) -> Result<Vec<Vec<u8>>> {
    let mut rows = Vec::new();
    let mut in_matrix = false;

    for line in reader.lines() {
        let line = line?;
        if !in_matrix {
            in_matrix = line.contains("x-axis:");
            continue;
        }
        if !line.starts_with('"') {
            continue;
        }
        let content = match line.rfind('"') {
            Some(end) if end > 0 => &line[1..end],
            _ => &line[1..],
        };
        rows.push(
            content
                .chars()
                .map(|c| if c == PRESENT { 1 } else { 0 })
                .collect(),
        );
    }

    trace!("Decoded {} existence rows", rows.len());
    Ok(rows)
}
