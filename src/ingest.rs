//! Loads songs from comma separated text.
//!
//! The first line names the columns. Fields may be wrapped in double quotes,
//! in which case they can hold commas and `""` stands for a literal quote.
//! Rows that cannot become a [`Song`] are logged and skipped; they never stop
//! later rows from loading.
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use crate::error::{PlayqlError, Result};
use crate::record::{Playlist, Song};

pub type Row = HashMap<String, String>;

lazy_static! {
    // every field, the first included, is matched after a leading comma
    static ref FIELD: Regex = Regex::new(r#",("(?:[^"]|"")*"|[^,]*)"#).unwrap();
}

/// A data row together with its 1-based line number in the source text.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRow {
    pub line: usize,
    pub row: Result<Row>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IngestReport {
    pub loaded: usize,
    pub skipped: usize,
}

/// Splits one line into its fields.
pub fn split_fields(line: &str) -> Vec<String> {
    let line = format!(",{}", line);
    FIELD
        .captures_iter(&line)
        .filter_map(|captures| captures.get(1))
        .map(|field| {
            let field = field.as_str();
            if field.len() >= 2 && field.starts_with('"') && field.ends_with('"') {
                field[1..field.len() - 1].replace("\"\"", "\"")
            } else {
                field.to_string()
            }
        })
        .collect()
}

/// Reads the header and data lines of `text` into string-keyed rows. A line
/// whose field count differs from the header yields an error in its place.
/// Blank lines are skipped but still counted.
pub fn read_rows(text: &str) -> Vec<SourceRow> {
    let mut lines = text
        .trim_start_matches('\u{feff}')
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty());
    let header = match lines.next() {
        Some((_, header)) => split_fields(header),
        None => return Vec::new(),
    };
    lines
        .map(|(line, text)| {
            let fields = split_fields(text);
            let row = if fields.len() != header.len() {
                Err(PlayqlError::construction(
                    "row",
                    format!("{} fields where the header has {}", fields.len(), header.len()),
                ))
            } else {
                Ok(header.iter().cloned().zip(fields).collect())
            };
            SourceRow { line, row }
        })
        .collect()
}

/// Builds a playlist from rows, skipping the ones that fail.
pub fn load(rows: impl IntoIterator<Item = SourceRow>) -> (Playlist, IngestReport) {
    let mut playlist = Playlist::new();
    let mut report = IngestReport::default();
    for SourceRow { line, row } in rows {
        match row.and_then(|row| Song::from_fields(&row)) {
            Ok(song) => {
                playlist.push(song);
                report.loaded += 1;
            }
            Err(e) => {
                warn!(line, error = %e, "skipping song");
                report.skipped += 1;
            }
        }
    }
    (playlist, report)
}

pub fn load_file(path: impl AsRef<Path>) -> Result<(Playlist, IngestReport)> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .map_err(|e| PlayqlError::Io(format!("{}: {}", path.display(), e)))?;
    let (playlist, report) = load(read_rows(&text));
    info!(
        file = %path.display(),
        loaded = report.loaded,
        skipped = report.skipped,
        "songs loaded"
    );
    Ok((playlist, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_fields_keep_commas() {
        assert_eq!(
            split_fields(r#"plain,"Tyler, The Creator","say ""hi""",,x"#),
            vec!["plain", "Tyler, The Creator", "say \"hi\"", "", "x"]
        );
    }

    #[test]
    fn trailing_comma_is_an_empty_field() {
        assert_eq!(split_fields("a,"), vec!["a", ""]);
    }
}
