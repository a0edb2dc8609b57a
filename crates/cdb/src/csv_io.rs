//! Reading and writing `data.csv`.
//!
//! Cells are text and nothing else: no trimming, no type inference, and empty cells stay empty strings rather than
//! becoming missing values.
use camino::Utf8Path;

use crate::error::Result;

/// A CSV file read into memory.
#[derive(Debug, Default, Eq, PartialEq)]
pub(crate) struct CsvTable {
    pub(crate) header: Vec<String>,
    pub(crate) rows: Vec<Vec<String>>,
}

pub(crate) fn read_table(path: &Utf8Path) -> Result<CsvTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_path(path)?;

    let header = reader.headers()?.iter().map(String::from).collect();
    let mut rows = vec![];
    for record in reader.records() {
        rows.push(record?.iter().map(String::from).collect());
    }

    Ok(CsvTable { header, rows })
}

/// Write a table, replacing whatever was at `path`.
///
/// With an empty header, the file is truncated and nothing is written.
pub(crate) fn write_table<R, C>(
    path: &Utf8Path,
    header: &[&str],
    rows: impl IntoIterator<Item = R>,
) -> Result<()>
where
    R: IntoIterator<Item = C>,
    C: AsRef<[u8]>,
{
    let mut writer = csv::WriterBuilder::new().from_path(path)?;
    if !header.is_empty() {
        writer.write_record(header)?;
        for r in rows {
            writer.write_record(r)?;
        }
    }
    writer.flush()?;
    Ok(())
}
