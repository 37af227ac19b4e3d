//! Reading measurement logs from CSV files.

use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use log::debug;

use crate::error::{Error, Result};
use crate::table::{Column, Table};

/// Reads a CSV document with a header row, inferring the type of every column.
///
/// Repeated header names get a `.1`, `.2`, ... suffix so that no column is lost.
pub fn read_table<R: Read>(input: R) -> csv::Result<Table> {
    let mut reader = ReaderBuilder::new().has_headers(true).trim(Trim::All).from_reader(input);
    let mut names: Vec<String> = Vec::new();
    for header in reader.headers()?.iter() {
        let mut name = header.to_string();
        let mut dup = 0;
        while names.contains(&name) {
            dup += 1;
            name = format!("{}.{}", header, dup);
        }
        names.push(name);
    }
    let mut cells: Vec<Vec<String>> = vec![Vec::new(); names.len()];
    for record in reader.records() {
        let record = record?;
        for (i, field) in record.iter().enumerate() {
            cells[i].push(field.to_string());
        }
    }
    let rows = cells.first().map(|c| c.len()).unwrap_or(0);
    let mut table = Table::new(rows);
    for (name, column) in names.into_iter().zip(cells) {
        table.set_column(name, Column::infer(column));
    }
    Ok(table)
}

/// Loads a table from the CSV file at `path`.
pub fn load_table(path: &Path) -> Result<Table> {
    if !path.is_file() {
        return Err(Error::MissingInput(path.to_path_buf()));
    }
    let file = std::fs::File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let table = read_table(file).map_err(|source| Error::Csv {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        "loaded {} rows with {} columns from {}",
        table.len(),
        table.column_names().count(),
        path.display()
    );
    Ok(table)
}
