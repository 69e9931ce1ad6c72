//! CSV-backed stores.
//!
//! Each store owns its file path and an in-memory copy of the table. The
//! table is read once on `open` and rewritten in full after every mutation.
//! There is no locking: only one process may write a data directory at a
//! time.

mod client;
mod visit;

pub use client::{Client, ClientStore};
pub use visit::{Visit, VisitStore};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, VisitError};

/// Trim a field the way every stored value is trimmed
pub(crate) fn clean(value: &str) -> String {
    value.trim().to_string()
}

/// Serialize rows to CSV bytes with an explicit header row.
///
/// The header is written even when `rows` is empty, so a fresh store file
/// still carries its schema. Rows may be nested (a struct followed by a
/// list of strings) since headers are never derived from them.
pub(crate) fn write_csv<H, T>(headers: H, rows: &[T]) -> Result<Vec<u8>>
where
    H: IntoIterator,
    H::Item: AsRef<[u8]>,
    T: Serialize,
{
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(headers)?;
    for row in rows {
        writer.serialize(row)?;
    }

    writer
        .into_inner()
        .map_err(|e| VisitError::Io(e.into_error()))
}

/// One store file held in memory.
///
/// Columns the file carries beyond `headers` are kept per row and written
/// back after the known ones, so rewrites never drop them.
pub(crate) struct Table<T> {
    path: PathBuf,
    headers: &'static [&'static str],
    rows: Vec<T>,
    extra_headers: Vec<String>,
    extra_rows: Vec<Vec<String>>,
}

impl<T: Serialize + DeserializeOwned> Table<T> {
    /// Load a whole table, creating the file with just its header when absent
    pub(crate) fn open(path: PathBuf, headers: &'static [&'static str]) -> Result<Self> {
        let mut table = Self {
            path,
            headers,
            rows: Vec::new(),
            extra_headers: Vec::new(),
            extra_rows: Vec::new(),
        };

        if !table.path.exists() {
            table.persist()?;
            tracing::debug!(path = %table.path.display(), "created empty store file");
            return Ok(table);
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(&table.path)?;

        let found = reader.headers()?.clone();
        for &column in headers {
            if !found.iter().any(|h| h == column) {
                return Err(VisitError::MissingColumn {
                    path: table.path.clone(),
                    column,
                });
            }
        }

        let extra_positions: Vec<usize> = found
            .iter()
            .enumerate()
            .filter(|(_, h)| !headers.contains(h))
            .map(|(i, _)| i)
            .collect();
        table.extra_headers = extra_positions
            .iter()
            .map(|&i| found[i].to_string())
            .collect();

        for record in reader.records() {
            let record = record?;
            table.rows.push(record.deserialize(Some(&found))?);
            table.extra_rows.push(
                extra_positions
                    .iter()
                    .map(|&i| record.get(i).unwrap_or("").to_string())
                    .collect(),
            );
        }

        tracing::debug!(
            path = %table.path.display(),
            rows = table.rows.len(),
            extra_columns = ?table.extra_headers,
            "loaded store file"
        );
        Ok(table)
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn rows(&self) -> &[T] {
        &self.rows
    }

    /// Append a row and rewrite the file. The row is dropped again if the
    /// write fails, so memory never holds what the file lacks.
    pub(crate) fn push(&mut self, row: T) -> Result<()> {
        self.rows.push(row);
        self.extra_rows
            .push(vec![String::new(); self.extra_headers.len()]);

        if let Err(e) = self.persist() {
            self.rows.pop();
            self.extra_rows.pop();
            return Err(e);
        }
        Ok(())
    }

    /// Rewrite the whole file from memory
    pub(crate) fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let headers = self
            .headers
            .iter()
            .copied()
            .chain(self.extra_headers.iter().map(String::as_str));
        let rows: Vec<(&T, &Vec<String>)> = self.rows.iter().zip(&self.extra_rows).collect();

        let bytes = write_csv(headers, &rows)?;
        fs::write(&self.path, bytes)?;
        Ok(())
    }
}
