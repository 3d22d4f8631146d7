//! CSV table loader
//!
//! Reads the four input tables from a data directory. All four files are
//! checked for existence before any of them is parsed, and each header row is
//! checked against the record's required columns before any row is decoded.

use csv::{ReaderBuilder, Trim};
use mla_common::models::SourceRecord;
use mla_common::{Error, ListeningEvent, Result, Singer, Song, User};
use std::path::{Path, PathBuf};
use tracing::debug;

/// The four raw input tables of one run
#[derive(Debug, Clone, Default)]
pub struct SourceTables {
    pub listening: Vec<ListeningEvent>,
    pub songs: Vec<Song>,
    pub users: Vec<User>,
    pub singers: Vec<Singer>,
}

/// Load the four input tables from `data_dir`
pub fn load_tables(data_dir: impl Into<PathBuf>) -> Result<SourceTables> {
    Loader::new(data_dir).load()
}

/// Loads [`SourceTables`] from a data directory
pub struct Loader {
    data_dir: PathBuf,
}

impl Loader {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load all four tables
    ///
    /// # Errors
    /// - `FileMissing` for the first absent input file
    /// - `SchemaMismatch` when a header lacks required columns
    /// - `InvalidRecord` when a row cannot be decoded
    pub fn load(&self) -> Result<SourceTables> {
        for file_name in [
            ListeningEvent::FILE_NAME,
            Singer::FILE_NAME,
            Song::FILE_NAME,
            User::FILE_NAME,
        ] {
            let path = self.data_dir.join(file_name);
            if !path.is_file() {
                return Err(Error::FileMissing(path));
            }
        }

        Ok(SourceTables {
            listening: self.read_table()?,
            songs: self.read_table()?,
            users: self.read_table()?,
            singers: self.read_table()?,
        })
    }

    fn read_table<T: SourceRecord>(&self) -> Result<Vec<T>> {
        let path = self.data_dir.join(T::FILE_NAME);
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_path(&path)?;

        let headers = reader.headers()?.clone();
        let missing: Vec<String> = T::COLUMNS
            .iter()
            .filter(|column| !headers.iter().any(|h| h == **column))
            .map(|column| column.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(Error::SchemaMismatch {
                file: path,
                missing,
            });
        }

        let mut rows = Vec::new();
        for result in reader.deserialize::<T>() {
            let record = result.map_err(|e| Error::InvalidRecord {
                file: path.clone(),
                line: e.position().map_or(0, |p| p.line()),
                message: e.to_string(),
            })?;
            rows.push(record);
        }

        debug!(file = %path.display(), rows = rows.len(), "Table loaded");
        Ok(rows)
    }
}
