use crate::domain::errors::StoreError;
use crate::domain::repositories::{RecordStore, TableSchema};
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

const DELIMITER: u8 = b';';

/// Semicolon-delimited table on disk.
///
/// The header must match `R::HEADER` exactly; the legacy comma-delimited
/// layout is rejected rather than migrated.
pub struct CsvStore<R> {
    path: PathBuf,
    _record: PhantomData<fn() -> R>,
}

impl<R> CsvStore<R>
where
    R: TableSchema + Serialize + DeserializeOwned,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the parent directory and a header-only table if missing.
    pub fn touch(&self) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;
                info!("Created data directory {:?}", dir);
            }
        }

        if !self.path.exists() {
            self.write_rows(&[])?;
            info!("Created empty {} table at {:?}", R::TABLE, self.path);
        }
        Ok(())
    }

    fn read_rows(&self) -> Result<Vec<R>, StoreError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(true)
            .from_path(&self.path)
            .map_err(|e| self.csv_error(e))?;

        let headers = reader.headers().map_err(|e| self.csv_error(e))?.clone();
        if headers.is_empty() {
            // Zero-byte file
            return Ok(Vec::new());
        }
        if !headers.iter().eq(R::HEADER.iter().copied()) {
            return Err(StoreError::SchemaMismatch {
                path: self.display_path(),
                expected: R::HEADER.join(";"),
                found: headers.iter().collect::<Vec<_>>().join(";"),
            });
        }

        reader
            .deserialize()
            .collect::<Result<Vec<R>, _>>()
            .map_err(|e| self.csv_error(e))
    }

    /// Write to a sibling temp file, then rename over the table so a crash
    /// never leaves a half-written file behind.
    fn write_rows(&self, rows: &[R]) -> Result<(), StoreError> {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| R::TABLE.to_string());
        let temp_path = self
            .path
            .with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4()));

        if let Err(e) = Self::write_file(&temp_path, rows) {
            let _ = fs::remove_file(&temp_path);
            return Err(self.csv_error(e));
        }

        fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            self.io_error(e)
        })?;

        debug!("Wrote {} {} rows to {:?}", rows.len(), R::TABLE, self.path);
        Ok(())
    }

    fn write_file(path: &Path, rows: &[R]) -> Result<(), csv::Error> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(false)
            .from_path(path)?;
        writer.write_record(R::HEADER)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn display_path(&self) -> String {
        self.path.display().to_string()
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.display_path(),
            source,
        }
    }

    fn csv_error(&self, source: csv::Error) -> StoreError {
        StoreError::Csv {
            path: self.display_path(),
            source,
        }
    }
}

#[async_trait]
impl<R> RecordStore<R> for CsvStore<R>
where
    R: TableSchema + Serialize + DeserializeOwned + Send + Sync,
{
    async fn load(&self) -> Result<Vec<R>, StoreError> {
        self.touch()?;
        let rows = self.read_rows()?;
        debug!("Loaded {} {} rows from {:?}", rows.len(), R::TABLE, self.path);
        Ok(rows)
    }

    async fn save(&self, rows: &[R]) -> Result<(), StoreError> {
        self.touch()?;
        self.write_rows(rows)
    }
}
