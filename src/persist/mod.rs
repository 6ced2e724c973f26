//! Flat-file persistence: comma-separated record files, one per entity
//! class, loaded in two phases and saved wholesale.
//!
//! Loading is deliberately forgiving. An unreadable file means "no data
//! available", a malformed row is logged and skipped, and a dangling id link
//! resolves to absent. Saving is strict and surfaces IO errors.

pub mod dates;
pub mod records;

mod loader;
mod saver;

pub use loader::load_store;
pub use saver::save_store;

use std::fs::File;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("io failure while writing records")]
    Io(#[from] std::io::Error),
    #[error("record serialization failed")]
    Csv(#[from] csv::Error),
}

/// Reads every well-formed record from `path`. Missing or unreadable files
/// and malformed rows are logged and yield nothing.
pub(crate) fn read_records<T: DeserializeOwned>(path: &Path) -> Vec<T> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) => {
            warn!(path = %path.display(), %err, "data file unavailable, starting empty");
            return Vec::new();
        }
    };
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut rows = Vec::new();
    for result in reader.deserialize::<T>() {
        match result {
            Ok(row) => rows.push(row),
            Err(err) => warn!(path = %path.display(), %err, "skipping malformed record"),
        }
    }
    rows
}

/// Rewrites `path` with the given records. Fields are written unquoted, so
/// values must already be comma-free.
pub(crate) fn write_records<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), PersistError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Never)
        .from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
