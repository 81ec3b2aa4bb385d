use std::io;
use std::path::{Path, PathBuf};

/// Where the training dataset is looked up, relative to the working directory.
pub const DEFAULT_DATASET_PATH: &str = "data/personality_datasert.csv";

/// Rows shown on the explanation page
pub const PREVIEW_ROWS: usize = 5;

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("File dataset '{0}' tidak ditemukan.")]
    NotFound(PathBuf),
    #[error("Failed to read dataset: {0}")]
    Csv(#[from] csv::Error),
}

/// Header and first rows of the dataset, kept as text for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetPreview {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Reads the header and up to `limit` rows of a CSV file.
pub fn load_preview(path: impl AsRef<Path>, limit: usize) -> Result<DatasetPreview, DatasetError> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path).map_err(|e| match e.kind() {
        csv::ErrorKind::Io(io_err) if io_err.kind() == io::ErrorKind::NotFound => {
            DatasetError::NotFound(path.to_path_buf())
        }
        _ => DatasetError::Csv(e),
    })?;

    let headers = reader.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::with_capacity(limit);
    for record in reader.records().take(limit) {
        rows.push(record?.iter().map(str::to_string).collect());
    }

    log::debug!("Loaded {} preview rows from {:?}", rows.len(), path);
    Ok(DatasetPreview { headers, rows })
}
