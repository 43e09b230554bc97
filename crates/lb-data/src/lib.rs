//! Dataset loading for the equipment lookup bot

pub mod config;
pub mod sources;

use std::path::Path;
use lb_core::Dataset;
use thiserror::Error;
use tokio::task::JoinError;
use tracing::info;

// Re-exports
pub use config::{LoadOptions, NullConfig};
pub use sources::{CsvSource, DatasetSource, SpreadsheetSource};

/// Errors that can occur while loading the dataset
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    
    #[error("CSV parsing error: {0}")]
    Csv(String),
    
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),
    
    #[error("Unsupported dataset format: {0}")]
    UnsupportedFormat(String),
    
    #[error("Worksheet '{0}' not found")]
    SheetNotFound(String),
    
    #[error("Workbook has no worksheets")]
    EmptyWorkbook,
    
    #[error("Dataset '{0}' contains no rows")]
    Empty(String),
    
    #[error("Join error: {0}")]
    Join(#[from] JoinError),
}

impl From<csv::Error> for DataError {
    fn from(error: csv::Error) -> Self {
        match error.kind() {
            csv::ErrorKind::Io(io_err) => DataError::Io(std::io::Error::new(io_err.kind(), error.to_string())),
            _ => DataError::Csv(error.to_string()),
        }
    }
}

impl From<calamine::Error> for DataError {
    fn from(error: calamine::Error) -> Self {
        match error {
            calamine::Error::Io(io_err) => DataError::Io(io_err),
            other => DataError::Spreadsheet(other.to_string()),
        }
    }
}

/// Pick a source for `path` based on its extension
pub fn open_source(path: &Path, options: LoadOptions) -> Result<Box<dyn DatasetSource>, DataError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    
    match extension.as_str() {
        "csv" => Ok(Box::new(CsvSource::new(path.to_path_buf(), options))),
        ext if SpreadsheetSource::EXTENSIONS.contains(&ext) => {
            Ok(Box::new(SpreadsheetSource::new(path.to_path_buf(), options)))
        }
        _ => Err(DataError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Load the dataset at `path`, failing if it holds no rows
pub async fn load_dataset(path: &Path, options: LoadOptions) -> Result<Dataset, DataError> {
    let source = open_source(path, options)?;
    let dataset = source.load().await?;
    
    if dataset.is_empty() {
        return Err(DataError::Empty(source.source_name().to_string()));
    }
    
    info!(source = source.source_name(), rows = dataset.len(), "Dataset loaded");
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    
    #[test]
    fn test_open_source_by_extension() {
        let options = LoadOptions::default();
        assert_eq!(open_source(Path::new("pumps.CSV"), options.clone()).unwrap().source_name(), "pumps.CSV");
        assert!(open_source(Path::new("nasosy.xlsx"), options.clone()).is_ok());
        assert!(open_source(Path::new("book.ods"), options.clone()).is_ok());
        assert!(matches!(
            open_source(Path::new("notes.txt"), options.clone()),
            Err(DataError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            open_source(Path::new("no_extension"), options),
            Err(DataError::UnsupportedFormat(_))
        ));
    }
    
    #[tokio::test]
    async fn test_load_dataset_from_csv() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "оборудование,level1,level2,level3,level4,level5").unwrap();
        writeln!(file, "PumpA,Cat1,Sub1,P-100,note1,").unwrap();
        writeln!(file, "PumpA,Cat1,Sub1,P-200,note2,").unwrap();
        
        let dataset = load_dataset(file.path(), LoadOptions::default()).await.unwrap();
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.equipment_values("оборудование"), vec!["PumpA"]);
    }
    
    #[tokio::test]
    async fn test_load_dataset_rejects_empty_file() {
        let file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        let result = load_dataset(file.path(), LoadOptions::default()).await;
        assert!(matches!(result, Err(DataError::Empty(_))));
    }
    
    #[tokio::test]
    async fn test_load_dataset_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_dataset(&dir.path().join("missing.csv"), LoadOptions::default()).await;
        assert!(matches!(result, Err(DataError::Io(_))));
        
        let result = load_dataset(&dir.path().join("missing.xlsx"), LoadOptions::default()).await;
        assert!(result.is_err());
    }
}
