use std::path::PathBuf;
use async_trait::async_trait;
use csv::ReaderBuilder;
use lb_core::Dataset;
use tracing::debug;

use super::{DatasetSource, RowCollector};
use crate::config::LoadOptions;
use crate::DataError;

/// CSV data source without a header row
pub struct CsvSource {
    /// Path to the CSV file
    path: PathBuf,
    /// Display name
    name: String,
    options: LoadOptions,
}

impl CsvSource {
    /// Create a new CSV source from a file path
    pub fn new(path: PathBuf, options: LoadOptions) -> Self {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown.csv")
            .to_string();
        
        Self { path, name, options }
    }
    
    /// Read the whole file into a dataset
    pub fn read(&self) -> Result<Dataset, DataError> {
        Self::read_file(&self.path, &self.options)
    }
    
    fn read_file(path: &std::path::Path, options: &LoadOptions) -> Result<Dataset, DataError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)?;
        
        let mut collector = RowCollector::new(options);
        for (idx, result) in reader.records().enumerate() {
            let record = result?;
            collector.push(idx, record.iter());
        }
        
        let dataset = collector.finish();
        debug!(path = %path.display(), rows = dataset.len(), "Read CSV dataset");
        Ok(dataset)
    }
}

#[async_trait]
impl DatasetSource for CsvSource {
    async fn load(&self) -> Result<Dataset, DataError> {
        let path = self.path.clone();
        let options = self.options.clone();
        tokio::task::spawn_blocking(move || Self::read_file(&path, &options)).await?
    }
    
    fn source_name(&self) -> &str {
        &self.name
    }
}
