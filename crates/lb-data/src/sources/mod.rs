pub mod csv_source;
pub mod spreadsheet_source;

pub use csv_source::CsvSource;
pub use spreadsheet_source::SpreadsheetSource;

use async_trait::async_trait;
use lb_core::{Dataset, DatasetRow};
use crate::config::{LoadOptions, COLUMN_COUNT};
use crate::DataError;

/// A file the dataset can be read from
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Read every row of the file
    async fn load(&self) -> Result<Dataset, DataError>;
    
    /// Get the source name/path
    fn source_name(&self) -> &str;
}

/// Turns raw positional records into normalized dataset rows
pub(crate) struct RowCollector<'a> {
    options: &'a LoadOptions,
    rows: Vec<DatasetRow>,
}

impl<'a> RowCollector<'a> {
    pub(crate) fn new(options: &'a LoadOptions) -> Self {
        Self {
            options,
            rows: Vec::new(),
        }
    }
    
    /// Add the record found at absolute row `index`
    pub(crate) fn push<I, S>(&mut self, index: usize, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if index < self.options.skip_rows {
            return;
        }
        
        let null_config = &self.options.null_config;
        let row = DatasetRow::from_cells(
            cells
                .into_iter()
                .take(COLUMN_COUNT)
                .map(|cell| null_config.normalize(cell.as_ref())),
        );
        
        if !row.is_blank() {
            self.rows.push(row);
        }
    }
    
    pub(crate) fn finish(self) -> Dataset {
        Dataset::new(self.rows)
    }
}
