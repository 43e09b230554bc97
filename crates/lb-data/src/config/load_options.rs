//! Options controlling how the dataset file is read

use serde::{Serialize, Deserialize};

use super::null_handling::NullConfig;

/// Number of positional columns in the dataset
pub const COLUMN_COUNT: usize = 6;

/// Dataset loading options
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadOptions {
    /// Leading rows to drop before reading data
    pub skip_rows: usize,
    
    /// Worksheet to read; the first one when unset
    pub sheet: Option<String>,
    
    /// Blank value handling
    pub null_config: NullConfig,
}

impl LoadOptions {
    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }
    
    pub fn with_skip_rows(mut self, skip_rows: usize) -> Self {
        self.skip_rows = skip_rows;
        self
    }
}
