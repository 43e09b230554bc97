//! Excel / OpenDocument spreadsheet source

use std::path::{Path, PathBuf};
use async_trait::async_trait;
use calamine::{open_workbook_auto, Data, Range, Reader};
use lb_core::Dataset;
use tracing::debug;

use super::{DatasetSource, RowCollector};
use crate::config::LoadOptions;
use crate::DataError;

/// Reads one worksheet of a workbook; the sheet has no header row
pub struct SpreadsheetSource {
    path: PathBuf,
    name: String,
    options: LoadOptions,
}

impl SpreadsheetSource {
    /// File extensions handled by this source
    pub const EXTENSIONS: [&'static str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];
    
    pub fn new(path: PathBuf, options: LoadOptions) -> Self {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown.xlsx")
            .to_string();
        
        Self { path, name, options }
    }
    
    /// Read the configured worksheet into a dataset
    pub fn read(&self) -> Result<Dataset, DataError> {
        Self::read_file(&self.path, &self.options)
    }
    
    fn read_file(path: &Path, options: &LoadOptions) -> Result<Dataset, DataError> {
        let mut workbook = open_workbook_auto(path)?;
        
        let range = match &options.sheet {
            Some(sheet) => {
                if !workbook.sheet_names().iter().any(|name| name == sheet) {
                    return Err(DataError::SheetNotFound(sheet.clone()));
                }
                workbook.worksheet_range(sheet)?
            }
            None => workbook
                .worksheet_range_at(0)
                .ok_or(DataError::EmptyWorkbook)??,
        };
        
        let dataset = collect_range(&range, options);
        debug!(path = %path.display(), rows = dataset.len(), "Read spreadsheet dataset");
        Ok(dataset)
    }
}

/// Convert a worksheet range into rows, keeping absolute column positions
fn collect_range(range: &Range<Data>, options: &LoadOptions) -> Dataset {
    let (first_row, first_col) = range
        .start()
        .map(|(row, col)| (row as usize, col as usize))
        .unwrap_or((0, 0));
    
    let mut collector = RowCollector::new(options);
    for (offset, cells) in range.rows().enumerate() {
        let padding = std::iter::repeat(String::new()).take(first_col);
        collector.push(first_row + offset, padding.chain(cells.iter().map(cell_text)));
    }
    collector.finish()
}

/// Render a cell the way it reads in the sheet
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(text) => text.clone(),
        Data::Float(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
            format!("{}", *value as i64)
        }
        other => other.to_string(),
    }
}

#[async_trait]
impl DatasetSource for SpreadsheetSource {
    async fn load(&self) -> Result<Dataset, DataError> {
        let path = self.path.clone();
        let options = self.options.clone();
        tokio::task::spawn_blocking(move || Self::read_file(&path, &options)).await?
    }
    
    fn source_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    fn range(cells: Vec<((u32, u32), Data)>) -> Range<Data> {
        let start = cells.iter().map(|(pos, _)| *pos).min().unwrap();
        let end = cells
            .iter()
            .fold(start, |(r, c), ((row, col), _)| (r.max(*row), c.max(*col)));
        let mut range = Range::new(start, end);
        for (pos, value) in cells {
            range.set_value(pos, value);
        }
        range
    }
    
    #[test]
    fn test_cell_text_formats_numbers_like_the_sheet() {
        assert_eq!(cell_text(&Data::Float(100.0)), "100");
        assert_eq!(cell_text(&Data::Float(2.5)), "2.5");
        assert_eq!(cell_text(&Data::Int(7)), "7");
        assert_eq!(cell_text(&Data::String("P-100".into())), "P-100");
        assert_eq!(cell_text(&Data::Empty), "");
    }
    
    #[test]
    fn test_collect_range_keeps_absolute_columns() {
        // Sheet whose used area starts at B2: column A is empty throughout
        let range = range(vec![
            ((1, 1), Data::String("Cat1".into())),
            ((1, 2), Data::String("Sub1".into())),
            ((1, 3), Data::Float(100.0)),
            ((2, 1), Data::String("Cat2".into())),
        ]);
        let dataset = collect_range(&range, &LoadOptions::default());
        
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.rows()[0].equipment, "");
        assert_eq!(dataset.rows()[0].level1, "Cat1");
        assert_eq!(dataset.rows()[0].level3, "100");
        assert_eq!(dataset.rows()[1].level1, "Cat2");
    }
    
    #[test]
    fn test_collect_range_skip_rows_uses_sheet_row_numbers() {
        let range = range(vec![
            ((0, 0), Data::String("оборудование".into())),
            ((1, 0), Data::String(" PumpA ".into())),
            ((1, 4), Data::String("note".into())),
        ]);
        let dataset = collect_range(&range, &LoadOptions::default().with_skip_rows(1));
        
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.rows()[0].equipment, "PumpA");
        assert_eq!(dataset.rows()[0].level4, "note");
    }
    
    #[test]
    fn test_source_name_from_path() {
        let source = SpreadsheetSource::new(PathBuf::from("/data/nasosy.xlsx"), LoadOptions::default());
        assert_eq!(source.source_name(), "nasosy.xlsx");
    }
}
