//! In-memory dataset of equipment rows

use std::sync::Arc;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// One row of the source table, addressed by column position
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetRow {
    /// Equipment name (column 0)
    pub equipment: String,
    
    /// First category level
    pub level1: String,
    
    /// Second category level
    pub level2: String,
    
    /// Pump number shown in the result
    pub level3: String,
    
    /// Free-text note shown in the result
    pub level4: String,
    
    /// Unused detail column, kept for completeness
    pub level5: String,
}

impl DatasetRow {
    /// Build a row from positional cells, padding missing ones with empty strings
    pub fn from_cells<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cells = cells.into_iter().map(Into::into);
        let mut next = || cells.next().unwrap_or_default();
        
        Self {
            equipment: next(),
            level1: next(),
            level2: next(),
            level3: next(),
            level4: next(),
            level5: next(),
        }
    }
    
    /// Whether every cell is empty
    pub fn is_blank(&self) -> bool {
        [
            &self.equipment,
            &self.level1,
            &self.level2,
            &self.level3,
            &self.level4,
            &self.level5,
        ]
        .iter()
        .all(|cell| cell.is_empty())
    }
}

/// A single block of the leaf result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultEntry {
    pub pump_number: String,
    pub note: String,
}

/// Immutable table of rows in file order
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    rows: Arc<Vec<DatasetRow>>,
}

impl Dataset {
    /// Create a dataset from already normalized rows
    pub fn new(rows: Vec<DatasetRow>) -> Self {
        Self { rows: Arc::new(rows) }
    }
    
    /// All rows in file order
    pub fn rows(&self) -> &[DatasetRow] {
        &self.rows
    }
    
    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }
    
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
    
    /// Distinct equipment values in encounter order, skipping the header label
    pub fn equipment_values(&self, header_label: &str) -> Vec<String> {
        let header = header_label.trim().to_lowercase();
        distinct(
            self.rows
                .iter()
                .map(|row| row.equipment.trim())
                .filter(|value| value.to_lowercase() != header),
        )
    }
    
    /// Distinct level-1 values under one equipment
    pub fn level1_values(&self, equipment: &str) -> Vec<String> {
        distinct(
            self.rows
                .iter()
                .filter(|row| row.equipment.trim() == equipment)
                .map(|row| row.level1.trim()),
        )
    }
    
    /// Distinct level-2 values under an (equipment, level1) pair
    pub fn level2_values(&self, equipment: &str, level1: &str) -> Vec<String> {
        distinct(
            self.rows
                .iter()
                .filter(|row| row.equipment.trim() == equipment && row.level1.trim() == level1)
                .map(|row| row.level2.trim()),
        )
    }
    
    /// Every row matching the full key, in file order
    pub fn entries(&self, equipment: &str, level1: &str, level2: &str) -> Vec<ResultEntry> {
        self.rows
            .iter()
            .filter(|row| {
                row.equipment.trim() == equipment
                    && row.level1.trim() == level1
                    && row.level2.trim() == level2
            })
            .map(|row| ResultEntry {
                pump_number: row.level3.clone(),
                note: row.level4.clone(),
            })
            .collect()
    }
}

impl From<Vec<DatasetRow>> for Dataset {
    fn from(rows: Vec<DatasetRow>) -> Self {
        Self::new(rows)
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .collect::<IndexSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    
    pub(crate) fn row(cells: [&str; 5]) -> DatasetRow {
        DatasetRow::from_cells(cells)
    }
    
    pub(crate) fn sample() -> Dataset {
        Dataset::new(vec![
            row(["Оборудование", "level1", "level2", "level3", "level4"]),
            row(["PumpA", "Cat1", "Sub1", "P-100", "note1"]),
            row(["PumpA", "Cat1", "Sub1", "P-200", "note2"]),
            row(["PumpA", "Cat1", "Sub2", "P-300", "note3"]),
            row(["PumpA", "Cat2", "Sub3", "P-400", "note4"]),
            row(["PumpB", "Cat1", "Sub9", "P-500", "note5"]),
            row(["PumpA", "Cat1", "Sub1", "P-600", ""]),
        ])
    }
    
    #[test]
    fn test_from_cells_pads_short_rows() {
        let row = DatasetRow::from_cells(["PumpA", "Cat1"]);
        assert_eq!(row.level1, "Cat1");
        assert_eq!(row.level2, "");
        assert_eq!(row.level5, "");
        assert!(!row.is_blank());
        assert!(DatasetRow::default().is_blank());
    }
    
    #[test]
    fn test_equipment_values_skip_header_and_duplicates() {
        let values = sample().equipment_values("оборудование");
        assert_eq!(values, vec!["PumpA", "PumpB"]);
    }
    
    #[test]
    fn test_equipment_values_are_trimmed_and_case_sensitive() {
        let dataset = Dataset::new(vec![
            row([" PumpA ", "c", "s", "", ""]),
            row(["PumpA", "c", "s", "", ""]),
            row(["pumpa", "c", "s", "", ""]),
        ]);
        assert_eq!(dataset.equipment_values("header"), vec!["PumpA", "pumpa"]);
    }
    
    #[test]
    fn test_level_values_are_filtered_by_parent() {
        let dataset = sample();
        assert_eq!(dataset.level1_values("PumpA"), vec!["Cat1", "Cat2"]);
        assert_eq!(dataset.level1_values("PumpB"), vec!["Cat1"]);
        assert_eq!(dataset.level2_values("PumpA", "Cat1"), vec!["Sub1", "Sub2"]);
        assert_eq!(dataset.level2_values("PumpB", "Cat1"), vec!["Sub9"]);
        assert!(dataset.level2_values("PumpB", "Cat2").is_empty());
    }
    
    #[test]
    fn test_entries_keep_file_order() {
        let entries = sample().entries("PumpA", "Cat1", "Sub1");
        let numbers: Vec<_> = entries.iter().map(|e| e.pump_number.as_str()).collect();
        assert_eq!(numbers, vec!["P-100", "P-200", "P-600"]);
        assert_eq!(entries[0].note, "note1");
        assert_eq!(entries[2].note, "");
    }
}
