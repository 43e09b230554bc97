//! Blank value handling for data loading

use serde::{Serialize, Deserialize};

/// Blank value configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NullConfig {
    /// Patterns to treat as blank
    pub patterns: Vec<String>,
    
    /// Whether to trim whitespace before checking
    pub trim_whitespace: bool,
    
    /// Case sensitive matching
    pub case_sensitive: bool,
}

impl Default for NullConfig {
    fn default() -> Self {
        Self {
            patterns: vec![String::new()],
            trim_whitespace: true,
            case_sensitive: false,
        }
    }
}

impl NullConfig {
    /// Check if a value should be treated as blank
    pub fn is_null(&self, value: &str) -> bool {
        let test_value = self.prepare(value);
        
        self.patterns.iter().any(|pattern| {
            if self.case_sensitive {
                test_value == pattern
            } else {
                test_value.to_lowercase() == pattern.to_lowercase()
            }
        })
    }
    
    /// Normalize a raw cell: trimmed text, or empty when it matches a blank pattern
    pub fn normalize(&self, value: &str) -> String {
        if self.is_null(value) {
            String::new()
        } else {
            self.prepare(value).to_string()
        }
    }
    
    /// Add a blank pattern
    pub fn add_pattern(&mut self, pattern: impl Into<String>) {
        let pattern = pattern.into();
        if !self.patterns.contains(&pattern) {
            self.patterns.push(pattern);
        }
    }
    
    fn prepare<'a>(&self, value: &'a str) -> &'a str {
        let value = value.trim_start_matches('\u{feff}');
        if self.trim_whitespace {
            value.trim()
        } else {
            value
        }
    }
}
