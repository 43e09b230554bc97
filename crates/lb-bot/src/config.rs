//! Environment-driven bot configuration

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use lb_core::DEFAULT_HEADER_LABEL;
use lb_data::LoadOptions;
use thiserror::Error;

/// Default dataset location, relative to the working directory
pub const DEFAULT_DATASET_PATH: &str = "nasosy.xlsx";

/// Errors raised while reading configuration
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Environment variable {0} is required")]
    Missing(&'static str),
    
    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Runtime configuration of the bot
#[derive(Clone)]
pub struct BotConfig {
    /// Telegram bot credential (`BOT_TOKEN`)
    pub bot_token: String,
    
    /// Dataset file (`DATASET_PATH`)
    pub dataset_path: PathBuf,
    
    /// Equipment column title excluded from the menu (`HEADER_LABEL`)
    pub header_label: String,
    
    /// Worksheet and row skipping (`DATASET_SHEET`, `DATASET_SKIP_ROWS`)
    pub load_options: LoadOptions,
    
    /// Drop sessions idle for this long (`SESSION_IDLE_TTL_SECS`); never when unset
    pub session_idle_ttl: Option<Duration>,
}

impl BotConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
    
    /// Read configuration through an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        
        let bot_token = get("BOT_TOKEN").ok_or(ConfigError::Missing("BOT_TOKEN"))?;
        let dataset_path = get("DATASET_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATASET_PATH));
        let header_label = get("HEADER_LABEL").unwrap_or_else(|| DEFAULT_HEADER_LABEL.to_string());
        
        let mut load_options = LoadOptions::default();
        if let Some(sheet) = get("DATASET_SHEET") {
            load_options = load_options.with_sheet(sheet);
        }
        if let Some(skip_rows) = parse_var::<usize>("DATASET_SKIP_ROWS", get("DATASET_SKIP_ROWS"))? {
            load_options = load_options.with_skip_rows(skip_rows);
        }
        
        let session_idle_ttl = match parse_var::<u64>("SESSION_IDLE_TTL_SECS", get("SESSION_IDLE_TTL_SECS"))? {
            Some(0) => {
                return Err(ConfigError::Invalid {
                    name: "SESSION_IDLE_TTL_SECS",
                    value: "0".to_string(),
                })
            }
            Some(secs) => Some(Duration::from_secs(secs)),
            None => None,
        };
        
        Ok(Self {
            bot_token,
            dataset_path,
            header_label,
            load_options,
            session_idle_ttl,
        })
    }
}

fn parse_var<T: FromStr>(name: &'static str, value: Option<String>) -> Result<Option<T>, ConfigError> {
    value
        .map(|value| value.parse::<T>().map_err(|_| ConfigError::Invalid { name, value }))
        .transpose()
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("bot_token", &"<redacted>")
            .field("dataset_path", &self.dataset_path)
            .field("header_label", &self.header_label)
            .field("load_options", &self.load_options)
            .field("session_idle_ttl", &self.session_idle_ttl)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    
    fn config(vars: &[(&str, &str)]) -> Result<BotConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        BotConfig::from_lookup(|key| vars.get(key).cloned())
    }
    
    #[test]
    fn test_defaults() {
        let config = config(&[("BOT_TOKEN", "123:abc")]).unwrap();
        assert_eq!(config.bot_token, "123:abc");
        assert_eq!(config.dataset_path, PathBuf::from("nasosy.xlsx"));
        assert_eq!(config.header_label, "оборудование");
        assert_eq!(config.load_options.skip_rows, 0);
        assert!(config.load_options.sheet.is_none());
        assert!(config.session_idle_ttl.is_none());
    }
    
    #[test]
    fn test_missing_or_blank_token() {
        assert_eq!(config(&[]).unwrap_err(), ConfigError::Missing("BOT_TOKEN"));
        assert_eq!(config(&[("BOT_TOKEN", "  ")]).unwrap_err(), ConfigError::Missing("BOT_TOKEN"));
    }
    
    #[test]
    fn test_overrides() {
        let config = config(&[
            ("BOT_TOKEN", "t"),
            ("DATASET_PATH", "/srv/pumps.csv"),
            ("DATASET_SHEET", "Лист1"),
            ("DATASET_SKIP_ROWS", "2"),
            ("HEADER_LABEL", "Equipment"),
            ("SESSION_IDLE_TTL_SECS", "3600"),
        ])
        .unwrap();
        assert_eq!(config.dataset_path, PathBuf::from("/srv/pumps.csv"));
        assert_eq!(config.load_options.sheet.as_deref(), Some("Лист1"));
        assert_eq!(config.load_options.skip_rows, 2);
        assert_eq!(config.header_label, "Equipment");
        assert_eq!(config.session_idle_ttl, Some(Duration::from_secs(3600)));
    }
    
    #[test]
    fn test_invalid_numbers() {
        assert!(matches!(
            config(&[("BOT_TOKEN", "t"), ("DATASET_SKIP_ROWS", "two")]),
            Err(ConfigError::Invalid { name: "DATASET_SKIP_ROWS", .. })
        ));
        assert!(matches!(
            config(&[("BOT_TOKEN", "t"), ("SESSION_IDLE_TTL_SECS", "0")]),
            Err(ConfigError::Invalid { name: "SESSION_IDLE_TTL_SECS", .. })
        ));
    }
    
    #[test]
    fn test_debug_redacts_token() {
        let config = config(&[("BOT_TOKEN", "secret-token")]).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("<redacted>"));
    }
}
