//! Button payload encoding
//! 
//! Payloads are the short strings carried by inline buttons: a bare keyword
//! for main-menu sections and home, or `prefix:token` for drill-down picks.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::{Section, Token};

const HOME: &str = "back";
const EQUIPMENT_PREFIX: &str = "eq";
const LEVEL1_PREFIX: &str = "l1";
const LEVEL2_PREFIX: &str = "l2";

/// Errors raised while decoding a payload
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallbackError {
    #[error("Empty callback payload")]
    Empty,
    
    #[error("Unknown callback payload: {0}")]
    Unknown(String),
    
    #[error("Missing token after prefix '{0}'")]
    MissingToken(String),
}

/// Decoded button payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callback {
    /// One of the main-menu sections
    Section(Section),
    /// Return to the main menu
    Home,
    /// Equipment picked on the equipment menu
    Equipment(Token),
    /// Category picked on the level-1 menu
    Level1(Token),
    /// Subcategory picked on the level-2 menu
    Level2(Token),
}

impl Callback {
    /// Wire form of the payload
    pub fn encode(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callback::Section(section) => f.write_str(section.keyword()),
            Callback::Home => f.write_str(HOME),
            Callback::Equipment(token) => write!(f, "{}:{}", EQUIPMENT_PREFIX, token),
            Callback::Level1(token) => write!(f, "{}:{}", LEVEL1_PREFIX, token),
            Callback::Level2(token) => write!(f, "{}:{}", LEVEL2_PREFIX, token),
        }
    }
}

impl FromStr for Callback {
    type Err = CallbackError;
    
    fn from_str(payload: &str) -> Result<Self, Self::Err> {
        let payload = payload.trim();
        if payload.is_empty() {
            return Err(CallbackError::Empty);
        }
        
        if let Some((prefix, token)) = payload.split_once(':') {
            let token = token.split(':').next().unwrap_or_default();
            let wrap: fn(Token) -> Callback = match prefix {
                EQUIPMENT_PREFIX => Callback::Equipment,
                LEVEL1_PREFIX => Callback::Level1,
                LEVEL2_PREFIX => Callback::Level2,
                _ => return Err(CallbackError::Unknown(payload.to_string())),
            };
            if token.is_empty() {
                return Err(CallbackError::MissingToken(prefix.to_string()));
            }
            return Ok(wrap(Token::from(token)));
        }
        
        if payload == HOME {
            return Ok(Callback::Home);
        }
        
        Section::from_keyword(payload)
            .map(Callback::Section)
            .ok_or_else(|| CallbackError::Unknown(payload.to_string()))
    }
}
