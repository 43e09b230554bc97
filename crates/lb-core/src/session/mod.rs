//! Per-user navigation sessions

mod store;

pub use store::{InMemorySessionStore, SessionStore};

use std::fmt;
use std::time::Instant;
use serde::{Deserialize, Serialize};

use crate::navigation::{Token, TokenMap};

/// Chat user identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A resolved choice together with the token it was picked through
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub token: Token,
    pub value: String,
}

/// Navigation progress of one user
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// Equipment picked on the equipment menu
    pub equipment: Option<Selection>,
    
    /// Category picked on the level-1 menu
    pub level1: Option<Selection>,
    
    /// Tokens issued by the last equipment menu
    pub equipment_tokens: TokenMap,
    
    /// Tokens issued by the last level-1 menu
    pub level1_tokens: TokenMap,
    
    /// Tokens issued by the last level-2 menu
    pub level2_tokens: TokenMap,
    
    /// Last time a transition touched this context
    pub touched_at: Instant,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self {
            equipment: None,
            level1: None,
            equipment_tokens: TokenMap::default(),
            level1_tokens: TokenMap::default(),
            level2_tokens: TokenMap::default(),
            touched_at: Instant::now(),
        }
    }
}

impl SessionContext {
    /// Fresh context holding only the equipment menu tokens
    pub fn with_equipment_tokens(tokens: TokenMap) -> Self {
        Self {
            equipment_tokens: tokens,
            ..Self::default()
        }
    }
    
    /// Record an equipment pick and the level-1 menu issued for it
    pub fn select_equipment(&mut self, selection: Selection, level1_tokens: TokenMap) {
        self.equipment = Some(selection);
        self.level1 = None;
        self.level1_tokens = level1_tokens;
        self.level2_tokens = TokenMap::default();
    }
    
    /// Record a level-1 pick and the level-2 menu issued for it
    pub fn select_level1(&mut self, selection: Selection, level2_tokens: TokenMap) {
        self.level1 = Some(selection);
        self.level2_tokens = level2_tokens;
    }
    
    /// Mark the context as used now
    pub fn touch(&mut self) {
        self.touched_at = Instant::now();
    }
}
