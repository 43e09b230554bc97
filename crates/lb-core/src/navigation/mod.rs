use serde::{Deserialize, Serialize};

mod callback;
mod engine;
mod tokens;

pub use callback::{Callback, CallbackError};
pub use engine::NavigationEngine;
pub use tokens::{Token, TokenMap, TOKEN_LEN};

use crate::dataset::ResultEntry;

/// Top-level entries of the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Section {
    /// Pump lookup, the only wired section
    Pumps,
    /// Disinfectant dosage calculation
    Disinfectants,
    /// Useful reference information
    Info,
    /// Norms and standards
    Norms,
}

impl Section {
    /// All sections in main-menu order
    pub const ALL: [Section; 4] = [
        Section::Pumps,
        Section::Disinfectants,
        Section::Info,
        Section::Norms,
    ];
    
    /// Payload keyword of the section button
    pub fn keyword(&self) -> &'static str {
        match self {
            Section::Pumps => "nasos",
            Section::Disinfectants => "dez",
            Section::Info => "info",
            Section::Norms => "norms",
        }
    }
    
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|section| section.keyword() == keyword)
    }
    
    /// Whether the section has a handler behind it
    pub fn is_available(&self) -> bool {
        matches!(self, Section::Pumps)
    }
}

/// One selectable entry of a drill-down menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub token: Token,
    pub label: String,
    pub callback: Callback,
}

impl Choice {
    fn from_tokens(tokens: &TokenMap, wrap: fn(Token) -> Callback) -> Vec<Choice> {
        tokens
            .iter()
            .map(|(token, value)| Choice {
                token: token.clone(),
                label: value.to_string(),
                callback: wrap(token.clone()),
            })
            .collect()
    }
}

/// What the user should see next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Root menu with the four sections
    MainMenu,
    /// Equipment list
    Equipment {
        choices: Vec<Choice>,
    },
    /// Categories of one equipment
    Level1 {
        equipment: String,
        choices: Vec<Choice>,
        back: Callback,
    },
    /// Subcategories of one category
    Level2 {
        equipment: String,
        level1: String,
        choices: Vec<Choice>,
        back: Callback,
    },
    /// Leaf with every matching row
    Result {
        equipment: String,
        level1: String,
        level2: String,
        entries: Vec<ResultEntry>,
        back: Callback,
    },
}

impl Screen {
    /// Drill-down choices shown on this screen
    pub fn choices(&self) -> &[Choice] {
        match self {
            Screen::Equipment { choices }
            | Screen::Level1 { choices, .. }
            | Screen::Level2 { choices, .. } => choices,
            Screen::MainMenu | Screen::Result { .. } => &[],
        }
    }
    
    /// Target of the back button, if the screen has one
    pub fn back(&self) -> Option<&Callback> {
        match self {
            Screen::Level1 { back, .. }
            | Screen::Level2 { back, .. }
            | Screen::Result { back, .. } => Some(back),
            Screen::MainMenu | Screen::Equipment { .. } => None,
        }
    }
}

/// How a screen reaches the chat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Replace the message the button belongs to
    Edit,
    /// Post a new message
    Send,
}

/// Engine response to one inbound event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Show {
        screen: Screen,
        delivery: Delivery,
    },
    /// The pressed section has nothing behind it yet
    Notice(Section),
}

impl Reply {
    fn edit(screen: Screen) -> Self {
        Reply::Show {
            screen,
            delivery: Delivery::Edit,
        }
    }
    
    fn main_menu() -> Self {
        Reply::Show {
            screen: Screen::MainMenu,
            delivery: Delivery::Send,
        }
    }
}
