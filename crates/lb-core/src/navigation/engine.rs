//! Navigation engine implementation

use std::sync::Arc;
use tracing::{debug, warn};

use super::{Callback, Choice, Reply, Screen, Section, Token, TokenMap};
use crate::dataset::Dataset;
use crate::session::{InMemorySessionStore, Selection, SessionContext, SessionStore, UserId};
use crate::DEFAULT_HEADER_LABEL;

/// Drives the equipment → level-1 → level-2 → result drill-down
///
/// Every menu gets a fresh [`TokenMap`] stored in the user's session; a
/// pressed token is only honoured while that map is still in the session.
/// Anything that cannot be resolved sends the user back to the main menu.
pub struct NavigationEngine<S = InMemorySessionStore> {
    dataset: Dataset,
    sessions: Arc<S>,
    header_label: String,
}

impl NavigationEngine<InMemorySessionStore> {
    /// Create an engine with an in-memory session store
    pub fn new(dataset: Dataset) -> Self {
        Self::with_store(dataset, Arc::new(InMemorySessionStore::new()))
    }
}

impl<S: SessionStore> NavigationEngine<S> {
    /// Create an engine over an existing session store
    pub fn with_store(dataset: Dataset, sessions: Arc<S>) -> Self {
        Self {
            dataset,
            sessions,
            header_label: DEFAULT_HEADER_LABEL.to_string(),
        }
    }
    
    /// Override the equipment header label excluded from the equipment menu
    pub fn with_header_label(mut self, label: impl Into<String>) -> Self {
        self.header_label = label.into();
        self
    }
    
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }
    
    pub fn sessions(&self) -> &Arc<S> {
        &self.sessions
    }
    
    /// Handle the start command
    pub fn start(&self, user: UserId) -> Reply {
        debug!(%user, "start");
        self.sessions.remove(user);
        Reply::main_menu()
    }
    
    /// Handle a raw button payload
    pub fn handle_payload(&self, user: UserId, payload: &str) -> Reply {
        match payload.parse::<Callback>() {
            Ok(callback) => self.handle(user, callback),
            Err(e) => {
                warn!(%user, payload, error = %e, "Unrecognised callback payload");
                self.restart(user)
            }
        }
    }
    
    /// Handle a decoded button payload
    pub fn handle(&self, user: UserId, callback: Callback) -> Reply {
        match callback {
            Callback::Section(Section::Pumps) => self.open_equipment_menu(user),
            Callback::Section(section) => {
                debug!(%user, section = section.keyword(), "Section not available");
                Reply::Notice(section)
            }
            Callback::Home => self.go_home(user),
            Callback::Equipment(token) => self.select_equipment(user, &token),
            Callback::Level1(token) => self.select_level1(user, &token),
            Callback::Level2(token) => self.select_level2(user, &token),
        }
    }
    
    /// Show the equipment list, replacing whatever the session held
    pub fn open_equipment_menu(&self, user: UserId) -> Reply {
        let tokens = TokenMap::issue(self.dataset.equipment_values(&self.header_label));
        let choices = Choice::from_tokens(&tokens, Callback::Equipment);
        
        debug!(%user, count = choices.len(), "Equipment menu");
        self.sessions.set(user, SessionContext::with_equipment_tokens(tokens));
        
        Reply::edit(Screen::Equipment { choices })
    }
    
    /// Resolve an equipment token and show its categories
    pub fn select_equipment(&self, user: UserId, token: &Token) -> Reply {
        let screen = self
            .sessions
            .update(user, |context| {
                let equipment = context.equipment_tokens.resolve(token)?.to_string();
                let tokens = TokenMap::issue(self.dataset.level1_values(&equipment));
                let choices = Choice::from_tokens(&tokens, Callback::Level1);
                
                context.select_equipment(
                    Selection {
                        token: token.clone(),
                        value: equipment.clone(),
                    },
                    tokens,
                );
                context.touch();
                
                Some(Screen::Level1 {
                    equipment,
                    choices,
                    back: Callback::Section(Section::Pumps),
                })
            })
            .flatten();
        
        self.show_or_restart(user, screen, token)
    }
    
    /// Resolve a level-1 token and show its subcategories
    pub fn select_level1(&self, user: UserId, token: &Token) -> Reply {
        let screen = self
            .sessions
            .update(user, |context| {
                let equipment = context.equipment.clone()?;
                let level1 = context.level1_tokens.resolve(token)?.to_string();
                let tokens = TokenMap::issue(self.dataset.level2_values(&equipment.value, &level1));
                let choices = Choice::from_tokens(&tokens, Callback::Level2);
                
                context.select_level1(
                    Selection {
                        token: token.clone(),
                        value: level1.clone(),
                    },
                    tokens,
                );
                context.touch();
                
                Some(Screen::Level2 {
                    equipment: equipment.value,
                    level1,
                    choices,
                    back: Callback::Equipment(equipment.token),
                })
            })
            .flatten();
        
        self.show_or_restart(user, screen, token)
    }
    
    /// Resolve a level-2 token and show every matching row
    pub fn select_level2(&self, user: UserId, token: &Token) -> Reply {
        let screen = self
            .sessions
            .update(user, |context| {
                let equipment = context.equipment.as_ref()?;
                let level1 = context.level1.as_ref()?;
                let level2 = context.level2_tokens.resolve(token)?;
                
                let screen = Screen::Result {
                    entries: self.dataset.entries(&equipment.value, &level1.value, level2),
                    equipment: equipment.value.clone(),
                    level1: level1.value.clone(),
                    level2: level2.to_string(),
                    back: Callback::Level1(level1.token.clone()),
                };
                context.touch();
                
                Some(screen)
            })
            .flatten();
        
        self.show_or_restart(user, screen, token)
    }
    
    /// Forget the user's path and show the main menu
    pub fn go_home(&self, user: UserId) -> Reply {
        debug!(%user, "Home");
        self.sessions.remove(user);
        Reply::main_menu()
    }
    
    fn restart(&self, user: UserId) -> Reply {
        debug!(%user, "Restarting navigation");
        Reply::main_menu()
    }
    
    fn show_or_restart(&self, user: UserId, screen: Option<Screen>, token: &Token) -> Reply {
        match screen {
            Some(screen) => Reply::edit(screen),
            None => {
                debug!(%user, %token, "Token not resolvable in session");
                self.restart(user)
            }
        }
    }
}
