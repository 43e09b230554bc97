//! Core functionality for the equipment lookup bot
//! 
//! This crate provides the dataset model, the per-user session store and the
//! navigation engine that drives the equipment → category → subcategory
//! drill-down. It knows nothing about the chat transport.

pub mod dataset;
pub mod navigation;
pub mod session;

// Re-export commonly used types
pub use dataset::{Dataset, DatasetRow, ResultEntry};
pub use navigation::{
    Callback, CallbackError, Choice, Delivery, NavigationEngine, Reply, Screen, Section,
    Token, TokenMap,
};
pub use session::{InMemorySessionStore, Selection, SessionContext, SessionStore, UserId};

/// Header label that marks the title row of the equipment column
pub const DEFAULT_HEADER_LABEL: &str = "оборудование";
