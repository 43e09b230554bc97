//! Session storage backends

use std::time::{Duration, Instant};
use ahash::AHashMap;
use parking_lot::Mutex;

use super::{SessionContext, UserId};

/// Storage for per-user navigation contexts
///
/// Closures passed to [`SessionStore::get_or_create`] and
/// [`SessionStore::update`] run while the store holds the user's entry, so a
/// token lookup and the mutation that follows it happen as one step.
pub trait SessionStore: Send + Sync {
    /// Snapshot of a user's context
    fn get(&self, user: UserId) -> Option<SessionContext>;
    
    /// Replace a user's context
    fn set(&self, user: UserId, context: SessionContext);
    
    /// Drop a user's context, returning it if present
    fn remove(&self, user: UserId) -> Option<SessionContext>;
    
    /// Run `f` against the user's context, creating an empty one first if needed
    fn get_or_create<R>(&self, user: UserId, f: impl FnOnce(&mut SessionContext) -> R) -> R
    where
        Self: Sized;
    
    /// Run `f` against the user's context if one exists
    fn update<R>(&self, user: UserId, f: impl FnOnce(&mut SessionContext) -> R) -> Option<R>
    where
        Self: Sized;
    
    /// Number of stored contexts
    fn len(&self) -> usize;
    
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-memory session store
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<AHashMap<UserId, SessionContext>>,
}

impl InMemorySessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
    
    /// Remove contexts untouched for longer than `max_idle`, returning how many went
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.lock();
        let before = sessions.len();
        sessions.retain(|_, context| now.saturating_duration_since(context.touched_at) <= max_idle);
        before - sessions.len()
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, user: UserId) -> Option<SessionContext> {
        self.sessions.lock().get(&user).cloned()
    }
    
    fn set(&self, user: UserId, context: SessionContext) {
        self.sessions.lock().insert(user, context);
    }
    
    fn remove(&self, user: UserId) -> Option<SessionContext> {
        self.sessions.lock().remove(&user)
    }
    
    fn get_or_create<R>(&self, user: UserId, f: impl FnOnce(&mut SessionContext) -> R) -> R {
        let mut sessions = self.sessions.lock();
        f(sessions.entry(user).or_default())
    }
    
    fn update<R>(&self, user: UserId, f: impl FnOnce(&mut SessionContext) -> R) -> Option<R> {
        let mut sessions = self.sessions.lock();
        sessions.get_mut(&user).map(f)
    }
    
    fn len(&self) -> usize {
        self.sessions.lock().len()
    }
}
