// Session storage collaborators
use dashmap::DashMap;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

// Slot holding the user's SearchCriteria record
pub const FORM_DATA_SESSION: &str = "form_data";

// Key-value store scoped to one user session.
// Values are replaced wholesale; there is no field-level patching.
pub trait SessionStore: Send + Sync + 'static {
    fn get(&self, key: &str) -> Option<Value>;

    fn put(&self, key: &str, value: Value);

    // Removes the slot, returning what it held
    fn forget(&self, key: &str) -> Option<Value>;
}

#[derive(Debug, Default)]
pub struct MemorySession {
    values: RwLock<HashMap<String, Value>>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }
}

impl SessionStore for MemorySession {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.read().get(key).cloned()
    }

    fn put(&self, key: &str, value: Value) {
        self.values.write().insert(key.to_string(), value);
    }

    fn forget(&self, key: &str) -> Option<Value> {
        self.values.write().remove(key)
    }
}

// Opaque session token, 128 random bits rendered as hex
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn generate() -> Self {
        Self(format!("{:032x}", rand::random::<u128>()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SessionId {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for SessionId {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

// A registered session and when its token was last presented
#[derive(Debug)]
struct RegistryEntry {
    session: Arc<MemorySession>,
    last_seen: Instant,
}

// Process-wide table of in-memory sessions keyed by token.
// With an idle TTL set, sessions unused for longer than the TTL are dropped
// whenever a new one is created.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: DashMap<SessionId, RegistryEntry>,
    idle_ttl: Option<Duration>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_ttl(idle_ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            idle_ttl: Some(idle_ttl),
        }
    }

    pub fn idle_ttl(&self) -> Option<Duration> {
        self.idle_ttl
    }

    pub fn create(&self) -> (SessionId, Arc<MemorySession>) {
        if let Some(ttl) = self.idle_ttl {
            self.evict_idle(ttl);
        }

        let id = SessionId::generate();
        let session = Arc::new(MemorySession::new());
        self.sessions.insert(
            id.clone(),
            RegistryEntry {
                session: Arc::clone(&session),
                last_seen: Instant::now(),
            },
        );
        tracing::debug!(session = %id, "session created");
        (id, session)
    }

    // Looking a session up counts as activity
    pub fn get(&self, id: &SessionId) -> Option<Arc<MemorySession>> {
        self.sessions.get_mut(id).map(|mut entry| {
            entry.last_seen = Instant::now();
            Arc::clone(&entry.session)
        })
    }

    // Unknown or missing tokens start a fresh session
    pub fn get_or_create(&self, id: Option<&SessionId>) -> (SessionId, Arc<MemorySession>) {
        match id.and_then(|id| self.get(id).map(|session| (id.clone(), session))) {
            Some(found) => found,
            None => self.create(),
        }
    }

    pub fn remove(&self, id: &SessionId) -> bool {
        self.sessions.remove(id).is_some()
    }

    // Drops sessions not seen within `ttl`, returning how many went
    pub fn evict_idle(&self, ttl: Duration) -> usize {
        match Instant::now().checked_sub(ttl) {
            Some(cutoff) => self.evict_seen_before(cutoff),
            None => 0,
        }
    }

    pub fn evict_seen_before(&self, cutoff: Instant) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, entry| entry.last_seen >= cutoff);
        let evicted = before.saturating_sub(self.sessions.len());
        if evicted > 0 {
            tracing::debug!(evicted, "idle sessions evicted");
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
