//! Shared handler state and the in-memory registration session store.

use medireg_core::{AddressLookupService, FormController, FormSession, GatewayConfig, RecordGateway};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};
use uuid::Uuid;

/// How long a registration session may sit untouched before it is dropped.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);

/// Application state for the REST API server
///
/// Cloned into every handler. The collaborators are trait objects so tests can swap in
/// in-memory fakes for the HTTP clients.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    pub gateway: Arc<dyn RecordGateway>,
    pub lookup: Arc<dyn AddressLookupService>,
    pub cfg: Arc<GatewayConfig>,
}

impl AppState {
    pub fn new(
        cfg: Arc<GatewayConfig>,
        gateway: Arc<dyn RecordGateway>,
        lookup: Arc<dyn AddressLookupService>,
    ) -> Self {
        Self {
            sessions: Arc::new(SessionStore::default()),
            gateway,
            lookup,
            cfg,
        }
    }

    /// Replaces the session store with an empty one using `idle_ttl`.
    pub fn with_session_ttl(mut self, idle_ttl: Duration) -> Self {
        self.sessions = Arc::new(SessionStore::new(idle_ttl));
        self
    }
}

#[derive(Debug)]
struct Entry {
    session: Arc<FormSession>,
    last_seen: Instant,
}

/// Open registration sessions keyed by id.
///
/// A session lives until its registration is accepted, it is discarded, or it has been idle
/// for the store's TTL. Every successful [`get`](Self::get) counts as activity. Expired
/// entries are invisible to lookups and are swept out whenever a new session is created.
///
/// The map lock is only taken to insert, fetch or remove a session handle; operations on a
/// session go through its own lock.
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Entry>>,
    idle_ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL)
    }
}

impl SessionStore {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_ttl,
        }
    }

    pub fn idle_ttl(&self) -> Duration {
        self.idle_ttl
    }

    /// Stores a new session and returns its id and handle.
    pub fn create(&self, controller: FormController) -> (Uuid, Arc<FormSession>) {
        self.create_at(controller, Instant::now())
    }

    /// Returns the session and marks it as active, unless it is unknown or expired.
    pub fn get(&self, id: &Uuid) -> Option<Arc<FormSession>> {
        self.get_at(id, Instant::now())
    }

    /// Removes the session. Returns `None` if it was unknown or had already expired.
    pub fn remove(&self, id: &Uuid) -> Option<Arc<FormSession>> {
        self.remove_at(id, Instant::now())
    }

    /// Number of stored entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_expired(&self, entry: &Entry, now: Instant) -> bool {
        now.saturating_duration_since(entry.last_seen) >= self.idle_ttl
    }

    fn create_at(&self, controller: FormController, now: Instant) -> (Uuid, Arc<FormSession>) {
        let id = Uuid::new_v4();
        let session = Arc::new(FormSession::new(controller));

        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let before = sessions.len();
        sessions.retain(|_, entry| !self.is_expired(entry, now));
        let swept = before - sessions.len();
        if swept > 0 {
            tracing::debug!("dropped {} idle registration sessions", swept);
        }
        sessions.insert(
            id,
            Entry {
                session: session.clone(),
                last_seen: now,
            },
        );
        (id, session)
    }

    fn get_at(&self, id: &Uuid, now: Instant) -> Option<Arc<FormSession>> {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let entry = sessions.get_mut(id)?;
        if self.is_expired(entry, now) {
            sessions.remove(id);
            return None;
        }
        entry.last_seen = now;
        Some(entry.session.clone())
    }

    fn remove_at(&self, id: &Uuid, now: Instant) -> Option<Arc<FormSession>> {
        let entry = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)?;
        (!self.is_expired(&entry, now)).then_some(entry.session)
    }
}
