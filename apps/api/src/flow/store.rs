use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::flow::session::Session;

/// In-memory session registry. Each browser tab owns one isolated session;
/// nothing is shared between them and nothing survives a restart.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<DashMap<Uuid, Arc<Session>>>,
    payment_delay: Duration,
}

impl SessionStore {
    pub fn new(payment_delay: Duration) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            payment_delay,
        }
    }

    pub fn create(&self) -> Arc<Session> {
        let session = Arc::new(Session::new(self.payment_delay));
        self.sessions.insert(session.id(), session.clone());
        info!(session_id = %session.id(), total = self.sessions.len(), "Session created");
        session
    }

    /// Looks up a session and marks it as seen.
    pub fn get(&self, id: Uuid) -> Result<Arc<Session>, AppError> {
        let session = self
            .sessions
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
        session.touch();
        Ok(session)
    }

    /// Drops a session. Its pending payment timer, if any, is aborted with it.
    pub fn remove(&self, id: Uuid) -> bool {
        self.sessions.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Removes sessions not seen for longer than `ttl`. Returns how many went.
    pub fn prune_idle(&self, ttl: Duration) -> usize {
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        let cutoff = Utc::now().timestamp_millis().saturating_sub(ttl_ms);
        let before = self.sessions.len();
        self.sessions
            .retain(|_, session| session.last_seen_ms() >= cutoff);
        let pruned = before.saturating_sub(self.sessions.len());
        if pruned > 0 {
            info!(pruned, remaining = self.sessions.len(), "Pruned idle sessions");
        }
        pruned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_get_remove() {
        let store = SessionStore::new(Duration::from_millis(10));
        let session = store.create();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(session.id()).unwrap().id(), session.id());

        assert!(store.remove(session.id()));
        assert!(!store.remove(session.id()));
        assert!(matches!(store.get(session.id()), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_sessions_are_isolated() {
        let store = SessionStore::new(Duration::from_millis(10));
        let a = store.create();
        let b = store.create();
        assert_ne!(a.id(), b.id());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_prune_keeps_recent_sessions() {
        let store = SessionStore::new(Duration::from_millis(10));
        store.create();
        assert_eq!(store.prune_idle(Duration::from_secs(60)), 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_prune_removes_stale_sessions() {
        let store = SessionStore::new(Duration::from_millis(10));
        store.create();
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(store.prune_idle(Duration::ZERO), 1);
        assert_eq!(store.len(), 0);
    }
}
