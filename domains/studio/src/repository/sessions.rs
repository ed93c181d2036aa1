//! Session store

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{Duration, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::entities::Session;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    #[error("Session store lock poisoned")]
    Poisoned,
}

/// Storage for per-user sessions
///
/// A request loads a snapshot, mutates it and saves it back. Concurrent
/// writes to one session are last-write-wins.
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    /// Load a live session; expired sessions are removed and reported absent
    async fn load(&self, id: Uuid) -> Result<Option<Session>, StoreError>;

    async fn save(&self, session: Session) -> Result<(), StoreError>;

    async fn remove(&self, id: Uuid) -> Result<(), StoreError>;

    /// Drop every expired session, returning how many were removed
    async fn purge_expired(&self) -> Result<usize, StoreError>;
}

pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
    ttl: Duration,
}

impl InMemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn purge(&self, sessions: &mut HashMap<Uuid, Session>) -> usize {
        let now = Utc::now();
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(self.ttl, now));
        before - sessions.len()
    }
}

#[async_trait::async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, id: Uuid) -> Result<Option<Session>, StoreError> {
        let now = Utc::now();
        {
            let sessions = self.sessions.read().map_err(|_| StoreError::Poisoned)?;
            match sessions.get(&id) {
                None => return Ok(None),
                Some(session) if !session.is_expired(self.ttl, now) => {
                    return Ok(Some(session.clone()))
                }
                Some(_) => {}
            }
        }

        tracing::debug!(session_id = %id, "Session expired");
        self.remove(id).await?;
        Ok(None)
    }

    async fn save(&self, session: Session) -> Result<(), StoreError> {
        let mut sessions = self.sessions.write().map_err(|_| StoreError::Poisoned)?;
        let purged = self.purge(&mut sessions);
        if purged > 0 {
            tracing::debug!(purged, "Purged expired sessions");
        }
        sessions.insert(session.id, session);
        Ok(())
    }

    async fn remove(&self, id: Uuid) -> Result<(), StoreError> {
        let mut sessions = self.sessions.write().map_err(|_| StoreError::Poisoned)?;
        sessions.remove(&id);
        Ok(())
    }

    async fn purge_expired(&self) -> Result<usize, StoreError> {
        let mut sessions = self.sessions.write().map_err(|_| StoreError::Poisoned)?;
        Ok(self.purge(&mut sessions))
    }
}
