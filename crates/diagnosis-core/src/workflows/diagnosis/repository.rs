use std::collections::HashMap;
use std::sync::RwLock;

use super::domain::{Session, SessionId};

/// Storage abstraction so the service can be exercised without persistence.
///
/// `update` only accepts a session whose revision is exactly one past the stored
/// one; anything else is a lost-update race and fails with `Stale`.
pub trait SessionRepository: Send + Sync {
    fn insert(&self, session: Session) -> Result<Session, RepositoryError>;
    fn update(&self, session: Session) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &SessionId) -> Result<Option<Session>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("session already exists")]
    Conflict,
    #[error("session not found")]
    NotFound,
    #[error("stale session update: stored revision {stored}, update carries {update}")]
    Stale { stored: u64, update: u64 },
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Process-local session store.
#[derive(Debug, Default)]
pub struct InMemorySessionRepository {
    sessions: RwLock<HashMap<SessionId, Session>>,
}

impl InMemorySessionRepository {
    pub fn len(&self) -> Result<usize, RepositoryError> {
        let sessions = self.sessions.read().map_err(poisoned)?;
        Ok(sessions.len())
    }

    pub fn is_empty(&self) -> Result<bool, RepositoryError> {
        Ok(self.len()? == 0)
    }
}

fn poisoned<T>(_: T) -> RepositoryError {
    RepositoryError::Unavailable("session store lock poisoned".to_string())
}

impl SessionRepository for InMemorySessionRepository {
    fn insert(&self, session: Session) -> Result<Session, RepositoryError> {
        let mut sessions = self.sessions.write().map_err(poisoned)?;
        if sessions.contains_key(session.id()) {
            return Err(RepositoryError::Conflict);
        }
        sessions.insert(session.id().clone(), session.clone());
        Ok(session)
    }

    fn update(&self, session: Session) -> Result<(), RepositoryError> {
        let mut sessions = self.sessions.write().map_err(poisoned)?;
        match sessions.get_mut(session.id()) {
            // Updates must build on the stored revision.
            Some(existing) if existing.revision() + 1 != session.revision() => {
                Err(RepositoryError::Stale {
                    stored: existing.revision(),
                    update: session.revision(),
                })
            }
            Some(existing) => {
                *existing = session;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<Session>, RepositoryError> {
        let sessions = self.sessions.read().map_err(poisoned)?;
        Ok(sessions.get(id).cloned())
    }
}
