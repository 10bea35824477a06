use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::editing::session::EditSession;

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("Session {0} not found")]
    NotFound(Uuid),

    #[error("Session limit of {0} reached")]
    Full(usize),
}

/// Open editor sessions, keyed by id. Each session is independent; the lock
/// only serialises access to the map and to one session at a time.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, EditSession>>>,
    capacity: usize,
}

impl SessionStore {
    pub fn new(capacity: usize) -> Self {
        SessionStore {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            capacity,
        }
    }

    pub async fn open(&self, session: EditSession) -> Result<Uuid, StoreError> {
        let mut sessions = self.sessions.write().await;
        if sessions.len() >= self.capacity {
            return Err(StoreError::Full(self.capacity));
        }
        let id = session.id();
        sessions.insert(id, session);
        info!("Opened edit session {id} ({} open)", sessions.len());
        Ok(id)
    }

    /// A copy of the session. The resume snapshot inside is shared, not cloned.
    pub async fn get(&self, id: Uuid) -> Result<EditSession, StoreError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    /// Runs `f` against the live session.
    pub async fn with_session<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut EditSession) -> T,
    ) -> Result<T, StoreError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        Ok(f(session))
    }

    /// Removes the session and returns it so its data can be persisted.
    pub async fn close(&self, id: Uuid) -> Result<EditSession, StoreError> {
        let session = self
            .sessions
            .write()
            .await
            .remove(&id)
            .ok_or(StoreError::NotFound(id))?;
        info!(
            "Closed edit session {id} at revision {}",
            session.revision()
        );
        Ok(session)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
