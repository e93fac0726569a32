//! In-memory record store.
//!
//! Backs tests and local development. Enforces the same access-scope rules
//! the platform does: session-joining queries require elevated access.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{AccessScope, RecordStore};
use crate::error::StoreError;
use crate::models::{DeviceType, Installation, ObjectId, Session};

/// In-memory store over `Arc<RwLock<HashMap>>` maps, cheap to clone and
/// share across tasks.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    installations: Arc<RwLock<HashMap<ObjectId, Installation>>>,
    sessions: Arc<RwLock<HashMap<ObjectId, Session>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an installation record.
    pub async fn insert_installation(&self, installation: Installation) {
        self.installations
            .write()
            .await
            .insert(installation.object_id.clone(), installation);
    }

    /// Insert or replace a session record.
    pub async fn insert_session(&self, session: Session) {
        self.sessions
            .write()
            .await
            .insert(session.object_id.clone(), session);
    }

    /// Remove a session, logging the user out of that installation.
    pub async fn remove_session(&self, object_id: &ObjectId) -> Option<Session> {
        self.sessions.write().await.remove(object_id)
    }

    fn require_elevated(scope: AccessScope, operation: &str) -> Result<(), StoreError> {
        if scope != AccessScope::Elevated {
            return Err(StoreError::ScopeDenied {
                operation: operation.to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn installation_by_object_id(
        &self,
        _scope: AccessScope,
        object_id: &ObjectId,
    ) -> Result<Option<Installation>, StoreError> {
        Ok(self.installations.read().await.get(object_id).cloned())
    }

    async fn set_latest_event(
        &self,
        _scope: AccessScope,
        installation: &ObjectId,
        event: &ObjectId,
    ) -> Result<(), StoreError> {
        let mut installations = self.installations.write().await;
        let record = installations
            .get_mut(installation)
            .ok_or_else(|| StoreError::Save(format!("no installation {installation}")))?;
        record.latest_event = Some(event.clone());
        Ok(())
    }

    async fn session_for_installation(
        &self,
        scope: AccessScope,
        user: &ObjectId,
        installation_id: &str,
    ) -> Result<Option<Session>, StoreError> {
        Self::require_elevated(scope, "session_for_installation")?;

        Ok(self
            .sessions
            .read()
            .await
            .values()
            .find(|s| &s.user == user && s.installation_id == installation_id)
            .cloned())
    }

    async fn paired_installations(
        &self,
        scope: AccessScope,
        user: &ObjectId,
        device_types: &[DeviceType],
    ) -> Result<Vec<Installation>, StoreError> {
        Self::require_elevated(scope, "paired_installations")?;

        let logged_in: HashSet<String> = self
            .sessions
            .read()
            .await
            .values()
            .filter(|s| &s.user == user)
            .map(|s| s.installation_id.clone())
            .collect();

        let mut matches: Vec<Installation> = self
            .installations
            .read()
            .await
            .values()
            .filter(|i| {
                &i.owner == user
                    && device_types.contains(&i.device_type)
                    && logged_in.contains(&i.installation_id)
            })
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.device_name.cmp(&b.device_name));
        Ok(matches)
    }
}
