use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{StoreError, UserRecord, UserStore};

/// Flat-file user store: one JSON object keyed by user id, loaded and
/// rewritten wholesale on every operation.
///
/// There is no locking and no transaction isolation; two concurrent
/// writers can both pass the uniqueness check against a stale snapshot
/// and clobber each other on save. Last write wins. This mirrors the
/// observable behavior of the original store and is a documented
/// limitation, not something to silently fix here.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub async fn new(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                tokio::fs::create_dir_all(dir).await?;
            }
        }
        if !tokio::fs::try_exists(&path).await? {
            tokio::fs::write(&path, b"{}").await?;
            debug!(path = %path.display(), "created empty user database");
        }
        Ok(Self { path })
    }

    async fn load(&self) -> Result<HashMap<Uuid, UserRecord>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_slice(&bytes) {
            Ok(users) => Ok(users),
            Err(e) => {
                // An unreadable file reads as empty rather than bricking
                // every auth operation.
                warn!(path = %self.path.display(), error = %e, "user database unparseable, treating as empty");
                Ok(HashMap::new())
            }
        }
    }

    async fn save(&self, users: &HashMap<Uuid, UserRecord>) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(users)?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for JsonFileStore {
    async fn create(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<UserRecord, StoreError> {
        let mut users = self.load().await?;
        for existing in users.values() {
            if existing.username == username {
                return Err(StoreError::DuplicateUsername);
            }
            if existing.email == email {
                return Err(StoreError::DuplicateEmail);
            }
        }
        let record = UserRecord::new(username, email, password_hash);
        users.insert(record.user_id, record.clone());
        self.save(&users).await?;
        debug!(user_id = %record.user_id, username = %record.username, "user created");
        Ok(record)
    }

    async fn get_by_id(&self, user_id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.load().await?.remove(&user_id))
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        let users = self.load().await?;
        Ok(users.into_values().find(|u| u.username == username))
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let users = self.load().await?;
        Ok(users.into_values().find(|u| u.email == email))
    }

    async fn update(&self, record: &UserRecord) -> Result<(), StoreError> {
        let mut users = self.load().await?;
        users.insert(record.user_id, record.clone());
        self.save(&users).await
    }

    async fn delete(&self, user_id: Uuid) -> Result<bool, StoreError> {
        let mut users = self.load().await?;
        if users.remove(&user_id).is_none() {
            return Ok(false);
        }
        self.save(&users).await?;
        Ok(true)
    }
}
