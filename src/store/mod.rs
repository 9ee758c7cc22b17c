use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

pub mod file;

pub use file::JsonFileStore;

/// A stored user. Serialized in full to the backing file; clients only
/// ever see the `PublicUser` projection from the auth DTOs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_login: Option<OffsetDateTime>,
    #[serde(default)]
    pub profile_data: Map<String, Value>,
}

impl UserRecord {
    pub fn new(username: &str, email: &str, password_hash: &str) -> Self {
        Self {
            user_id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: OffsetDateTime::now_utc(),
            last_login: None,
            profile_data: Map::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username already exists")]
    DuplicateUsername,

    #[error("email already exists")]
    DuplicateEmail,

    #[error("user database io: {0}")]
    Io(#[from] std::io::Error),

    #[error("user database encode: {0}")]
    Encode(#[from] serde_json::Error),
}

/// CRUD over the credential store. Uniqueness of `user_id`, `username`
/// and `email` is the store's invariant to uphold.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<UserRecord, StoreError>;

    async fn get_by_id(&self, user_id: Uuid) -> Result<Option<UserRecord>, StoreError>;

    async fn get_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError>;

    async fn get_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Upsert by `user_id`.
    async fn update(&self, record: &UserRecord) -> Result<(), StoreError>;

    /// Returns whether a record was actually removed.
    async fn delete(&self, user_id: Uuid) -> Result<bool, StoreError>;
}
