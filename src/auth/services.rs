use serde_json::{Map, Value};
use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::jwt::JwtKeys;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::validation::{is_valid_email, validate_password, validate_username};
use crate::error::ApiError;
use crate::store::{UserRecord, UserStore};

/// Validate, create and hand back the new user with a signed token.
/// Validation short-circuits: username, then email, then password.
pub async fn register(
    store: &dyn UserStore,
    keys: &JwtKeys,
    username: &str,
    email: &str,
    password: &str,
) -> Result<(UserRecord, String), ApiError> {
    validate_username(username)?;
    if !is_valid_email(email) {
        return Err(ApiError::Validation("Invalid email format".into()));
    }
    validate_password(password)?;

    // Emails are stored lowercased so login lookups are case-insensitive.
    let email = email.to_lowercase();
    let hash = hash_password(password)?;
    let user = store.create(username, &email, &hash).await?;
    let token = keys.sign(user.user_id, &user.username)?;

    info!(user_id = %user.user_id, username = %user.username, "user registered");
    Ok((user, token))
}

/// The identifier is tried as an email only when it looks like one;
/// otherwise it is a username. Unknown user and wrong password are
/// deliberately indistinguishable to the caller.
pub async fn login(
    store: &dyn UserStore,
    keys: &JwtKeys,
    identifier: &str,
    password: &str,
) -> Result<(UserRecord, String), ApiError> {
    let user = if is_valid_email(identifier) {
        // Match the lowercased form registration stores.
        store.get_by_email(&identifier.to_lowercase()).await?
    } else {
        store.get_by_username(identifier).await?
    };

    let mut user = match user {
        Some(u) => u,
        None => {
            warn!("login attempt for unknown identifier");
            return Err(ApiError::InvalidCredentials);
        }
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(user_id = %user.user_id, "login with invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    user.last_login = Some(OffsetDateTime::now_utc());
    store.update(&user).await?;

    let token = keys.sign(user.user_id, &user.username)?;
    info!(user_id = %user.user_id, username = %user.username, "user logged in");
    Ok((user, token))
}

pub async fn change_password(
    store: &dyn UserStore,
    user_id: Uuid,
    old_password: &str,
    new_password: &str,
) -> Result<(), ApiError> {
    let mut user = store.get_by_id(user_id).await?.ok_or(ApiError::NotFound)?;

    if !verify_password(old_password, &user.password_hash)? {
        warn!(user_id = %user_id, "password change with wrong current password");
        return Err(ApiError::InvalidCredentials);
    }
    validate_password(new_password)?;

    user.password_hash = hash_password(new_password)?;
    store.update(&user).await?;
    info!(user_id = %user_id, "password changed");
    Ok(())
}

/// Shallow-merges the patch into `profile_data`. The handler strips
/// protected keys before calling; this layer merges whatever it is given.
pub async fn update_profile(
    store: &dyn UserStore,
    user_id: Uuid,
    patch: Map<String, Value>,
) -> Result<UserRecord, ApiError> {
    let mut user = store.get_by_id(user_id).await?.ok_or(ApiError::NotFound)?;
    for (key, value) in patch {
        user.profile_data.insert(key, value);
    }
    store.update(&user).await?;
    info!(user_id = %user_id, "profile updated");
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JwtConfig;
    use crate::store::JsonFileStore;

    async fn fixtures(dir: &tempfile::TempDir) -> (JsonFileStore, JwtKeys) {
        let store = JsonFileStore::new(dir.path().join("users.json"))
            .await
            .expect("store");
        let keys = JwtKeys::from_config(&JwtConfig {
            secret: "test-secret".into(),
            ttl_hours: 24,
        });
        (store, keys)
    }

    #[tokio::test]
    async fn register_then_login_keeps_user_id_stable() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (store, keys) = fixtures(&dir).await;

        let (registered, token) = register(&store, &keys, "stable", "s@example.com", "passw0rd")
            .await
            .expect("register");
        assert!(!token.is_empty());
        assert!(registered.last_login.is_none());

        let (via_username, _) = login(&store, &keys, "stable", "passw0rd")
            .await
            .expect("login by username");
        assert_eq!(via_username.user_id, registered.user_id);
        assert!(via_username.last_login.is_some());

        let (via_email, _) = login(&store, &keys, "s@example.com", "passw0rd")
            .await
            .expect("login by email");
        assert_eq!(via_email.user_id, registered.user_id);
    }

    #[tokio::test]
    async fn mixed_case_email_register_then_login() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (store, keys) = fixtures(&dir).await;

        let (registered, _) =
            register(&store, &keys, "mixed_case", "Mixed.Case@Example.com", "passw0rd")
                .await
                .expect("register");
        assert_eq!(registered.email, "mixed.case@example.com");

        // The identical identifier used at registration must work again.
        let (user, _) = login(&store, &keys, "Mixed.Case@Example.com", "passw0rd")
            .await
            .expect("login with the email as typed at registration");
        assert_eq!(user.user_id, registered.user_id);

        let (user, _) = login(&store, &keys, "mixed.case@example.com", "passw0rd")
            .await
            .expect("login with the lowercased email");
        assert_eq!(user.user_id, registered.user_id);

        // Case-variant duplicates collapse to the same stored email.
        let err = register(&store, &keys, "second_try", "MIXED.CASE@EXAMPLE.COM", "passw0rd")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::DuplicateEmail));
    }

    #[tokio::test]
    async fn register_rejects_duplicates() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (store, keys) = fixtures(&dir).await;

        register(&store, &keys, "original", "orig@example.com", "passw0rd")
            .await
            .expect("register");

        let err = register(&store, &keys, "original", "other@example.com", "passw0rd")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::DuplicateUsername));

        let err = register(&store, &keys, "someone_else", "orig@example.com", "passw0rd")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::DuplicateEmail));
    }

    #[tokio::test]
    async fn register_short_circuits_on_first_invalid_field() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (store, keys) = fixtures(&dir).await;

        let err = register(&store, &keys, "x", "not-an-email", "short")
            .await
            .unwrap_err();
        // Username fails first even though email and password are bad too.
        assert!(err.to_string().contains("Username"));
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_invalid_credentials() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (store, keys) = fixtures(&dir).await;
        register(&store, &keys, "victim", "v@example.com", "passw0rd")
            .await
            .expect("register");

        let err = login(&store, &keys, "victim", "wrong-pass1").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidCredentials));

        let err = login(&store, &keys, "nobody", "passw0rd").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidCredentials));
    }

    #[tokio::test]
    async fn change_password_with_wrong_old_leaves_hash_untouched() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (store, keys) = fixtures(&dir).await;
        let (user, _) = register(&store, &keys, "cautious", "c@example.com", "passw0rd")
            .await
            .expect("register");
        let before = store
            .get_by_id(user.user_id)
            .await
            .expect("get")
            .unwrap()
            .password_hash;

        let err = change_password(&store, user.user_id, "not-the-old1", "newpass99")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidCredentials));

        let after = store
            .get_by_id(user.user_id)
            .await
            .expect("get")
            .unwrap()
            .password_hash;
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn change_password_happy_path_rotates_hash() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (store, keys) = fixtures(&dir).await;
        let (user, _) = register(&store, &keys, "rotator", "r@example.com", "passw0rd")
            .await
            .expect("register");

        change_password(&store, user.user_id, "passw0rd", "newpass99")
            .await
            .expect("change password");

        login(&store, &keys, "rotator", "newpass99")
            .await
            .expect("login with new password");
        let err = login(&store, &keys, "rotator", "passw0rd").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidCredentials));
    }

    #[tokio::test]
    async fn update_profile_merges_shallowly() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (store, keys) = fixtures(&dir).await;
        let (user, _) = register(&store, &keys, "profiled", "p@example.com", "passw0rd")
            .await
            .expect("register");

        let mut patch = Map::new();
        patch.insert("bio".into(), serde_json::json!("chronically self-aware"));
        let updated = update_profile(&store, user.user_id, patch)
            .await
            .expect("update");
        assert_eq!(updated.profile_data["bio"], "chronically self-aware");

        let mut patch = Map::new();
        patch.insert("mood".into(), serde_json::json!("fine, probably"));
        let updated = update_profile(&store, user.user_id, patch)
            .await
            .expect("update");
        // Earlier keys survive a later shallow merge.
        assert_eq!(updated.profile_data["bio"], "chronically self-aware");
        assert_eq!(updated.profile_data["mood"], "fine, probably");

        let err = update_profile(&store, Uuid::new_v4(), Map::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }
}
