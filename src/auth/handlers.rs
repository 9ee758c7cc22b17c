use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{Map, Value};
use tracing::instrument;

use crate::auth::dto::{
    AuthResponse, ChangePasswordRequest, LoginRequest, MessageResponse, PublicUser,
    RegisterRequest,
};
use crate::auth::jwt::{AuthUser, JwtKeys};
use crate::auth::services;
use crate::error::ApiError;
use crate::state::AppState;

/// Fields that must never be writable through the profile patch path.
const PROTECTED_FIELDS: [&str; 7] = [
    "user_id",
    "username",
    "email",
    "password",
    "password_hash",
    "created_at",
    "last_login",
];

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/verify", get(verify))
        .route("/auth/profile", get(get_profile).put(update_profile))
        .route("/auth/change-password", post(change_password))
        .route("/auth/logout", post(logout))
}

#[instrument(skip(state, payload))]
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let username = payload.username.trim();
    let email = payload.email.trim();

    let keys = JwtKeys::from_ref(&state);
    let (user, token) =
        services::register(state.users.as_ref(), &keys, username, email, &payload.password)
            .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: user.into(),
            token,
        }),
    ))
}

#[instrument(skip(state, payload))]
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let identifier = payload
        .username
        .as_deref()
        .or(payload.email.as_deref())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::Validation("Username/email and password are required".into()))?;

    let keys = JwtKeys::from_ref(&state);
    let (user, token) =
        services::login(state.users.as_ref(), &keys, identifier, &payload.password).await?;

    Ok(Json(AuthResponse {
        user: user.into(),
        token,
    }))
}

#[instrument(skip(state, auth))]
async fn verify(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<PublicUser>, ApiError> {
    let user = current_user(&state, &auth).await?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, auth))]
async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<PublicUser>, ApiError> {
    let user = current_user(&state, &auth).await?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, auth, patch))]
async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(patch): Json<Map<String, Value>>,
) -> Result<Json<PublicUser>, ApiError> {
    let patch = sanitize_patch(patch);
    let user = services::update_profile(state.users.as_ref(), auth.0.sub, patch).await?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, auth, payload))]
async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    services::change_password(
        state.users.as_ref(),
        auth.0.sub,
        &payload.old_password,
        &payload.new_password,
    )
    .await?;
    Ok(Json(MessageResponse {
        message: "Password changed successfully".into(),
    }))
}

#[instrument(skip(auth))]
async fn logout(auth: AuthUser) -> Json<MessageResponse> {
    // Stateless tokens: nothing to revoke server-side.
    Json(MessageResponse {
        message: format!(
            "Goodbye, {}. Try not to miss the existential dread too much.",
            auth.0.username
        ),
    })
}

async fn current_user(
    state: &AppState,
    auth: &AuthUser,
) -> Result<crate::store::UserRecord, ApiError> {
    state
        .users
        .get_by_id(auth.0.sub)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User not found".into()))
}

/// Strip keys the patch path must not touch; account fields change only
/// through their dedicated operations.
fn sanitize_patch(patch: Map<String, Value>) -> Map<String, Value> {
    patch
        .into_iter()
        .filter(|(key, _)| !PROTECTED_FIELDS.contains(&key.as_str()))
        .collect()
}
