use axum::Router;

use crate::state::AppState;

mod dto;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod services;
pub mod validation;

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}
