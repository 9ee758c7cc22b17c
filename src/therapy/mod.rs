use axum::Router;

use crate::state::AppState;

mod dto;
pub mod generator;
pub mod handlers;
pub mod remote;
pub mod score;
pub mod session;
pub mod templates;

pub fn router() -> Router<AppState> {
    handlers::therapy_routes()
}
