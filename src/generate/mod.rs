use crate::state::AppState;
use axum::Router;

mod dto;
pub mod fallback;
pub mod gemini;
pub mod handlers;

pub fn router() -> Router<AppState> {
    handlers::router()
}
