use crate::state::AppState;
use axum::Router;

mod dto;
mod error;
pub(crate) mod extractors;
pub mod handlers;
pub mod password;
pub mod services;
pub mod store;
pub mod token;
pub mod user;

pub use error::AuthError;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::auth_routes())
        .merge(handlers::me_routes())
}
