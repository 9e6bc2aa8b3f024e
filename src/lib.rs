//! LibraryHub client
//!
//! Typed access to the LibraryHub REST API (books, loans, users) with a
//! persisted bearer-token session. All calls go through one gateway client
//! that injects the token, unwraps `{ "data": ... }` envelopes and signs the
//! user out when the server answers 401.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult, ErrorCategory};
pub use services::{gateway::ApiClient, session::SessionStore, Services};

/// Application state shared by every front-end component
#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Services,
}
