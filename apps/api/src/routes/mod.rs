pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::chat::handlers::handle_chat;
use crate::profile::handlers as profile;
use crate::resume::handlers::handle_generate_resume;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Chat API
        .route("/api/chat", post(handle_chat))
        // Resume API
        .route("/api/generate-resume", post(handle_generate_resume))
        .route("/api/generate-cover-letter", post(handle_generate_resume))
        // Profile API
        .route(
            "/api/profile",
            get(profile::handle_get_profile).put(profile::handle_save_profile),
        )
        .route("/api/profile/form", get(profile::handle_form_bootstrap))
        .route(
            "/api/profile/sections/:section",
            put(profile::handle_save_section),
        )
        .with_state(state)
}
