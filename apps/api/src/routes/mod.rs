pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::editing::handlers;
use crate::state::AppState;
use crate::variants::handlers as variants;
use crate::widgets::handlers as widgets;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Edit sessions
        .route("/api/v1/sessions", post(handlers::handle_open_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_close_session),
        )
        .route("/api/v1/sessions/:id/theme", put(handlers::handle_set_theme))
        .route("/api/v1/sessions/:id/data", put(handlers::handle_replace_data))
        .route(
            "/api/v1/sessions/:id/value",
            get(handlers::handle_get_value).patch(handlers::handle_set_value),
        )
        .route(
            "/api/v1/sessions/:id/arrays/add",
            post(handlers::handle_add_array_item),
        )
        .route(
            "/api/v1/sessions/:id/arrays/remove",
            post(handlers::handle_remove_array_item),
        )
        .route(
            "/api/v1/sessions/:id/bullets/add",
            post(handlers::handle_add_bullet),
        )
        .route(
            "/api/v1/sessions/:id/bullets/remove",
            post(handlers::handle_remove_bullet),
        )
        // Inline widgets
        .route(
            "/api/v1/sessions/:id/widgets/render",
            post(widgets::handle_render_widget),
        )
        .route(
            "/api/v1/sessions/:id/widgets/commit",
            post(widgets::handle_commit_widget),
        )
        // Section variants
        .route(
            "/api/v1/sessions/:id/projects",
            get(variants::handle_render_projects),
        )
        .with_state(state)
}
