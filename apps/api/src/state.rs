use crate::config::Config;
use crate::editing::store::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Open edit sessions, one per page being edited.
    pub sessions: SessionStore,
    pub config: Config,
}
