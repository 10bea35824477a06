use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::variants::projects::{render_projects, ProjectCard, ProjectsVariant};

#[derive(Debug, Deserialize)]
pub struct VariantQuery {
    pub variant: Option<String>,
}

/// GET /api/v1/sessions/:id/projects?variant=
pub async fn handle_render_projects(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<VariantQuery>,
) -> Result<Json<Vec<ProjectCard>>, AppError> {
    let variant = query
        .variant
        .as_deref()
        .map(ProjectsVariant::from_key)
        .unwrap_or_default();
    let session = state.sessions.get(id).await?;
    Ok(Json(render_projects(session.data(), variant)))
}
