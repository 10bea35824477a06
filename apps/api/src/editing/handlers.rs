//! Axum route handlers for edit sessions.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::editing::path::DataPath;
use crate::editing::session::{ensure_unique_ids, EditSession};
use crate::errors::AppError;
use crate::models::resume::ResumeData;
use crate::models::theme::ThemeColor;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OpenSessionRequest {
    pub resume_data: Option<ResumeData>,
    pub theme_color: Option<String>,
    pub editable: Option<bool>,
    /// Start from the demo resume instead of an empty one.
    pub sample: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetThemeRequest {
    pub theme_color: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetValueRequest {
    pub path: String,
    pub value: Value,
}

#[derive(Debug, Deserialize)]
pub struct PathQuery {
    pub path: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddArrayItemRequest {
    pub path: String,
    pub item: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveArrayItemRequest {
    pub path: String,
    pub index: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddBulletRequest {
    pub entry_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveBulletRequest {
    pub entry_id: String,
    pub index: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub revision: u64,
    /// False when the request was a no-op (stale id, last bullet, same text).
    pub changed: bool,
    pub theme_color: ThemeColor,
    pub editable: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub data: Arc<ResumeData>,
}

impl SessionResponse {
    pub fn from_session(session: &EditSession, changed: bool) -> Self {
        SessionResponse {
            session_id: session.id(),
            revision: session.revision(),
            changed,
            theme_color: session.theme_color().clone(),
            editable: session.editable(),
            created_at: session.created_at(),
            updated_at: session.updated_at(),
            data: session.snapshot(),
        }
    }

    /// Final response for a disposed session; takes the snapshot by value.
    pub fn closed(session: EditSession) -> Self {
        let mut response = SessionResponse::from_session(&session, false);
        response.data = session.into_data();
        response
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueResponse {
    pub path: String,
    pub value: Value,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
pub async fn handle_open_session(
    State(state): State<AppState>,
    Json(request): Json<OpenSessionRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let theme_color = match request.theme_color.as_deref() {
        Some(color) => ThemeColor::parse(color)?,
        None => state.config.default_theme_color.clone(),
    };
    let initial = match request.resume_data {
        Some(data) => data,
        None if request.sample => ResumeData::sample(),
        None => ResumeData::default(),
    };

    ensure_unique_ids(&initial)?;

    let session = EditSession::new(initial, theme_color, request.editable.unwrap_or(true));
    let response = SessionResponse::from_session(&session, false);
    state.sessions.open(session).await?;
    Ok(Json(response))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state.sessions.get(id).await?;
    Ok(Json(SessionResponse::from_session(&session, false)))
}

/// DELETE /api/v1/sessions/:id
///
/// Ends the session and returns its final snapshot for the caller to persist.
pub async fn handle_close_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state.sessions.close(id).await?;
    Ok(Json(SessionResponse::closed(session)))
}

/// PUT /api/v1/sessions/:id/theme
pub async fn handle_set_theme(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SetThemeRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let color = ThemeColor::parse(&request.theme_color)?;
    let response = state
        .sessions
        .with_session(id, |session| {
            let changed = session.theme_color() != &color;
            session.set_theme_color(color);
            SessionResponse::from_session(session, changed)
        })
        .await?;
    Ok(Json(response))
}

/// PUT /api/v1/sessions/:id/data
pub async fn handle_replace_data(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<ResumeData>,
) -> Result<Json<SessionResponse>, AppError> {
    let response = state
        .sessions
        .with_session(id, |session| {
            session.replace(data)?;
            info!("Replaced data of session {id} (revision {})", session.revision());
            Ok::<_, AppError>(SessionResponse::from_session(session, true))
        })
        .await??;
    Ok(Json(response))
}

/// GET /api/v1/sessions/:id/value?path=
pub async fn handle_get_value(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<PathQuery>,
) -> Result<Json<ValueResponse>, AppError> {
    let path = DataPath::parse(&query.path)?;
    let session = state.sessions.get(id).await?;
    let value = session.get_value(&path)?;
    Ok(Json(ValueResponse {
        path: path.to_string(),
        value,
    }))
}

/// PATCH /api/v1/sessions/:id/value
pub async fn handle_set_value(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SetValueRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let path = DataPath::parse(&request.path)?;
    let response = state
        .sessions
        .with_session(id, |session| {
            let changed = session.set_value_at_path(&path, request.value)?;
            Ok::<_, AppError>(SessionResponse::from_session(session, changed))
        })
        .await??;
    Ok(Json(response))
}

/// POST /api/v1/sessions/:id/arrays/add
pub async fn handle_add_array_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AddArrayItemRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let path = DataPath::parse(&request.path)?;
    let response = state
        .sessions
        .with_session(id, |session| {
            session.add_array_item(&path, request.item)?;
            Ok::<_, AppError>(SessionResponse::from_session(session, true))
        })
        .await??;
    Ok(Json(response))
}

/// POST /api/v1/sessions/:id/arrays/remove
pub async fn handle_remove_array_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<RemoveArrayItemRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let path = DataPath::parse(&request.path)?;
    let response = state
        .sessions
        .with_session(id, |session| {
            session.remove_array_item(&path, request.index)?;
            Ok::<_, AppError>(SessionResponse::from_session(session, true))
        })
        .await??;
    Ok(Json(response))
}

/// POST /api/v1/sessions/:id/bullets/add
pub async fn handle_add_bullet(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AddBulletRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let response = state
        .sessions
        .with_session(id, |session| {
            let changed = session.add_bullet_point(&request.entry_id);
            SessionResponse::from_session(session, changed)
        })
        .await?;
    Ok(Json(response))
}

/// POST /api/v1/sessions/:id/bullets/remove
pub async fn handle_remove_bullet(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<RemoveBulletRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let response = state
        .sessions
        .with_session(id, |session| {
            let changed = session.remove_bullet_point(&request.entry_id, request.index);
            SessionResponse::from_session(session, changed)
        })
        .await?;
    Ok(Json(response))
}
