//! Axum route handlers for widget render/commit requests.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::editing::error::EditError;
use crate::editing::handlers::SessionResponse;
use crate::editing::path::DataPath;
use crate::editing::session::EditSession;
use crate::errors::AppError;
use crate::state::AppState;
use crate::widgets::bullets::{BulletList, BulletListView};
use crate::widgets::date::{DateField, DateFormat, DateView};
use crate::widgets::list::{ListField, ListView};
use crate::widgets::section_items::{SectionItems, SectionItemsView};
use crate::widgets::skills::{SkillsField, SkillsView};
use crate::widgets::text::{TextField, TextView};
use crate::widgets::RenderMode;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(tag = "widget", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum RenderRequest {
    Text {
        path: String,
        #[serde(default)]
        multiline: bool,
        placeholder: Option<String>,
    },
    Date {
        path: String,
        #[serde(default)]
        format: DateFormat,
    },
    List {
        path: String,
    },
    Skills {
        path: Option<String>,
        #[serde(default)]
        show_rating: bool,
    },
    Bullets {
        entry_id: String,
    },
    SectionItems {
        section: usize,
    },
}

#[derive(Debug, Serialize)]
#[serde(tag = "widget", rename_all = "snake_case")]
pub enum WidgetView {
    Text(TextView),
    Date(DateView),
    List(ListView),
    Skills(SkillsView),
    Bullets(BulletListView),
    SectionItems(SectionItemsView),
}

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum CommitRequest {
    Text {
        path: String,
        text: String,
        #[serde(default)]
        multiline: bool,
    },
    Date {
        path: String,
        value: String,
    },
    ListAdd {
        path: String,
        #[serde(default)]
        default_item: Value,
    },
    ListRemove {
        path: String,
        index: usize,
    },
    SkillAdd {
        path: Option<String>,
    },
    SkillRemove {
        path: Option<String>,
        index: usize,
    },
    SkillRename {
        path: Option<String>,
        index: usize,
        name: String,
    },
    SkillRate {
        path: Option<String>,
        index: usize,
        rating: String,
    },
    BulletAdd {
        entry_id: String,
    },
    BulletRemove {
        entry_id: String,
        index: usize,
    },
    SectionItemAdd {
        section: usize,
    },
    SectionItemRemove {
        section: usize,
        index: usize,
    },
}

fn skills_field(path: Option<&str>, show_rating: bool) -> Result<SkillsField, EditError> {
    Ok(match path {
        Some(p) => SkillsField::new(DataPath::parse(p)?, show_rating),
        None => SkillsField {
            show_rating,
            ..SkillsField::default()
        },
    })
}

/// Applies one widget commit. Returns whether the snapshot changed.
pub fn apply_commit(session: &mut EditSession, request: CommitRequest) -> Result<bool, EditError> {
    match request {
        CommitRequest::Text {
            path,
            text,
            multiline,
        } => TextField::new(DataPath::parse(&path)?)
            .multiline(multiline)
            .commit(session, &text),
        CommitRequest::Date { path, value } => {
            DateField::new(DataPath::parse(&path)?, DateFormat::default()).commit(session, &value)
        }
        CommitRequest::ListAdd { path, default_item } => {
            let default_item = match default_item {
                Value::Null => Value::Object(Default::default()),
                item => item,
            };
            ListField::new(DataPath::parse(&path)?, default_item).add(session)?;
            Ok(true)
        }
        CommitRequest::ListRemove { path, index } => {
            ListField::new(DataPath::parse(&path)?, Value::Null).remove(session, index)?;
            Ok(true)
        }
        CommitRequest::SkillAdd { path } => {
            skills_field(path.as_deref(), false)?.add(session)?;
            Ok(true)
        }
        CommitRequest::SkillRemove { path, index } => {
            skills_field(path.as_deref(), false)?.remove(session, index)?;
            Ok(true)
        }
        CommitRequest::SkillRename { path, index, name } => {
            skills_field(path.as_deref(), false)?.rename(session, index, &name)
        }
        CommitRequest::SkillRate {
            path,
            index,
            rating,
        } => {
            skills_field(path.as_deref(), true)?.rate(session, index, &rating)
        }
        CommitRequest::BulletAdd { entry_id } => Ok(BulletList::new(entry_id).add(session)),
        CommitRequest::BulletRemove { entry_id, index } => {
            Ok(BulletList::new(entry_id).remove(session, index))
        }
        CommitRequest::SectionItemAdd { section } => {
            SectionItems::new(section).add(session)?;
            Ok(true)
        }
        CommitRequest::SectionItemRemove { section, index } => {
            SectionItems::new(section).remove(session, index)
        }
    }
}

fn render(session: &EditSession, request: RenderRequest) -> Result<WidgetView, AppError> {
    let data = session.data();
    let mode = RenderMode::from_flag(session.editable());
    Ok(match request {
        RenderRequest::Text {
            path,
            multiline,
            placeholder,
        } => WidgetView::Text(
            TextField::new(DataPath::parse(&path)?)
                .multiline(multiline)
                .placeholder(placeholder)
                .render(data, mode)?,
        ),
        RenderRequest::Date { path, format } => {
            WidgetView::Date(DateField::new(DataPath::parse(&path)?, format).render(data, mode)?)
        }
        RenderRequest::List { path } => WidgetView::List(
            ListField::new(DataPath::parse(&path)?, Value::Null).render(data, mode)?,
        ),
        RenderRequest::Skills { path, show_rating } => {
            WidgetView::Skills(skills_field(path.as_deref(), show_rating)?.render(data, mode)?)
        }
        RenderRequest::Bullets { entry_id } => {
            let view = BulletList::new(entry_id.clone())
                .render(data, mode)
                .ok_or_else(|| AppError::NotFound(format!("Entry {entry_id} not found")))?;
            WidgetView::Bullets(view)
        }
        RenderRequest::SectionItems { section } => {
            WidgetView::SectionItems(SectionItems::new(section).render(data, mode)?)
        }
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions/:id/widgets/render
pub async fn handle_render_widget(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<RenderRequest>,
) -> Result<Json<WidgetView>, AppError> {
    let session = state.sessions.get(id).await?;
    Ok(Json(render(&session, request)?))
}

/// POST /api/v1/sessions/:id/widgets/commit
///
/// Read-only sessions reject every commit.
pub async fn handle_commit_widget(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CommitRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let response = state
        .sessions
        .with_session(id, |session| {
            if !session.editable() {
                return Err(AppError::Validation(format!(
                    "Session {id} is read-only"
                )));
            }
            let changed = apply_commit(session, request)?;
            Ok(SessionResponse::from_session(session, changed))
        })
        .await??;
    Ok(Json(response))
}
