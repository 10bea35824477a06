//! Inline-edit widgets as view models.
//!
//! A widget is bound to a path. `render` turns the current snapshot into what
//! the page shows (and, in editable mode, which edit affordances exist);
//! commit methods forward user edits to the [`EditSession`].
//!
//! [`EditSession`]: crate::editing::session::EditSession

pub mod bullets;
pub mod date;
pub mod handlers;
pub mod list;
pub mod section_items;
pub mod skills;
pub mod text;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Threaded from the page into every template and widget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    Editable,
    #[default]
    Static,
}

impl RenderMode {
    pub fn from_flag(editable: bool) -> Self {
        if editable {
            RenderMode::Editable
        } else {
            RenderMode::Static
        }
    }

    pub fn is_editable(self) -> bool {
        self == RenderMode::Editable
    }
}

/// Scalar value as display text. Unset values show as empty.
pub(crate) fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
