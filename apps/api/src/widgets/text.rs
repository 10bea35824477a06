use serde::Serialize;
use serde_json::Value;

use crate::editing::applier;
use crate::editing::error::EditError;
use crate::editing::path::DataPath;
use crate::editing::session::EditSession;
use crate::models::resume::ResumeData;
use crate::widgets::{display_text, RenderMode};

/// Click-to-edit text bound to one string field.
#[derive(Debug, Clone)]
pub struct TextField {
    pub path: DataPath,
    pub multiline: bool,
    pub placeholder: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TextView {
    pub path: String,
    pub value: String,
    /// Static multiline text split for bullet-style display.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub lines: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    pub multiline: bool,
    pub editable: bool,
}

impl TextField {
    pub fn new(path: DataPath) -> Self {
        TextField {
            path,
            multiline: false,
            placeholder: None,
        }
    }

    pub fn multiline(mut self, multiline: bool) -> Self {
        self.multiline = multiline;
        self
    }

    pub fn placeholder(mut self, placeholder: Option<String>) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn render(&self, data: &ResumeData, mode: RenderMode) -> Result<TextView, EditError> {
        let value = display_text(&applier::get(data, &self.path)?);

        let lines = if self.multiline && !mode.is_editable() {
            value
                .split('\n')
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect()
        } else {
            Vec::new()
        };

        let placeholder = match mode {
            RenderMode::Editable if value.is_empty() => self.placeholder.clone(),
            _ => None,
        };

        Ok(TextView {
            path: self.path.to_string(),
            value,
            lines,
            placeholder,
            multiline: self.multiline,
            editable: mode.is_editable(),
        })
    }

    /// Writes `text` on blur/confirm. Unchanged text publishes nothing.
    /// Single-line fields drop any newlines the input carried.
    pub fn commit(&self, session: &mut EditSession, text: &str) -> Result<bool, EditError> {
        let text = if self.multiline {
            text.to_string()
        } else {
            text.replace(['\r', '\n'], " ")
        };

        let current = display_text(&session.get_value(&self.path)?);
        if current == text {
            return Ok(false);
        }
        session.set_value_at_path(&self.path, Value::String(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::theme::ThemeColor;
    use serde_json::json;

    fn data() -> ResumeData {
        serde_json::from_value(json!({
            "personalInfo": { "fullName": "", "summary": "Builds things.\n\nShips them." },
            "skills": [{ "id": "s1", "name": "Rust" }]
        }))
        .unwrap()
    }

    fn field(path: &str) -> TextField {
        TextField::new(DataPath::parse(path).unwrap())
    }

    #[test]
    fn test_static_multiline_splits_lines() {
        let view = field("personalInfo.summary")
            .multiline(true)
            .render(&data(), RenderMode::Static)
            .unwrap();
        assert_eq!(view.lines, vec!["Builds things.", "Ships them."]);
        assert!(!view.editable);

        let editable = field("personalInfo.summary")
            .multiline(true)
            .render(&data(), RenderMode::Editable)
            .unwrap();
        assert!(editable.lines.is_empty());
        assert_eq!(editable.value, "Builds things.\n\nShips them.");
    }

    #[test]
    fn test_placeholder_only_when_editable_and_empty() {
        let f = field("personalInfo.fullName").placeholder(Some("Your Name".to_string()));
        let editable = f.render(&data(), RenderMode::Editable).unwrap();
        assert_eq!(editable.placeholder.as_deref(), Some("Your Name"));
        let fixed = f.render(&data(), RenderMode::Static).unwrap();
        assert_eq!(fixed.placeholder, None);
    }

    #[test]
    fn test_unset_optional_renders_empty() {
        let view = field("skills[0].rating")
            .render(&data(), RenderMode::Static)
            .unwrap();
        assert_eq!(view.value, "");
    }

    #[test]
    fn test_commit_writes_and_skips_unchanged() {
        let mut session = EditSession::new(data(), ThemeColor::default(), true);
        let f = field("personalInfo.fullName");
        assert!(f.commit(&mut session, "Jane Doe").unwrap());
        assert!(!f.commit(&mut session, "Jane Doe").unwrap());
        assert_eq!(session.data().personal_info.full_name, "Jane Doe");
        assert_eq!(session.revision(), 1);
    }

    #[test]
    fn test_single_line_commit_flattens_newlines() {
        let mut session = EditSession::new(data(), ThemeColor::default(), true);
        field("personalInfo.fullName")
            .commit(&mut session, "Jane\nDoe")
            .unwrap();
        assert_eq!(session.data().personal_info.full_name, "Jane Doe");
    }

    #[test]
    fn test_commit_to_bad_path_fails() {
        let mut session = EditSession::new(data(), ThemeColor::default(), true);
        let err = field("experience[0].company")
            .commit(&mut session, "Acme")
            .unwrap_err();
        assert!(matches!(err, EditError::PathNotFound { .. }));
    }
}
