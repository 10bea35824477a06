use serde::Serialize;
use serde_json::Value;

use crate::editing::applier;
use crate::editing::error::EditError;
use crate::editing::path::DataPath;
use crate::editing::session::EditSession;
use crate::models::resume::ResumeData;
use crate::widgets::RenderMode;

/// An array section with add/remove affordances in editable mode.
#[derive(Debug, Clone)]
pub struct ListField {
    pub path: DataPath,
    /// Template for new items. Leave `id` out: each add gets a fresh one.
    pub default_item: Value,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListItemView {
    pub index: usize,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub value: Value,
    pub can_remove: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListView {
    pub path: String,
    pub items: Vec<ListItemView>,
    pub can_add: bool,
    pub editable: bool,
}

impl ListField {
    pub fn new(path: DataPath, default_item: Value) -> Self {
        ListField { path, default_item }
    }

    pub fn render(&self, data: &ResumeData, mode: RenderMode) -> Result<ListView, EditError> {
        let value = applier::get(data, &self.path)?;
        let Value::Array(entries) = value else {
            return Err(EditError::TypeMismatch {
                path: self.path.to_string(),
                reason: "list widget bound to a non-array".to_string(),
            });
        };

        let editable = mode.is_editable();
        let items = entries
            .into_iter()
            .enumerate()
            .map(|(index, value)| ListItemView {
                index,
                path: self.path.clone().index(index).to_string(),
                id: value.get("id").and_then(Value::as_str).map(str::to_string),
                value,
                can_remove: editable,
            })
            .collect();

        Ok(ListView {
            path: self.path.to_string(),
            items,
            can_add: editable,
            editable,
        })
    }

    pub fn add(&self, session: &mut EditSession) -> Result<usize, EditError> {
        session.add_array_item(&self.path, self.default_item.clone())
    }

    pub fn remove(&self, session: &mut EditSession, index: usize) -> Result<(), EditError> {
        session.remove_array_item(&self.path, index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::theme::ThemeColor;
    use serde_json::json;

    fn experience_list() -> ListField {
        ListField::new(
            DataPath::parse("experience").unwrap(),
            json!({ "company": "", "position": "", "startDate": "", "endDate": "" }),
        )
    }

    #[test]
    fn test_render_lists_items_with_paths() {
        let data = ResumeData::sample();
        let view = experience_list().render(&data, RenderMode::Editable).unwrap();
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].path, "experience[0]");
        assert_eq!(view.items[0].id.as_deref(), Some("1"));
        assert_eq!(view.items[0].value["company"], "Tech Company");
        assert!(view.can_add && view.items[0].can_remove);

        let fixed = experience_list().render(&data, RenderMode::Static).unwrap();
        assert!(!fixed.can_add && !fixed.items[0].can_remove);
    }

    #[test]
    fn test_render_rejects_non_array() {
        let field = ListField::new(DataPath::parse("personalInfo").unwrap(), json!({}));
        let err = field
            .render(&ResumeData::default(), RenderMode::Static)
            .unwrap_err();
        assert!(matches!(err, EditError::TypeMismatch { .. }));
    }

    #[test]
    fn test_add_twice_then_remove() {
        let mut session = EditSession::new(ResumeData::default(), ThemeColor::default(), true);
        let list = experience_list();
        assert_eq!(list.add(&mut session).unwrap(), 0);
        assert_eq!(list.add(&mut session).unwrap(), 1);
        let experience = &session.data().experience;
        assert_ne!(experience[0].id, experience[1].id);

        list.remove(&mut session, 0).unwrap();
        assert_eq!(session.data().experience.len(), 1);
    }
}
