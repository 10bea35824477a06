use serde::Serialize;
use serde_json::{json, Value};

use crate::editing::applier;
use crate::editing::error::EditError;
use crate::editing::path::DataPath;
use crate::editing::session::EditSession;
use crate::models::resume::ResumeData;
use crate::widgets::{display_text, RenderMode};

const NEW_SKILL: &str = "New Skill";

/// The skills list, optionally with a proficiency rating next to each name.
/// Also accepts a plain array of strings.
#[derive(Debug, Clone)]
pub struct SkillsField {
    pub path: DataPath,
    pub show_rating: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SkillView {
    pub index: usize,
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SkillsView {
    pub path: String,
    pub skills: Vec<SkillView>,
    pub show_rating: bool,
    pub can_add: bool,
    pub editable: bool,
}

impl Default for SkillsField {
    fn default() -> Self {
        SkillsField {
            path: DataPath::root().field("skills"),
            show_rating: false,
        }
    }
}

impl SkillsField {
    pub fn new(path: DataPath, show_rating: bool) -> Self {
        SkillsField { path, show_rating }
    }

    fn entries(&self, data: &ResumeData) -> Result<Vec<Value>, EditError> {
        match applier::get(data, &self.path)? {
            Value::Array(entries) => Ok(entries),
            _ => Err(EditError::TypeMismatch {
                path: self.path.to_string(),
                reason: "skills widget bound to a non-array".to_string(),
            }),
        }
    }

    pub fn render(&self, data: &ResumeData, mode: RenderMode) -> Result<SkillsView, EditError> {
        let skills = self
            .entries(data)?
            .iter()
            .enumerate()
            .map(|(index, entry)| match entry {
                Value::Object(fields) => SkillView {
                    index,
                    id: fields
                        .get("id")
                        .and_then(Value::as_str)
                        .filter(|id| !id.is_empty())
                        .map_or_else(|| format!("skill-{index}"), str::to_string),
                    name: fields.get("name").map(display_text).unwrap_or_default(),
                    rating: if self.show_rating {
                        fields
                            .get("rating")
                            .map(display_text)
                            .filter(|r| !r.is_empty())
                    } else {
                        None
                    },
                },
                other => SkillView {
                    index,
                    id: format!("skill-{index}"),
                    name: display_text(other),
                    rating: None,
                },
            })
            .collect();

        Ok(SkillsView {
            path: self.path.to_string(),
            skills,
            show_rating: self.show_rating,
            can_add: mode.is_editable(),
            editable: mode.is_editable(),
        })
    }

    /// Renames a skill. Blank names are ignored.
    pub fn rename(
        &self,
        session: &mut EditSession,
        index: usize,
        name: &str,
    ) -> Result<bool, EditError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(false);
        }
        let item = self.path.clone().index(index);
        let target = match session.get_value(&item)? {
            Value::String(_) => item,
            _ => item.field("name"),
        };
        session.set_value_at_path(&target, Value::String(name.to_string()))
    }

    /// Sets the proficiency label; a blank rating clears it.
    pub fn rate(
        &self,
        session: &mut EditSession,
        index: usize,
        rating: &str,
    ) -> Result<bool, EditError> {
        let rating = rating.trim();
        let value = if rating.is_empty() {
            Value::Null
        } else {
            Value::String(rating.to_string())
        };
        session.set_value_at_path(&self.path.clone().index(index).field("rating"), value)
    }

    /// Appends a placeholder skill shaped like the list: a `{ name }` object,
    /// or a bare string when the list holds strings.
    pub fn add(&self, session: &mut EditSession) -> Result<usize, EditError> {
        let entries = self.entries(session.data())?;
        if entries.iter().any(Value::is_string) {
            return session.add_array_item(&self.path, json!(NEW_SKILL));
        }
        match session.add_array_item(&self.path, json!({ "name": NEW_SKILL })) {
            // An empty list gives no hint; it may still be a list of strings.
            Err(EditError::TypeMismatch { .. }) if entries.is_empty() => {
                session.add_array_item(&self.path, json!(NEW_SKILL))
            }
            result => result,
        }
    }

    pub fn remove(&self, session: &mut EditSession, index: usize) -> Result<(), EditError> {
        session.remove_array_item(&self.path, index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::theme::ThemeColor;

    fn session() -> EditSession {
        EditSession::new(
            serde_json::from_value(json!({
                "skills": [
                    { "id": "s1", "name": "Rust", "rating": "Expert" },
                    { "id": "s2", "name": "Go" }
                ],
                "projects": [{ "id": "p1", "techStack": ["Axum", "Tokio"] }]
            }))
            .unwrap(),
            ThemeColor::default(),
            true,
        )
    }

    #[test]
    fn test_render_with_and_without_rating() {
        let s = session();
        let rated = SkillsField::new(DataPath::parse("skills").unwrap(), true)
            .render(s.data(), RenderMode::Static)
            .unwrap();
        assert_eq!(rated.skills[0].rating.as_deref(), Some("Expert"));
        assert_eq!(rated.skills[1].rating, None);

        let plain = SkillsField::default()
            .render(s.data(), RenderMode::Editable)
            .unwrap();
        assert_eq!(plain.skills[0].name, "Rust");
        assert_eq!(plain.skills[0].rating, None);
        assert!(plain.can_add);
    }

    #[test]
    fn test_render_string_list() {
        let s = session();
        let view = SkillsField::new(DataPath::parse("projects[0].techStack").unwrap(), false)
            .render(s.data(), RenderMode::Static)
            .unwrap();
        let names: Vec<_> = view.skills.iter().map(|sk| sk.name.as_str()).collect();
        assert_eq!(names, vec!["Axum", "Tokio"]);
        assert_eq!(view.skills[1].id, "skill-1");
    }

    #[test]
    fn test_rename_trims_and_ignores_blank() {
        let mut s = session();
        let field = SkillsField::default();
        assert!(field.rename(&mut s, 1, "  Golang ").unwrap());
        assert_eq!(s.data().skills[1].name, "Golang");
        assert!(!field.rename(&mut s, 1, "   ").unwrap());
        assert_eq!(s.revision(), 1);
    }

    #[test]
    fn test_rename_in_string_list() {
        let mut s = session();
        let field = SkillsField::new(DataPath::parse("projects[0].techStack").unwrap(), false);
        field.rename(&mut s, 0, "Hyper").unwrap();
        assert_eq!(s.data().projects[0].tech_stack[0], "Hyper");
    }

    #[test]
    fn test_add_to_string_list_appends_a_string() {
        let mut s = session();
        let field = SkillsField::new(DataPath::parse("projects[0].techStack").unwrap(), false);
        assert_eq!(field.add(&mut s).unwrap(), 2);
        assert_eq!(*s.data().projects[0].tech_stack, vec!["Axum", "Tokio", "New Skill"]);

        let empty = SkillsField::new(DataPath::parse("projects[0].technologies").unwrap(), false);
        assert_eq!(empty.add(&mut s).unwrap(), 0);
        assert_eq!(*s.data().projects[0].technologies, vec!["New Skill"]);
        assert_eq!(s.revision(), 2);
    }

    #[test]
    fn test_rate_sets_and_clears() {
        let mut s = session();
        let field = SkillsField::new(DataPath::parse("skills").unwrap(), true);
        field.rate(&mut s, 1, "Intermediate").unwrap();
        assert_eq!(s.data().skills[1].rating.as_deref(), Some("Intermediate"));
        field.rate(&mut s, 1, "").unwrap();
        assert_eq!(s.data().skills[1].rating, None);
    }

    #[test]
    fn test_add_and_remove() {
        let mut s = session();
        let field = SkillsField::default();
        let index = field.add(&mut s).unwrap();
        assert_eq!(index, 2);
        assert_eq!(s.data().skills[2].name, "New Skill");
        assert!(!s.data().skills[2].id.is_empty());
        field.remove(&mut s, 0).unwrap();
        assert_eq!(s.data().skills[0].id, "s2");
    }
}
