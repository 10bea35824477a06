use serde::Serialize;

use crate::editing::error::EditError;
use crate::editing::path::DataPath;
use crate::editing::session::EditSession;
use crate::models::resume::ResumeData;
use crate::widgets::RenderMode;

/// Line items of one custom section (certifications, awards, ...), addressed
/// by the section's position.
#[derive(Debug, Clone)]
pub struct SectionItems {
    pub section: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SectionItemView {
    pub index: usize,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub can_remove: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SectionItemsView {
    pub section: usize,
    pub items: Vec<SectionItemView>,
    /// True while the items shown are the lines of the section's content.
    pub from_content: bool,
    pub can_add: bool,
    pub editable: bool,
}

impl SectionItems {
    pub fn new(section: usize) -> Self {
        SectionItems { section }
    }

    fn items_path(&self) -> DataPath {
        DataPath::root()
            .field("sections")
            .index(self.section)
            .field("items")
    }

    pub fn render(&self, data: &ResumeData, mode: RenderMode) -> Result<SectionItemsView, EditError> {
        let section = data.sections.get(self.section).ok_or_else(|| EditError::PathNotFound {
            path: DataPath::root().field("sections").index(self.section).to_string(),
            step: format!("[{}] (length {})", self.section, data.sections.len()),
        })?;
        let editable = mode.is_editable();
        let structured = section.items.as_ref().is_some_and(|items| !items.is_empty());
        let base = self.items_path();

        let items = section
            .effective_items()
            .into_iter()
            .enumerate()
            .map(|(index, text)| SectionItemView {
                index,
                text,
                path: structured.then(|| base.clone().index(index).to_string()),
                can_remove: editable,
            })
            .collect();

        Ok(SectionItemsView {
            section: self.section,
            items,
            from_content: !structured,
            can_add: editable,
            editable,
        })
    }

    pub fn add(&self, session: &mut EditSession) -> Result<usize, EditError> {
        session.add_section_item(self.section)
    }

    pub fn remove(&self, session: &mut EditSession, index: usize) -> Result<bool, EditError> {
        session.remove_section_item(self.section, index)
    }
}
