use serde::Serialize;

use crate::editing::session::EditSession;
use crate::models::resume::ResumeData;
use crate::widgets::RenderMode;

/// Achievement bullets of one experience or project entry, addressed by id.
#[derive(Debug, Clone)]
pub struct BulletList {
    pub entry_id: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BulletView {
    pub index: usize,
    pub text: String,
    /// Path for a text widget editing this bullet; absent while the bullets
    /// are still derived from the description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub can_remove: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BulletListView {
    pub entry_id: String,
    pub bullets: Vec<BulletView>,
    /// True when the bullets shown come from splitting the description.
    pub from_description: bool,
    pub can_add: bool,
    pub editable: bool,
}

impl BulletList {
    pub fn new(entry_id: impl Into<String>) -> Self {
        BulletList {
            entry_id: entry_id.into(),
        }
    }

    /// `None` when no entry carries this id.
    pub fn render(&self, data: &ResumeData, mode: RenderMode) -> Option<BulletListView> {
        let target = data.find_bulleted(&self.entry_id)?;
        let entry = data.bulleted(target);
        let editable = mode.is_editable();

        let structured = entry.bullets().is_some_and(|list| !list.is_empty());
        let texts = entry.effective_bullets();
        // The UI never offers to remove the only remaining bullet.
        let removable = editable && structured && texts.len() > 1;
        let base = target.bullets_path();

        let bullets = texts
            .into_iter()
            .enumerate()
            .map(|(index, text)| BulletView {
                index,
                text,
                path: structured.then(|| base.clone().index(index).to_string()),
                can_remove: removable,
            })
            .collect();

        Some(BulletListView {
            entry_id: self.entry_id.clone(),
            bullets,
            from_description: !structured,
            can_add: editable,
            editable,
        })
    }

    pub fn add(&self, session: &mut EditSession) -> bool {
        session.add_bullet_point(&self.entry_id)
    }

    pub fn remove(&self, session: &mut EditSession, index: usize) -> bool {
        session.remove_bullet_point(&self.entry_id, index)
    }
}
