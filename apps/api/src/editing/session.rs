//! One editor instance's state: the current resume snapshot and the
//! operations templates and widgets use to change it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::editing::applier;
use crate::editing::error::EditError;
use crate::editing::path::{DataPath, Step};
use crate::models::resume::{bullets_from_description, CustomSection, ResumeData};
use crate::models::theme::ThemeColor;

/// Owns the resume while it is being edited. Every successful mutation
/// replaces the snapshot wholesale and bumps `revision`; readers holding an
/// older `Arc` keep seeing a consistent tree.
#[derive(Debug, Clone)]
pub struct EditSession {
    id: Uuid,
    data: Arc<ResumeData>,
    revision: u64,
    theme_color: ThemeColor,
    editable: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl EditSession {
    pub fn new(initial: ResumeData, theme_color: ThemeColor, editable: bool) -> Self {
        let now = Utc::now();
        EditSession {
            id: Uuid::new_v4(),
            data: Arc::new(initial),
            revision: 0,
            theme_color,
            editable,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The current snapshot. Cheap: clones the `Arc`.
    pub fn snapshot(&self) -> Arc<ResumeData> {
        Arc::clone(&self.data)
    }

    pub fn data(&self) -> &ResumeData {
        &self.data
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn theme_color(&self) -> &ThemeColor {
        &self.theme_color
    }

    pub fn editable(&self) -> bool {
        self.editable
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn publish(&mut self, next: ResumeData) {
        self.data = Arc::new(next);
        self.revision += 1;
        self.updated_at = Utc::now();
    }

    pub fn get_value(&self, path: &DataPath) -> Result<Value, EditError> {
        applier::get(self.data.as_ref(), path)
    }

    /// Writes `value` at `path`. Returns `false`, publishing nothing, when the
    /// write leaves the snapshot equal to the current one.
    ///
    /// Entity ids are fixed once set: writing a different id, directly or as
    /// part of a whole entry, is `ImmutableId`. A whole entry written without
    /// an id keeps the one it had.
    pub fn set_value_at_path(&mut self, path: &DataPath, value: Value) -> Result<bool, EditError> {
        let value = self.keep_entity_id(path, value)?;
        let next = applier::set(self.data.as_ref(), path, value)?;
        if next == *self.data {
            return Ok(false);
        }
        ensure_unique_ids(&next)?;
        self.publish(next);
        Ok(true)
    }

    fn keep_entity_id(&self, path: &DataPath, mut value: Value) -> Result<Value, EditError> {
        // Unresolvable paths are reported by the applier.
        let Ok(current) = self.get_value(path) else {
            return Ok(value);
        };
        let targets_id = matches!(path.steps().last(), Some(Step::Field(name)) if name == "id");
        let current_id = match &current {
            Value::String(id) if targets_id => id.as_str(),
            Value::Object(fields) => fields.get("id").and_then(Value::as_str).unwrap_or_default(),
            _ => "",
        };
        if current_id.is_empty() {
            return Ok(value);
        }

        let immutable = || EditError::ImmutableId {
            path: path.to_string(),
            id: current_id.to_string(),
        };
        match &mut value {
            Value::String(id) if targets_id && id.as_str() != current_id => return Err(immutable()),
            Value::Object(fields) if !targets_id => {
                let supplied = fields.get("id").and_then(Value::as_str).unwrap_or_default().to_string();
                if supplied.is_empty() {
                    fields.insert("id".to_string(), Value::String(current_id.to_string()));
                } else if supplied != current_id {
                    return Err(immutable());
                }
            }
            _ => {}
        }
        Ok(value)
    }

    /// Appends `item` to the array at `array`. Objects without a non-empty
    /// `id` get a fresh one; an id already present in the array is rejected.
    /// Returns the index of the new element.
    pub fn add_array_item(&mut self, array: &DataPath, item: Value) -> Result<usize, EditError> {
        let item = self.with_unique_id(array, item)?;
        let (next, index) = applier::insert_at(self.data.as_ref(), array, None, item)?;
        self.publish(next);
        Ok(index)
    }

    pub fn remove_array_item(&mut self, array: &DataPath, index: usize) -> Result<(), EditError> {
        let (next, _) = applier::remove_at(self.data.as_ref(), array, index)?;
        self.publish(next);
        Ok(())
    }

    fn with_unique_id(&self, array: &DataPath, mut item: Value) -> Result<Value, EditError> {
        let Value::Object(fields) = &mut item else {
            return Ok(item);
        };

        let id = match fields.get("id").and_then(Value::as_str) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => {
                fields.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
                return Ok(item);
            }
        };

        let existing = self.get_value(array)?;
        let taken = existing.as_array().is_some_and(|entries| {
            entries
                .iter()
                .any(|entry| entry.get("id").and_then(Value::as_str) == Some(id.as_str()))
        });
        if taken {
            return Err(EditError::DuplicateId {
                path: array.to_string(),
                id,
            });
        }
        Ok(item)
    }

    /// Appends an empty bullet to the experience or project entry with
    /// `entry_id`. An entry with no bullets yet is first seeded from its
    /// description lines. Returns `false` when no entry has that id.
    pub fn add_bullet_point(&mut self, entry_id: &str) -> bool {
        let Some(target) = self.data.find_bulleted(entry_id) else {
            debug!("add_bullet_point: no entry with id {entry_id}");
            return false;
        };

        let mut next = ResumeData::clone(&self.data);
        let entry = next.bulleted_mut(target);
        let mut bullets = match entry.bullets() {
            Some(list) if !list.is_empty() => list.to_vec(),
            _ => bullets_from_description(entry.description()),
        };
        bullets.push(String::new());
        *entry.bullets_mut() = Some(Arc::new(bullets));

        self.publish(next);
        true
    }

    /// Removes one bullet from the entry with `entry_id`. The last remaining
    /// bullet is never removed. Returns `false` when nothing changed.
    pub fn remove_bullet_point(&mut self, entry_id: &str, bullet_index: usize) -> bool {
        let Some(target) = self.data.find_bulleted(entry_id) else {
            debug!("remove_bullet_point: no entry with id {entry_id}");
            return false;
        };

        let count = self
            .data
            .bulleted(target)
            .bullets()
            .map_or(0, |list| list.len());
        if count <= 1 || bullet_index >= count {
            debug!("remove_bullet_point: kept bullets of {entry_id} (count {count}, index {bullet_index})");
            return false;
        }

        let mut next = ResumeData::clone(&self.data);
        if let Some(list) = next.bulleted_mut(target).bullets_mut() {
            Arc::make_mut(list).remove(bullet_index);
        }
        self.publish(next);
        true
    }

    /// Appends an empty item to the custom section at `section`. A section
    /// without items yet is first seeded from its content lines, and the
    /// content is cleared. Returns the new item's index.
    pub fn add_section_item(&mut self, section: usize) -> Result<usize, EditError> {
        let mut items = self.section(section)?.effective_items();
        items.push(String::new());
        let index = items.len() - 1;
        self.write_section_items(section, items);
        Ok(index)
    }

    /// Removes one item from the custom section at `section`, which may leave
    /// it empty. Returns `false` when `item` is out of range.
    pub fn remove_section_item(&mut self, section: usize, item: usize) -> Result<bool, EditError> {
        let mut items = self.section(section)?.effective_items();
        if item >= items.len() {
            debug!("remove_section_item: section {section} has {} items, index {item}", items.len());
            return Ok(false);
        }
        items.remove(item);
        self.write_section_items(section, items);
        Ok(true)
    }

    fn section(&self, index: usize) -> Result<&CustomSection, EditError> {
        self.data
            .sections
            .get(index)
            .map(|section| &**section)
            .ok_or_else(|| EditError::PathNotFound {
                path: DataPath::root().field("sections").index(index).to_string(),
                step: format!("[{index}] (length {})", self.data.sections.len()),
            })
    }

    /// Items become the only source once written, so the content they were
    /// derived from is cleared with them.
    fn write_section_items(&mut self, index: usize, items: Vec<String>) {
        let mut next = ResumeData::clone(&self.data);
        let section = Arc::make_mut(&mut Arc::make_mut(&mut next.sections)[index]);
        section.items = Some(Arc::new(items));
        section.content.clear();
        self.publish(next);
    }

    /// Swaps in a whole new snapshot, e.g. after the page reloads data.
    pub fn replace(&mut self, data: ResumeData) -> Result<(), EditError> {
        ensure_unique_ids(&data)?;
        self.publish(data);
        Ok(())
    }

    pub fn set_theme_color(&mut self, color: ThemeColor) {
        self.theme_color = color;
        self.updated_at = Utc::now();
    }

    /// Ends the session, handing the final snapshot to the caller.
    pub fn into_data(self) -> Arc<ResumeData> {
        self.data
    }
}

/// Rejects a tree in which one entity array repeats an id.
pub fn ensure_unique_ids(data: &ResumeData) -> Result<(), EditError> {
    match data.duplicate_id() {
        Some((array, id)) => Err(EditError::DuplicateId {
            path: array.to_string(),
            id,
        }),
        None => Ok(()),
    }
}
