//! Path-addressable nodes.
//!
//! Every type that can appear in the resume tree implements [`PathNode`].
//! Writes happen on a cloned root: `Arc` nodes go through `Arc::make_mut`, so
//! only the containers along the written path are copied and every sibling
//! stays shared with the previous snapshot.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::editing::error::EditError;
use crate::editing::path::{DataPath, Step};
use crate::models::resume::{
    CustomSection, Education, Experience, PersonalInfo, Project, ResumeData, Skill,
};

/// Why a walk stopped, before the full path is known.
#[derive(Debug, Clone, PartialEq)]
pub enum Miss {
    /// No field or element at this step.
    Absent { step: String },
    /// An optional container that was never initialised.
    Unset,
    /// Index past the end of an array.
    OutOfBounds { index: usize, len: usize },
    /// The node exists but the value or operation does not fit its type.
    Shape { reason: String },
}

impl Miss {
    fn absent(step: &Step) -> Self {
        Miss::Absent {
            step: step.to_string(),
        }
    }

    fn shape(reason: impl Into<String>) -> Self {
        Miss::Shape {
            reason: reason.into(),
        }
    }

    /// Attaches the full path the caller asked for.
    pub fn at(self, path: &DataPath) -> EditError {
        let path_str = path.to_string();
        match self {
            Miss::Absent { step } => EditError::PathNotFound {
                path: path_str,
                step,
            },
            Miss::Unset => EditError::PathNotFound {
                path: path_str,
                step: "unset optional field".to_string(),
            },
            Miss::OutOfBounds { index, len } => EditError::PathNotFound {
                path: path_str,
                step: format!("[{index}] (length {len})"),
            },
            Miss::Shape { reason } => EditError::TypeMismatch {
                path: path_str,
                reason,
            },
        }
    }
}

fn encode<T: Serialize + ?Sized>(node: &T) -> Result<Value, Miss> {
    serde_json::to_value(node).map_err(|e| Miss::shape(e.to_string()))
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, Miss> {
    serde_json::from_value(value).map_err(|e| Miss::shape(format!("value does not fit: {e}")))
}

/// A node of the resume tree. The defaults describe a leaf: it can be read
/// and replaced whole, but has no children.
pub trait PathNode: Serialize + DeserializeOwned {
    fn read(&self, steps: &[Step]) -> Result<Value, Miss> {
        match steps.first() {
            None => encode(self),
            Some(step) => Err(Miss::absent(step)),
        }
    }

    fn write(&mut self, steps: &[Step], value: Value) -> Result<(), Miss> {
        match steps.first() {
            None => {
                *self = decode(value)?;
                Ok(())
            }
            Some(step) => Err(Miss::absent(step)),
        }
    }

    fn list_mut(&mut self, steps: &[Step]) -> Result<&mut dyn ListNode, Miss> {
        match steps.first() {
            None => Err(Miss::shape("target is not an array")),
            Some(step) => Err(Miss::absent(step)),
        }
    }
}

/// Array operations reachable through a `&mut dyn` handle.
pub trait ListNode {
    fn len(&self) -> usize;

    fn insert_value(&mut self, index: usize, item: Value) -> Result<(), Miss>;

    fn remove_value(&mut self, index: usize) -> Result<Value, Miss>;
}

impl PathNode for String {}
impl PathNode for bool {}
impl PathNode for u32 {}

impl<T: PathNode> PathNode for Option<T> {
    fn read(&self, steps: &[Step]) -> Result<Value, Miss> {
        match (self, steps.first()) {
            (Some(inner), _) => inner.read(steps),
            (None, None) => Ok(Value::Null),
            (None, Some(_)) => Err(Miss::Unset),
        }
    }

    fn write(&mut self, steps: &[Step], value: Value) -> Result<(), Miss> {
        if steps.is_empty() {
            *self = decode(value)?;
            return Ok(());
        }
        match self {
            Some(inner) => inner.write(steps, value),
            None => Err(Miss::Unset),
        }
    }

    fn list_mut(&mut self, steps: &[Step]) -> Result<&mut dyn ListNode, Miss> {
        match self {
            Some(inner) => inner.list_mut(steps),
            None => Err(Miss::Unset),
        }
    }
}

impl<T: PathNode + Clone> PathNode for Arc<T> {
    fn read(&self, steps: &[Step]) -> Result<Value, Miss> {
        self.as_ref().read(steps)
    }

    fn write(&mut self, steps: &[Step], value: Value) -> Result<(), Miss> {
        if steps.is_empty() {
            *self = Arc::new(decode(value)?);
            return Ok(());
        }
        Arc::make_mut(self).write(steps, value)
    }

    fn list_mut(&mut self, steps: &[Step]) -> Result<&mut dyn ListNode, Miss> {
        Arc::make_mut(self).list_mut(steps)
    }
}

impl<T: PathNode> PathNode for Vec<T> {
    fn read(&self, steps: &[Step]) -> Result<Value, Miss> {
        match steps.split_first() {
            None => encode(self),
            Some((Step::Index(i), rest)) => self
                .get(*i)
                .ok_or(Miss::OutOfBounds {
                    index: *i,
                    len: self.len(),
                })?
                .read(rest),
            Some((step, _)) => Err(Miss::absent(step)),
        }
    }

    fn write(&mut self, steps: &[Step], value: Value) -> Result<(), Miss> {
        match steps.split_first() {
            None => {
                *self = decode(value)?;
                Ok(())
            }
            Some((Step::Index(i), rest)) => {
                let len = self.len();
                self.get_mut(*i)
                    .ok_or(Miss::OutOfBounds { index: *i, len })?
                    .write(rest, value)
            }
            Some((step, _)) => Err(Miss::absent(step)),
        }
    }

    fn list_mut(&mut self, steps: &[Step]) -> Result<&mut dyn ListNode, Miss> {
        match steps.split_first() {
            None => Ok(self),
            Some((Step::Index(i), rest)) => {
                let len = self.len();
                self.get_mut(*i)
                    .ok_or(Miss::OutOfBounds { index: *i, len })?
                    .list_mut(rest)
            }
            Some((step, _)) => Err(Miss::absent(step)),
        }
    }
}

impl<T: PathNode> ListNode for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn insert_value(&mut self, index: usize, item: Value) -> Result<(), Miss> {
        if index > Vec::len(self) {
            return Err(Miss::OutOfBounds {
                index,
                len: Vec::len(self),
            });
        }
        self.insert(index, decode(item)?);
        Ok(())
    }

    fn remove_value(&mut self, index: usize) -> Result<Value, Miss> {
        if index >= Vec::len(self) {
            return Err(Miss::OutOfBounds {
                index,
                len: Vec::len(self),
            });
        }
        encode(&self.remove(index))
    }
}

/// Implements [`PathNode`] for a record by mapping path keys to its fields.
/// A field may answer to several keys (`"highlights" | "bulletPoints"`).
macro_rules! path_node_record {
    ($ty:ty { $($field:ident => $($key:literal)|+),* $(,)? }) => {
        impl PathNode for $ty {
            fn read(&self, steps: &[Step]) -> Result<Value, Miss> {
                match steps.split_first() {
                    None => encode(self),
                    Some((Step::Field(name), rest)) => match name.as_str() {
                        $($($key)|+ => self.$field.read(rest),)*
                        _ => Err(Miss::absent(&steps[0])),
                    },
                    Some((step, _)) => Err(Miss::absent(step)),
                }
            }

            fn write(&mut self, steps: &[Step], value: Value) -> Result<(), Miss> {
                match steps.split_first() {
                    None => {
                        *self = decode(value)?;
                        Ok(())
                    }
                    Some((Step::Field(name), rest)) => match name.as_str() {
                        $($($key)|+ => self.$field.write(rest, value),)*
                        _ => Err(Miss::absent(&steps[0])),
                    },
                    Some((step, _)) => Err(Miss::absent(step)),
                }
            }

            fn list_mut(&mut self, steps: &[Step]) -> Result<&mut dyn ListNode, Miss> {
                match steps.split_first() {
                    None => Err(Miss::shape("target is not an array")),
                    Some((Step::Field(name), rest)) => match name.as_str() {
                        $($($key)|+ => self.$field.list_mut(rest),)*
                        _ => Err(Miss::absent(&steps[0])),
                    },
                    Some((step, _)) => Err(Miss::absent(step)),
                }
            }
        }
    };
}

path_node_record!(ResumeData {
    personal_info => "personalInfo",
    include_social_links => "includeSocialLinks",
    experience => "experience",
    education => "education",
    skills => "skills",
    sections => "sections",
    projects => "projects",
});

path_node_record!(PersonalInfo {
    full_name => "fullName",
    title => "title",
    email => "email",
    phone => "phone",
    location => "location",
    summary => "summary",
    photo => "photo",
    linkedin => "linkedin",
    github => "github",
    portfolio => "portfolio",
});

path_node_record!(Experience {
    id => "id",
    company => "company",
    position => "position",
    location => "location",
    start_date => "startDate",
    end_date => "endDate",
    current => "current",
    description => "description",
    bullet_points => "bulletPoints",
});

path_node_record!(Education {
    id => "id",
    school => "school",
    degree => "degree",
    field => "field",
    location => "location",
    start_date => "startDate",
    end_date => "endDate",
    gpa => "gpa",
});

path_node_record!(Skill {
    id => "id",
    name => "name",
    rating => "rating",
    level => "level",
    category => "category",
});

path_node_record!(CustomSection {
    id => "id",
    title => "title",
    content => "content",
    items => "items",
});

path_node_record!(Project {
    id => "id",
    name => "name",
    role => "role",
    description => "description",
    technologies => "technologies",
    tech_stack => "techStack",
    highlights => "highlights" | "bulletPoints",
    url => "url",
    github_url => "githubUrl",
    start_date => "startDate",
    end_date => "endDate",
    current => "current",
});
