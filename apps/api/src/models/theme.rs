use std::fmt;

use serde::{Deserialize, Serialize};

use crate::editing::error::EditError;

/// Accent color passed into every template, always `#rrggbb` in lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ThemeColor(String);

impl ThemeColor {
    pub fn parse(value: &str) -> Result<Self, EditError> {
        let trimmed = value.trim();
        let valid = trimmed.len() == 7
            && trimmed.starts_with('#')
            && trimmed[1..].chars().all(|c| c.is_ascii_hexdigit());
        if !valid {
            return Err(EditError::InvalidThemeColor {
                value: value.to_string(),
            });
        }
        Ok(ThemeColor(trimmed.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ThemeColor {
    fn default() -> Self {
        ThemeColor("#2563eb".to_string())
    }
}

impl fmt::Display for ThemeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ThemeColor {
    type Error = EditError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ThemeColor::parse(&value)
    }
}

impl From<ThemeColor> for String {
    fn from(color: ThemeColor) -> Self {
        color.0
    }
}
