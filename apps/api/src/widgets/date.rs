//! Month-precision dates. Stored as `YYYY-MM`; formatting is display-only.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::editing::applier;
use crate::editing::error::EditError;
use crate::editing::path::DataPath;
use crate::editing::session::EditSession;
use crate::models::resume::ResumeData;
use crate::widgets::{display_text, RenderMode};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateFormat {
    /// `Jan 2024`
    #[default]
    Short,
    /// `January 2024`
    Long,
    /// `2024`
    Year,
}

/// Parses `YYYY-MM` or `YYYY-MM-DD` to the first day of that month.
pub fn parse_month(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let parsed = match value.len() {
        7 => NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d").ok(),
        10 => NaiveDate::parse_from_str(value, "%Y-%m-%d").ok(),
        _ => None,
    }?;
    parsed.with_day(1)
}

/// Canonical stored form of a user-entered date. Empty input clears the date.
pub fn normalize(value: &str) -> Result<String, EditError> {
    if value.trim().is_empty() {
        return Ok(String::new());
    }
    parse_month(value)
        .map(|date| date.format("%Y-%m").to_string())
        .ok_or_else(|| EditError::InvalidDate {
            value: value.to_string(),
        })
}

/// Display text for a stored date. Values that do not parse are shown as-is.
pub fn format_display(value: &str, format: DateFormat) -> String {
    match parse_month(value) {
        Some(date) => match format {
            DateFormat::Short => date.format("%b %Y").to_string(),
            DateFormat::Long => date.format("%B %Y").to_string(),
            DateFormat::Year => date.format("%Y").to_string(),
        },
        None => value.trim().to_string(),
    }
}

/// `Jan 2020 - Present`, `Jan 2020 - Mar 2022`, or whichever side is set.
pub fn format_range(start: &str, end: &str, current: bool, format: DateFormat) -> String {
    let start = format_display(start, format);
    let end = if current {
        "Present".to_string()
    } else {
        format_display(end, format)
    };
    match (start.is_empty(), end.is_empty()) {
        (false, false) => format!("{start} - {end}"),
        (false, true) => start,
        (true, _) => end,
    }
}

#[derive(Debug, Clone)]
pub struct DateField {
    pub path: DataPath,
    pub format: DateFormat,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DateView {
    pub path: String,
    /// Stored form, e.g. `2024-01`.
    pub value: String,
    pub display: String,
    pub editable: bool,
}

impl DateField {
    pub fn new(path: DataPath, format: DateFormat) -> Self {
        DateField { path, format }
    }

    pub fn render(&self, data: &ResumeData, mode: RenderMode) -> Result<DateView, EditError> {
        let value = display_text(&applier::get(data, &self.path)?);
        Ok(DateView {
            path: self.path.to_string(),
            display: format_display(&value, self.format),
            value,
            editable: mode.is_editable(),
        })
    }

    /// Stores the picked date as `YYYY-MM`.
    pub fn commit(&self, session: &mut EditSession, raw: &str) -> Result<bool, EditError> {
        let canonical = normalize(raw)?;
        let current = display_text(&session.get_value(&self.path)?);
        if current == canonical {
            return Ok(false);
        }
        session.set_value_at_path(&self.path, Value::String(canonical))
    }
}
