//! Data paths: the `experience[2].bulletPoints[0]` micro-grammar used by
//! inline-edit bindings.
//!
//! Array indices are accepted in both bracket (`sections[1]`) and dot
//! (`sections.1`) form and parse to the same [`DataPath`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::editing::error::EditError;

/// Prefix some markup passes along with the path. Stripped before parsing.
const ROOT_PREFIX: &str = "resumeData.";

/// One step of an access plan.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Step {
    Field(String),
    Index(usize),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Field(name) => f.write_str(name),
            Step::Index(i) => write!(f, "[{i}]"),
        }
    }
}

/// A parsed location in the resume tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DataPath {
    steps: Vec<Step>,
}

impl DataPath {
    /// The empty path, addressing the whole tree. Start point for the builder.
    pub fn root() -> Self {
        DataPath::default()
    }

    pub fn parse(input: &str) -> Result<Self, EditError> {
        let trimmed = input.trim();
        let body = trimmed.strip_prefix(ROOT_PREFIX).unwrap_or(trimmed);
        if body.is_empty() {
            return Err(invalid(input, "path is empty".to_string()));
        }

        let mut steps = Vec::new();
        for segment in body.split('.') {
            parse_segment(segment, &mut steps).map_err(|reason| invalid(input, reason))?;
        }
        Ok(DataPath { steps })
    }

    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.steps.push(Step::Field(name.into()));
        self
    }

    pub fn index(mut self, index: usize) -> Self {
        self.steps.push(Step::Index(index));
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

fn invalid(path: &str, reason: String) -> EditError {
    EditError::InvalidPath {
        path: path.to_string(),
        reason,
    }
}

/// Parses `name`, `name[1][2]` or a bare `3` into steps.
fn parse_segment(segment: &str, steps: &mut Vec<Step>) -> Result<(), String> {
    if segment.is_empty() {
        return Err("empty segment".to_string());
    }

    let (head, mut rest) = match segment.find('[') {
        Some(pos) => segment.split_at(pos),
        None => (segment, ""),
    };

    if head.is_empty() {
        return Err(format!("segment '{segment}' has no field name"));
    } else if head.bytes().all(|b| b.is_ascii_digit()) {
        steps.push(Step::Index(parse_index(head)?));
    } else if is_identifier(head) {
        steps.push(Step::Field(head.to_string()));
    } else {
        return Err(format!("'{head}' is not a field name"));
    }

    while !rest.is_empty() {
        if !rest.starts_with('[') {
            return Err(format!("unexpected '{rest}' after index in '{segment}'"));
        }
        let close = rest
            .find(']')
            .ok_or_else(|| format!("unterminated bracket in '{segment}'"))?;
        steps.push(Step::Index(parse_index(&rest[1..close])?));
        rest = &rest[close + 1..];
    }
    Ok(())
}

fn parse_index(raw: &str) -> Result<usize, String> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("'{raw}' is not a non-negative integer index"));
    }
    raw.parse::<usize>()
        .map_err(|e| format!("index '{raw}' is out of range: {e}"))
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

impl FromStr for DataPath {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DataPath::parse(s)
    }
}

impl TryFrom<String> for DataPath {
    type Error = EditError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        DataPath::parse(&value)
    }
}

impl From<DataPath> for String {
    fn from(path: DataPath) -> Self {
        path.to_string()
    }
}

/// Canonical form: dots between fields, brackets for indices.
impl fmt::Display for DataPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 && matches!(step, Step::Field(_)) {
                f.write_str(".")?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str) -> Step {
        Step::Field(name.to_string())
    }

    #[test]
    fn test_bracket_and_dot_indices_are_equivalent() {
        let bracket = DataPath::parse("sections[0].title").unwrap();
        let dotted = DataPath::parse("sections.0.title").unwrap();
        assert_eq!(bracket, dotted);
        assert_eq!(
            bracket.steps(),
            &[field("sections"), Step::Index(0), field("title")]
        );
    }

    #[test]
    fn test_nested_indices() {
        let path = DataPath::parse("experience[3].bulletPoints[1]").unwrap();
        assert_eq!(
            path.steps(),
            &[
                field("experience"),
                Step::Index(3),
                field("bulletPoints"),
                Step::Index(1)
            ]
        );
        let chained = DataPath::parse("grid[1][2]").unwrap();
        assert_eq!(chained.steps(), &[field("grid"), Step::Index(1), Step::Index(2)]);
    }

    #[test]
    fn test_root_prefix_is_stripped() {
        assert_eq!(
            DataPath::parse("resumeData.personalInfo.summary").unwrap(),
            DataPath::parse("personalInfo.summary").unwrap()
        );
    }

    #[test]
    fn test_display_is_canonical() {
        let path = DataPath::parse("sections.1.items.0").unwrap();
        assert_eq!(path.to_string(), "sections[1].items[0]");
        let built = DataPath::root().field("experience").index(2).field("company");
        assert_eq!(built.to_string(), "experience[2].company");
        assert_eq!(built, "experience.2.company".parse().unwrap());
    }

    #[test]
    fn test_malformed_paths_are_rejected() {
        for bad in [
            "",
            "   ",
            "experience[",
            "experience[]",
            "experience[-1]",
            "experience[x].company",
            "experience..company",
            "experience.",
            ".experience",
            "experience[0]company",
            "2abc",
            "[0]",
            "full-name",
        ] {
            let err = DataPath::parse(bad).unwrap_err();
            assert!(
                matches!(err, EditError::InvalidPath { .. }),
                "expected InvalidPath for {bad:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn test_builder_matches_parser() {
        let built = DataPath::root().field("experience").index(2).field("company");
        assert_eq!(built, DataPath::parse("experience[2].company").unwrap());
        assert_eq!(built.steps().last(), Some(&field("company")));
    }

    #[test]
    fn test_serde_uses_string_form() {
        let path: DataPath = serde_json::from_str("\"skills.3.name\"").unwrap();
        assert_eq!(serde_json::to_string(&path).unwrap(), "\"skills[3].name\"");
        assert!(serde_json::from_str::<DataPath>("\"skills[\"").is_err());
    }
}
