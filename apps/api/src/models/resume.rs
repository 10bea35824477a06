use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::editing::path::DataPath;

/// An ordered array of entities. Each entity sits behind its own `Arc` so that
/// copying the array copies pointers, never entries.
pub type EntryList<T> = Arc<Vec<Arc<T>>>;

/// An ordered array of plain strings (bullets, items, technologies).
pub type StringList = Arc<Vec<String>>;

/// The whole resume as rendered by every template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeData {
    pub personal_info: Arc<PersonalInfo>,
    pub include_social_links: bool,
    pub experience: EntryList<Experience>,
    pub education: EntryList<Education>,
    pub skills: EntryList<Skill>,
    pub sections: EntryList<CustomSection>,
    pub projects: EntryList<Project>,
}

impl Default for ResumeData {
    fn default() -> Self {
        ResumeData {
            personal_info: Arc::default(),
            include_social_links: true,
            experience: Arc::default(),
            education: Arc::default(),
            skills: Arc::default(),
            sections: Arc::default(),
            projects: Arc::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub full_name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub summary: String,
    pub photo: String,
    pub linkedin: String,
    pub github: String,
    pub portfolio: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Experience {
    pub id: String,
    pub company: String,
    pub position: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub current: bool,
    /// Legacy freeform achievements, one per line.
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bullet_points: Option<StringList>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    pub id: String,
    pub school: String,
    pub degree: String,
    pub field: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpa: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Skill {
    pub id: String,
    pub name: String,
    /// Free-text proficiency label ("Expert", "8", ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomSection {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<StringList>,
}

impl CustomSection {
    /// Items to display: the structured list once it is non-empty, otherwise
    /// the non-blank lines of `content`.
    pub fn effective_items(&self) -> Vec<String> {
        match &self.items {
            Some(items) if !items.is_empty() => items.to_vec(),
            _ => self
                .content
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub role: String,
    pub description: String,
    pub technologies: StringList,
    pub tech_stack: StringList,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlights: Option<StringList>,
    pub url: String,
    pub github_url: String,
    pub start_date: String,
    pub end_date: String,
    pub current: bool,
}

impl Project {
    /// `technologies` followed by any `techStack` entries not already listed.
    pub fn all_technologies(&self) -> Vec<String> {
        let mut merged: Vec<String> = self.technologies.iter().cloned().collect();
        for tech in self.tech_stack.iter() {
            if !merged.iter().any(|t| t.eq_ignore_ascii_case(tech)) {
                merged.push(tech.clone());
            }
        }
        merged
    }
}

/// An entry that carries a structured bullet list next to a freeform description.
pub trait BulletedEntry {
    fn id(&self) -> &str;
    fn description(&self) -> &str;
    fn bullets(&self) -> Option<&StringList>;
    fn bullets_mut(&mut self) -> &mut Option<StringList>;

    /// Bullets to display: the structured list once it is non-empty, otherwise
    /// the description split into lines.
    fn effective_bullets(&self) -> Vec<String> {
        match self.bullets() {
            Some(list) if !list.is_empty() => list.to_vec(),
            _ => bullets_from_description(self.description()),
        }
    }
}

impl BulletedEntry for Experience {
    fn id(&self) -> &str {
        &self.id
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn bullets(&self) -> Option<&StringList> {
        self.bullet_points.as_ref()
    }

    fn bullets_mut(&mut self) -> &mut Option<StringList> {
        &mut self.bullet_points
    }
}

impl BulletedEntry for Project {
    fn id(&self) -> &str {
        &self.id
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn bullets(&self) -> Option<&StringList> {
        self.highlights.as_ref()
    }

    fn bullets_mut(&mut self) -> &mut Option<StringList> {
        &mut self.highlights
    }
}

/// Splits a freeform description into bullet lines, dropping blank lines and
/// leading `-` / `•` markers.
pub fn bullets_from_description(description: &str) -> Vec<String> {
    description
        .split('\n')
        .map(|line| {
            line.trim()
                .trim_start_matches(['-', '•'])
                .trim_start()
                .to_string()
        })
        .filter(|line| !line.is_empty())
        .collect()
}

/// Where a bulleted entry lives inside a [`ResumeData`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletTarget {
    Experience(usize),
    Project(usize),
}

impl BulletTarget {
    /// Path of the entry's bullet array, e.g. `experience[2].bulletPoints`.
    pub fn bullets_path(&self) -> DataPath {
        match *self {
            BulletTarget::Experience(i) => DataPath::root()
                .field("experience")
                .index(i)
                .field("bulletPoints"),
            BulletTarget::Project(i) => DataPath::root()
                .field("projects")
                .index(i)
                .field("highlights"),
        }
    }
}

impl ResumeData {
    /// Linear scan over experience, then projects, for the entry with `id`.
    pub fn find_bulleted(&self, id: &str) -> Option<BulletTarget> {
        if let Some(i) = self.experience.iter().position(|e| e.id() == id) {
            return Some(BulletTarget::Experience(i));
        }
        self.projects
            .iter()
            .position(|p| p.id() == id)
            .map(BulletTarget::Project)
    }

    pub fn bulleted(&self, target: BulletTarget) -> &dyn BulletedEntry {
        match target {
            BulletTarget::Experience(i) => self.experience[i].as_ref(),
            BulletTarget::Project(i) => self.projects[i].as_ref(),
        }
    }

    /// Copy-on-write access to one entry: only the containing array and the
    /// entry itself are copied, and only if they are shared.
    pub fn bulleted_mut(&mut self, target: BulletTarget) -> &mut dyn BulletedEntry {
        match target {
            BulletTarget::Experience(i) => {
                let entry: &mut Experience = Arc::make_mut(&mut Arc::make_mut(&mut self.experience)[i]);
                entry
            }
            BulletTarget::Project(i) => {
                let entry: &mut Project = Arc::make_mut(&mut Arc::make_mut(&mut self.projects)[i]);
                entry
            }
        }
    }

    /// First id that appears twice within one entity array, with that array's
    /// name. Empty ids are not compared.
    pub fn duplicate_id(&self) -> Option<(&'static str, String)> {
        fn first_repeat<'a>(ids: impl Iterator<Item = &'a str>) -> Option<String> {
            let mut seen = HashSet::new();
            ids.filter(|id| !id.is_empty())
                .find(|id| !seen.insert(*id))
                .map(str::to_string)
        }

        let arrays: [(&'static str, Option<String>); 5] = [
            ("experience", first_repeat(self.experience.iter().map(|e| e.id.as_str()))),
            ("education", first_repeat(self.education.iter().map(|e| e.id.as_str()))),
            ("skills", first_repeat(self.skills.iter().map(|s| s.id.as_str()))),
            ("sections", first_repeat(self.sections.iter().map(|s| s.id.as_str()))),
            ("projects", first_repeat(self.projects.iter().map(|p| p.id.as_str()))),
        ];
        arrays
            .into_iter()
            .find_map(|(name, repeat)| repeat.map(|id| (name, id)))
    }

    /// Demo resume shown before the user has typed anything.
    pub fn sample() -> Self {
        ResumeData {
            personal_info: Arc::new(PersonalInfo {
                full_name: "John Doe".to_string(),
                title: "Senior Software Engineer".to_string(),
                email: "john.doe@example.com".to_string(),
                phone: "+1 (555) 123-4567".to_string(),
                location: "San Francisco, CA".to_string(),
                summary: "Experienced software engineer with expertise in full-stack development, system architecture, and team leadership.".to_string(),
                linkedin: "linkedin.com/in/johndoe".to_string(),
                github: "github.com/johndoe".to_string(),
                ..PersonalInfo::default()
            }),
            include_social_links: true,
            experience: Arc::new(vec![Arc::new(Experience {
                id: "1".to_string(),
                company: "Tech Company".to_string(),
                position: "Senior Software Engineer".to_string(),
                start_date: "2020-01".to_string(),
                end_date: "2024-01".to_string(),
                description: "Led development of enterprise applications".to_string(),
                bullet_points: Some(Arc::new(vec![
                    "Built and maintained RESTful APIs serving 100K+ daily users".to_string(),
                    "Implemented automated testing reducing bugs by 40%".to_string(),
                ])),
                ..Experience::default()
            })]),
            education: Arc::new(vec![Arc::new(Education {
                id: "1".to_string(),
                school: "Columbia University".to_string(),
                degree: "Bachelor of Science".to_string(),
                field: "Computer Science".to_string(),
                start_date: "2012-09".to_string(),
                end_date: "2016-05".to_string(),
                ..Education::default()
            })]),
            skills: Arc::new(
                ["TypeScript", "Rust", "PostgreSQL", "System Design"]
                    .iter()
                    .enumerate()
                    .map(|(i, name)| {
                        Arc::new(Skill {
                            id: format!("skill-{i}"),
                            name: name.to_string(),
                            ..Skill::default()
                        })
                    })
                    .collect(),
            ),
            sections: Arc::default(),
            projects: Arc::new(vec![Arc::new(Project {
                id: "p1".to_string(),
                name: "Resume Builder".to_string(),
                role: "Creator".to_string(),
                description: "Template-driven resume editor with inline editing".to_string(),
                technologies: Arc::new(vec!["React".to_string(), "TypeScript".to_string()]),
                url: "https://example.com".to_string(),
                start_date: "2023-03".to_string(),
                current: true,
                ..Project::default()
            })]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_fields_default_on_load() {
        let data: ResumeData = serde_json::from_value(json!({
            "personalInfo": { "fullName": "Jane" },
            "experience": [{ "id": "e1", "company": "Acme" }]
        }))
        .unwrap();
        assert_eq!(data.personal_info.full_name, "Jane");
        assert_eq!(data.personal_info.title, "");
        assert!(data.include_social_links);
        assert_eq!(data.experience[0].company, "Acme");
        assert!(data.experience[0].bullet_points.is_none());
        assert!(data.education.is_empty());
    }

    #[test]
    fn test_serializes_camel_case_keys() {
        let value = serde_json::to_value(ResumeData::sample()).unwrap();
        assert_eq!(value["personalInfo"]["fullName"], "John Doe");
        assert_eq!(value["experience"][0]["startDate"], "2020-01");
        assert_eq!(value["projects"][0]["githubUrl"], "");
        assert!(value["includeSocialLinks"].as_bool().unwrap());
    }

    #[test]
    fn test_bullets_from_description_strips_markers() {
        let lines = bullets_from_description("- Led team\n\n• Shipped v2\n  Cut costs  ");
        assert_eq!(lines, vec!["Led team", "Shipped v2", "Cut costs"]);
    }

    #[test]
    fn test_effective_bullets_prefer_structured_list() {
        let exp = Experience {
            description: "Old line".to_string(),
            bullet_points: Some(Arc::new(vec!["New line".to_string()])),
            ..Experience::default()
        };
        assert_eq!(exp.effective_bullets(), vec!["New line"]);

        let empty_list = Experience {
            description: "Old line".to_string(),
            bullet_points: Some(Arc::new(vec![])),
            ..Experience::default()
        };
        assert_eq!(empty_list.effective_bullets(), vec!["Old line"]);
    }

    #[test]
    fn test_find_bulleted_searches_experience_then_projects() {
        let data = ResumeData::sample();
        assert_eq!(data.find_bulleted("1"), Some(BulletTarget::Experience(0)));
        assert_eq!(data.find_bulleted("p1"), Some(BulletTarget::Project(0)));
        assert_eq!(data.find_bulleted("missing"), None);
        assert_eq!(
            BulletTarget::Project(0).bullets_path().to_string(),
            "projects[0].highlights"
        );
    }

    #[test]
    fn test_bulleted_mut_copies_only_the_target_entry() {
        let before = ResumeData::sample();
        let mut after = before.clone();
        *after.bulleted_mut(BulletTarget::Project(0)).bullets_mut() =
            Some(Arc::new(vec!["Shipped v1".to_string()]));

        assert!(!Arc::ptr_eq(&before.projects, &after.projects));
        assert!(Arc::ptr_eq(&before.experience, &after.experience));
        assert_eq!(before.projects[0].highlights, None);
        assert_eq!(after.bulleted(BulletTarget::Project(0)).effective_bullets(), vec!["Shipped v1"]);
    }

    #[test]
    fn test_section_items_fall_back_to_content_lines() {
        let mut section = CustomSection {
            content: "AWS Certified\n\n  \nCKA".to_string(),
            ..CustomSection::default()
        };
        assert_eq!(section.effective_items(), vec!["AWS Certified", "CKA"]);

        section.items = Some(Arc::new(vec!["Only item".to_string()]));
        assert_eq!(section.effective_items(), vec!["Only item"]);
    }

    #[test]
    fn test_duplicate_id_per_array() {
        let mut data = ResumeData::sample();
        assert_eq!(data.duplicate_id(), None);

        Arc::make_mut(&mut data.skills).push(Arc::new(Skill {
            id: "skill-1".to_string(),
            ..Skill::default()
        }));
        assert_eq!(data.duplicate_id(), Some(("skills", "skill-1".to_string())));

        // Same id in different arrays is fine; empty ids are never compared.
        let data: ResumeData = serde_json::from_value(json!({
            "experience": [{ "id": "1" }, { "id": "" }, { "id": "" }],
            "education": [{ "id": "1" }]
        }))
        .unwrap();
        assert_eq!(data.duplicate_id(), None);
    }

    #[test]
    fn test_all_technologies_merges_without_duplicates() {
        let project = Project {
            technologies: Arc::new(vec!["Rust".to_string(), "Axum".to_string()]),
            tech_stack: Arc::new(vec!["rust".to_string(), "Tokio".to_string()]),
            ..Project::default()
        };
        assert_eq!(project.all_technologies(), vec!["Rust", "Axum", "Tokio"]);
    }
}
