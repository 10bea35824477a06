use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::resume::{BulletedEntry, Project, ResumeData};
use crate::widgets::date::{format_range, DateFormat};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectsVariant {
    #[default]
    Standard,
    Cards,
    Detailed,
}

impl ProjectsVariant {
    /// Unknown keys fall back to the standard layout.
    pub fn from_key(key: &str) -> Self {
        key.parse().unwrap_or_else(|_| {
            debug!("Unknown projects variant '{key}', using standard");
            ProjectsVariant::Standard
        })
    }
}

impl FromStr for ProjectsVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(ProjectsVariant::Standard),
            "cards" => Ok(ProjectsVariant::Cards),
            "detailed" => Ok(ProjectsVariant::Detailed),
            other => Err(format!("unknown projects variant '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProjectLink {
    pub label: &'static str,
    pub url: String,
}

/// What one project looks like in the chosen layout. Fields a layout does not
/// show stay empty.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectCard {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dates: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub technologies: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<ProjectLink>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub highlights: Vec<String>,
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn links(project: &Project) -> Vec<ProjectLink> {
    let mut links = Vec::new();
    if let Some(url) = non_empty(&project.url) {
        links.push(ProjectLink { label: "Live", url });
    }
    if let Some(url) = non_empty(&project.github_url) {
        links.push(ProjectLink {
            label: "GitHub",
            url,
        });
    }
    links
}

fn dates(project: &Project) -> Option<String> {
    non_empty(&format_range(
        &project.start_date,
        &project.end_date,
        project.current,
        DateFormat::Short,
    ))
}

fn standard_card(project: &Project) -> ProjectCard {
    ProjectCard {
        id: project.id.clone(),
        name: project.name.clone(),
        role: non_empty(&project.role),
        dates: dates(project),
        description: non_empty(&project.description),
        ..ProjectCard::default()
    }
}

fn compact_card(project: &Project) -> ProjectCard {
    ProjectCard {
        id: project.id.clone(),
        name: project.name.clone(),
        description: non_empty(&project.description),
        technologies: project.all_technologies(),
        links: links(project),
        ..ProjectCard::default()
    }
}

fn detailed_card(project: &Project) -> ProjectCard {
    let highlights = project.effective_bullets();
    ProjectCard {
        id: project.id.clone(),
        name: project.name.clone(),
        role: non_empty(&project.role),
        dates: dates(project),
        // Highlights already carry the description when they were split from it.
        description: if project.highlights.as_ref().is_some_and(|h| !h.is_empty()) {
            non_empty(&project.description)
        } else {
            None
        },
        technologies: project.all_technologies(),
        links: links(project),
        highlights,
    }
}

/// Dispatches every project to the layout `variant` selects.
pub fn render_projects(data: &ResumeData, variant: ProjectsVariant) -> Vec<ProjectCard> {
    let render: fn(&Project) -> ProjectCard = match variant {
        ProjectsVariant::Standard => standard_card,
        ProjectsVariant::Cards => compact_card,
        ProjectsVariant::Detailed => detailed_card,
    };
    data.projects.iter().map(|p| render(p)).collect()
}
