use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque project identifier, e.g. `proj_1718000000000`.
pub type ProjectId = String;

/// Codebase reference used when a project was uploaded without a repository URL.
pub const LOCAL_FILES: &str = "Local Files";

/// A project tracked by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ProjectKind,
    pub status: ProjectStatus,
    pub last_modified: DateTime<Utc>,
    pub bugs_found: u32,
    pub bugs_fixed: u32,
    /// Repository URL, or [`LOCAL_FILES`].
    #[serde(rename = "codebase", alias = "codebaseRef")]
    pub codebase_ref: String,
    pub language: String,
}

impl Project {
    pub fn is_local(&self) -> bool {
        self.codebase_ref == LOCAL_FILES
    }
}

/// Display category of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectKind {
    #[serde(rename = "Web Application")]
    WebApplication,
    #[serde(rename = "Script")]
    Script,
    #[serde(other)]
    Other,
}

impl fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WebApplication => write!(f, "Web Application"),
            Self::Script => write!(f, "Script"),
            Self::Other => write!(f, "Other"),
        }
    }
}

/// Lifecycle status of a project, driven by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    #[default]
    Analyzing,
    InProgress,
    Completed,
    Failed,
}

impl ProjectStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Analyzing => "analyzing",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "analyzing" => Ok(Self::Analyzing),
            "in-progress" | "inprogress" => Ok(Self::InProgress),
            "completed" | "done" => Ok(Self::Completed),
            "failed" | "error" => Ok(Self::Failed),
            other => Err(format!("unknown project status: {other}")),
        }
    }
}

/// Partial update applied to a project in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    #[serde(default)]
    pub status: Option<ProjectStatus>,
    #[serde(default)]
    pub bugs_found: Option<u32>,
    #[serde(default)]
    pub bugs_fixed: Option<u32>,
    #[serde(default)]
    pub last_modified: Option<DateTime<Utc>>,
}

impl ProjectPatch {
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.bugs_found.is_none()
            && self.bugs_fixed.is_none()
            && self.last_modified.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_uses_wire_field_names() {
        let json = r#"{
            "id": "proj_1",
            "name": "Shop",
            "type": "Web Application",
            "status": "in-progress",
            "lastModified": "2024-01-15T10:30:00Z",
            "bugsFound": 4,
            "bugsFixed": 1,
            "codebaseRef": "https://github.com/user/shop",
            "language": "TypeScript"
        }"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.kind, ProjectKind::WebApplication);
        assert_eq!(project.status, ProjectStatus::InProgress);
        assert_eq!(project.codebase_ref, "https://github.com/user/shop");

        let value = serde_json::to_value(&project).unwrap();
        assert_eq!(value["codebase"], "https://github.com/user/shop");
        assert_eq!(value["bugsFound"], 4);
        assert_eq!(value["type"], "Web Application");
    }

    #[test]
    fn unknown_kind_maps_to_other() {
        let kind: ProjectKind = serde_json::from_str("\"Mobile App\"").unwrap();
        assert_eq!(kind, ProjectKind::Other);
    }

    #[test]
    fn status_parse_accepts_variants() {
        assert_eq!(
            ProjectStatus::from_str("IN_PROGRESS").unwrap(),
            ProjectStatus::InProgress
        );
        assert_eq!(ProjectStatus::Completed.to_string(), "completed");
        assert!(ProjectStatus::from_str("paused").is_err());
    }
}
