//! HTTP access to the backend project list.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::domain::{LOCAL_FILES, Project, ProjectKind, ProjectStatus};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned HTTP {0}")]
    Status(u16),

    #[error("invalid projects payload: {0}")]
    Decode(String),
}

#[async_trait]
pub trait ProjectsApi: Send + Sync {
    async fn list_projects(&self) -> Result<Vec<Project>, ApiError>;
}

#[derive(Debug, Deserialize)]
struct ProjectsEnvelope {
    projects: Vec<Project>,
}

pub struct HttpProjectsApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpProjectsApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn projects_url(&self) -> String {
        format!("{}/api/projects", self.base_url)
    }
}

#[async_trait]
impl ProjectsApi for HttpProjectsApi {
    async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        let response = self.client.get(self.projects_url()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }
        let body = response.bytes().await?;
        let envelope: ProjectsEnvelope =
            serde_json::from_slice(&body).map_err(|err| ApiError::Decode(err.to_string()))?;
        Ok(envelope.projects)
    }
}

/// Serves a fixed project list without touching the network.
#[derive(Debug, Clone, Default)]
pub struct StaticProjectsApi {
    projects: Vec<Project>,
}

impl StaticProjectsApi {
    pub fn new(projects: Vec<Project>) -> Self {
        Self { projects }
    }
}

#[async_trait]
impl ProjectsApi for StaticProjectsApi {
    async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        Ok(self.projects.clone())
    }
}

fn fixed_time(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}

/// Fixed list shown when the backend cannot be reached.
pub fn fallback_projects() -> Vec<Project> {
    vec![
        Project {
            id: "proj_001".to_string(),
            name: "E-commerce Website".to_string(),
            kind: ProjectKind::WebApplication,
            status: ProjectStatus::Completed,
            last_modified: fixed_time(1_705_314_600),
            bugs_found: 12,
            bugs_fixed: 10,
            codebase_ref: "https://github.com/user/ecommerce-site".to_string(),
            language: "JavaScript".to_string(),
        },
        Project {
            id: "proj_002".to_string(),
            name: "Data Processing Script".to_string(),
            kind: ProjectKind::Script,
            status: ProjectStatus::InProgress,
            last_modified: fixed_time(1_705_247_100),
            bugs_found: 5,
            bugs_fixed: 3,
            codebase_ref: LOCAL_FILES.to_string(),
            language: "Python".to_string(),
        },
    ]
}

/// Fetches the project list, substituting [`fallback_projects`] on any failure.
pub async fn load_projects_or_fallback(api: &dyn ProjectsApi) -> Vec<Project> {
    match api.list_projects().await {
        Ok(projects) => {
            log::debug!("Fetched {} projects", projects.len());
            projects
        }
        Err(err) => {
            log::warn!("Failed to fetch projects, using fallback data: {}", err);
            fallback_projects()
        }
    }
}
