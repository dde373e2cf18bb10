//! Process-wide project list: insertion ordered, updated in place by id.

use std::cmp::Reverse;

use crate::domain::{Project, ProjectError, ProjectPatch, ProjectStatus};

/// Sort order for the project list screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectSort {
    /// Newest first.
    #[default]
    LastModified,
    Name,
    Status,
}

/// Search and filter controls of the project list screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectQuery {
    /// Case-insensitive match against name or language.
    pub search: String,
    /// `None` shows every status.
    pub status: Option<ProjectStatus>,
    pub sort: ProjectSort,
}

/// Dashboard counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectStats {
    pub total_projects: usize,
    pub bugs_found: u64,
    pub bugs_fixed: u64,
}

#[derive(Debug, Clone, Default)]
pub struct ProjectCollection {
    projects: Vec<Project>,
}

fn check_counts(found: u32, fixed: u32) -> Result<(), ProjectError> {
    if fixed > found {
        return Err(ProjectError::InvalidCounts { found, fixed });
    }
    Ok(())
}

impl ProjectCollection {
    pub fn new(projects: Vec<Project>) -> Result<Self, ProjectError> {
        let mut collection = Self::default();
        collection.replace_all(projects)?;
        Ok(collection)
    }

    pub fn all(&self) -> &[Project] {
        &self.projects
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Replaces the whole list. Rejected as a unit if any project breaks the count invariant.
    pub fn replace_all(&mut self, projects: Vec<Project>) -> Result<(), ProjectError> {
        for project in &projects {
            check_counts(project.bugs_found, project.bugs_fixed)?;
        }
        self.projects = projects;
        Ok(())
    }

    /// Appends a project; a project with the same id is replaced where it stands.
    pub fn insert(&mut self, project: Project) -> Result<(), ProjectError> {
        check_counts(project.bugs_found, project.bugs_fixed)?;
        match self.projects.iter_mut().find(|p| p.id == project.id) {
            Some(existing) => *existing = project,
            None => self.projects.push(project),
        }
        Ok(())
    }

    /// Applies `patch` in place. The project is left untouched when the result would have
    /// more bugs fixed than found.
    pub fn update(&mut self, id: &str, patch: &ProjectPatch) -> Result<&Project, ProjectError> {
        let project = self
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ProjectError::NotFound(id.to_string()))?;

        let found = patch.bugs_found.unwrap_or(project.bugs_found);
        let fixed = patch.bugs_fixed.unwrap_or(project.bugs_fixed);
        check_counts(found, fixed)?;

        project.bugs_found = found;
        project.bugs_fixed = fixed;
        if let Some(status) = patch.status {
            project.status = status;
        }
        if let Some(last_modified) = patch.last_modified {
            project.last_modified = last_modified;
        }
        Ok(project)
    }

    pub fn remove(&mut self, id: &str) -> Option<Project> {
        let index = self.projects.iter().position(|p| p.id == id)?;
        Some(self.projects.remove(index))
    }

    pub fn query(&self, query: &ProjectQuery) -> Vec<&Project> {
        let needle = query.search.trim().to_lowercase();
        let mut matches: Vec<&Project> = self
            .projects
            .iter()
            .filter(|p| query.status.is_none_or(|status| p.status == status))
            .filter(|p| {
                needle.is_empty()
                    || p.name.to_lowercase().contains(&needle)
                    || p.language.to_lowercase().contains(&needle)
            })
            .collect();

        match query.sort {
            ProjectSort::LastModified => matches.sort_by_key(|p| Reverse(p.last_modified)),
            ProjectSort::Name => matches.sort_by(|a, b| a.name.cmp(&b.name)),
            ProjectSort::Status => matches.sort_by(|a, b| a.status.as_str().cmp(b.status.as_str())),
        }
        matches
    }

    /// First `n` projects in list order.
    pub fn recent(&self, n: usize) -> &[Project] {
        &self.projects[..n.min(self.projects.len())]
    }

    pub fn stats(&self) -> ProjectStats {
        ProjectStats {
            total_projects: self.projects.len(),
            bugs_found: self.projects.iter().map(|p| u64::from(p.bugs_found)).sum(),
            bugs_fixed: self.projects.iter().map(|p| u64::from(p.bugs_fixed)).sum(),
        }
    }
}
