//! Project submission.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::time::Duration;
use thiserror::Error;

use crate::application::upload::{ProjectIds, build_project};
use crate::domain::{Project, SubmitRequest};

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("upload rejected: {0}")]
    Rejected(String),
}

#[async_trait]
pub trait ProjectSubmitter: Send + Sync {
    async fn submit(&self, request: SubmitRequest) -> Result<Project, SubmitError>;
}

/// Accepts every submission after a fixed delay and builds the project locally.
#[derive(Debug)]
pub struct LocalSubmitter {
    delay: Duration,
    ids: Mutex<ProjectIds>,
}

impl LocalSubmitter {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            ids: Mutex::new(ProjectIds::default()),
        }
    }
}

#[async_trait]
impl ProjectSubmitter for LocalSubmitter {
    async fn submit(&self, request: SubmitRequest) -> Result<Project, SubmitError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let now = Utc::now();
        let id = self.ids.lock().next(now);
        let project = build_project(&request, id, now);
        log::info!(
            "Accepted upload {} ({} files, codebase {})",
            project.id,
            request.files.len(),
            project.codebase_ref
        );
        Ok(project)
    }
}
