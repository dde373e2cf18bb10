use uuid::Uuid;

use crate::application::analysis::AnalysisTracker;
use crate::application::feed::ActivityFeed;
use crate::application::projects::{ProjectCollection, ProjectQuery};
use crate::application::settings::SettingsStore;
use crate::application::upload::UploadWorkflow;
use crate::domain::{AnalysisResult, ProjectId};
use crate::infra::app_config::AppConfig;

/// Which screen is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppView {
    #[default]
    Dashboard,
    Upload,
    Projects,
    Analysis,
    Settings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
    Info,
}

/// Transient toast shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: Uuid,
    pub level: NotificationLevel,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionStatus {
    pub connected: bool,
    pub is_connecting: bool,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AnalysisState {
    pub code: String,
    pub tracker: AnalysisTracker,
    /// Completed results, newest last.
    pub results: Vec<AnalysisResult>,
    pub is_analyzing: bool,
}

/// All app state in one struct.
#[derive(Debug, Default)]
pub struct AppState {
    pub current_view: AppView,
    pub connection: ConnectionStatus,

    pub upload: UploadWorkflow,

    pub projects: ProjectCollection,
    pub project_query: ProjectQuery,
    pub is_loading_projects: bool,
    /// Projects subscribed with `join-project`, in join order. Re-sent after every reconnect.
    pub joined_projects: Vec<ProjectId>,

    pub feed: ActivityFeed,
    pub analysis: AnalysisState,
    pub settings: SettingsStore,

    pub notifications: Vec<Notification>,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            feed: ActivityFeed::with_capacity(config.feed_capacity),
            ..Default::default()
        }
    }

    pub fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.notifications.push(Notification {
            id: Uuid::new_v4(),
            level,
            message: message.into(),
        });
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }
}
