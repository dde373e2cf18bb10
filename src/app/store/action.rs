use crate::app::state::AppView;
use crate::application::projects::ProjectSort;
use crate::domain::{
    AccessType, AnalysisId, DraftFile, IntegrationKind, Project, ProjectId, ProjectStatus,
    ProjectType,
};
use crate::infra::realtime::InboundEvent;

#[derive(Debug)]
pub enum Action {
    Navigation(NavigationAction),
    Upload(UploadAction),
    Projects(ProjectsAction),
    Analysis(AnalysisAction),
    Settings(SettingsAction),
    Connection(ConnectionAction),
    Async(AsyncAction),
}

#[derive(Debug)]
pub enum NavigationAction {
    SwitchTo(AppView),
}

#[derive(Debug)]
pub enum UploadAction {
    SelectType(ProjectType),
    SetName(String),
    SetDescription(String),
    SetCodebaseUrl(String),
    SetAccessType(AccessType),
    AddFiles(Vec<DraftFile>),
    RemoveFile(usize),
    Continue,
    Back,
    Cancel,
    Submit,
}

#[derive(Debug)]
pub enum ProjectsAction {
    Refresh,
    Join(ProjectId),
    SetSearch(String),
    SetStatusFilter(Option<ProjectStatus>),
    SetSort(ProjectSort),
}

#[derive(Debug)]
pub enum AnalysisAction {
    UpdateCode(String),
    Run,
    ClearResults,
}

#[derive(Debug)]
pub enum SettingsAction {
    Connect { kind: IntegrationKind, name: String },
    Disconnect { kind: IntegrationKind, name: String },
    Undo,
}

#[derive(Debug)]
pub enum ConnectionAction {
    Connect,
    Disconnect,
}

/// Results reported back by the runtime.
#[derive(Debug)]
pub enum AsyncAction {
    ProjectsLoaded(Vec<Project>),
    ProjectSubmitted(Result<Project, String>),
    ConnectFinished(Result<(), String>),
    /// The `analyze-code` request with this id could not be sent.
    AnalysisEmitFailed(AnalysisId),
    Channel(InboundEvent),
}
