//! Application store for the DebugFlow client.
//!
//! This module holds the process-wide state, the action/command plumbing and the root
//! `DebugFlowApp` that ties the store to the realtime channel and backend adapters.

mod init;
mod polling;
mod root;
mod state;
mod store;

pub use root::DebugFlowApp;
pub use state::{
    AnalysisState, AppState, AppView, ConnectionStatus, Notification, NotificationLevel,
};
pub use store::{
    Action, AnalysisAction, AsyncAction, Command, ConnectionAction, NavigationAction,
    ProjectsAction, SettingsAction, UploadAction,
};
