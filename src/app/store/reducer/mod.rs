pub mod analysis;
pub mod async_handler;
pub mod connection;
pub mod navigation;
pub mod projects;
pub mod settings;
pub mod upload;

use super::super::state::AppState;
use super::action::Action;
use super::command::Command;

pub fn reduce(state: &mut AppState, action: Action) -> Vec<Command> {
    match action {
        Action::Navigation(action) => navigation::reduce(state, action),
        Action::Upload(action) => upload::reduce(state, action),
        Action::Projects(action) => projects::reduce(state, action),
        Action::Analysis(action) => analysis::reduce(state, action),
        Action::Settings(action) => settings::reduce(state, action),
        Action::Connection(action) => connection::reduce(state, action),
        Action::Async(action) => async_handler::reduce(state, action),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::{AppView, NotificationLevel};
    use crate::application::upload::build_project;
    use crate::app::store::action::{
        AnalysisAction, AsyncAction, ConnectionAction, NavigationAction, ProjectsAction,
        SettingsAction, UploadAction,
    };
    use crate::domain::{
        AccessType, AnalysisResult, DraftFile, IntegrationKind, ProjectKind, ProjectPatch,
        ProjectStatus, ProjectType, SubmitRequest, UploadStep,
    };
    use crate::infra::api::fallback_projects;
    use crate::infra::realtime::{DebugResponse, InboundEvent, OutboundEvent, ProjectUpdate};
    use serde_json::json;

    fn connected_state() -> AppState {
        let mut state = AppState::default();
        reduce(
            &mut state,
            Action::Async(AsyncAction::Channel(InboundEvent::Connected)),
        );
        state
    }

    fn levels(state: &AppState) -> Vec<(NotificationLevel, &str)> {
        state
            .notifications
            .iter()
            .map(|n| (n.level, n.message.as_str()))
            .collect()
    }

    #[test]
    fn switching_to_projects_loads_once() {
        let mut state = AppState::default();

        let commands = reduce(
            &mut state,
            Action::Navigation(NavigationAction::SwitchTo(AppView::Projects)),
        );
        assert_eq!(state.current_view, AppView::Projects);
        assert_eq!(commands, vec![Command::LoadProjects]);

        let commands = reduce(&mut state, Action::Projects(ProjectsAction::Refresh));
        assert!(commands.is_empty(), "a load is already in flight");

        reduce(
            &mut state,
            Action::Async(AsyncAction::ProjectsLoaded(fallback_projects())),
        );
        assert!(!state.is_loading_projects);
        assert_eq!(state.projects.len(), 2);
    }

    #[test]
    fn invalid_project_list_falls_back() {
        let mut state = AppState::default();
        let mut broken = fallback_projects();
        broken[0].bugs_fixed = 99;

        reduce(&mut state, Action::Async(AsyncAction::ProjectsLoaded(broken)));

        assert_eq!(state.projects.all(), fallback_projects().as_slice());
    }

    #[test]
    fn files_upload_submits_and_resets_on_success() {
        let mut state = AppState::default();
        reduce(
            &mut state,
            Action::Upload(UploadAction::SelectType(ProjectType::Files)),
        );
        reduce(
            &mut state,
            Action::Upload(UploadAction::AddFiles(vec![
                DraftFile::new("a.py", 1, "a.py"),
                DraftFile::new("logo.png", 1, "logo.png"),
            ])),
        );
        assert_eq!(
            levels(&state),
            vec![
                (NotificationLevel::Success, "Added 1 files"),
                (NotificationLevel::Error, "Unsupported file type: logo.png"),
            ]
        );

        let commands = reduce(&mut state, Action::Upload(UploadAction::Submit));
        let request = match commands.as_slice() {
            [Command::SubmitProject(request)] => request.clone(),
            other => panic!("expected submit command, got {other:?}"),
        };
        assert!(state.upload.is_submitting());

        let project = build_project(&request, "proj_1".into(), chrono::Utc::now());
        reduce(
            &mut state,
            Action::Async(AsyncAction::ProjectSubmitted(Ok(project))),
        );

        assert!(state.upload.draft().is_pristine());
        assert!(!state.upload.is_submitting());
        assert_eq!(state.projects.len(), 1);
        assert_eq!(state.projects.all()[0].kind, ProjectKind::Script);
        assert_eq!(
            state.notifications.last().map(|n| n.message.as_str()),
            Some("Project uploaded successfully!")
        );
    }

    #[test]
    fn failed_upload_keeps_draft() {
        let mut state = AppState::default();
        reduce(
            &mut state,
            Action::Upload(UploadAction::SelectType(ProjectType::App)),
        );
        reduce(
            &mut state,
            Action::Upload(UploadAction::SetName("Shop".into())),
        );
        reduce(
            &mut state,
            Action::Upload(UploadAction::AddFiles(vec![DraftFile::new("app.js", 1, "app.js")])),
        );
        reduce(&mut state, Action::Upload(UploadAction::Continue));
        assert_eq!(state.upload.step(), UploadStep::CodebaseAccess);

        let commands = reduce(&mut state, Action::Upload(UploadAction::Submit));
        assert!(commands.is_empty(), "codebase URL is required");

        reduce(
            &mut state,
            Action::Upload(UploadAction::SetCodebaseUrl("https://github.com/u/shop".into())),
        );
        let commands = reduce(&mut state, Action::Upload(UploadAction::Submit));
        assert_eq!(commands.len(), 1);

        reduce(
            &mut state,
            Action::Async(AsyncAction::ProjectSubmitted(Err("offline".into()))),
        );
        assert_eq!(state.upload.step(), UploadStep::CodebaseAccess);
        assert_eq!(state.upload.draft().name, "Shop");
        assert_eq!(
            state.notifications.last().map(|n| (n.level, n.message.as_str())),
            Some((NotificationLevel::Error, "Failed to upload project"))
        );
    }

    #[test]
    fn blank_code_is_not_sent() {
        let mut state = connected_state();
        reduce(
            &mut state,
            Action::Analysis(AnalysisAction::UpdateCode("   \n".into())),
        );

        let commands = reduce(&mut state, Action::Analysis(AnalysisAction::Run));

        assert!(commands.is_empty());
        assert!(!state.analysis.is_analyzing);
        assert_eq!(
            levels(&state),
            vec![(NotificationLevel::Error, "Please enter some code to analyze")]
        );
    }

    #[test]
    fn analysis_resolves_once_by_id() {
        let mut state = connected_state();
        reduce(
            &mut state,
            Action::Analysis(AnalysisAction::UpdateCode("let x = 1;".into())),
        );
        let commands = reduce(&mut state, Action::Analysis(AnalysisAction::Run));
        let id = match commands.as_slice() {
            [Command::Emit(OutboundEvent::AnalyzeCode(request))] => {
                assert_eq!(request.code, "let x = 1;");
                request.analysis_id.clone()
            }
            other => panic!("expected analyze-code emit, got {other:?}"),
        };
        assert!(state.analysis.is_analyzing);

        let push = || {
            Action::Async(AsyncAction::Channel(InboundEvent::AnalysisComplete(
                AnalysisResult::from_payload(json!({"analysisId": id, "issues": [1, 2]})),
            )))
        };
        reduce(&mut state, push());
        reduce(&mut state, push());

        assert!(!state.analysis.is_analyzing);
        assert_eq!(state.analysis.results.len(), 1);
        assert_eq!(state.feed.len(), 1);

        // a push for another client's request is ignored
        reduce(
            &mut state,
            Action::Async(AsyncAction::Channel(InboundEvent::AnalysisComplete(
                AnalysisResult::from_payload(json!({"analysisId": "1"})),
            ))),
        );
        assert_eq!(state.analysis.results.len(), 1);
    }

    #[test]
    fn reconnect_rejoins_projects() {
        let mut state = AppState::default();
        let commands = reduce(
            &mut state,
            Action::Projects(ProjectsAction::Join("proj_001".into())),
        );
        assert!(commands.is_empty(), "offline joins are deferred");

        let commands = reduce(
            &mut state,
            Action::Async(AsyncAction::Channel(InboundEvent::Connected)),
        );
        assert_eq!(
            commands,
            vec![Command::Emit(OutboundEvent::JoinProject("proj_001".into()))]
        );

        let commands = reduce(
            &mut state,
            Action::Projects(ProjectsAction::Join("proj_002".into())),
        );
        assert_eq!(
            commands,
            vec![Command::Emit(OutboundEvent::JoinProject("proj_002".into()))]
        );

        reduce(
            &mut state,
            Action::Async(AsyncAction::Channel(InboundEvent::Disconnected)),
        );
        assert!(!state.connection.connected);
        let commands = reduce(
            &mut state,
            Action::Async(AsyncAction::Channel(InboundEvent::Connected)),
        );
        assert_eq!(commands.len(), 2);
    }

    #[test]
    fn connect_is_not_requested_twice() {
        let mut state = AppState::default();
        let first = reduce(&mut state, Action::Connection(ConnectionAction::Connect));
        let second = reduce(&mut state, Action::Connection(ConnectionAction::Connect));
        assert_eq!(first, vec![Command::Connect]);
        assert!(second.is_empty());

        reduce(
            &mut state,
            Action::Async(AsyncAction::ConnectFinished(Err("refused".into()))),
        );
        assert!(!state.connection.is_connecting);
        assert_eq!(state.connection.last_error.as_deref(), Some("refused"));
    }

    #[test]
    fn connect_settles_only_on_channel_event() {
        let mut state = AppState::default();
        reduce(&mut state, Action::Connection(ConnectionAction::Connect));

        reduce(
            &mut state,
            Action::Async(AsyncAction::ConnectFinished(Ok(()))),
        );
        assert!(state.connection.is_connecting);
        assert!(!state.connection.connected);

        reduce(
            &mut state,
            Action::Async(AsyncAction::Channel(InboundEvent::Connected)),
        );
        assert!(!state.connection.is_connecting);
        assert!(state.connection.connected);

        // the channel event may also arrive before the runtime result
        let mut state = AppState::default();
        reduce(&mut state, Action::Connection(ConnectionAction::Connect));
        reduce(
            &mut state,
            Action::Async(AsyncAction::Channel(InboundEvent::Connected)),
        );
        reduce(
            &mut state,
            Action::Async(AsyncAction::ConnectFinished(Ok(()))),
        );
        assert!(!state.connection.is_connecting);
        assert!(state.connection.connected);
    }

    #[test]
    fn unsent_analysis_is_cancelled() {
        let mut state = connected_state();
        reduce(
            &mut state,
            Action::Analysis(AnalysisAction::UpdateCode("print(1)".into())),
        );
        let commands = reduce(&mut state, Action::Analysis(AnalysisAction::Run));
        let id = match commands.as_slice() {
            [Command::Emit(OutboundEvent::AnalyzeCode(request))] => request.analysis_id.clone(),
            other => panic!("expected analyze-code emit, got {other:?}"),
        };
        state.take_notifications();

        reduce(
            &mut state,
            Action::Async(AsyncAction::AnalysisEmitFailed(id.clone())),
        );
        assert!(!state.analysis.is_analyzing);
        assert!(!state.analysis.tracker.is_pending(&id));
        assert_eq!(
            levels(&state),
            vec![(NotificationLevel::Error, "Could not send code for analysis")]
        );

        // a second report for the same id changes nothing
        reduce(&mut state, Action::Async(AsyncAction::AnalysisEmitFailed(id)));
        assert_eq!(state.notifications.len(), 1);
    }

    #[test]
    fn stray_submit_result_is_ignored() {
        let mut state = AppState::default();
        let request = SubmitRequest {
            project_type: ProjectType::Files,
            name: "Ghost".into(),
            description: String::new(),
            files: vec![DraftFile::new("a.py", 1, "a.py")],
            codebase_url: String::new(),
            access_type: AccessType::ReadOnly,
        };
        let project = build_project(&request, "proj_1".into(), chrono::Utc::now());

        reduce(
            &mut state,
            Action::Async(AsyncAction::ProjectSubmitted(Ok(project))),
        );

        assert!(state.projects.is_empty());
        assert!(state.notifications.is_empty());
    }

    #[test]
    fn pushes_land_in_feed() {
        let mut state = AppState::default();
        state.projects.replace_all(fallback_projects()).unwrap();

        reduce(
            &mut state,
            Action::Async(AsyncAction::Channel(InboundEvent::DebugResponse(DebugResponse {
                message: "Breakpoint hit".into(),
                timestamp: Some("2024-01-01T00:00:00Z".into()),
            }))),
        );
        reduce(
            &mut state,
            Action::Async(AsyncAction::Channel(InboundEvent::ProjectUpdate(ProjectUpdate {
                id: "proj_002".into(),
                patch: ProjectPatch {
                    status: Some(ProjectStatus::Completed),
                    bugs_fixed: Some(5),
                    ..Default::default()
                },
            }))),
        );
        // violates bugsFixed <= bugsFound and is dropped
        reduce(
            &mut state,
            Action::Async(AsyncAction::Channel(InboundEvent::ProjectUpdate(ProjectUpdate {
                id: "proj_001".into(),
                patch: ProjectPatch {
                    bugs_fixed: Some(13),
                    ..Default::default()
                },
            }))),
        );

        let feed = state.feed.snapshot();
        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0].message, "Data Processing Script is now completed (5/5 bugs fixed)");
        assert_eq!(feed[1].message, "Breakpoint hit");
        assert_eq!(feed[1].reported_at.as_deref(), Some("2024-01-01T00:00:00Z"));
        assert_eq!(state.projects.get("proj_001").map(|p| p.bugs_fixed), Some(10));
    }

    #[test]
    fn settings_commands_notify_and_undo() {
        let mut state = AppState::default();
        reduce(
            &mut state,
            Action::Settings(SettingsAction::Connect {
                kind: IntegrationKind::Repository,
                name: "GitHub".into(),
            }),
        );
        reduce(
            &mut state,
            Action::Settings(SettingsAction::Connect {
                kind: IntegrationKind::Repository,
                name: "GitHub".into(),
            }),
        );
        assert!(
            state
                .settings
                .current()
                .is_connected(IntegrationKind::Repository, "GitHub")
        );
        assert_eq!(state.notifications[0].level, NotificationLevel::Success);
        assert_eq!(state.notifications[1].level, NotificationLevel::Error);

        reduce(&mut state, Action::Settings(SettingsAction::Undo));
        assert!(state.settings.current().is_empty());
    }
}
