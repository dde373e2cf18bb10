use super::super::super::DebugFlowApp;
use super::super::action::{Action, AsyncAction};
use crate::infra::api::load_projects_or_fallback;

pub fn load_projects(app: &mut DebugFlowApp) {
    let api = app.projects_api.clone();
    let action_tx = app.action_tx.clone();

    tokio::spawn(async move {
        let projects = load_projects_or_fallback(api.as_ref()).await;
        let _ = action_tx
            .send(Action::Async(AsyncAction::ProjectsLoaded(projects)))
            .await;
    });
}
