use super::super::super::DebugFlowApp;
use super::super::action::{Action, AsyncAction};
use crate::domain::SubmitRequest;

pub fn submit_project(app: &mut DebugFlowApp, request: SubmitRequest) {
    let submitter = app.submitter.clone();
    let action_tx = app.action_tx.clone();

    tokio::spawn(async move {
        let result = submitter
            .submit(request)
            .await
            .map_err(|err| err.to_string());
        let _ = action_tx
            .send(Action::Async(AsyncAction::ProjectSubmitted(result)))
            .await;
    });
}
