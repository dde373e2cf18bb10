use super::super::super::DebugFlowApp;
use super::super::action::{Action, AsyncAction};
use crate::infra::realtime::OutboundEvent;

pub fn connect(app: &mut DebugFlowApp) {
    let manager = app.connection.clone();
    let action_tx = app.action_tx.clone();

    tokio::spawn(async move {
        let result = manager
            .connect()
            .await
            .map(|_| ())
            .map_err(|err| err.to_string());

        let _ = action_tx
            .send(Action::Async(AsyncAction::ConnectFinished(result)))
            .await;
    });
}

pub fn disconnect(app: &mut DebugFlowApp) {
    if !app.connection.close() {
        log::debug!("disconnect requested without an open channel");
    }
}

pub fn emit(app: &mut DebugFlowApp, event: OutboundEvent) {
    match app.connection.emit(&event) {
        Ok(()) => log::debug!("emitted {}", event.name()),
        Err(err) => {
            log::warn!("Failed to emit {}: {}", event.name(), err);
            if let OutboundEvent::AnalyzeCode(request) = event {
                let action = AsyncAction::AnalysisEmitFailed(request.analysis_id);
                let action_tx = app.action_tx.clone();
                tokio::spawn(async move {
                    let _ = action_tx.send(Action::Async(action)).await;
                });
            }
        }
    }
}
